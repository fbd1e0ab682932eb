//! SQLite persistence for users, cars, and offers.
//!
//! Schema is bootstrapped in code via `CREATE TABLE IF NOT EXISTS` on startup;
//! the dynamic listing query lives in [`cars`].

pub mod cars;

use anyhow::{anyhow, Context as _, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

use crate::cars::{CarRow, CarStatus, CarWithSeller};
use crate::offers::{OfferRow, OfferStatus, OfferWithDetails};
use crate::users::{Role, UserRow};

const OFFER_DETAILS_SELECT: &str = "SELECT offers.*, \
       u.name AS buyer_name, u.email AS buyer_email, \
       c.title AS car_title, c.brand AS car_brand, c.model AS car_model, \
       c.price AS car_price, c.images AS car_images, c.seller_id AS car_seller_id \
  FROM offers \
  JOIN users u ON u.id = offers.buyer_id \
  JOIN cars c ON c.id = offers.car_id";

/// Values written by a car update. The handler merges the partial request
/// into the existing row before calling storage, so every field is final.
#[derive(Debug, Clone)]
pub struct CarUpdate {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub description: String,
    pub images_json: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("carhub.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .foreign_keys(true)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
        let stmts = [
            "CREATE TABLE IF NOT EXISTS users (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role          TEXT NOT NULL DEFAULT 'buyer',
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS cars (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                brand       TEXT NOT NULL,
                model       TEXT NOT NULL,
                year        INTEGER NOT NULL,
                price       REAL NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                images      TEXT NOT NULL DEFAULT '[]',
                seller_id   TEXT NOT NULL REFERENCES users(id),
                status      TEXT NOT NULL DEFAULT 'available',
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS offers (
                id         TEXT PRIMARY KEY,
                car_id     TEXT NOT NULL REFERENCES cars(id),
                buyer_id   TEXT NOT NULL REFERENCES users(id),
                amount     REAL NOT NULL,
                message    TEXT NOT NULL DEFAULT '',
                status     TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_cars_seller ON cars(seller_id)",
            "CREATE INDEX IF NOT EXISTS idx_cars_status ON cars(status)",
            "CREATE INDEX IF NOT EXISTS idx_offers_car ON offers(car_id)",
            "CREATE INDEX IF NOT EXISTS idx_offers_buyer ON offers(buyer_id)",
        ];
        for stmt in stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("schema bootstrap")?;
        }
        Ok(())
    }

    // ─── Users ──────────────────────────────────────────────────────────────

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get_user(&id)
            .await?
            .ok_or_else(|| anyhow!("user not found after insert"))
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    // ─── Cars ───────────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn create_car(
        &self,
        title: &str,
        brand: &str,
        model: &str,
        year: i64,
        price: f64,
        description: &str,
        images_json: &str,
        seller_id: &str,
    ) -> Result<CarRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO cars (id, title, brand, model, year, price, description, images, seller_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'available', ?, ?)",
        )
        .bind(&id)
        .bind(title)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(price)
        .bind(description)
        .bind(images_json)
        .bind(seller_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get_car(&id)
            .await?
            .ok_or_else(|| anyhow!("car not found after insert"))
    }

    pub async fn get_car(&self, id: &str) -> Result<Option<CarRow>> {
        Ok(sqlx::query_as("SELECT * FROM cars WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_car_with_seller(&self, id: &str) -> Result<Option<CarWithSeller>> {
        Ok(sqlx::query_as(
            "SELECT cars.*, users.name AS seller_name, users.email AS seller_email
               FROM cars JOIN users ON users.id = cars.seller_id
              WHERE cars.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Seller dashboard: own cars regardless of status, newest first.
    pub async fn list_cars_by_seller(&self, seller_id: &str) -> Result<Vec<CarWithSeller>> {
        Ok(sqlx::query_as(
            "SELECT cars.*, users.name AS seller_name, users.email AS seller_email
               FROM cars JOIN users ON users.id = cars.seller_id
              WHERE cars.seller_id = ?
              ORDER BY cars.created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn update_car(&self, id: &str, update: &CarUpdate) -> Result<CarWithSeller> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE cars SET title = ?, brand = ?, model = ?, year = ?, price = ?, description = ?, images = ?, updated_at = ?
              WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.brand)
        .bind(&update.model)
        .bind(update.year)
        .bind(update.price)
        .bind(&update.description)
        .bind(&update.images_json)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        self.get_car_with_seller(id)
            .await?
            .ok_or_else(|| anyhow!("car not found after update"))
    }

    pub async fn delete_car(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        // Offers reference the car; drop them with the listing.
        sqlx::query("DELETE FROM offers WHERE car_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // ─── Offers ─────────────────────────────────────────────────────────────

    pub async fn create_offer(
        &self,
        car_id: &str,
        buyer_id: &str,
        amount: f64,
        message: &str,
    ) -> Result<OfferWithDetails> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO offers (id, car_id, buyer_id, amount, message, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 'pending', ?, ?)",
        )
        .bind(&id)
        .bind(car_id)
        .bind(buyer_id)
        .bind(amount)
        .bind(message)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get_offer_with_details(&id)
            .await?
            .ok_or_else(|| anyhow!("offer not found after insert"))
    }

    pub async fn get_offer(&self, id: &str) -> Result<Option<OfferRow>> {
        Ok(sqlx::query_as("SELECT * FROM offers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_offer_with_details(&self, id: &str) -> Result<Option<OfferWithDetails>> {
        let sql = format!("{OFFER_DETAILS_SELECT} WHERE offers.id = ?");
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_offers_for_car(&self, car_id: &str) -> Result<Vec<OfferWithDetails>> {
        let sql =
            format!("{OFFER_DETAILS_SELECT} WHERE offers.car_id = ? ORDER BY offers.created_at DESC");
        Ok(sqlx::query_as(&sql)
            .bind(car_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn list_offers_by_buyer(&self, buyer_id: &str) -> Result<Vec<OfferWithDetails>> {
        let sql = format!(
            "{OFFER_DETAILS_SELECT} WHERE offers.buyer_id = ? ORDER BY offers.created_at DESC"
        );
        Ok(sqlx::query_as(&sql)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// All offers on any car belonging to `seller_id`, newest first.
    pub async fn list_offers_for_seller(&self, seller_id: &str) -> Result<Vec<OfferWithDetails>> {
        let sql = format!(
            "{OFFER_DETAILS_SELECT} WHERE c.seller_id = ? ORDER BY offers.created_at DESC"
        );
        Ok(sqlx::query_as(&sql)
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Persist the seller's decision. Accepting an offer marks the car sold
    /// in the same transaction so the listing can never stay purchasable
    /// after a sale.
    pub async fn set_offer_status(
        &self,
        offer_id: &str,
        car_id: &str,
        status: OfferStatus,
    ) -> Result<OfferWithDetails> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE offers SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(&now)
            .bind(offer_id)
            .execute(&mut *tx)
            .await?;
        if status == OfferStatus::Accepted {
            sqlx::query("UPDATE cars SET status = ?, updated_at = ? WHERE id = ?")
                .bind(CarStatus::Sold)
                .bind(&now)
                .bind(car_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        self.get_offer_with_details(offer_id)
            .await?
            .ok_or_else(|| anyhow!("offer not found after update"))
    }

    // ─── Seed support ───────────────────────────────────────────────────────

    /// Wipe all rows. Used by `carhubd seed` before loading demo data.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM offers").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM cars").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
