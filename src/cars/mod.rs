//! Car listing data model: rows, status lifecycle, list filters and the wire
//! response shapes.

use serde::{Deserialize, Serialize};

pub const MIN_YEAR: i64 = 1900;

/// Default and maximum page sizes for the public listing endpoint.
pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Sold,
    /// Reserved in the schema; no endpoint currently sets it.
    Pending,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CarRow {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub description: String,
    /// JSON array of image URLs.
    pub images: String,
    pub seller_id: String,
    pub status: CarStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl CarRow {
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_str(&self.images).unwrap_or_default()
    }
}

/// Car joined with its seller's public fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CarWithSeller {
    #[sqlx(flatten)]
    pub car: CarRow,
    pub seller_name: String,
    pub seller_email: String,
}

/// Seller fields embedded in car responses.
#[derive(Debug, Clone, Serialize)]
pub struct SellerInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub status: CarStatus,
    pub seller: SellerInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CarWithSeller> for CarResponse {
    fn from(row: CarWithSeller) -> Self {
        let images = row.car.image_list();
        Self {
            id: row.car.id,
            title: row.car.title,
            brand: row.car.brand,
            model: row.car.model,
            year: row.car.year,
            price: row.car.price,
            description: row.car.description,
            images,
            status: row.car.status,
            seller: SellerInfo {
                id: row.car.seller_id,
                name: row.seller_name,
                email: row.seller_email,
            },
            created_at: row.car.created_at,
            updated_at: row.car.updated_at,
        }
    }
}

/// Filters for the public listing query. All optional, all AND-combined.
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    /// Case-insensitive substring over title/brand/model/description.
    pub search: Option<String>,
    /// Case-insensitive substring over brand alone.
    pub brand: Option<String>,
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarSort {
    /// `created_at DESC` — the default.
    Newest,
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
}

impl CarSort {
    /// Parse the `sort` query parameter. Unknown values fall back to newest
    /// first, matching the original API.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-asc") => CarSort::PriceAsc,
            Some("price-desc") => CarSort::PriceDesc,
            Some("year-asc") => CarSort::YearAsc,
            Some("year-desc") => CarSort::YearDesc,
            _ => CarSort::Newest,
        }
    }

    pub fn order_clause(&self) -> &'static str {
        match self {
            CarSort::Newest => "cars.created_at DESC",
            CarSort::PriceAsc => "cars.price ASC",
            CarSort::PriceDesc => "cars.price DESC",
            CarSort::YearAsc => "cars.year ASC",
            CarSort::YearDesc => "cars.year DESC",
        }
    }
}

/// Paginated listing response: `{cars, page, totalPages, total}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPage {
    pub cars: Vec<CarResponse>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}
