//! Purchase offer data model. Lifecycle: `pending -> accepted | rejected`,
//! decided by the car's seller. Accepting an offer marks the car sold.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferRow {
    pub id: String,
    pub car_id: String,
    pub buyer_id: String,
    pub amount: f64,
    pub message: String,
    pub status: OfferStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Offer joined with buyer fields and a summary of the car it targets.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferWithDetails {
    #[sqlx(flatten)]
    pub offer: OfferRow,
    pub buyer_name: String,
    pub buyer_email: String,
    pub car_title: String,
    pub car_brand: String,
    pub car_model: String,
    pub car_price: f64,
    pub car_images: String,
    pub car_seller_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuyerInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Car fields embedded in offer responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCarSummary {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub images: Vec<String>,
    pub seller_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    pub id: String,
    pub amount: f64,
    pub message: String,
    pub status: OfferStatus,
    pub buyer: BuyerInfo,
    pub car: OfferCarSummary,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OfferWithDetails> for OfferResponse {
    fn from(row: OfferWithDetails) -> Self {
        let images = serde_json::from_str(&row.car_images).unwrap_or_default();
        Self {
            id: row.offer.id,
            amount: row.offer.amount,
            message: row.offer.message,
            status: row.offer.status,
            buyer: BuyerInfo {
                id: row.offer.buyer_id,
                name: row.buyer_name,
                email: row.buyer_email,
            },
            car: OfferCarSummary {
                id: row.offer.car_id,
                title: row.car_title,
                brand: row.car_brand,
                model: row.car_model,
                price: row.car_price,
                images,
                seller_id: row.car_seller_id,
            },
            created_at: row.offer.created_at,
            updated_at: row.offer.updated_at,
        }
    }
}
