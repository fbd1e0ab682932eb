// rest/routes/offers.rs — purchase offer lifecycle.
//
// Buyers create offers on available cars they don't own; the car's seller
// reviews them and accepts or rejects. Accepting marks the car sold.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::cars::CarStatus;
use crate::error::ApiError;
use crate::offers::{OfferResponse, OfferStatus};
use crate::rest::auth::{AuthUser, Buyer, Seller};
use crate::AppContext;

// carId and amount are optional so an absent field reports the handler's
// own 400 instead of a serde-level rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub car_id: Option<String>,
    pub amount: Option<f64>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateOfferStatusRequest {
    /// `accepted` or `rejected`; anything else (or absent) is a 400.
    pub status: Option<String>,
}

pub async fn create_offer(
    State(ctx): State<Arc<AppContext>>,
    Buyer(user): Buyer,
    Json(body): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<OfferResponse>), ApiError> {
    let car_id = body.car_id.as_deref().unwrap_or("").trim().to_string();
    let amount = body.amount.unwrap_or(0.0);
    if car_id.is_empty() || amount == 0.0 {
        return Err(ApiError::bad_request("Please provide car ID and amount"));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::bad_request("Amount must be positive"));
    }

    let car = ctx
        .storage
        .get_car(&car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    if car.seller_id == user.id {
        return Err(ApiError::bad_request(
            "You cannot make an offer on your own car",
        ));
    }
    if car.status != CarStatus::Available {
        return Err(ApiError::bad_request("Car is not available"));
    }

    let message = body.message.unwrap_or_default();
    let offer = ctx
        .storage
        .create_offer(&car.id, &user.id, amount, message.trim())
        .await?;
    info!("offer created: {} on car {}", offer.offer.id, car.id);

    Ok((StatusCode::CREATED, Json(offer.into())))
}

pub async fn my_offers(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<OfferResponse>>, ApiError> {
    let offers = ctx.storage.list_offers_by_buyer(&user.id).await?;
    Ok(Json(offers.into_iter().map(OfferResponse::from).collect()))
}

pub async fn seller_requests(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
) -> Result<Json<Vec<OfferResponse>>, ApiError> {
    let offers = ctx.storage.list_offers_for_seller(&user.id).await?;
    Ok(Json(offers.into_iter().map(OfferResponse::from).collect()))
}

pub async fn car_offers(
    State(ctx): State<Arc<AppContext>>,
    AuthUser(user): AuthUser,
    Path(car_id): Path<String>,
) -> Result<Json<Vec<OfferResponse>>, ApiError> {
    let car = ctx
        .storage
        .get_car(&car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    // Only the seller may see the offers on their listing.
    if car.seller_id != user.id {
        return Err(ApiError::forbidden("Not authorized to view these offers"));
    }

    let offers = ctx.storage.list_offers_for_car(&car_id).await?;
    Ok(Json(offers.into_iter().map(OfferResponse::from).collect()))
}

pub async fn update_offer_status(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
    Path(id): Path<String>,
    Json(body): Json<UpdateOfferStatusRequest>,
) -> Result<Json<OfferResponse>, ApiError> {
    let status = match body.status.as_deref() {
        Some("accepted") => OfferStatus::Accepted,
        Some("rejected") => OfferStatus::Rejected,
        _ => return Err(ApiError::bad_request("Invalid status")),
    };

    let offer = ctx
        .storage
        .get_offer(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Offer not found"))?;

    let car = ctx
        .storage
        .get_car(&offer.car_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;
    if car.seller_id != user.id {
        return Err(ApiError::forbidden("Not authorized"));
    }

    let updated = ctx
        .storage
        .set_offer_status(&id, &offer.car_id, status)
        .await?;
    info!("offer {} {} by seller {}", id, status.as_str(), user.id);

    Ok(Json(updated.into()))
}
