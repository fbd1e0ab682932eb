// rest/routes/cars.rs — car listing CRUD.
//
// Listing is public; creation/update/deletion are seller-only, and mutation
// further requires ownership (403 when the car belongs to another seller).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::cars::{CarFilter, CarPage, CarResponse, CarSort, DEFAULT_PAGE_SIZE, MIN_YEAR};
use crate::error::ApiError;
use crate::rest::auth::Seller;
use crate::storage::CarUpdate;
use crate::AppContext;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListCarsParams {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// Required fields are optional here so an absent field lands on the handler's
// own 400 instead of a serde-level rejection.
#[derive(Deserialize)]
pub struct CreateCarRequest {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
pub struct UpdateCarRequest {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Appended to the existing image list, like the original upload flow.
    pub images: Option<Vec<String>>,
}

fn max_year() -> i64 {
    // Next year's models are listable.
    i64::from(Utc::now().year()) + 1
}

fn validate_year(year: i64) -> Result<(), ApiError> {
    if !(MIN_YEAR..=max_year()).contains(&year) {
        return Err(ApiError::bad_request(format!(
            "Year must be between {MIN_YEAR} and {}",
            max_year()
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ApiError::bad_request("Price must be positive"));
    }
    Ok(())
}

/// Trims and drops empty strings, so a blank value leaves the stored one
/// in place.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub async fn list_cars(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<ListCarsParams>,
) -> Result<Json<CarPage>, ApiError> {
    let filter = CarFilter {
        search: params.search,
        brand: params.brand,
        min_year: params.min_year,
        max_year: params.max_year,
        min_price: params.min_price,
        max_price: params.max_price,
    };
    let sort = CarSort::from_param(params.sort.as_deref());
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let (rows, total) = ctx.storage.list_cars(&filter, sort, page, limit).await?;
    let limit = limit.clamp(1, crate::cars::MAX_PAGE_SIZE);
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(CarPage {
        cars: rows.into_iter().map(CarResponse::from).collect(),
        page,
        total_pages,
        total,
    }))
}

pub async fn get_car(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    let car = ctx
        .storage
        .get_car_with_seller(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;
    Ok(Json(car.into()))
}

pub async fn my_cars(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
) -> Result<Json<Vec<CarResponse>>, ApiError> {
    let rows = ctx.storage.list_cars_by_seller(&user.id).await?;
    Ok(Json(rows.into_iter().map(CarResponse::from).collect()))
}

pub async fn create_car(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
    Json(body): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<CarResponse>), ApiError> {
    let title = body.title.as_deref().unwrap_or("").trim().to_string();
    let brand = body.brand.as_deref().unwrap_or("").trim().to_string();
    let model = body.model.as_deref().unwrap_or("").trim().to_string();
    let (Some(year), Some(price)) = (body.year, body.price) else {
        return Err(ApiError::bad_request("Please provide all required fields"));
    };
    if title.is_empty() || brand.is_empty() || model.is_empty() {
        return Err(ApiError::bad_request("Please provide all required fields"));
    }
    validate_year(year)?;
    validate_price(price)?;

    let images = body.images.unwrap_or_default();
    let images_json = serde_json::to_string(&images).unwrap_or_else(|_| "[]".to_string());
    let description = body.description.unwrap_or_default();

    let car = ctx
        .storage
        .create_car(
            &title,
            &brand,
            &model,
            year,
            price,
            description.trim(),
            &images_json,
            &user.id,
        )
        .await?;
    info!("car listed: {} by seller {}", car.id, user.id);

    let car = ctx
        .storage
        .get_car_with_seller(&car.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;
    Ok((StatusCode::CREATED, Json(car.into())))
}

pub async fn update_car(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
    Path(id): Path<String>,
    Json(body): Json<UpdateCarRequest>,
) -> Result<Json<CarResponse>, ApiError> {
    let car = ctx
        .storage
        .get_car(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;
    if car.seller_id != user.id {
        return Err(ApiError::forbidden("Not authorized to update this car"));
    }

    if let Some(year) = body.year {
        validate_year(year)?;
    }
    if let Some(price) = body.price {
        validate_price(price)?;
    }

    // New images append to the existing list; everything else replaces.
    let mut images = car.image_list();
    if let Some(new_images) = body.images {
        images.extend(new_images);
    }

    // Blank title/brand/model keep the stored value; those fields are
    // required and cannot be blanked through an update.
    let update = CarUpdate {
        title: non_blank(body.title).unwrap_or(car.title),
        brand: non_blank(body.brand).unwrap_or(car.brand),
        model: non_blank(body.model).unwrap_or(car.model),
        year: body.year.unwrap_or(car.year),
        price: body.price.unwrap_or(car.price),
        description: body
            .description
            .map(|s| s.trim().to_string())
            .unwrap_or(car.description),
        images_json: serde_json::to_string(&images).unwrap_or_else(|_| "[]".to_string()),
    };

    let updated = ctx.storage.update_car(&id, &update).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_car(
    State(ctx): State<Arc<AppContext>>,
    Seller(user): Seller,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let car = ctx
        .storage
        .get_car(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;
    if car.seller_id != user.id {
        return Err(ApiError::forbidden("Not authorized to delete this car"));
    }

    ctx.storage.delete_car(&id).await?;
    info!("car deleted: {} by seller {}", id, user.id);
    Ok(Json(json!({ "message": "Car deleted successfully" })))
}
