use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_customer::aggregate::CustomerId;
use contracts::domain::a002_measurement::aggregate::{Measurement, MeasurementDto, MeasurementView};
use serde_json::{json, Value};

use super::parse_id;
use crate::domain::a002_measurement;
use crate::shared::error::AppError;
use crate::AppState;

/// GET /api/measurements
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<MeasurementView>>, AppError> {
    Ok(Json(a002_measurement::service::list_all(&state.db).await?))
}

/// GET /api/measurements/:customer_id
pub async fn get_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<MeasurementView>, AppError> {
    let customer_id: CustomerId = parse_id(&customer_id)?;
    Ok(Json(a002_measurement::service::get(&state.db, customer_id).await?))
}

/// POST /api/measurements/:customer_id
pub async fn add(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(dto): Json<MeasurementDto>,
) -> Result<(StatusCode, Json<Measurement>), AppError> {
    let customer_id: CustomerId = parse_id(&customer_id)?;
    let measurement = a002_measurement::service::add(&state.db, customer_id, dto).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

/// PUT /api/measurements/:customer_id
pub async fn update(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(dto): Json<MeasurementDto>,
) -> Result<Json<Measurement>, AppError> {
    let customer_id: CustomerId = parse_id(&customer_id)?;
    Ok(Json(
        a002_measurement::service::update(&state.db, customer_id, dto).await?,
    ))
}

/// DELETE /api/measurements/:customer_id
pub async fn delete(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let customer_id: CustomerId = parse_id(&customer_id)?;
    a002_measurement::service::delete(&state.db, customer_id).await?;
    Ok(Json(json!({ "message": "Measurement deleted successfully" })))
}
