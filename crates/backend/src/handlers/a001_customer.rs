use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_customer::aggregate::{
    Customer, CustomerDetails, CustomerDto, CustomerId, UpdateCustomerDto,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::domain::a001_customer;
use crate::shared::error::AppError;
use crate::AppState;

/// GET /api/customers
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<CustomerDetails>>, AppError> {
    Ok(Json(a001_customer::service::list_all(&state.db).await?))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerDetails>, AppError> {
    let id: CustomerId = parse_id(&id)?;
    Ok(Json(a001_customer::service::get_details(&state.db, id).await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CustomerDto>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = a001_customer::service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/customers/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateCustomerDto>,
) -> Result<Json<Customer>, AppError> {
    let id: CustomerId = parse_id(&id)?;
    Ok(Json(a001_customer::service::update(&state.db, id, dto).await?))
}

/// DELETE /api/customers/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: CustomerId = parse_id(&id)?;
    a001_customer::service::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}
