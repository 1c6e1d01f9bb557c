use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_order::aggregate::{
    NewOrderDto, Order, OrderId, OrderView, SalesQuery, SalesSummary, UpdateOrderStatusDto,
};

use super::parse_id;
use crate::domain::a003_order;
use crate::shared::error::AppError;
use crate::AppState;

/// GET /api/orders
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(a003_order::service::list_all(&state.db).await?))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, AppError> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(a003_order::service::get(&state.db, id).await?))
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<NewOrderDto>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = a003_order::service::add(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateOrderStatusDto>,
) -> Result<Json<Order>, AppError> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(a003_order::service::update_status(&state.db, id, dto).await?))
}

/// GET /api/orders/sales?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn sales(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesSummary>, AppError> {
    Ok(Json(a003_order::service::sales(&state.db, query).await?))
}
