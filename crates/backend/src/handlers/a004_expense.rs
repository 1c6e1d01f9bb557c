use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_expense::aggregate::{Expense, ExpenseDto, ExpenseId};

use super::parse_id;
use crate::domain::a004_expense;
use crate::shared::error::AppError;
use crate::AppState;

/// GET /api/expenses
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(a004_expense::service::list_all(&state.db).await?))
}

/// GET /api/expenses/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, AppError> {
    let id: ExpenseId = parse_id(&id)?;
    Ok(Json(a004_expense::service::get(&state.db, id).await?))
}

/// POST /api/expenses
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ExpenseDto>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = a004_expense::service::add(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<ExpenseDto>,
) -> Result<Json<Expense>, AppError> {
    let id: ExpenseId = parse_id(&id)?;
    Ok(Json(a004_expense::service::update(&state.db, id, dto).await?))
}
