use contracts::domain::a004_expense::aggregate::{
    duplicate_month_message, Expense, ExpenseDto, ExpenseId,
};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::AppError;

/// Record the expenses of a month; one record per month
pub async fn add(db: &DatabaseConnection, dto: ExpenseDto) -> Result<Expense, AppError> {
    let mut expense = Expense::new_for_insert(&dto).map_err(AppError::Validation)?;

    if repository::get_by_month(db, &expense.month).await?.is_some() {
        return Err(AppError::Conflict(duplicate_month_message(&expense.month)));
    }

    expense.before_write();
    repository::insert(db, &expense)
        .await
        .map_err(|e| AppError::from_write(e, duplicate_month_message(&expense.month)))?;

    tracing::info!("Recorded expenses for {}: {}", expense.month, expense.total_amount);
    Ok(expense)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Expense>, AppError> {
    Ok(repository::list_all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: ExpenseId) -> Result<Expense, AppError> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(AppError::not_found::<Expense>)
}

/// Replace the amounts (and month, when given) of a record; the total is recomputed
pub async fn update(
    db: &DatabaseConnection,
    id: ExpenseId,
    dto: ExpenseDto,
) -> Result<Expense, AppError> {
    let mut expense = get(db, id).await?;
    expense.update(&dto).map_err(AppError::Validation)?;

    if let Some(other) = repository::get_by_month(db, &expense.month).await? {
        if other.id != expense.id {
            return Err(AppError::Conflict(duplicate_month_message(&expense.month)));
        }
    }

    expense.before_write();
    repository::update(db, &expense)
        .await
        .map_err(|e| AppError::from_write(e, duplicate_month_message(&expense.month)))?;

    Ok(expense)
}
