pub mod a001_customer;
pub mod a002_measurement;
pub mod a003_order;
pub mod a004_expense;

use contracts::domain::common::AggregateId;

use crate::shared::error::AppError;

/// Parse an id from the request path; malformed ids are a client error
pub(crate) fn parse_id<Id: AggregateId>(raw: &str) -> Result<Id, AppError> {
    Id::from_string(raw.trim()).map_err(|_| AppError::invalid_id(raw))
}
