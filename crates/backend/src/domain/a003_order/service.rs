use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use contracts::domain::a001_customer::aggregate::{Customer, CustomerId};
use contracts::domain::a003_order::aggregate::{
    NewOrderDto, Order, OrderId, OrderStatus, OrderView, SalesQuery, SalesSummary,
    UpdateOrderStatusDto,
};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::a001_customer;
use crate::shared::error::AppError;

/// Place an order for an existing customer
pub async fn add(db: &DatabaseConnection, dto: NewOrderDto) -> Result<Order, AppError> {
    let mut order = Order::new_for_insert(&dto).map_err(AppError::Validation)?;

    if a001_customer::repository::get_by_id(db, order.customer)
        .await?
        .is_none()
    {
        return Err(AppError::not_found::<Customer>());
    }

    order.before_write();
    repository::insert(db, &order).await?;

    tracing::info!(
        "Created order {} for customer {}",
        order.id.value(),
        order.customer.value()
    );
    Ok(order)
}

/// All orders, newest first, each with its customer's summary
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<OrderView>, AppError> {
    let orders = repository::list_all(db).await?;

    let mut ids: Vec<CustomerId> = orders.iter().map(|o| o.customer).collect();
    ids.sort_by_key(|id| id.value());
    ids.dedup();

    let customers: HashMap<CustomerId, Customer> = a001_customer::repository::get_by_ids(db, &ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| OrderView {
            customer_details: customers.get(&order.customer).map(Customer::summary),
            order,
        })
        .collect())
}

pub async fn get(db: &DatabaseConnection, id: OrderId) -> Result<OrderView, AppError> {
    let order = repository::get_by_id(db, id)
        .await?
        .ok_or_else(AppError::not_found::<Order>)?;
    let customer = a001_customer::repository::get_by_id(db, order.customer).await?;

    Ok(OrderView {
        order,
        customer_details: customer.map(|c| c.summary()),
    })
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: OrderId,
    dto: UpdateOrderStatusDto,
) -> Result<Order, AppError> {
    let status: OrderStatus = dto.status.parse().map_err(AppError::Validation)?;

    if !repository::update_status(db, id, status).await? {
        return Err(AppError::not_found::<Order>());
    }

    repository::get_by_id(db, id)
        .await?
        .ok_or_else(AppError::not_found::<Order>)
}

/// Total amount and number of orders created within the query range
pub async fn sales(db: &DatabaseConnection, query: SalesQuery) -> Result<SalesSummary, AppError> {
    let from = query
        .from
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_bound(s, false))
        .transpose()?;
    let to = query
        .to
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_bound(s, true))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::Validation(
                "'from' must not be later than 'to'".into(),
            ));
        }
    }

    let orders = repository::list_created_between(db, from, to).await?;
    Ok(summarize(&orders))
}

/// Sum of order totals in one pass
pub fn summarize(orders: &[Order]) -> SalesSummary {
    orders.iter().fold(SalesSummary::default(), |mut acc, order| {
        acc.total_amount += order.total_amount;
        acc.total_orders += 1;
        acc
    })
}

/// A range bound: `YYYY-MM-DD` covers the whole UTC day, RFC 3339 is taken as is
fn parse_bound(s: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        }
        .unwrap_or_default();
        return Ok(Utc.from_utc_datetime(&date.and_time(time)));
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("Invalid date '{}'", s)))
}
