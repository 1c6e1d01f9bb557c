use std::collections::HashMap;

use contracts::domain::a001_customer::aggregate::{Customer, CustomerId};
use contracts::domain::a002_measurement::aggregate::{Measurement, MeasurementDto, MeasurementView};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::a001_customer;
use crate::shared::error::AppError;

pub const MEASUREMENT_EXISTS: &str = "Measurement already exists for this customer";

/// Record the measurement of a customer and link it from the customer
pub async fn add(
    db: &DatabaseConnection,
    customer_id: CustomerId,
    dto: MeasurementDto,
) -> Result<Measurement, AppError> {
    let customer = a001_customer::repository::get_by_id(db, customer_id)
        .await?
        .ok_or_else(AppError::not_found::<Customer>)?;

    let mut measurement =
        Measurement::new_for_insert(customer.id, &dto).map_err(AppError::Validation)?;

    if repository::get_by_customer(db, customer.id).await?.is_some() {
        return Err(AppError::Conflict(MEASUREMENT_EXISTS.into()));
    }

    measurement.before_write();
    let customer_id = customer.id;
    let measurement = insert_linked(db, measurement).await?;

    tracing::info!("Added measurement for customer {}", customer_id.value());
    Ok(measurement)
}

/// Insert the measurement and link it; rolls back if the customer was deleted meanwhile
async fn insert_linked(
    db: &DatabaseConnection,
    measurement: Measurement,
) -> Result<Measurement, AppError> {
    db.transaction::<_, Measurement, AppError>(move |txn| {
        Box::pin(async move {
            repository::insert(txn, &measurement)
                .await
                .map_err(|e| AppError::from_write(e, MEASUREMENT_EXISTS))?;
            let linked = a001_customer::repository::set_measurement(
                txn,
                measurement.customer,
                Some(measurement.id),
            )
            .await?;
            if !linked {
                return Err(AppError::not_found::<Customer>());
            }
            Ok(measurement)
        })
    })
    .await
    .map_err(AppError::from)
}

/// Change the provided positive fields of a customer's measurement
pub async fn update(
    db: &DatabaseConnection,
    customer_id: CustomerId,
    dto: MeasurementDto,
) -> Result<Measurement, AppError> {
    let mut measurement = repository::get_by_customer(db, customer_id)
        .await?
        .ok_or_else(AppError::not_found::<Measurement>)?;

    measurement.update(&dto);
    measurement.before_write();
    repository::update(db, &measurement).await?;

    Ok(measurement)
}

/// Remove a customer's measurement and clear the customer's link to it
pub async fn delete(db: &DatabaseConnection, customer_id: CustomerId) -> Result<(), AppError> {
    db.transaction::<_, (), AppError>(move |txn| {
        Box::pin(async move {
            if !repository::delete_by_customer(txn, customer_id).await? {
                return Err(AppError::not_found::<Measurement>());
            }
            a001_customer::repository::set_measurement(txn, customer_id, None).await?;
            Ok(())
        })
    })
    .await?;

    Ok(())
}

pub async fn get(db: &DatabaseConnection, customer_id: CustomerId) -> Result<MeasurementView, AppError> {
    let measurement = repository::get_by_customer(db, customer_id)
        .await?
        .ok_or_else(AppError::not_found::<Measurement>)?;
    let customer = a001_customer::repository::get_by_id(db, customer_id).await?;

    Ok(MeasurementView {
        measurement,
        customer_details: customer.map(|c| c.summary()),
    })
}

/// All measurements, newest first, each with its customer's summary
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<MeasurementView>, AppError> {
    let measurements = repository::list_all(db).await?;

    let ids: Vec<CustomerId> = measurements.iter().map(|m| m.customer).collect();
    let customers: HashMap<CustomerId, Customer> = a001_customer::repository::get_by_ids(db, &ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(measurements
        .into_iter()
        .map(|measurement| MeasurementView {
            customer_details: customers.get(&measurement.customer).map(Customer::summary),
            measurement,
        })
        .collect())
}
