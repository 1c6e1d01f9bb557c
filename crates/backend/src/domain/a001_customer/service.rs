use std::collections::HashMap;

use contracts::domain::a001_customer::aggregate::{
    validate_name, validate_phone, Customer, CustomerDetails, CustomerDto, CustomerId,
    UpdateCustomerDto, CUSTOMER_SEQUENCE,
};
use contracts::domain::a003_order::aggregate::OrderId;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::{a002_measurement, a003_order};
use crate::shared::error::AppError;
use crate::system::sys_counter;

pub const PHONE_EXISTS: &str = "Phone number already exists";

/// Register a customer and tag it with the next display ID
///
/// The phone pre-check runs before any number is taken; allocation and
/// insert share one transaction so a failed insert gives the number back.
pub async fn create(db: &DatabaseConnection, dto: CustomerDto) -> Result<Customer, AppError> {
    let name = dto.name.trim().to_string();
    let phone = dto.phone.trim().to_string();
    validate_name(&name).map_err(AppError::Validation)?;
    validate_phone(&phone).map_err(AppError::Validation)?;

    if repository::get_by_phone(db, &phone).await?.is_some() {
        return Err(AppError::Conflict(PHONE_EXISTS.into()));
    }

    let customer = db
        .transaction::<_, Customer, AppError>(move |txn| {
            Box::pin(async move {
                let display_id =
                    sys_counter::allocate_display_id(txn, CUSTOMER_SEQUENCE).await?;

                let mut customer = Customer::new_for_insert(display_id, name, phone);
                customer.before_write();

                repository::insert(txn, &customer)
                    .await
                    .map_err(|e| AppError::from_write(e, PHONE_EXISTS))?;
                Ok(customer)
            })
        })
        .await?;

    tracing::info!(
        "Created customer {} ({})",
        customer.customer_id.as_deref().unwrap_or("-"),
        customer.id.value()
    );
    Ok(customer)
}

/// All customers, newest first, with measurement and order references
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<CustomerDetails>, AppError> {
    let customers = repository::list_all(db).await?;

    let mut measurements: HashMap<CustomerId, _> = a002_measurement::repository::list_all(db)
        .await?
        .into_iter()
        .map(|m| (m.customer, m))
        .collect();

    let mut orders: HashMap<CustomerId, Vec<OrderId>> = HashMap::new();
    for (order, customer) in a003_order::repository::list_customer_links(db).await? {
        orders.entry(customer).or_default().push(order);
    }

    Ok(customers
        .into_iter()
        .map(|customer| CustomerDetails {
            measurement: measurements.remove(&customer.id),
            orders: orders.remove(&customer.id).unwrap_or_default(),
            customer,
        })
        .collect())
}

/// One customer with its measurement and order references
pub async fn get_details(db: &DatabaseConnection, id: CustomerId) -> Result<CustomerDetails, AppError> {
    let customer = repository::get_by_id(db, id)
        .await?
        .ok_or_else(AppError::not_found::<Customer>)?;
    let measurement = a002_measurement::repository::get_by_customer(db, id).await?;
    let orders = a003_order::repository::list_ids_by_customer(db, id).await?;

    Ok(CustomerDetails {
        customer,
        measurement,
        orders,
    })
}

/// Partial update of name and phone; the display ID never changes
pub async fn update(
    db: &DatabaseConnection,
    id: CustomerId,
    dto: UpdateCustomerDto,
) -> Result<Customer, AppError> {
    let mut customer = repository::get_by_id(db, id)
        .await?
        .ok_or_else(AppError::not_found::<Customer>)?;

    customer.update(&dto);
    customer.validate().map_err(AppError::Validation)?;

    if let Some(other) = repository::get_by_phone(db, &customer.phone).await? {
        if other.id != customer.id {
            return Err(AppError::Conflict(PHONE_EXISTS.into()));
        }
    }

    customer.before_write();
    repository::update(db, &customer)
        .await
        .map_err(|e| AppError::from_write(e, PHONE_EXISTS))?;

    Ok(customer)
}

/// Delete a customer together with its measurement; orders are kept
pub async fn delete(db: &DatabaseConnection, id: CustomerId) -> Result<(), AppError> {
    db.transaction::<_, (), AppError>(move |txn| {
        Box::pin(async move {
            a002_measurement::repository::delete_by_customer(txn, id).await?;
            if !repository::delete(txn, id).await? {
                return Err(AppError::not_found::<Customer>());
            }
            Ok(())
        })
    })
    .await?;

    tracing::info!("Deleted customer {}", id.value());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::test_db;
    use contracts::domain::a002_measurement::aggregate::MeasurementDto;
    use contracts::domain::a003_order::aggregate::NewOrderDto;
    use std::collections::HashSet;

    fn dto(name: &str, phone: &str) -> CustomerDto {
        CustomerDto {
            name: name.into(),
            phone: phone.into(),
        }
    }

    fn full_measurement() -> MeasurementDto {
        MeasurementDto {
            length: Some(40.0),
            shoulder: Some(18.0),
            chest: Some(42.0),
            waist: Some(36.0),
            hip: Some(40.0),
            neck: Some(15.5),
            sleeve_length: Some(24.0),
            wrist: Some(7.0),
            bicep: Some(13.0),
            shalwar_length: Some(39.0),
            thigh: Some(24.0),
            knee: Some(17.0),
            bottom: Some(14.0),
            pant_waist: Some(34.0),
        }
    }

    #[tokio::test]
    async fn test_display_ids_are_sequential() {
        let (_dir, db) = test_db().await;

        let first = create(&db, dto("Ahmed", "03001234567")).await.unwrap();
        let second = create(&db, dto("Bilal", "03001234568")).await.unwrap();

        assert_eq!(first.customer_id.as_deref(), Some("01"));
        assert_eq!(second.customer_id.as_deref(), Some("02"));
    }

    #[tokio::test]
    async fn test_duplicate_phone_does_not_consume_an_id() {
        let (_dir, db) = test_db().await;

        create(&db, dto("Ahmed", "03001234567")).await.unwrap();
        let err = create(&db, dto("Another Ahmed", "03001234567"))
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, PHONE_EXISTS),
            other => panic!("unexpected error: {:?}", other),
        }

        let next = create(&db, dto("Bilal", "03001234568")).await.unwrap();
        assert_eq!(next.customer_id.as_deref(), Some("02"));
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_the_counter() {
        let (_dir, db) = test_db().await;
        let existing = create(&db, dto("Ahmed", "03001234567")).await.unwrap();

        // Insert that hits the unique phone index inside the allocating transaction
        let result = db
            .transaction::<_, (), AppError>(move |txn| {
                Box::pin(async move {
                    let display_id =
                        sys_counter::allocate_display_id(txn, CUSTOMER_SEQUENCE).await?;
                    let clash =
                        Customer::new_for_insert(display_id, "Racer".into(), existing.phone);
                    repository::insert(txn, &clash)
                        .await
                        .map_err(|e| AppError::from_write(e, PHONE_EXISTS))?;
                    Ok(())
                })
            })
            .await;
        assert!(matches!(
            result.map_err(AppError::from),
            Err(AppError::Conflict(_))
        ));

        assert_eq!(
            sys_counter::current_value(&db, CUSTOMER_SEQUENCE).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let (_dir, db) = test_db().await;
        assert!(matches!(
            create(&db, dto("   ", "03001234567")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create(&db, dto("Ahmed", "12345")).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            sys_counter::current_value(&db, CUSTOMER_SEQUENCE).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let (_dir, db) = test_db().await;

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    create(&db, dto(&format!("Customer {}", i), &format!("030000000{:02}", i)))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let customer = handle.await.unwrap();
            assert!(ids.insert(customer.customer_id.unwrap()));
        }

        let expected: HashSet<String> = (1..=10).map(|v| format!("{:02}", v)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_update_keeps_display_id() {
        let (_dir, db) = test_db().await;
        let a = create(&db, dto("Ahmed", "03001234567")).await.unwrap();
        let b = create(&db, dto("Bilal", "03001234568")).await.unwrap();

        let updated = update(
            &db,
            a.id,
            UpdateCustomerDto {
                name: Some("Ahmed Khan".into()),
                phone: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Ahmed Khan");
        assert_eq!(updated.customer_id.as_deref(), Some("01"));

        let err = update(
            &db,
            a.id,
            UpdateCustomerDto {
                name: None,
                phone: Some(b.phone.clone()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = update(&db, CustomerId::new_v4(), UpdateCustomerDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_measurement() {
        let (_dir, db) = test_db().await;
        let customer = create(&db, dto("Ahmed", "03001234567")).await.unwrap();
        a002_measurement::service::add(&db, customer.id, full_measurement())
            .await
            .unwrap();

        delete(&db, customer.id).await.unwrap();

        assert!(repository::get_by_id(&db, customer.id).await.unwrap().is_none());
        assert!(a002_measurement::repository::get_by_customer(&db, customer.id)
            .await
            .unwrap()
            .is_none());

        let err = delete(&db, customer.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_without_measurement_leaves_other_rows() {
        let (_dir, db) = test_db().await;
        let kept = create(&db, dto("Bilal", "03007654321")).await.unwrap();
        a002_measurement::service::add(&db, kept.id, full_measurement())
            .await
            .unwrap();
        let customer = create(&db, dto("Ahmed", "03001234567")).await.unwrap();
        let order = a003_order::service::add(
            &db,
            NewOrderDto {
                customer: Some(customer.id.value().to_string()),
                suit_type: Some("Waistcoat".into()),
                delivery_date: Some("2025-04-01".into()),
                total_amount: Some(2500.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        delete(&db, customer.id).await.unwrap();

        assert!(repository::get_by_id(&db, customer.id).await.unwrap().is_none());
        assert_eq!(repository::list_all(&db).await.unwrap().len(), 1);
        let measurements = a002_measurement::repository::list_all(&db).await.unwrap();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].customer, kept.id);
        let orders = a003_order::repository::list_all(&db).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order.id);
    }
}
