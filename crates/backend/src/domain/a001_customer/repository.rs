use chrono::Utc;
use contracts::domain::a001_customer::aggregate::{Customer, CustomerId};
use contracts::domain::a002_measurement::aggregate::MeasurementId;
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::parse_stored_uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub measurement_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        Customer {
            id: CustomerId(parse_stored_uuid("a001_customer", "id", &m.id)),
            customer_id: m.customer_id,
            name: m.name,
            phone: m.phone,
            measurement_id: m
                .measurement_id
                .and_then(|s| Uuid::parse_str(&s).ok())
                .map(MeasurementId),
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        }
    }
}

fn to_active(aggregate: &Customer) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        customer_id: Set(aggregate.customer_id.clone()),
        name: Set(aggregate.name.clone()),
        phone: Set(aggregate.phone.clone()),
        measurement_id: Set(aggregate.measurement_id.map(|m| m.value().to_string())),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
    }
}

/// All customers, newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Customer>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: CustomerId) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find_by_id(id.value().to_string()).one(conn).await?;
    Ok(result.map(Into::into))
}

/// Look up several customers at once (for embedding summaries in listings)
pub async fn get_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[CustomerId],
) -> anyhow::Result<Vec<Customer>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let keys: Vec<String> = ids.iter().map(|id| id.value().to_string()).collect();
    let items = Entity::find()
        .filter(Column::Id.is_in(keys))
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_phone<C: ConnectionTrait>(conn: &C, phone: &str) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find()
        .filter(Column::Phone.eq(phone))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, aggregate: &Customer) -> anyhow::Result<CustomerId> {
    to_active(aggregate).insert(conn).await?;
    Ok(aggregate.id)
}

pub async fn update<C: ConnectionTrait>(conn: &C, aggregate: &Customer) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}

/// Point the customer at a measurement (or clear the link); false when the customer is gone
pub async fn set_measurement<C: ConnectionTrait>(
    conn: &C,
    id: CustomerId,
    measurement: Option<MeasurementId>,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(
            Column::MeasurementId,
            Expr::value(measurement.map(|m| m.value().to_string())),
        )
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.value().to_string()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: CustomerId) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.value().to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
