use chrono::{DateTime, Utc};
use contracts::domain::a001_customer::aggregate::CustomerId;
use contracts::domain::a003_order::aggregate::{Order, OrderId, OrderStatus};
use contracts::domain::common::EntityMetadata;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::parse_stored_uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer: String,
    pub suit_type: String,
    pub quantity: i32,
    pub delivery_date: chrono::NaiveDate,
    pub status: String,
    pub total_amount: f64,
    pub advance_paid: f64,
    pub notes: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(m: Model) -> Self {
        let status = m.status.parse().unwrap_or_else(|_| {
            tracing::warn!("Order {} has unknown status '{}'", m.id, m.status);
            OrderStatus::default()
        });

        Order {
            id: OrderId(parse_stored_uuid("a003_order", "id", &m.id)),
            customer: CustomerId(parse_stored_uuid("a003_order", "customer", &m.customer)),
            suit_type: m.suit_type,
            quantity: m.quantity,
            delivery_date: m.delivery_date,
            status,
            total_amount: m.total_amount,
            advance_paid: m.advance_paid,
            notes: m.notes,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        }
    }
}

/// All orders, newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Order>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: OrderId) -> anyhow::Result<Option<Order>> {
    let result = Entity::find_by_id(id.value().to_string()).one(conn).await?;
    Ok(result.map(Into::into))
}

/// `(order, customer)` pairs of every order, oldest first
pub async fn list_customer_links<C: ConnectionTrait>(
    conn: &C,
) -> anyhow::Result<Vec<(OrderId, CustomerId)>> {
    let rows: Vec<(String, String)> = Entity::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Customer)
        .order_by_asc(Column::CreatedAt)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, customer)| {
            let id = Uuid::parse_str(&id).ok()?;
            let customer = Uuid::parse_str(&customer).ok()?;
            Some((OrderId(id), CustomerId(customer)))
        })
        .collect())
}

/// Ids of one customer's orders, oldest first
pub async fn list_ids_by_customer<C: ConnectionTrait>(
    conn: &C,
    customer: CustomerId,
) -> anyhow::Result<Vec<OrderId>> {
    let ids: Vec<String> = Entity::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::Customer.eq(customer.value().to_string()))
        .order_by_asc(Column::CreatedAt)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(ids
        .iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .map(OrderId)
        .collect())
}

/// Orders created within `[from, to]`, both bounds inclusive
pub async fn list_created_between<C: ConnectionTrait>(
    conn: &C,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> anyhow::Result<Vec<Order>> {
    let mut query = Entity::find();
    if let Some(from) = from {
        query = query.filter(Column::CreatedAt.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(Column::CreatedAt.lte(to));
    }

    let items = query
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(conn: &C, aggregate: &Order) -> anyhow::Result<OrderId> {
    let active = ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        customer: Set(aggregate.customer.value().to_string()),
        suit_type: Set(aggregate.suit_type.clone()),
        quantity: Set(aggregate.quantity),
        delivery_date: Set(aggregate.delivery_date),
        status: Set(aggregate.status.as_str().to_string()),
        total_amount: Set(aggregate.total_amount),
        advance_paid: Set(aggregate.advance_paid),
        notes: Set(aggregate.notes.clone()),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
    };
    active.insert(conn).await?;
    Ok(aggregate.id)
}

/// Change the status; returns false when the order does not exist
pub async fn update_status<C: ConnectionTrait>(
    conn: &C,
    id: OrderId,
    status: OrderStatus,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.value().to_string()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
