use contracts::domain::a004_expense::aggregate::{Expense, ExpenseId};
use contracts::domain::common::EntityMetadata;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::parse_stored_uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_expense")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub month: String,
    pub salaries: f64,
    pub rent: f64,
    pub electricity: f64,
    pub food: f64,
    pub maintenance: f64,
    pub other: f64,
    pub total_amount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(m: Model) -> Self {
        Expense {
            id: ExpenseId(parse_stored_uuid("a004_expense", "id", &m.id)),
            month: m.month,
            salaries: m.salaries,
            rent: m.rent,
            electricity: m.electricity,
            food: m.food,
            maintenance: m.maintenance,
            other: m.other,
            total_amount: m.total_amount,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        }
    }
}

fn to_active(a: &Expense) -> ActiveModel {
    ActiveModel {
        id: Set(a.id.value().to_string()),
        month: Set(a.month.clone()),
        salaries: Set(a.salaries),
        rent: Set(a.rent),
        electricity: Set(a.electricity),
        food: Set(a.food),
        maintenance: Set(a.maintenance),
        other: Set(a.other),
        total_amount: Set(a.total_amount),
        created_at: Set(a.metadata.created_at),
        updated_at: Set(a.metadata.updated_at),
    }
}

/// All expense records, newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Expense>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: ExpenseId) -> anyhow::Result<Option<Expense>> {
    let result = Entity::find_by_id(id.value().to_string()).one(conn).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_month<C: ConnectionTrait>(conn: &C, month: &str) -> anyhow::Result<Option<Expense>> {
    let result = Entity::find()
        .filter(Column::Month.eq(month))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, aggregate: &Expense) -> anyhow::Result<ExpenseId> {
    to_active(aggregate).insert(conn).await?;
    Ok(aggregate.id)
}

pub async fn update<C: ConnectionTrait>(conn: &C, aggregate: &Expense) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}
