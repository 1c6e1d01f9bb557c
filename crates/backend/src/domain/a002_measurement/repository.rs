use contracts::domain::a001_customer::aggregate::CustomerId;
use contracts::domain::a002_measurement::aggregate::{Measurement, MeasurementId};
use contracts::domain::common::EntityMetadata;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::parse_stored_uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_measurement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub customer: String,
    pub length: f64,
    pub shoulder: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub neck: f64,
    pub sleeve_length: f64,
    pub wrist: f64,
    pub bicep: f64,
    pub shalwar_length: f64,
    pub thigh: f64,
    pub knee: f64,
    pub bottom: f64,
    pub pant_waist: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Measurement {
    fn from(m: Model) -> Self {
        Measurement {
            id: MeasurementId(parse_stored_uuid("a002_measurement", "id", &m.id)),
            customer: CustomerId(parse_stored_uuid("a002_measurement", "customer", &m.customer)),
            length: m.length,
            shoulder: m.shoulder,
            chest: m.chest,
            waist: m.waist,
            hip: m.hip,
            neck: m.neck,
            sleeve_length: m.sleeve_length,
            wrist: m.wrist,
            bicep: m.bicep,
            shalwar_length: m.shalwar_length,
            thigh: m.thigh,
            knee: m.knee,
            bottom: m.bottom,
            pant_waist: m.pant_waist,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
        }
    }
}

fn to_active(a: &Measurement) -> ActiveModel {
    ActiveModel {
        id: Set(a.id.value().to_string()),
        customer: Set(a.customer.value().to_string()),
        length: Set(a.length),
        shoulder: Set(a.shoulder),
        chest: Set(a.chest),
        waist: Set(a.waist),
        hip: Set(a.hip),
        neck: Set(a.neck),
        sleeve_length: Set(a.sleeve_length),
        wrist: Set(a.wrist),
        bicep: Set(a.bicep),
        shalwar_length: Set(a.shalwar_length),
        thigh: Set(a.thigh),
        knee: Set(a.knee),
        bottom: Set(a.bottom),
        pant_waist: Set(a.pant_waist),
        created_at: Set(a.metadata.created_at),
        updated_at: Set(a.metadata.updated_at),
    }
}

/// All measurements, newest first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Measurement>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_customer<C: ConnectionTrait>(
    conn: &C,
    customer: CustomerId,
) -> anyhow::Result<Option<Measurement>> {
    let result = Entity::find()
        .filter(Column::Customer.eq(customer.value().to_string()))
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, aggregate: &Measurement) -> anyhow::Result<MeasurementId> {
    to_active(aggregate).insert(conn).await?;
    Ok(aggregate.id)
}

pub async fn update<C: ConnectionTrait>(conn: &C, aggregate: &Measurement) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}

/// Remove the measurement of a customer; returns whether one existed
pub async fn delete_by_customer<C: ConnectionTrait>(conn: &C, customer: CustomerId) -> anyhow::Result<bool> {
    let result = Entity::delete_many()
        .filter(Column::Customer.eq(customer.value().to_string()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
