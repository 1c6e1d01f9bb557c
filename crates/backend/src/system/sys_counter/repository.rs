use anyhow::Context;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::format::format_display_id;

/// One named sequence; `value` is the next number to hand out
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Create-if-missing and increment in a single statement, returning the
/// pre-increment value. A never-used sequence hands out 1.
const ALLOCATE_SQL: &str = "INSERT INTO sys_counters (name, value) VALUES (?, 2) \
     ON CONFLICT(name) DO UPDATE SET value = value + 1 \
     RETURNING value - 1 AS allocated";

/// Take the next number of sequence `name`
///
/// `conn` may be a pooled connection or an open transaction; inside a
/// transaction the increment is undone on rollback.
pub async fn allocate<C: ConnectionTrait>(conn: &C, name: &str) -> anyhow::Result<i64> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            ALLOCATE_SQL,
            [name.into()],
        ))
        .await
        .with_context(|| format!("Failed to allocate from sequence '{}'", name))?
        .ok_or_else(|| anyhow::anyhow!("Sequence '{}' returned no value", name))?;

    let allocated: i64 = row.try_get("", "allocated")?;
    Ok(allocated)
}

/// Take the next number of sequence `name` formatted as a display ID ("01", "02", ...)
pub async fn allocate_display_id<C: ConnectionTrait>(conn: &C, name: &str) -> anyhow::Result<String> {
    let value = allocate(conn, name).await?;
    Ok(format_display_id(value))
}

/// Next value that `allocate` would return, without consuming it
#[cfg(test)]
pub async fn current_value<C: ConnectionTrait>(conn: &C, name: &str) -> anyhow::Result<i64> {
    let counter = Entity::find_by_id(name.to_string()).one(conn).await?;
    Ok(counter.map(|c| c.value).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::test_db;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_first_allocation_is_one() {
        let (_dir, db) = test_db().await;
        assert_eq!(current_value(&db, "customer").await.unwrap(), 1);
        assert_eq!(allocate_display_id(&db, "customer").await.unwrap(), "01");
        assert_eq!(allocate_display_id(&db, "customer").await.unwrap(), "02");
        assert_eq!(current_value(&db, "customer").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_sequences_are_independent() {
        let (_dir, db) = test_db().await;
        assert_eq!(allocate(&db, "customer").await.unwrap(), 1);
        assert_eq!(allocate(&db, "customer").await.unwrap(), 2);
        assert_eq!(allocate(&db, "invoice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_values_are_monotonic() {
        let (_dir, db) = test_db().await;
        let mut last = 0;
        for _ in 0..120 {
            let v = allocate(&db, "customer").await.unwrap();
            assert!(v > last);
            last = v;
        }
        assert_eq!(last, 120);
        assert_eq!(allocate_display_id(&db, "customer").await.unwrap(), "121");
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_unique() {
        let (_dir, db) = test_db().await;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { allocate(&db, "customer").await.unwrap() })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        assert_eq!(seen, (1..=20).collect::<HashSet<i64>>());
        assert_eq!(current_value(&db, "customer").await.unwrap(), 21);
    }
}
