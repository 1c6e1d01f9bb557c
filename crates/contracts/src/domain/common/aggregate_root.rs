use super::{AggregateId, EntityMetadata};

/// Aggregate root
///
/// Instance accessors plus the static naming metadata every aggregate carries.
pub trait AggregateRoot {
    type Id: AggregateId;

    fn id(&self) -> Self::Id;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Index of the aggregate in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name in the database (e.g. "customer")
    fn collection_name() -> &'static str;

    /// Singular name for messages (e.g. "Customer")
    fn element_name() -> &'static str;

    /// Plural name for messages (e.g. "Customers")
    fn list_name() -> &'static str;

    /// Full name of the aggregate, which is also its table name (e.g. "a001_customer")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
