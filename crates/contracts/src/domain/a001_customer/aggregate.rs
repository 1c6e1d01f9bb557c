use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a002_measurement::aggregate::{Measurement, MeasurementId};
use crate::domain::a003_order::aggregate::OrderId;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Internal storage identifier of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Name of the counter sequence that numbers customers
pub const CUSTOMER_SEQUENCE: &str = "customer";

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

// ============================================================================
// Aggregate Root
// ============================================================================

/// A customer of the shop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,

    /// Zero-padded display ID ("01", "02", ...), assigned once on creation
    pub customer_id: Option<String>,

    pub name: String,
    pub phone: String,

    pub measurement_id: Option<MeasurementId>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Customer {
    /// Build a new customer for insertion, tagged with an allocated display ID
    pub fn new_for_insert(display_id: String, name: String, phone: String) -> Self {
        Self {
            id: CustomerId::new_v4(),
            customer_id: Some(display_id),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            measurement_id: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Apply a partial update; empty values leave the field unchanged
    pub fn update(&mut self, dto: &UpdateCustomerDto) {
        if let Some(name) = dto.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            self.name = name.to_string();
        }
        if let Some(phone) = dto.phone.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            self.phone = phone.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_phone(&self.phone)
    }

    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            id: self.id,
            customer_id: self.customer_id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".into());
    }
    Ok(())
}

/// Phone numbers are 10 to 15 ASCII digits, nothing else
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    let len_ok = (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&phone.len());
    if !len_ok || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "Phone number must contain {} to {} digits",
            PHONE_MIN_DIGITS, PHONE_MAX_DIGITS
        ));
    }
    Ok(())
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "customer"
    }

    fn element_name() -> &'static str {
        "Customer"
    }

    fn list_name() -> &'static str {
        "Customers"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of `POST /api/customers`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Body of `PUT /api/customers/:id`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCustomerDto {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Short customer reference embedded in measurement and order listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub customer_id: Option<String>,
    pub name: String,
    pub phone: String,
}

/// Customer with its measurement and order references resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    pub measurement: Option<Measurement>,
    #[serde(default)]
    pub orders: Vec<OrderId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("0300123456").is_ok());
        assert!(validate_phone("923001234567890").is_ok());
        assert!(validate_phone("030012345").is_err());
        assert!(validate_phone("9230012345678901").is_err());
        assert!(validate_phone("0300-123456").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_partial_update_keeps_missing_fields() {
        let mut customer =
            Customer::new_for_insert("01".into(), " Ali Raza ".into(), "03001234567".into());
        assert_eq!(customer.name, "Ali Raza");

        customer.update(&UpdateCustomerDto {
            name: Some("  ".into()),
            phone: Some("03219876543".into()),
        });
        assert_eq!(customer.name, "Ali Raza");
        assert_eq!(customer.phone, "03219876543");
        assert_eq!(customer.customer_id.as_deref(), Some("01"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let customer =
            Customer::new_for_insert("07".into(), "Bilal".into(), "03001234567".into());
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["customerId"], "07");
        assert!(json["measurementId"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
