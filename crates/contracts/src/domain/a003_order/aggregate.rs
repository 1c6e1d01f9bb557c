use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::a001_customer::aggregate::{CustomerId, CustomerSummary};
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
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

impl AggregateId for OrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "delivered")]
    Delivered,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("Invalid status '{}'. Allowed: {}", s, allowed.join(", "))
            })
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const REQUIRED_FIELDS_MISSING: &str = "Required fields missing";

// ============================================================================
// Aggregate Root
// ============================================================================

/// A tailoring order placed by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerId,
    pub suit_type: String,
    pub quantity: i32,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub advance_paid: f64,
    pub notes: String,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Order {
    /// Build an order from a form, applying defaults for optional fields
    pub fn new_for_insert(dto: &NewOrderDto) -> Result<Self, String> {
        let customer = dto
            .customer
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(REQUIRED_FIELDS_MISSING)?;
        let suit_type = dto
            .suit_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(REQUIRED_FIELDS_MISSING)?;
        let delivery_date = dto
            .delivery_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(REQUIRED_FIELDS_MISSING)?;
        let total_amount = dto
            .total_amount
            .filter(|v| *v != 0.0)
            .ok_or(REQUIRED_FIELDS_MISSING)?;

        let customer = CustomerId::from_string(customer.trim())
            .map_err(|_| "Invalid customer id".to_string())?;
        let delivery_date = parse_delivery_date(delivery_date)?;

        let quantity = dto.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err("Quantity must be at least 1".into());
        }
        if total_amount < 0.0 {
            return Err("Total amount cannot be negative".into());
        }
        let advance_paid = dto.advance_paid.unwrap_or(0.0);
        if advance_paid < 0.0 {
            return Err("Advance paid cannot be negative".into());
        }

        Ok(Self {
            id: OrderId::new_v4(),
            customer,
            suit_type: suit_type.to_string(),
            quantity,
            delivery_date,
            status: OrderStatus::default(),
            total_amount,
            advance_paid,
            notes: dto.notes.clone().unwrap_or_default(),
            metadata: EntityMetadata::new(),
        })
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part is kept)
pub fn parse_delivery_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| format!("Invalid delivery date '{}'", s))
}

impl AggregateRoot for Order {
    type Id = OrderId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "order"
    }

    fn element_name() -> &'static str {
        "Order"
    }

    fn list_name() -> &'static str {
        "Orders"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderDto {
    pub customer: Option<String>,
    pub suit_type: Option<String>,
    pub quantity: Option<i32>,
    pub delivery_date: Option<String>,
    pub total_amount: Option<f64>,
    pub advance_paid: Option<f64>,
    pub notes: Option<String>,
}

/// Body of `PUT /api/orders/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrderStatusDto {
    #[serde(default)]
    pub status: String,
}

/// Query of `GET /api/orders/sales`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SalesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Sales aggregated over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_amount: f64,
    pub total_orders: u64,
}

/// Order together with the customer's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer_details: Option<CustomerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewOrderDto {
        NewOrderDto {
            customer: Some(Uuid::new_v4().to_string()),
            suit_type: Some("Shalwar Kameez".into()),
            delivery_date: Some("2025-03-14".into()),
            total_amount: Some(4500.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_value(OrderStatus::InProgress).unwrap(),
            "in progress"
        );
    }

    #[test]
    fn test_new_order_defaults() {
        let order = Order::new_for_insert(&form()).unwrap();
        assert_eq!(order.quantity, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.advance_paid, 0.0);
        assert_eq!(order.notes, "");
        assert_eq!(order.delivery_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_new_order_requires_fields() {
        let mut dto = form();
        dto.suit_type = None;
        assert_eq!(Order::new_for_insert(&dto).unwrap_err(), REQUIRED_FIELDS_MISSING);

        let mut dto = form();
        dto.total_amount = None;
        assert_eq!(Order::new_for_insert(&dto).unwrap_err(), REQUIRED_FIELDS_MISSING);

        let mut dto = form();
        dto.quantity = Some(0);
        assert!(Order::new_for_insert(&dto).is_err());
    }

    #[test]
    fn test_delivery_date_accepts_timestamps() {
        assert_eq!(
            parse_delivery_date("2025-03-14T10:30:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        assert!(parse_delivery_date("14/03/2025").is_err());
    }
}
