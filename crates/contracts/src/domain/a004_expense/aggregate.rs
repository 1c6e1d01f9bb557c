use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub Uuid);

impl ExpenseId {
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

impl AggregateId for ExpenseId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ExpenseId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Shop expenses of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,

    /// Calendar month, `YYYY-MM`
    pub month: String,

    pub salaries: f64,
    pub rent: f64,
    pub electricity: f64,
    pub food: f64,
    pub maintenance: f64,
    pub other: f64,

    /// Sum of the six categories, always computed server side
    pub total_amount: f64,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Expense {
    pub fn new_for_insert(dto: &ExpenseDto) -> Result<Self, String> {
        let month = dto
            .month
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or("Month is required")?;
        validate_month(month)?;

        let mut expense = Self {
            id: ExpenseId::new_v4(),
            month: month.to_string(),
            salaries: 0.0,
            rent: 0.0,
            electricity: 0.0,
            food: 0.0,
            maintenance: 0.0,
            other: 0.0,
            total_amount: 0.0,
            metadata: EntityMetadata::new(),
        };
        expense.set_amounts(dto)?;
        Ok(expense)
    }

    /// Replace month (when given) and all category amounts, then recompute the total
    pub fn update(&mut self, dto: &ExpenseDto) -> Result<(), String> {
        if let Some(month) = dto.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            validate_month(month)?;
            self.month = month.to_string();
        }
        self.set_amounts(dto)
    }

    fn set_amounts(&mut self, dto: &ExpenseDto) -> Result<(), String> {
        let amount = |name: &str, v: Option<f64>| -> Result<f64, String> {
            let v = v.unwrap_or(0.0);
            if v < 0.0 || !v.is_finite() {
                return Err(format!("{} must be a non-negative amount", name));
            }
            Ok(v)
        };

        self.salaries = amount("salaries", dto.salaries)?;
        self.rent = amount("rent", dto.rent)?;
        self.electricity = amount("electricity", dto.electricity)?;
        self.food = amount("food", dto.food)?;
        self.maintenance = amount("maintenance", dto.maintenance)?;
        self.other = amount("other", dto.other)?;
        self.total_amount = self.compute_total();
        Ok(())
    }

    pub fn compute_total(&self) -> f64 {
        self.salaries + self.rent + self.electricity + self.food + self.maintenance + self.other
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

/// Months are `YYYY-MM`
pub fn validate_month(month: &str) -> Result<(), String> {
    let well_formed = month.len() == 7
        && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok();
    if !well_formed {
        return Err(format!("Invalid month '{}', expected YYYY-MM", month));
    }
    Ok(())
}

pub fn duplicate_month_message(month: &str) -> String {
    format!("Expense record for {} already exists.", month)
}

impl AggregateRoot for Expense {
    type Id = ExpenseId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "expense"
    }

    fn element_name() -> &'static str {
        "Expense"
    }

    fn list_name() -> &'static str {
        "Expenses"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of expense create/update requests; omitted amounts count as zero
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpenseDto {
    pub month: Option<String>,
    pub salaries: Option<f64>,
    pub rent: Option<f64>,
    pub electricity: Option<f64>,
    pub food: Option<f64>,
    pub maintenance: Option<f64>,
    pub other: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_categories() {
        let expense = Expense::new_for_insert(&ExpenseDto {
            month: Some("2025-01".into()),
            salaries: Some(1000.0),
            rent: Some(500.0),
            electricity: Some(200.0),
            food: Some(0.0),
            maintenance: Some(0.0),
            other: Some(0.0),
        })
        .unwrap();
        assert_eq!(expense.total_amount, 1700.0);
    }

    #[test]
    fn test_update_recomputes_and_keeps_month() {
        let mut expense = Expense::new_for_insert(&ExpenseDto {
            month: Some("2025-02".into()),
            rent: Some(800.0),
            ..Default::default()
        })
        .unwrap();
        expense
            .update(&ExpenseDto {
                food: Some(150.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(expense.month, "2025-02");
        assert_eq!(expense.rent, 0.0);
        assert_eq!(expense.total_amount, 150.0);
    }

    #[test]
    fn test_month_format() {
        assert!(validate_month("2025-12").is_ok());
        assert!(validate_month("2025-13").is_err());
        assert!(validate_month("2025-1").is_err());
        assert!(validate_month("January").is_err());
        assert!(Expense::new_for_insert(&ExpenseDto::default()).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Expense::new_for_insert(&ExpenseDto {
            month: Some("2025-03".into()),
            other: Some(-5.0),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
