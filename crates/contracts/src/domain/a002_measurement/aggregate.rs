use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a001_customer::aggregate::{CustomerId, CustomerSummary};
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementId(pub Uuid);

impl MeasurementId {
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

impl AggregateId for MeasurementId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MeasurementId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

pub const ALL_FIELDS_REQUIRED: &str = "All measurement fields are required";

// ============================================================================
// Aggregate Root
// ============================================================================

/// Body measurements of one customer (inches)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: MeasurementId,
    pub customer: CustomerId,

    // Kameez
    pub length: f64,
    pub shoulder: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub neck: f64,
    pub sleeve_length: f64,
    pub wrist: f64,
    pub bicep: f64,

    // Shalwar
    pub shalwar_length: f64,
    pub thigh: f64,
    pub knee: f64,
    pub bottom: f64,
    pub pant_waist: f64,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

/// Copies every provided positive value of `$dto` onto `$target`
macro_rules! apply_positive {
    ($target:expr, $dto:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $dto.$field.filter(|v| *v > 0.0) {
                $target.$field = v;
            }
        )+
    };
}

impl Measurement {
    /// Create a measurement from a form; every field must be present and positive
    pub fn new_for_insert(customer: CustomerId, dto: &MeasurementDto) -> Result<Self, String> {
        let req = |v: Option<f64>| v.filter(|v| *v > 0.0).ok_or(ALL_FIELDS_REQUIRED);

        Ok(Self {
            id: MeasurementId::new_v4(),
            customer,
            length: req(dto.length)?,
            shoulder: req(dto.shoulder)?,
            chest: req(dto.chest)?,
            waist: req(dto.waist)?,
            hip: req(dto.hip)?,
            neck: req(dto.neck)?,
            sleeve_length: req(dto.sleeve_length)?,
            wrist: req(dto.wrist)?,
            bicep: req(dto.bicep)?,
            shalwar_length: req(dto.shalwar_length)?,
            thigh: req(dto.thigh)?,
            knee: req(dto.knee)?,
            bottom: req(dto.bottom)?,
            pant_waist: req(dto.pant_waist)?,
            metadata: EntityMetadata::new(),
        })
    }

    /// Partial update: only provided positive values replace the stored ones
    pub fn update(&mut self, dto: &MeasurementDto) {
        apply_positive!(
            self,
            dto,
            length,
            shoulder,
            chest,
            waist,
            hip,
            neck,
            sleeve_length,
            wrist,
            bicep,
            shalwar_length,
            thigh,
            knee,
            bottom,
            pant_waist,
        );
    }

    pub fn before_write(&mut self) {
        self.metadata.touch();
    }
}

impl AggregateRoot for Measurement {
    type Id = MeasurementId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "measurement"
    }

    fn element_name() -> &'static str {
        "Measurement"
    }

    fn list_name() -> &'static str {
        "Measurements"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of measurement create/update requests
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementDto {
    pub length: Option<f64>,
    pub shoulder: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub neck: Option<f64>,
    pub sleeve_length: Option<f64>,
    pub wrist: Option<f64>,
    pub bicep: Option<f64>,
    pub shalwar_length: Option<f64>,
    pub thigh: Option<f64>,
    pub knee: Option<f64>,
    pub bottom: Option<f64>,
    pub pant_waist: Option<f64>,
}

/// Measurement together with the owning customer's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementView {
    #[serde(flatten)]
    pub measurement: Measurement,
    pub customer_details: Option<CustomerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> MeasurementDto {
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

    #[test]
    fn test_create_requires_every_field() {
        let customer = CustomerId::new_v4();
        assert!(Measurement::new_for_insert(customer, &full_form()).is_ok());

        let mut missing = full_form();
        missing.pant_waist = None;
        assert_eq!(
            Measurement::new_for_insert(customer, &missing).unwrap_err(),
            ALL_FIELDS_REQUIRED
        );

        let mut zero = full_form();
        zero.neck = Some(0.0);
        assert!(Measurement::new_for_insert(customer, &zero).is_err());
    }

    #[test]
    fn test_update_is_partial() {
        let mut m = Measurement::new_for_insert(CustomerId::new_v4(), &full_form()).unwrap();
        m.update(&MeasurementDto {
            chest: Some(44.0),
            waist: Some(0.0),
            ..Default::default()
        });
        assert_eq!(m.chest, 44.0);
        assert_eq!(m.waist, 36.0);
        assert_eq!(m.length, 40.0);
    }
}
