//! The normalized property record persisted in the cache.
//!
//! `TransformedProperty` is the stable output schema of the service: the
//! "latest" assessment/tax slice is surfaced as top-level fields while the
//! full multi-year provider maps ride along untouched, so no provider data
//! is lost in transformation. Field names serialize in camelCase to match
//! the wire format consumed by the UI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest assessed value, split into components.
///
/// Each component independently defaults to zero when the source record
/// lacks it; the assessment *year* never defaults (it is absent instead).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessedValue {
    pub land: f64,
    pub building: f64,
    pub total: f64,
}

/// One year's tax assessment as the provider reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<f64>,
}

/// One year's property tax bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// A sale or other recorded event in the property's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Structural feature map. Known keys are typed; anything else the
/// provider sends is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basement: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garage_spaces: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Owner record from the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyOwner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

/// The normalized output record: value-typed, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedProperty {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub owner_name: String,
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basement: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sale_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sale_price: Option<f64>,
    pub assessed_value: AssessedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessed_date: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoa_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<PropertyFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_occupied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoning: Option<String>,
    #[serde(rename = "assessorID", skip_serializing_if = "Option::is_none")]
    pub assessor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_assessments: Option<BTreeMap<String, TaxAssessment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_taxes: Option<BTreeMap<String, TaxBill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<BTreeMap<String, SaleEvent>>,
}
