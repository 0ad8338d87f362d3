//! Raw provider response schema.
//!
//! Mirrors the provider's native record shape: year-keyed assessment and
//! tax maps, an owner name list, and a free-form feature map. Never
//! persisted; only the transformer consumes it.

use plat_core::property::{PropertyFeatures, PropertyOwner, SaleEvent, TaxAssessment, TaxBill};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A single property record as the provider returns it.
///
/// Every field is optional: the provider omits whatever it has no data
/// for, and the transformer decides the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProviderProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub last_sale_date: Option<String>,
    #[serde(default)]
    pub last_sale_price: Option<f64>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub subdivision: Option<String>,
    #[serde(default)]
    pub owner_occupied: Option<bool>,
    #[serde(default)]
    pub zoning: Option<String>,
    #[serde(default, rename = "assessorID")]
    pub assessor_id: Option<String>,
    #[serde(default)]
    pub legal_description: Option<String>,
    #[serde(default)]
    pub hoa_fee: Option<f64>,
    #[serde(default)]
    pub owner: Option<PropertyOwner>,
    #[serde(default)]
    pub features: Option<PropertyFeatures>,
    #[serde(default)]
    pub tax_assessments: Option<BTreeMap<String, TaxAssessment>>,
    #[serde(default)]
    pub property_taxes: Option<BTreeMap<String, TaxBill>>,
    #[serde(default)]
    pub history: Option<BTreeMap<String, SaleEvent>>,
}
