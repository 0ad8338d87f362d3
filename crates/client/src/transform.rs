//! Provider response transformation.
//!
//! Maps the provider's raw schema into the stable `TransformedProperty`
//! output record. Pure and total: absent data becomes `None` (or a
//! documented default), never an invented placeholder, and the full
//! multi-year maps ride through untouched.

use plat_core::cache::normalize_address;
use plat_core::config::OwnerOverride;
use plat_core::property::{AssessedValue, TransformedProperty};
use std::collections::{BTreeMap, HashMap};

use crate::provider::RawProviderProperty;

/// Configured owner-name corrections, keyed by normalized provider record
/// id or formatted address.
#[derive(Debug, Clone, Default)]
pub struct OwnerOverrides {
    by_key: HashMap<String, String>,
}

impl OwnerOverrides {
    /// Build the override table from configuration entries.
    pub fn new(entries: &[OwnerOverride]) -> Self {
        let by_key = entries
            .iter()
            .map(|entry| (normalize_address(&entry.address), entry.owner_name.clone()))
            .collect();
        Self { by_key }
    }

    /// Find an override for a raw record: the provider id wins over the
    /// formatted address.
    fn matching(&self, raw: &RawProviderProperty) -> Option<&str> {
        raw.id
            .as_deref()
            .and_then(|id| self.by_key.get(&normalize_address(id)))
            .or_else(|| {
                raw.formatted_address
                    .as_deref()
                    .and_then(|addr| self.by_key.get(&normalize_address(addr)))
            })
            .map(String::as_str)
    }
}

/// Select the record under the numerically largest year key.
///
/// Keys that don't parse as years are skipped; an absent or empty map
/// yields `None` rather than a zero year.
fn latest_entry<'a, T>(map: Option<&'a BTreeMap<String, T>>) -> Option<(i32, &'a T)> {
    map?.iter()
        .filter_map(|(key, record)| key.trim().parse::<i32>().ok().map(|year| (year, record)))
        .max_by_key(|(year, _)| *year)
}

fn owner_name(raw: &RawProviderProperty, overrides: &OwnerOverrides) -> String {
    if let Some(name) = overrides.matching(raw) {
        return name.to_string();
    }

    raw.owner
        .as_ref()
        .and_then(|owner| owner.names.as_ref())
        .filter(|names| !names.is_empty())
        .map(|names| names.join(", "))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Transform a raw provider record into the application's output schema.
pub fn transform(raw: &RawProviderProperty, overrides: &OwnerOverrides) -> TransformedProperty {
    let latest_assessment = latest_entry(raw.tax_assessments.as_ref());
    let latest_tax = latest_entry(raw.property_taxes.as_ref());

    // Each component defaults to zero independently; the year never does.
    let assessed_value = latest_assessment
        .map(|(_, assessment)| AssessedValue {
            land: assessment.land.unwrap_or(0.0),
            building: assessment.improvements.unwrap_or(0.0),
            total: assessment.value.unwrap_or(0.0),
        })
        .unwrap_or_default();

    TransformedProperty {
        address: raw
            .address_line1
            .clone()
            .or_else(|| raw.formatted_address.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        city: raw.city.clone(),
        state: raw.state.clone(),
        zip_code: raw.zip_code.clone(),
        owner_name: owner_name(raw, overrides),
        property_type: raw.property_type.clone().unwrap_or_else(|| "Residential".to_string()),
        year_built: raw.year_built,
        square_footage: raw.square_footage,
        lot_size: raw.lot_size,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        stories: raw.features.as_ref().and_then(|f| f.floor_count),
        basement: raw.features.as_ref().and_then(|f| f.basement),
        garage: raw.features.as_ref().and_then(|f| f.garage_spaces),
        last_sale_date: raw.last_sale_date.clone(),
        last_sale_price: raw.last_sale_price,
        assessed_value,
        assessed_date: latest_assessment.map(|(year, _)| year),
        neighborhood: raw.neighborhood.clone(),
        subdivision: raw.subdivision.clone(),
        county: raw.county.clone(),
        latitude: raw.latitude,
        longitude: raw.longitude,
        tax_amount: latest_tax.and_then(|(_, bill)| bill.total),
        hoa_fee: raw.hoa_fee,
        features: raw.features.clone(),
        owner_occupied: raw.owner_occupied,
        zoning: raw.zoning.clone(),
        assessor_id: raw.assessor_id.clone(),
        legal_description: raw.legal_description.clone(),
        tax_assessments: raw.tax_assessments.clone(),
        property_taxes: raw.property_taxes.clone(),
        history: raw.history.clone(),
    }
}
