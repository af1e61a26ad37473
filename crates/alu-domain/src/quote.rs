//! Persisted quote records and the payload used to save a quote.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    breakdown::PricedBreakdown,
    common::deserialize_dimension,
    item::ConfiguredItem,
    selection::AccessoryQuantities,
};

/// Placeholder written to the flat fields of a multi-item quote.
pub const MULTIPLE_LABEL: &str = "Multiple";

/// Quote record as returned by the quote service's fetch endpoint.
///
/// `accessories` and `details` are kept raw: older records store them as JSON
/// encoded strings, newer ones as structured values. Interpreting them is the
/// reconciliation layer's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_date: Option<String>,
    #[serde(default)]
    pub chassis_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_dimension")]
    pub height: Option<u32>,
    #[serde(default)]
    pub profile_series: Option<String>,
    #[serde(default)]
    pub glazing_type: Option<String>,
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub accessories: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_ht: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_ttc: Option<f64>,
    #[serde(default)]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body sent to the quote service when saving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub chassis_type: String,
    pub width: u32,
    pub height: u32,
    pub profile_series: String,
    pub glazing_type: String,
    pub finish: String,
    pub accessories: AccessoryQuantities,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_notes: String,
    pub breakdown: SaveBreakdown,
}

impl SavePayload {
    pub fn total_price(&self) -> f64 {
        match &self.breakdown {
            SaveBreakdown::MultiItem { total_price, .. } => *total_price,
            SaveBreakdown::Single(breakdown) => breakdown.total_price,
        }
    }

    pub fn item_count(&self) -> usize {
        match &self.breakdown {
            SaveBreakdown::MultiItem { items, .. } => items.len(),
            SaveBreakdown::Single(_) => 1,
        }
    }
}

/// Either the aggregate of several items or a single unit's own breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SaveBreakdown {
    MultiItem {
        items: Vec<ConfiguredItem>,
        total_price: f64,
    },
    Single(PricedBreakdown),
}

/// Identifier pair returned once a quote is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedQuote {
    pub quote_id: i64,
    pub quote_number: String,
}

/// One row of a quote listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteSummary {
    pub id: i64,
    pub quote_number: String,
    pub quote_date: String,
    pub client_name: String,
    pub item_count: usize,
    pub total_price: f64,
}
