//! Cost breakdown returned by the pricing service for one configured unit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names the pricing service uses for the client block of a quote's
/// details; they never belong to a breakdown.
pub const CLIENT_DETAIL_KEYS: [&str; 4] =
    ["client_name", "client_email", "client_phone", "client_notes"];

/// Named numeric fields plus everything else the service sent, kept verbatim
/// so a breakdown can be written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PricedBreakdown {
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub glazing_cost: f64,
    #[serde(default)]
    pub accessories_cost: f64,
    #[serde(default)]
    pub finish_supplement: f64,
    #[serde(default)]
    pub profile_cost: f64,
    #[serde(default)]
    pub labor: f64,
    #[serde(default)]
    pub surface_m2: f64,
    #[serde(default)]
    pub perimeter_m: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PricedBreakdown {
    pub fn with_total(total_price: f64) -> Self {
        Self {
            total_price,
            ..Self::default()
        }
    }

    /// Line total for `quantity` identical units.
    pub fn line_total(&self, quantity: u32) -> f64 {
        self.total_price * f64::from(quantity)
    }

    /// Reads an auxiliary numeric field such as `total_ht` or `vat_amount`.
    pub fn extra_number(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    /// Labelled rows for display, skipping auxiliary fields the service did
    /// not send.
    pub fn display_rows(&self) -> Vec<(&'static str, f64)> {
        let mut rows = vec![
            ("Glazing", self.glazing_cost),
            ("Profiles", self.profile_cost),
            ("Base price", self.base_price),
            ("Accessories", self.accessories_cost),
            ("Finish supplement", self.finish_supplement),
            ("Labor", self.labor),
        ];
        for (label, key) in [
            ("Discount", "discount_amount"),
            ("Total excl. VAT", "total_ht"),
            ("VAT", "vat_amount"),
        ] {
            if let Some(value) = self.extra_number(key) {
                rows.push((label, value));
            }
        }
        rows.push(("Total", self.total_price));
        rows
    }
}
