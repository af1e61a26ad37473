//! Committed, priced units of a quote.

use serde::{Deserialize, Serialize};

use crate::{
    breakdown::PricedBreakdown,
    common::{default_quantity, deserialize_quantity},
    selection::SelectionState,
};

/// Frozen snapshot of a selection with the breakdown priced for it.
///
/// Serialises flat: the selection fields sit next to `breakdown` and
/// `quantity`, matching the `items` array of persisted multi-item quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfiguredItem {
    #[serde(flatten)]
    pub selection: SelectionState,
    pub breakdown: PricedBreakdown,
    #[serde(
        default = "default_quantity",
        deserialize_with = "deserialize_quantity"
    )]
    pub quantity: u32,
}

impl ConfiguredItem {
    pub fn new(selection: SelectionState, breakdown: PricedBreakdown, quantity: u32) -> Self {
        Self {
            selection,
            breakdown,
            quantity: quantity.max(1),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.breakdown.line_total(self.quantity)
    }

    /// Short label such as `Fenêtre coulissante 1200x1000`.
    pub fn label(&self) -> String {
        let chassis = self.selection.chassis_type.as_deref().unwrap_or("Item");
        match (self.selection.width, self.selection.height) {
            (Some(width), Some(height)) => format!("{chassis} {width}x{height}"),
            _ => chassis.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_round_trips_through_flat_wire_shape() {
        let raw = r#"{"chassisType":"Fenêtre","width":1200,"height":1000,
            "profileSeries":"Serie 40","glazingType":"4mm","finish":"Brut",
            "accessories":{"Poignée":2},"clientName":"A","clientEmail":"",
            "clientPhone":"","clientNotes":"",
            "breakdown":{"total_price":100.0},"quantity":3}"#;
        let item: ConfiguredItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.selection.accessory_quantity("Poignée"), 2);
        assert_eq!(item.line_total(), 300.0);
        assert_eq!(item.label(), "Fenêtre 1200x1000");

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["chassisType"], "Fenêtre");
        assert_eq!(value["breakdown"]["total_price"], 100.0);
        assert!(value.get("selection").is_none());
    }

    #[test]
    fn missing_or_zero_quantity_counts_as_one() {
        let missing: ConfiguredItem =
            serde_json::from_str(r#"{"breakdown":{"total_price":10}}"#).unwrap();
        assert_eq!(missing.quantity, 1);
        let zero: ConfiguredItem =
            serde_json::from_str(r#"{"breakdown":{"total_price":10},"quantity":0}"#).unwrap();
        assert_eq!(zero.quantity, 1);
    }
}
