//! The in-progress configuration a wizard session builds up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{deserialize_accessories, deserialize_dimension};

/// Accessory name to positive quantity. Zero entries are never stored.
pub type AccessoryQuantities = BTreeMap<String, u32>;

/// Wire names are camelCase to stay compatible with persisted quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
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
    #[serde(default, deserialize_with = "deserialize_accessories")]
    pub accessories: AccessoryQuantities,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub client_notes: String,
}

/// Client identity carried from one item to the next within a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ClientInfo {
        ClientInfo {
            name: self.client_name.clone(),
            email: self.client_email.clone(),
            phone: self.client_phone.clone(),
            notes: self.client_notes.clone(),
        }
    }

    pub fn set_client(&mut self, client: ClientInfo) {
        self.client_name = client.name;
        self.client_email = client.email;
        self.client_phone = client.phone;
        self.client_notes = client.notes;
    }

    /// Fresh configuration that keeps only the client identity.
    pub fn cleared_keeping_client(&self) -> Self {
        let mut next = Self::default();
        next.set_client(self.client());
        next
    }

    pub fn accessory_quantity(&self, name: &str) -> u32 {
        self.accessories.get(name).copied().unwrap_or(0)
    }

    /// Glazed surface in m², once both dimensions are known.
    pub fn surface_m2(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(f64::from(width) * f64::from(height) / 1_000_000.0),
            _ => None,
        }
    }

    /// Frame perimeter in metres, once both dimensions are known.
    pub fn perimeter_m(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => {
                Some(2.0 * (f64::from(width) + f64::from(height)) / 1000.0)
            }
            _ => None,
        }
    }

    pub fn has_client_name(&self) -> bool {
        !self.client_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_measures_follow_dimensions() {
        let mut selection = SelectionState::new();
        assert!(selection.surface_m2().is_none());
        selection.width = Some(1200);
        selection.height = Some(1000);
        assert_eq!(selection.surface_m2(), Some(1.2));
        assert_eq!(selection.perimeter_m(), Some(4.4));
    }

    #[test]
    fn derived_measures_handle_extreme_dimensions() {
        let mut selection = SelectionState::new();
        selection.width = Some(u32::MAX);
        selection.height = Some(u32::MAX);
        let perimeter = selection.perimeter_m().unwrap();
        assert_eq!(perimeter, 4.0 * f64::from(u32::MAX) / 1000.0);
        assert!(selection.surface_m2().unwrap() > 0.0);
    }

    #[test]
    fn clearing_keeps_only_client_fields() {
        let mut selection = SelectionState::new();
        selection.chassis_type = Some("Fenêtre".into());
        selection.accessories.insert("Poignée".into(), 2);
        selection.client_name = "Atelier Benali".into();
        selection.client_phone = "0600000000".into();

        let cleared = selection.cleared_keeping_client();
        assert!(cleared.chassis_type.is_none());
        assert!(cleared.accessories.is_empty());
        assert_eq!(cleared.client_name, "Atelier Benali");
        assert_eq!(cleared.client_phone, "0600000000");
    }

    #[test]
    fn wire_format_uses_camel_case_and_drops_zero_quantities() {
        let selection: SelectionState = serde_json::from_str(
            r#"{"chassisType":"Porte","width":900.0,"height":2100,
                "accessories":{"Serrure":1,"Gond":0},"clientName":"X"}"#,
        )
        .unwrap();
        assert_eq!(selection.chassis_type.as_deref(), Some("Porte"));
        assert_eq!(selection.width, Some(900));
        assert_eq!(selection.accessories.len(), 1);
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["profileSeries"], serde_json::Value::Null);
        assert_eq!(json["clientName"], "X");
    }
}
