//! Rebuilds wizard state from a persisted quote.
//!
//! Stored quotes come in two shapes. [`classify`] is the only place that
//! tells them apart; each variant then has its own reconstruction path into
//! the common [`Reconstruction`].

use serde::Deserialize;
use serde_json::{Map, Value};

use alu_domain::{
    deserialize_accessories, AccessoryQuantities, ClientInfo, ConfiguredItem, PricedBreakdown,
    QuoteRecord, SelectionState, CLIENT_DETAIL_KEYS,
};

use crate::{error::QuoteParseError, item_ledger::ItemLedger};

/// A stored quote, after shape detection.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistedQuote {
    /// One configuration's fields on the record itself, breakdown in `details`.
    Legacy {
        selection: SelectionState,
        breakdown: PricedBreakdown,
    },
    /// `details.items` holds the configured items.
    MultiItem {
        items: Vec<ConfiguredItem>,
        client: ClientInfo,
    },
}

/// Wizard state ready to be installed in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub selection: SelectionState,
    /// Breakdown of the item the selection mirrors.
    pub breakdown: Option<PricedBreakdown>,
    pub ledger: ItemLedger,
}

#[derive(Deserialize)]
struct AccessoryField(#[serde(deserialize_with = "deserialize_accessories")] AccessoryQuantities);

/// Values stored as JSON text are decoded; structured values pass through.
fn structured(value: &Value) -> Result<Value, serde_json::Error> {
    match value {
        Value::String(text) => serde_json::from_str(text),
        other => Ok(other.clone()),
    }
}

fn details_object(record: &QuoteRecord) -> Result<Map<String, Value>, QuoteParseError> {
    let details = structured(&record.details)
        .map_err(|err| QuoteParseError::MalformedDetails(err.to_string()))?;
    match details {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(QuoteParseError::MalformedDetails(format!(
            "expected an object, found {other}"
        ))),
    }
}

fn client_from(details: &Map<String, Value>) -> ClientInfo {
    let text = |key: &str| {
        details
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    ClientInfo {
        name: text("client_name"),
        email: text("client_email"),
        phone: text("client_phone"),
        notes: text("client_notes"),
    }
}

/// Decides the shape of `record` and decodes it fully. Any malformed part
/// fails the whole record.
pub fn classify(record: &QuoteRecord) -> Result<PersistedQuote, QuoteParseError> {
    let mut details = details_object(record)?;
    let client = client_from(&details);

    match details.remove("items") {
        Some(Value::Array(raw_items)) if !raw_items.is_empty() => {
            let items = raw_items
                .into_iter()
                .enumerate()
                .map(|(index, raw)| {
                    serde_json::from_value::<ConfiguredItem>(raw).map_err(|err| {
                        QuoteParseError::MalformedItem {
                            index,
                            message: err.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PersistedQuote::MultiItem { items, client })
        }
        Some(Value::Array(_)) | Some(Value::Null) | None => legacy(record, details, client),
        Some(other) => Err(QuoteParseError::MalformedDetails(format!(
            "`items` must be an array, found {other}"
        ))),
    }
}

fn legacy(
    record: &QuoteRecord,
    mut details: Map<String, Value>,
    client: ClientInfo,
) -> Result<PersistedQuote, QuoteParseError> {
    let accessories = structured(&record.accessories)
        .and_then(serde_json::from_value::<AccessoryField>)
        .map_err(|err| QuoteParseError::MalformedAccessories(err.to_string()))?
        .0;

    for key in CLIENT_DETAIL_KEYS {
        details.remove(key);
    }
    let breakdown = serde_json::from_value::<PricedBreakdown>(Value::Object(details))
        .map_err(|err| QuoteParseError::MalformedBreakdown(err.to_string()))?;

    let mut selection = SelectionState {
        chassis_type: record.chassis_type.clone(),
        width: record.width,
        height: record.height,
        profile_series: record.profile_series.clone(),
        glazing_type: record.glazing_type.clone(),
        finish: record.finish.clone(),
        accessories,
        ..SelectionState::default()
    };
    selection.set_client(client);

    Ok(PersistedQuote::Legacy {
        selection,
        breakdown,
    })
}

/// Legacy: a one-item ledger mirrored by the selection. Multi-item: the items
/// verbatim, with the selection copying item 0 plus the record's client.
pub fn reconstruct(quote: PersistedQuote) -> Reconstruction {
    match quote {
        PersistedQuote::Legacy {
            selection,
            breakdown,
        } => {
            let item = ConfiguredItem::new(selection.clone(), breakdown.clone(), 1);
            Reconstruction {
                selection,
                breakdown: Some(breakdown),
                ledger: ItemLedger::from_items(vec![item]),
            }
        }
        PersistedQuote::MultiItem { items, client } => {
            let (mut selection, breakdown) = items
                .first()
                .map(|first| (first.selection.clone(), Some(first.breakdown.clone())))
                .unwrap_or_default();
            selection.set_client(client);
            Reconstruction {
                selection,
                breakdown,
                ledger: ItemLedger::from_items(items),
            }
        }
    }
}

/// [`classify`] then [`reconstruct`].
pub fn reconstruct_record(record: &QuoteRecord) -> Result<Reconstruction, QuoteParseError> {
    classify(record).map(reconstruct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_record() -> QuoteRecord {
        serde_json::from_value(json!({
            "id": 3,
            "quote_number": "DEV-20240105-0003",
            "chassis_type": "Fenêtre",
            "width": 1200,
            "height": 1000,
            "profile_series": "Serie 40",
            "glazing_type": "Double 4/16/4",
            "finish": "Blanc",
            "accessories": "{\"Poignée\": 2}",
            "details": "{\"total_price\": 980.5, \"labor\": 120, \"client_name\": \"Atelier Benali\"}"
        }))
        .unwrap()
    }

    #[test]
    fn legacy_record_becomes_single_mirrored_item() {
        let rebuilt = reconstruct_record(&legacy_record()).unwrap();
        assert_eq!(rebuilt.ledger.len(), 1);
        let item = &rebuilt.ledger.items()[0];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.selection.chassis_type.as_deref(), Some("Fenêtre"));
        assert_eq!(item.selection.width, Some(1200));
        assert_eq!(item.selection.height, Some(1000));
        assert_eq!(item.selection.profile_series.as_deref(), Some("Serie 40"));
        assert_eq!(item.selection.glazing_type.as_deref(), Some("Double 4/16/4"));
        assert_eq!(item.selection.finish.as_deref(), Some("Blanc"));
        assert_eq!(item.selection.accessory_quantity("Poignée"), 2);
        assert_eq!(item.breakdown.total_price, 980.5);
        assert!(!item.breakdown.extra.contains_key("client_name"));
        assert_eq!(rebuilt.selection, item.selection);
        assert_eq!(rebuilt.selection.client_name, "Atelier Benali");
    }

    #[test]
    fn multi_item_record_keeps_order_and_mirrors_first() {
        let record: QuoteRecord = serde_json::from_value(json!({
            "id": 9,
            "chassis_type": "Devis multiple (3 articles)",
            "width": 0,
            "height": 0,
            "accessories": {},
            "details": {
                "items": [
                    {"chassisType": "Porte", "width": 900, "height": 2100,
                     "breakdown": {"total_price": 100}, "quantity": 2},
                    {"chassisType": "Fenêtre", "width": 600, "height": 600,
                     "breakdown": {"total_price": 50}},
                    {"chassisType": "Baie", "width": 2400, "height": 2100,
                     "breakdown": {"total_price": 700}, "quantity": 1}
                ],
                "total_price": 950,
                "client_name": "Client X",
                "client_phone": "0522"
            }
        }))
        .unwrap();

        let rebuilt = reconstruct_record(&record).unwrap();
        let names: Vec<_> = rebuilt
            .ledger
            .items()
            .iter()
            .map(|item| item.selection.chassis_type.clone().unwrap())
            .collect();
        assert_eq!(names, ["Porte", "Fenêtre", "Baie"]);
        assert_eq!(rebuilt.ledger.editing_index(), None);
        assert_eq!(rebuilt.selection.chassis_type.as_deref(), Some("Porte"));
        assert_eq!(rebuilt.selection.width, Some(900));
        assert_eq!(rebuilt.selection.client_name, "Client X");
        assert_eq!(rebuilt.selection.client_phone, "0522");
        assert_eq!(rebuilt.breakdown.map(|b| b.total_price), Some(100.0));
        assert_eq!(rebuilt.ledger.aggregate_total(), 950.0);
    }

    #[test]
    fn empty_items_array_reads_as_legacy() {
        let mut record = legacy_record();
        record.details = json!({"items": [], "total_price": 10});
        assert!(matches!(
            classify(&record),
            Ok(PersistedQuote::Legacy { .. })
        ));
    }

    #[test]
    fn malformed_text_fields_are_parse_errors() {
        let mut record = legacy_record();
        record.details = Value::String("{not json".into());
        assert!(matches!(
            classify(&record),
            Err(QuoteParseError::MalformedDetails(_))
        ));

        let mut record = legacy_record();
        record.accessories = Value::String("[1, 2".into());
        assert!(matches!(
            classify(&record),
            Err(QuoteParseError::MalformedAccessories(_))
        ));
    }

    #[test]
    fn one_bad_item_fails_the_whole_record() {
        let mut record = legacy_record();
        record.details = json!({"items": [
            {"chassisType": "Porte", "breakdown": {"total_price": 1}},
            {"chassisType": "Porte", "breakdown": "oops"}
        ]});
        assert!(matches!(
            classify(&record),
            Err(QuoteParseError::MalformedItem { index: 1, .. })
        ));
    }
}
