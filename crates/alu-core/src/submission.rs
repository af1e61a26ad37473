//! Save payload assembly.

use alu_domain::{AccessoryQuantities, SaveBreakdown, SavePayload, MULTIPLE_LABEL};

use crate::{error::FinalizeError, item_ledger::ItemLedger};

/// Builds the payload the quote store expects. A ledger holding one item at
/// quantity 1 is saved in the flat legacy shape; anything else is saved as a
/// multi-item quote with placeholder flat fields. Client fields come from the
/// first item.
pub fn build_save_payload(ledger: &ItemLedger) -> Result<SavePayload, FinalizeError> {
    let items = ledger.items();
    let first = items.first().ok_or(FinalizeError::EmptyQuote)?;
    let client = first.selection.client();

    if let [only] = items {
        if only.quantity == 1 {
            let selection = &only.selection;
            return Ok(SavePayload {
                chassis_type: selection.chassis_type.clone().unwrap_or_default(),
                width: selection.width.unwrap_or_default(),
                height: selection.height.unwrap_or_default(),
                profile_series: selection.profile_series.clone().unwrap_or_default(),
                glazing_type: selection.glazing_type.clone().unwrap_or_default(),
                finish: selection.finish.clone().unwrap_or_default(),
                accessories: selection.accessories.clone(),
                client_name: client.name,
                client_email: client.email,
                client_phone: client.phone,
                client_notes: client.notes,
                breakdown: SaveBreakdown::Single(only.breakdown.clone()),
            });
        }
    }

    Ok(SavePayload {
        chassis_type: format!("Devis multiple ({} articles)", items.len()),
        width: 0,
        height: 0,
        profile_series: MULTIPLE_LABEL.to_string(),
        glazing_type: MULTIPLE_LABEL.to_string(),
        finish: MULTIPLE_LABEL.to_string(),
        accessories: AccessoryQuantities::new(),
        client_name: client.name,
        client_email: client.email,
        client_phone: client.phone,
        client_notes: client.notes,
        breakdown: SaveBreakdown::MultiItem {
            items: items.to_vec(),
            total_price: ledger.aggregate_total(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alu_domain::{ConfiguredItem, PricedBreakdown, SelectionState};

    fn item(total: f64, quantity: u32) -> ConfiguredItem {
        let mut selection = SelectionState::new();
        selection.chassis_type = Some("Fenêtre".into());
        selection.width = Some(1200);
        selection.height = Some(1000);
        selection.client_name = "Atelier Benali".into();
        ConfiguredItem::new(selection, PricedBreakdown::with_total(total), quantity)
    }

    #[test]
    fn empty_ledger_is_refused() {
        assert_eq!(
            build_save_payload(&ItemLedger::new()),
            Err(FinalizeError::EmptyQuote)
        );
    }

    #[test]
    fn single_unit_uses_flat_shape() {
        let ledger = ItemLedger::from_items(vec![item(500.0, 1)]);
        let payload = build_save_payload(&ledger).unwrap();
        assert_eq!(payload.chassis_type, "Fenêtre");
        assert_eq!(payload.width, 1200);
        assert!(matches!(payload.breakdown, SaveBreakdown::Single(_)));
        assert_eq!(payload.total_price(), 500.0);
        assert_eq!(payload.client_name, "Atelier Benali");
    }

    #[test]
    fn quantities_or_several_items_use_multi_shape() {
        let ledger = ItemLedger::from_items(vec![item(100.0, 2), item(250.0, 1)]);
        let payload = build_save_payload(&ledger).unwrap();
        assert_eq!(payload.chassis_type, "Devis multiple (2 articles)");
        assert_eq!((payload.width, payload.height), (0, 0));
        assert_eq!(payload.profile_series, "Multiple");
        assert_eq!(payload.total_price(), 450.0);
        assert_eq!(payload.item_count(), 2);

        let single_batch = ItemLedger::from_items(vec![item(100.0, 3)]);
        let payload = build_save_payload(&single_batch).unwrap();
        assert_eq!(payload.chassis_type, "Devis multiple (1 articles)");
        assert_eq!(payload.total_price(), 300.0);
    }
}
