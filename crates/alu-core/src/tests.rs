use std::sync::Arc;

use serde_json::json;

use crate::{
    catalog::Catalog,
    error::{Field, WizardError},
    item_ledger::CommitOutcome,
    selection::{AccessoryChange, SelectionField},
    session::{CalculationOutcome, WizardSession},
    wizard::WizardStep,
};
use alu_domain::{
    Accessory, ChassisType, Finish, GlazingType, PricedBreakdown, ProfileSeries, QuoteRecord,
};

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(
        vec![
            ChassisType::new("Fenêtre", (400, 2400), (300, 2200)),
            ChassisType::new("Porte", (700, 1200), (1900, 2500)),
        ],
        vec![
            ProfileSeries::new("Serie 40", 85.0),
            ProfileSeries::new("Serie 60", 120.0),
        ],
        vec![GlazingType::new("Double 4/16/4", 320.0)],
        vec![Finish::new("Brut", 1.0), Finish::new("Anodisé", 1.15)],
        vec![
            Accessory::new("Poignée", 40.0),
            Accessory::new("Rail bas", 25.0).incompatible_with("Serie 40"),
        ],
    ))
}

/// Fills every item field from step 1 and advances to the client step.
fn configure_window(session: &mut WizardSession, width: &str) {
    session.set_field(SelectionField::ChassisType, "Fenêtre").unwrap();
    session.next().unwrap();
    session.set_field(SelectionField::Width, width).unwrap();
    session.set_field(SelectionField::Height, "1000").unwrap();
    session.next().unwrap();
    session.set_field(SelectionField::ProfileSeries, "Serie 60").unwrap();
    session.next().unwrap();
    session.set_field(SelectionField::GlazingType, "Double 4/16/4").unwrap();
    session.next().unwrap();
    session.adjust_accessory("Poignée", 2).unwrap();
    session.next().unwrap();
    session.set_field(SelectionField::Finish, "Brut").unwrap();
    session.next().unwrap();
    assert_eq!(session.step(), WizardStep::Client);
}

fn session_at_client_step() -> WizardSession {
    let mut session = WizardSession::new_session(catalog());
    configure_window(&mut session, "1200");
    session.set_field(SelectionField::ClientName, "Atelier Benali").unwrap();
    session
}

fn price(session: &mut WizardSession, total: f64) {
    let ticket = session.begin_calculation().unwrap();
    let outcome = session
        .complete_calculation(ticket, Ok(PricedBreakdown::with_total(total)))
        .unwrap();
    assert_eq!(outcome, CalculationOutcome::Applied);
}

#[test]
fn next_without_chassis_is_rejected_and_changes_nothing() {
    let mut session = WizardSession::new_session(catalog());
    let before = session.selection().clone();
    let generation = session.generation();

    let err = session.next().unwrap_err();
    match err {
        WizardError::Validation(validation) => {
            assert!(validation.message_for(Field::ChassisType).is_some())
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.step(), WizardStep::ChassisType);
    assert_eq!(session.selection(), &before);
    assert_eq!(session.generation(), generation);
}

#[test]
fn out_of_range_dimensions_block_step_two() {
    let mut session = WizardSession::new_session(catalog());
    session.set_field(SelectionField::ChassisType, "Porte").unwrap();
    session.next().unwrap();
    session.set_field(SelectionField::Width, "1500").unwrap();
    session.set_field(SelectionField::Height, "abc").unwrap();
    assert_eq!(session.selection().height, None);

    let err = session.next().unwrap_err();
    let WizardError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        validation.message_for(Field::Width),
        Some("Width must be between 700 and 1200 mm")
    );
    assert!(validation.message_for(Field::Height).is_some());
    assert_eq!(session.step(), WizardStep::Dimensions);
}

#[test]
fn prev_is_unconditional_above_step_one() {
    let mut session = session_at_client_step();
    session.set_field(SelectionField::ClientName, "").unwrap();
    assert_eq!(session.prev(), Ok(WizardStep::Finish));

    let mut fresh = WizardSession::new_session(catalog());
    assert_eq!(fresh.prev(), Err(WizardError::AtFirstStep));
}

#[test]
fn client_step_requires_summary_action() {
    let mut session = session_at_client_step();
    assert_eq!(session.next(), Err(WizardError::SummaryRequired));
    price(&mut session, 100.0);
    assert_eq!(session.next(), Err(WizardError::AtFinalStep));
}

#[test]
fn switching_series_drops_forbidden_accessories() {
    let mut session = WizardSession::new_session(catalog());
    session.adjust_accessory("Rail bas", 3).unwrap();
    session.adjust_accessory("Poignée", 1).unwrap();
    assert_eq!(session.accessory_total(), 115.0);

    let removed = session
        .set_field(SelectionField::ProfileSeries, "Serie 40")
        .unwrap();
    assert_eq!(removed, vec!["Rail bas".to_string()]);
    assert!(session.is_forbidden("Rail bas"));
    assert_eq!(session.selection().accessory_quantity("Rail bas"), 0);
    assert_eq!(session.accessory_total(), 40.0);

    assert_eq!(
        session.adjust_accessory("rail bas", 1),
        Ok(AccessoryChange::Blocked)
    );
    assert_eq!(session.selection().accessory_quantity("Rail bas"), 0);

    session
        .set_field(SelectionField::ProfileSeries, "Serie 60")
        .unwrap();
    assert!(session.forbidden_accessories().is_empty());
    assert!(session.compatibility_warning().is_none());
}

#[test]
fn unknown_accessory_is_an_error() {
    let mut session = WizardSession::new_session(catalog());
    assert!(matches!(
        session.adjust_accessory("Moustiquaire", 1),
        Err(WizardError::UnknownOption { .. })
    ));
}

#[test]
fn pricing_failure_stays_on_client_step() {
    let mut session = session_at_client_step();
    let before = session.selection().clone();
    let ticket = session.begin_calculation().unwrap();
    let err = session
        .complete_calculation(ticket, Err("Tarif introuvable".into()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Price calculation failed: Tarif introuvable");
    assert_eq!(session.step(), WizardStep::Client);
    assert_eq!(session.selection(), &before);
    assert!(session.breakdown().is_none());
    assert!(!session.is_calculating());
}

#[test]
fn second_calculation_is_refused_while_one_is_in_flight() {
    let mut session = session_at_client_step();
    let ticket = session.begin_calculation().unwrap();
    assert!(matches!(
        session.begin_calculation(),
        Err(WizardError::CalculationInFlight)
    ));
    session
        .complete_calculation(ticket, Ok(PricedBreakdown::with_total(1.0)))
        .unwrap();
    assert_eq!(session.step(), WizardStep::Summary);
}

#[test]
fn late_result_after_navigation_is_discarded() {
    let mut session = session_at_client_step();
    let ticket = session.begin_calculation().unwrap();
    session.prev().unwrap();
    session.next().unwrap();
    assert_eq!(session.step(), WizardStep::Client);

    let outcome = session
        .complete_calculation(ticket, Ok(PricedBreakdown::with_total(999.0)))
        .unwrap();
    assert_eq!(outcome, CalculationOutcome::Discarded);
    assert!(session.breakdown().is_none());
    assert_eq!(session.step(), WizardStep::Client);
}

#[test]
fn commits_accumulate_and_client_fields_carry_over() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.set_item_quantity(2).unwrap();
    assert_eq!(
        session.commit_item(),
        Ok(CommitOutcome::Appended { index: 0 })
    );
    assert_eq!(session.commit_item(), Err(WizardError::AlreadyCommitted));

    session.reset_for_next_item();
    assert_eq!(session.step(), WizardStep::ChassisType);
    assert!(session.selection().chassis_type.is_none());
    assert_eq!(session.selection().client_name, "Atelier Benali");
    assert_eq!(session.item_quantity(), 1);
}

#[test]
fn aggregate_total_follows_quantities() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.set_item_quantity(2).unwrap();
    session.commit_item().unwrap();

    session.reset_for_next_item();
    configure_window(&mut session, "800");
    price(&mut session, 250.0);
    session.commit_item().unwrap();

    let totals = session.totals();
    assert_eq!(totals.total_price, 450.0);
    assert_eq!(totals.item_count, 2);
    assert_eq!(totals.unit_count, 3);
}

#[test]
fn editing_replaces_the_item_in_place() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.commit_item().unwrap();
    session.reset_for_next_item();
    configure_window(&mut session, "600");
    price(&mut session, 250.0);
    session.commit_item().unwrap();
    assert_eq!(session.ledger().len(), 2);

    session.edit_item(0).unwrap();
    assert_eq!(session.step(), WizardStep::ChassisType);
    assert_eq!(session.ledger().editing_index(), Some(0));
    assert_eq!(session.selection().width, Some(1200));

    session.set_field(SelectionField::Finish, "Anodisé").unwrap();
    for _ in 0..6 {
        session.next().unwrap();
    }
    price(&mut session, 130.0);
    session.set_item_quantity(3).unwrap();
    assert_eq!(
        session.commit_item(),
        Ok(CommitOutcome::Replaced { index: 0 })
    );
    assert_eq!(session.ledger().len(), 2);
    assert_eq!(session.totals().total_price, 130.0 * 3.0 + 250.0);
    assert_eq!(
        session.ledger().items()[0].selection.finish.as_deref(),
        Some("Anodisé")
    );
}

#[test]
fn removing_last_item_disables_finalize() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.commit_item().unwrap();
    assert!(session.can_finalize());
    session.remove_item(0).unwrap();
    assert!(!session.can_finalize());
    assert_eq!(session.remove_item(0), Err(WizardError::ItemNotFound(0)));
}

#[test]
fn changing_a_priced_selection_requires_repricing() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.set_field(SelectionField::Finish, "Anodisé").unwrap();
    assert_eq!(session.step(), WizardStep::Client);
    assert!(session.breakdown().is_none());
    assert!(matches!(
        session.commit_item(),
        Err(WizardError::WrongStep { .. })
    ));
}

#[test]
fn quantity_never_drops_below_one() {
    let mut session = session_at_client_step();
    price(&mut session, 10.0);
    assert_eq!(session.adjust_item_quantity(-4), Ok(1));
    assert_eq!(session.adjust_item_quantity(2), Ok(3));
    assert_eq!(session.set_item_quantity(0), Err(WizardError::InvalidQuantity));
    assert_eq!(session.item_quantity(), 3);
}

#[test]
fn quantity_deltas_saturate_at_the_bounds() {
    let mut session = session_at_client_step();
    price(&mut session, 10.0);
    assert_eq!(session.adjust_item_quantity(i64::MAX), Ok(u32::MAX));
    assert_eq!(session.adjust_item_quantity(1), Ok(u32::MAX));
    assert_eq!(session.adjust_item_quantity(i64::MIN), Ok(1));
}

#[test]
fn loading_a_stored_quote_applies_series_constraints() {
    let mut session = WizardSession::new_session(catalog());
    let record: QuoteRecord = serde_json::from_value(json!({
        "id": 4,
        "chassis_type": "Fenêtre",
        "width": 1200,
        "height": 1000,
        "profile_series": "Serie 40",
        "glazing_type": "Double 4/16/4",
        "finish": "Brut",
        "accessories": {"Rail bas": 1, "Poignée": 1},
        "details": {"total_price": 300, "client_name": "B"}
    }))
    .unwrap();

    session.load_persisted(&record).unwrap();
    assert_eq!(session.step(), WizardStep::ChassisType);
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.selection().accessory_quantity("Rail bas"), 0);
    assert!(session.is_forbidden("Rail bas"));
    assert_eq!(session.selection().client_name, "B");
}

#[test]
fn unreadable_quote_falls_back_to_a_fresh_session() {
    let mut session = session_at_client_step();
    price(&mut session, 100.0);
    session.commit_item().unwrap();
    let previous_id = session.id();

    let record = QuoteRecord {
        details: json!("{broken"),
        ..QuoteRecord::default()
    };
    assert!(session.load_persisted(&record).is_err());
    assert_ne!(session.id(), previous_id);
    assert!(session.ledger().is_empty());
    assert_eq!(session.step(), WizardStep::ChassisType);
    assert_eq!(session.selection().client_name, "");
    assert!(!session.catalog().is_empty());
}
