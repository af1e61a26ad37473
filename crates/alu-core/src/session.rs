//! The wizard session: one operator's selection, step and item ledger.
//!
//! All state changes go through command methods here. Each mutation bumps a
//! generation counter; a price calculation started under one generation is
//! only applied if the session has not moved since.

use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, info, warn};
use uuid::Uuid;

use alu_domain::{find_by_name_loose, ConfiguredItem, PricedBreakdown, QuoteRecord, SelectionState};

use crate::{
    catalog::Catalog,
    compatibility::{accessory_total, resolve},
    error::{OptionKind, PricingError, QuoteParseError, WizardError},
    item_ledger::{CommitOutcome, ItemLedger, QuoteTotals},
    reconcile::{reconstruct_record, Reconstruction},
    selection::{adjust_accessory, apply_field, AccessoryChange, SelectionField},
    wizard::WizardStep,
};

/// Snapshot handed to the pricing call. Completing it consumes it.
#[derive(Debug)]
pub struct CalculationTicket {
    generation: u64,
    pub selection: SelectionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationOutcome {
    /// Breakdown attached, session now on the summary step.
    Applied,
    /// The session changed while the call was in flight; result dropped.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    catalog: Arc<Catalog>,
    selection: SelectionState,
    breakdown: Option<PricedBreakdown>,
    step: WizardStep,
    ledger: ItemLedger,
    item_quantity: u32,
    item_committed: bool,
    forbidden: BTreeSet<String>,
    generation: u64,
    calculation_in_flight: bool,
}

impl WizardSession {
    pub fn new_session(catalog: Arc<Catalog>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            catalog,
            selection: SelectionState::new(),
            breakdown: None,
            step: WizardStep::FIRST,
            ledger: ItemLedger::new(),
            item_quantity: 1,
            item_committed: false,
            forbidden: BTreeSet::new(),
            generation: 0,
            calculation_in_flight: false,
        };
        info!(session_id = %session.id, "wizard session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn breakdown(&self) -> Option<&PricedBreakdown> {
        self.breakdown.as_ref()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn ledger(&self) -> &ItemLedger {
        &self.ledger
    }

    pub fn item_quantity(&self) -> u32 {
        self.item_quantity
    }

    pub fn item_committed(&self) -> bool {
        self.item_committed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_calculating(&self) -> bool {
        self.calculation_in_flight
    }

    /// Accessories that cannot be combined with the selected series.
    pub fn forbidden_accessories(&self) -> &BTreeSet<String> {
        &self.forbidden
    }

    pub fn is_forbidden(&self, accessory: &str) -> bool {
        self.forbidden.contains(accessory)
    }

    pub fn accessory_total(&self) -> f64 {
        accessory_total(&self.selection.accessories, &self.catalog)
    }

    pub fn compatibility_warning(&self) -> Option<String> {
        resolve(
            self.selection.profile_series.as_deref(),
            &self.selection.accessories,
            &self.catalog,
        )
        .warning()
    }

    /// Gate message for the current step while it is unmet.
    pub fn pending_message(&self) -> Option<String> {
        self.step
            .check(&self.selection, &self.catalog)
            .err()
            .map(|err| err.to_string())
    }

    pub fn totals(&self) -> QuoteTotals {
        self.ledger.totals()
    }

    pub fn can_finalize(&self) -> bool {
        self.ledger.can_finalize()
    }

    /// Drops every item and the selection; the catalog snapshot is kept.
    pub fn reset(&mut self) {
        let previous = self.id;
        *self = Self::new_session(Arc::clone(&self.catalog));
        debug!(previous_session = %previous, session_id = %self.id, "session reset");
    }

    /// Starts a new item: selection cleared except client fields, back to step 1.
    pub fn reset_for_next_item(&mut self) {
        self.selection = self.selection.cleared_keeping_client();
        self.breakdown = None;
        self.step = WizardStep::FIRST;
        self.item_quantity = 1;
        self.item_committed = false;
        self.forbidden.clear();
        self.ledger.cancel_edit();
        self.touch();
        debug!(session_id = %self.id, "ready for next item");
    }

    /// Sets a single-valued field. Returns accessories dropped because a new
    /// series forbids them.
    pub fn set_field(
        &mut self,
        field: SelectionField,
        value: &str,
    ) -> Result<Vec<String>, WizardError> {
        apply_field(&mut self.selection, &self.catalog, field, value)?;
        let removed = if field == SelectionField::ProfileSeries {
            self.refresh_compatibility()
        } else {
            Vec::new()
        };
        self.selection_changed();
        debug!(session_id = %self.id, %field, "field updated");
        Ok(removed)
    }

    /// Adjusts an accessory quantity by `delta`. An increase on an accessory
    /// the series forbids is refused silently with [`AccessoryChange::Blocked`].
    pub fn adjust_accessory(
        &mut self,
        name: &str,
        delta: i64,
    ) -> Result<AccessoryChange, WizardError> {
        let canonical = find_by_name_loose(&self.catalog.accessories, name)
            .map(|accessory| accessory.name.clone())
            .ok_or_else(|| WizardError::UnknownOption {
                kind: OptionKind::Accessory,
                name: name.to_string(),
            })?;
        let forbidden = self.is_forbidden(&canonical);
        let change = adjust_accessory(&mut self.selection, &canonical, delta, forbidden);
        match change {
            AccessoryChange::Updated { .. } | AccessoryChange::Removed => self.selection_changed(),
            AccessoryChange::Blocked => {
                debug!(session_id = %self.id, accessory = %canonical, "increase blocked by series");
            }
            AccessoryChange::Unchanged => {}
        }
        Ok(change)
    }

    /// Advances one step if the current step's gate holds. Leaving the client
    /// step goes through [`Self::begin_calculation`] instead.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::Client => return Err(WizardError::SummaryRequired),
            WizardStep::Summary => return Err(WizardError::AtFinalStep),
            _ => {}
        }
        self.step.check(&self.selection, &self.catalog)?;
        let next = self.step.following().ok_or(WizardError::AtFinalStep)?;
        self.step = next;
        self.touch();
        debug!(session_id = %self.id, step = next.number(), "advanced");
        Ok(next)
    }

    pub fn prev(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.preceding().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        self.touch();
        debug!(session_id = %self.id, step = previous.number(), "went back");
        Ok(previous)
    }

    /// Validates the configuration and reserves the single pricing slot.
    pub fn begin_calculation(&mut self) -> Result<CalculationTicket, WizardError> {
        if self.step != WizardStep::Client {
            return Err(WizardError::WrongStep {
                expected: WizardStep::Client,
                actual: self.step,
            });
        }
        if self.calculation_in_flight {
            return Err(WizardError::CalculationInFlight);
        }
        for definition in crate::wizard::STEPS
            .iter()
            .take_while(|definition| definition.step <= WizardStep::Client)
        {
            definition.step.check(&self.selection, &self.catalog)?;
        }
        self.calculation_in_flight = true;
        debug!(session_id = %self.id, generation = self.generation, "calculation started");
        Ok(CalculationTicket {
            generation: self.generation,
            selection: self.selection.clone(),
        })
    }

    /// Settles a calculation. A result for an outdated generation or step is
    /// discarded; a pricing failure leaves the session on the client step.
    pub fn complete_calculation(
        &mut self,
        ticket: CalculationTicket,
        result: Result<PricedBreakdown, String>,
    ) -> Result<CalculationOutcome, WizardError> {
        self.calculation_in_flight = false;
        if ticket.generation != self.generation || self.step != WizardStep::Client {
            warn!(
                session_id = %self.id,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale calculation result"
            );
            return Ok(CalculationOutcome::Discarded);
        }
        let breakdown = result.map_err(|message| {
            warn!(session_id = %self.id, %message, "price calculation failed");
            WizardError::Pricing(PricingError(message))
        })?;
        debug!(session_id = %self.id, total = breakdown.total_price, "configuration priced");
        self.breakdown = Some(breakdown);
        self.step = WizardStep::Summary;
        self.item_committed = false;
        self.touch();
        Ok(CalculationOutcome::Applied)
    }

    pub fn set_item_quantity(&mut self, quantity: u32) -> Result<u32, WizardError> {
        self.require_open_summary()?;
        if quantity == 0 {
            return Err(WizardError::InvalidQuantity);
        }
        self.item_quantity = quantity;
        self.touch();
        Ok(quantity)
    }

    /// Moves the quantity by `delta`, stopping at 1.
    pub fn adjust_item_quantity(&mut self, delta: i64) -> Result<u32, WizardError> {
        self.require_open_summary()?;
        let next = i64::from(self.item_quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        self.item_quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.touch();
        Ok(self.item_quantity)
    }

    /// Freezes the priced selection into the ledger. The session stays on
    /// the summary until [`Self::reset_for_next_item`] is called.
    pub fn commit_item(&mut self) -> Result<CommitOutcome, WizardError> {
        self.require_open_summary()?;
        let breakdown = self.breakdown.clone().ok_or(WizardError::NotPriced)?;
        let item = ConfiguredItem::new(self.selection.clone(), breakdown, self.item_quantity);
        let outcome = self.ledger.commit(item);
        self.item_committed = true;
        self.touch();
        info!(
            session_id = %self.id,
            position = outcome.index() + 1,
            items = self.ledger.len(),
            total = self.ledger.aggregate_total(),
            "item committed"
        );
        Ok(outcome)
    }

    /// Loads item `index` back for a full re-edit from step 1.
    pub fn edit_item(&mut self, index: usize) -> Result<(), WizardError> {
        let item = self.ledger.begin_edit(index)?;
        self.selection = item.selection;
        self.breakdown = Some(item.breakdown);
        self.item_quantity = item.quantity;
        self.item_committed = false;
        self.step = WizardStep::FIRST;
        self.refresh_compatibility();
        self.touch();
        debug!(session_id = %self.id, index, "editing item");
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<ConfiguredItem, WizardError> {
        let removed = self.ledger.remove(index)?;
        self.touch();
        info!(session_id = %self.id, index, remaining = self.ledger.len(), "item removed");
        Ok(removed)
    }

    /// Installs a persisted quote. A malformed record resets the session to a
    /// fresh wizard instead of leaving it half-populated.
    pub fn load_persisted(&mut self, record: &QuoteRecord) -> Result<(), QuoteParseError> {
        match reconstruct_record(record) {
            Ok(reconstruction) => {
                self.install(reconstruction);
                info!(
                    session_id = %self.id,
                    quote_id = ?record.id,
                    items = self.ledger.len(),
                    "quote loaded for editing"
                );
                Ok(())
            }
            Err(err) => {
                warn!(session_id = %self.id, quote_id = ?record.id, error = %err, "quote unreadable");
                self.reset();
                Err(err)
            }
        }
    }

    fn install(&mut self, reconstruction: Reconstruction) {
        self.selection = reconstruction.selection;
        self.breakdown = reconstruction.breakdown;
        self.ledger = reconstruction.ledger;
        self.step = WizardStep::FIRST;
        self.item_quantity = 1;
        self.item_committed = false;
        let removed = self.refresh_compatibility();
        if !removed.is_empty() {
            debug!(session_id = %self.id, ?removed, "dropped incompatible accessories");
        }
        self.touch();
    }

    fn require_open_summary(&self) -> Result<(), WizardError> {
        if self.step != WizardStep::Summary {
            return Err(WizardError::WrongStep {
                expected: WizardStep::Summary,
                actual: self.step,
            });
        }
        if self.item_committed {
            return Err(WizardError::AlreadyCommitted);
        }
        Ok(())
    }

    fn refresh_compatibility(&mut self) -> Vec<String> {
        let resolution = resolve(
            self.selection.profile_series.as_deref(),
            &self.selection.accessories,
            &self.catalog,
        );
        self.selection.accessories = resolution.accessories;
        self.forbidden = resolution.forbidden;
        resolution.removed
    }

    /// A changed selection invalidates any attached price.
    fn selection_changed(&mut self) {
        self.breakdown = None;
        if self.step == WizardStep::Summary {
            self.step = WizardStep::Client;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.generation += 1;
    }
}
