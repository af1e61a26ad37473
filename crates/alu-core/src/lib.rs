//! alu-core
//!
//! The configuration wizard: step gating, accessory compatibility, the item
//! ledger, and reconciliation of stored quotes. Depends on alu-domain. Talks
//! to the outside world only through the traits in [`collaborators`].

pub mod catalog;
pub mod collaborators;
pub mod compatibility;
pub mod error;
pub mod format;
pub mod item_ledger;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod submission;
pub mod wizard;
pub mod workflow;

pub use catalog::{load_catalog, Catalog};
pub use collaborators::*;
pub use compatibility::{accessory_total, resolve, Resolution};
pub use error::*;
pub use format::{CurrencyFormatter, MoneyFormat};
pub use item_ledger::{CommitOutcome, ItemLedger, QuoteTotals};
pub use reconcile::{classify, reconstruct, reconstruct_record, PersistedQuote, Reconstruction};
pub use selection::{AccessoryChange, SelectionField};
pub use session::{CalculationOutcome, CalculationTicket, WizardSession};
pub use submission::build_save_payload;
pub use wizard::{validate_dimensions, WizardStep, STEPS};
pub use workflow::*;

#[cfg(test)]
mod tests;
