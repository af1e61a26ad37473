//! alu-domain
//!
//! Pure data model for the joinery configurator: catalog entries, the
//! in-progress selection, priced breakdowns, configured items, and the
//! persisted quote shapes. No I/O, no CLI, no wizard logic.

pub mod breakdown;
pub mod catalog;
pub mod common;
pub mod item;
pub mod quote;
pub mod selection;

pub use breakdown::*;
pub use catalog::*;
pub use common::*;
pub use item::*;
pub use quote::*;
pub use selection::*;
