//! Contracts for the external services the wizard talks to.
//!
//! Implementations live outside this crate: `alu-storage-json` provides
//! file-backed ones, the CLI crate an HTTP client for the quoting service.

use async_trait::async_trait;

use alu_domain::{
    Accessory, ChassisType, Finish, GlazingType, PricedBreakdown, ProfileSeries, QuoteRecord,
    SavePayload, SavedQuote, SelectionState,
};

/// Read access to the five catalog option sets. Errors are plain messages;
/// [`crate::catalog::load_catalog`] attaches the failing set.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn chassis_types(&self) -> Result<Vec<ChassisType>, String>;
    async fn profile_series(&self) -> Result<Vec<ProfileSeries>, String>;
    async fn glazing_types(&self) -> Result<Vec<GlazingType>, String>;
    async fn finishes(&self) -> Result<Vec<Finish>, String>;
    async fn accessories(&self) -> Result<Vec<Accessory>, String>;
}

/// Turns a configuration into a cost breakdown.
#[async_trait]
pub trait PricingEngine: Send + Sync {
    /// Returns the service's human-readable message on failure.
    async fn calculate(&self, selection: &SelectionState) -> Result<PricedBreakdown, String>;
}

/// Persists quotes and fetches them back for editing.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn save(&self, payload: &SavePayload) -> Result<SavedQuote, String>;
    async fn fetch(&self, quote_id: i64) -> Result<QuoteRecord, String>;
}

/// Produces the customer-facing document for a stored quote.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, quote_id: i64) -> Result<Vec<u8>, String>;
}
