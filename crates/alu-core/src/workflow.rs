//! Async flows that cross a collaborator boundary.

use std::sync::Arc;

use tracing::info;

use alu_domain::SavedQuote;

use crate::{
    catalog::load_catalog,
    collaborators::{CatalogProvider, DocumentGenerator, PricingEngine, QuoteStore},
    error::{
        CatalogLoadError, DocumentError, FetchError, FinalizeError, LoadQuoteError, SaveError,
        WizardError,
    },
    session::{CalculationOutcome, WizardSession},
    submission::build_save_payload,
};

/// The four collaborators a session needs, shared behind `Arc`s.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogProvider>,
    pub pricing: Arc<dyn PricingEngine>,
    pub quotes: Arc<dyn QuoteStore>,
    pub documents: Arc<dyn DocumentGenerator>,
}

/// A saved quote and its generated document.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedQuote {
    pub saved: SavedQuote,
    pub document: Vec<u8>,
    pub item_count: usize,
    pub total_price: f64,
}

/// Loads the catalog and starts a session. No session exists if any option
/// set fails to load.
pub async fn open_session(provider: &dyn CatalogProvider) -> Result<WizardSession, CatalogLoadError> {
    let catalog = load_catalog(provider).await?;
    Ok(WizardSession::new_session(Arc::new(catalog)))
}

/// "View summary": prices the current selection and moves to the summary.
pub async fn view_summary(
    session: &mut WizardSession,
    pricing: &dyn PricingEngine,
) -> Result<CalculationOutcome, WizardError> {
    let ticket = session.begin_calculation()?;
    let result = pricing.calculate(&ticket.selection).await;
    session.complete_calculation(ticket, result)
}

/// Saves the ledger, then requests the document. Nothing is requested when
/// the save fails.
pub async fn finalize(
    session: &WizardSession,
    quotes: &dyn QuoteStore,
    documents: &dyn DocumentGenerator,
) -> Result<FinalizedQuote, FinalizeError> {
    let payload = build_save_payload(session.ledger())?;
    let saved = quotes.save(&payload).await.map_err(SaveError)?;
    info!(
        session_id = %session.id(),
        quote_id = saved.quote_id,
        quote_number = %saved.quote_number,
        items = payload.item_count(),
        "quote saved"
    );

    let document = documents
        .generate(saved.quote_id)
        .await
        .map_err(|message| FinalizeError::Document {
            quote_id: saved.quote_id,
            quote_number: saved.quote_number.clone(),
            source: DocumentError(message),
        })?;

    Ok(FinalizedQuote {
        saved,
        document,
        item_count: payload.item_count(),
        total_price: payload.total_price(),
    })
}

/// Fetches a stored quote into the session. A fetch failure leaves the
/// session as it was; a parse failure leaves it fresh.
pub async fn open_quote_for_edit(
    session: &mut WizardSession,
    quotes: &dyn QuoteStore,
    quote_id: i64,
) -> Result<(), LoadQuoteError> {
    let record = quotes
        .fetch(quote_id)
        .await
        .map_err(|message| FetchError { quote_id, message })?;
    session.load_persisted(&record)?;
    Ok(())
}
