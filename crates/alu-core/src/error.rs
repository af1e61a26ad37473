use std::fmt;

use thiserror::Error;

use crate::wizard::WizardStep;

/// Input field a validation message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ChassisType,
    Width,
    Height,
    ProfileSeries,
    GlazingType,
    Finish,
    ClientName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::ChassisType => "chassis type",
            Field::Width => "width",
            Field::Height => "height",
            Field::ProfileSeries => "profile series",
            Field::GlazingType => "glazing type",
            Field::Finish => "finish",
            Field::ClientName => "client name",
        };
        f.write_str(label)
    }
}

/// Step gate not met. Carries one message per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field,
                message: message.into(),
            }],
        }
    }

    pub fn from_issues(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }
}

fn summary(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Which of the five catalog sets a load failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSet {
    ChassisTypes,
    ProfileSeries,
    GlazingTypes,
    Finishes,
    Accessories,
}

impl fmt::Display for CatalogSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogSet::ChassisTypes => "chassis types",
            CatalogSet::ProfileSeries => "profile series",
            CatalogSet::GlazingTypes => "glazing types",
            CatalogSet::Finishes => "finishes",
            CatalogSet::Accessories => "accessories",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load catalog {set}: {message}")]
pub struct CatalogLoadError {
    pub set: CatalogSet,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Price calculation failed: {0}")]
pub struct PricingError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteParseError {
    #[error("Quote details are not valid JSON: {0}")]
    MalformedDetails(String),
    #[error("Quote accessories are not valid JSON: {0}")]
    MalformedAccessories(String),
    #[error("Quote item {index} is malformed: {message}")]
    MalformedItem { index: usize, message: String },
    #[error("Quote breakdown is malformed: {0}")]
    MalformedBreakdown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to save quote: {0}")]
pub struct SaveError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to generate quote document: {0}")]
pub struct DocumentError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch quote {quote_id}: {message}")]
pub struct FetchError {
    pub quote_id: i64,
    pub message: String,
}

/// Catalog kinds a selection command can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    ChassisType,
    ProfileSeries,
    GlazingType,
    Finish,
    Accessory,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OptionKind::ChassisType => "chassis type",
            OptionKind::ProfileSeries => "profile series",
            OptionKind::GlazingType => "glazing type",
            OptionKind::Finish => "finish",
            OptionKind::Accessory => "accessory",
        };
        f.write_str(label)
    }
}

/// Failures of session commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown {kind}: `{name}`")]
    UnknownOption { kind: OptionKind, name: String },
    #[error("Already at the first step")]
    AtFirstStep,
    #[error("Use the summary action to price this configuration")]
    SummaryRequired,
    #[error("No further step after the summary")]
    AtFinalStep,
    #[error("Action requires step {expected}, session is on step {actual}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("Configuration has not been priced yet")]
    NotPriced,
    #[error("This item is already in the quote")]
    AlreadyCommitted,
    #[error("A price calculation is already in progress")]
    CalculationInFlight,
    #[error("No quote item at position {0}")]
    ItemNotFound(usize),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Failures of the save-then-document sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error("Add at least one item to the quote before saving")]
    EmptyQuote,
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("Quote {quote_number} was saved, but its document failed: {source}")]
    Document {
        quote_id: i64,
        quote_number: String,
        #[source]
        source: DocumentError,
    },
}

/// Failures while opening a saved quote for editing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadQuoteError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] QuoteParseError),
}
