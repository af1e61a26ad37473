use std::{fmt::Write as _, path::PathBuf};

use async_trait::async_trait;
use tracing::info;

use alu_core::{reconstruct_record, CurrencyFormatter, DocumentGenerator, MoneyFormat};
use alu_domain::{ConfiguredItem, QuoteRecord};

use crate::{quotes::JsonQuoteStore, write_atomic, StorageError};

/// Renders stored quotes as plain text and keeps a copy at
/// `documents/devis_<id>.txt`.
#[derive(Debug, Clone)]
pub struct TextDocumentGenerator {
    quotes: JsonQuoteStore,
    documents_dir: PathBuf,
    money: MoneyFormat,
}

impl TextDocumentGenerator {
    pub fn new(quotes: JsonQuoteStore, documents_dir: PathBuf, money: MoneyFormat) -> Self {
        Self {
            quotes,
            documents_dir,
            money,
        }
    }

    pub fn document_path(&self, quote_id: i64) -> PathBuf {
        self.documents_dir.join(format!("devis_{quote_id}.txt"))
    }

    pub fn write_document(&self, quote_id: i64) -> Result<Vec<u8>, StorageError> {
        let record = self.quotes.record(quote_id)?;
        let text = self.render(&record)?;
        let path = self.document_path(quote_id);
        write_atomic(&path, text.as_bytes())?;
        info!(quote_id, path = %path.display(), "quote document written");
        Ok(text.into_bytes())
    }

    pub fn render(&self, record: &QuoteRecord) -> Result<String, StorageError> {
        let rebuilt =
            reconstruct_record(record).map_err(|err| StorageError::Other(err.to_string()))?;
        let client = rebuilt.selection.client();
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "DEVIS {}",
            record.quote_number.as_deref().unwrap_or("-")
        );
        let _ = writeln!(out, "Date: {}", record.quote_date.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Client: {}", client.name);
        for (label, value) in [
            ("Email", &client.email),
            ("Phone", &client.phone),
            ("Notes", &client.notes),
        ] {
            if !value.trim().is_empty() {
                let _ = writeln!(out, "{label}: {value}");
            }
        }

        for (index, item) in rebuilt.ledger.items().iter().enumerate() {
            let _ = writeln!(out);
            self.render_item(&mut out, index, item);
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total: {}",
            self.money.format_amount(rebuilt.ledger.aggregate_total())
        );
        Ok(out)
    }

    fn render_item(&self, out: &mut String, index: usize, item: &ConfiguredItem) {
        let selection = &item.selection;
        let accessories = if selection.accessories.is_empty() {
            "None".to_string()
        } else {
            selection
                .accessories
                .iter()
                .map(|(name, quantity)| format!("{name} x{quantity}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(out, "Item {}: {}", index + 1, item.label());
        if let Some(surface) = selection.surface_m2() {
            let _ = writeln!(out, "  Surface: {surface:.2} m²");
        }
        for (label, value) in [
            ("Profile series", &selection.profile_series),
            ("Glazing", &selection.glazing_type),
            ("Finish", &selection.finish),
        ] {
            let _ = writeln!(out, "  {label}: {}", value.as_deref().unwrap_or("-"));
        }
        let _ = writeln!(out, "  Accessories: {accessories}");
        let _ = writeln!(
            out,
            "  {} x {} = {}",
            self.money.format_amount(item.breakdown.total_price),
            item.quantity,
            self.money.format_amount(item.line_total())
        );
    }
}

#[async_trait]
impl DocumentGenerator for TextDocumentGenerator {
    async fn generate(&self, quote_id: i64) -> Result<Vec<u8>, String> {
        self.write_document(quote_id).map_err(|err| err.to_string())
    }
}
