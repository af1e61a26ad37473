use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use alu_core::QuoteStore;
use alu_domain::{QuoteRecord, QuoteSummary, SavePayload, SavedQuote};

use crate::{write_json, StorageError};

const QUOTE_PREFIX: &str = "DEV";

/// Contents of `quotes.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuoteBook {
    #[serde(default)]
    pub last_id: i64,
    #[serde(default)]
    pub quotes: Vec<QuoteRecord>,
}

/// Quote store keeping every record in one JSON file, in the same record
/// shape the quoting service returns.
#[derive(Debug, Clone)]
pub struct JsonQuoteStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonQuoteStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load_book(&self) -> Result<QuoteBook, StorageError> {
        if !self.path.exists() {
            return Ok(QuoteBook::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_payload(&self, payload: &SavePayload) -> Result<SavedQuote, StorageError> {
        self.save_payload_at(payload, Local::now())
    }

    /// Appends a record for `payload`, numbered `DEV-YYYYMMDD-NNNN` with a
    /// per-day sequence.
    pub fn save_payload_at(
        &self,
        payload: &SavePayload,
        now: DateTime<Local>,
    ) -> Result<SavedQuote, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Other("quote store lock poisoned".into()))?;
        let mut book = self.load_book()?;

        let quote_id = book
            .quotes
            .iter()
            .filter_map(|record| record.id)
            .fold(book.last_id, i64::max)
            + 1;
        let quote_number = next_quote_number(&book, now);
        let record = build_record(payload, quote_id, &quote_number, now)?;

        book.last_id = quote_id;
        book.quotes.push(record);
        write_json(&self.path, &book)?;
        info!(quote_id, %quote_number, "quote stored");
        Ok(SavedQuote {
            quote_id,
            quote_number,
        })
    }

    pub fn record(&self, quote_id: i64) -> Result<QuoteRecord, StorageError> {
        debug!(quote_id, "reading quote");
        self.load_book()?
            .quotes
            .into_iter()
            .find(|record| record.id == Some(quote_id))
            .ok_or_else(|| StorageError::NotFound(format!("Quote {quote_id}")))
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<QuoteSummary>, StorageError> {
        let mut rows: Vec<QuoteSummary> = self
            .load_book()?
            .quotes
            .iter()
            .filter_map(summarize)
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }
}

fn next_quote_number(book: &QuoteBook, now: DateTime<Local>) -> String {
    let prefix = format!("{QUOTE_PREFIX}-{}-", now.format("%Y%m%d"));
    let last = book
        .quotes
        .iter()
        .filter_map(|record| record.quote_number.as_deref())
        .filter_map(|number| number.strip_prefix(&prefix))
        .filter_map(|sequence| sequence.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:04}", last + 1)
}

fn build_record(
    payload: &SavePayload,
    quote_id: i64,
    quote_number: &str,
    now: DateTime<Local>,
) -> Result<QuoteRecord, StorageError> {
    let mut details = match serde_json::to_value(&payload.breakdown)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in [
        ("client_name", &payload.client_name),
        ("client_email", &payload.client_email),
        ("client_phone", &payload.client_phone),
        ("client_notes", &payload.client_notes),
    ] {
        details.insert(key.to_string(), Value::String(value.clone()));
    }
    let price_ht = details
        .get("total_ht")
        .and_then(Value::as_f64)
        .unwrap_or_default();

    Ok(QuoteRecord {
        id: Some(quote_id),
        quote_number: Some(quote_number.to_string()),
        quote_date: Some(now.format("%Y-%m-%d").to_string()),
        chassis_type: Some(payload.chassis_type.clone()),
        width: Some(payload.width),
        height: Some(payload.height),
        profile_series: Some(payload.profile_series.clone()),
        glazing_type: Some(payload.glazing_type.clone()),
        finish: Some(payload.finish.clone()),
        accessories: serde_json::to_value(&payload.accessories)?,
        discount_percent: Some(0.0),
        price_ht: Some(price_ht),
        price_ttc: Some(payload.total_price()),
        details: Value::Object(details),
        created_at: Some(now.to_rfc3339()),
    })
}

fn summarize(record: &QuoteRecord) -> Option<QuoteSummary> {
    let details = record.details.as_object();
    let client_name = details
        .and_then(|map| map.get("client_name"))
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string();
    let item_count = details
        .and_then(|map| map.get("items"))
        .and_then(Value::as_array)
        .map(Vec::len)
        .filter(|count| *count > 0)
        .unwrap_or(1);
    Some(QuoteSummary {
        id: record.id?,
        quote_number: record.quote_number.clone().unwrap_or_default(),
        quote_date: record.quote_date.clone().unwrap_or_default(),
        client_name,
        item_count,
        total_price: record.price_ttc.unwrap_or_default(),
    })
}

#[async_trait]
impl QuoteStore for JsonQuoteStore {
    async fn save(&self, payload: &SavePayload) -> Result<SavedQuote, String> {
        self.save_payload(payload).map_err(|err| err.to_string())
    }

    async fn fetch(&self, quote_id: i64) -> Result<QuoteRecord, String> {
        self.record(quote_id).map_err(|err| err.to_string())
    }
}
