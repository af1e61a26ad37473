//! HTTP collaborators for the existing quoting service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::COOKIE, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use alu_core::{CatalogProvider, DocumentGenerator, PricingEngine, QuoteStore};
use alu_domain::{
    Accessory, ChassisType, Finish, GlazingType, PricedBreakdown, ProfileSeries, QuoteRecord,
    SavePayload, SavedQuote, SelectionState,
};

use crate::errors::AppError;

const CATALOG_PREFIX: &str = "/api/catalog";
const QUOTES_PATH: &str = "/api/quotes";

/// Error body the service sends alongside a failing status.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Talks to `/api/...` on `base_url`. Implements all four collaborator
/// traits; the local backend borrows only its pricing.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl RemoteBackend {
    pub fn new(
        base_url: &str,
        session_cookie: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Remote(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, String> {
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(|err| format!("{what}: {err}"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(body
            .error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("{what} (HTTP {})", status.as_u16())))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, String> {
        debug!(path, "GET");
        let response = self.send(self.client.get(self.url(path)), what).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| format!("{what}: unexpected response: {err}"))
    }

    async fn catalog_set<T: DeserializeOwned>(&self, set: &str) -> Result<Vec<T>, String> {
        self.get_json(&format!("{CATALOG_PREFIX}/{set}"), "Catalog request failed")
            .await
    }
}

#[async_trait]
impl CatalogProvider for RemoteBackend {
    async fn chassis_types(&self) -> Result<Vec<ChassisType>, String> {
        self.catalog_set("chassis-types").await
    }

    async fn profile_series(&self) -> Result<Vec<ProfileSeries>, String> {
        self.catalog_set("profile-series").await
    }

    async fn glazing_types(&self) -> Result<Vec<GlazingType>, String> {
        self.catalog_set("glazing-types").await
    }

    async fn finishes(&self) -> Result<Vec<Finish>, String> {
        self.catalog_set("finishes").await
    }

    async fn accessories(&self) -> Result<Vec<Accessory>, String> {
        self.catalog_set("accessories").await
    }
}

#[async_trait]
impl PricingEngine for RemoteBackend {
    async fn calculate(&self, selection: &SelectionState) -> Result<PricedBreakdown, String> {
        let request = self
            .client
            .post(self.url(&format!("{QUOTES_PATH}/calculate")))
            .json(selection);
        let response = self.send(request, "Price calculation failed").await?;
        response
            .json::<PricedBreakdown>()
            .await
            .map_err(|err| format!("Unexpected price breakdown: {err}"))
    }
}

#[async_trait]
impl QuoteStore for RemoteBackend {
    async fn save(&self, payload: &SavePayload) -> Result<SavedQuote, String> {
        let request = self.client.post(self.url(QUOTES_PATH)).json(payload);
        let response = self.send(request, "Save failed").await?;
        response
            .json::<SavedQuote>()
            .await
            .map_err(|err| format!("Unexpected save response: {err}"))
    }

    async fn fetch(&self, quote_id: i64) -> Result<QuoteRecord, String> {
        self.get_json(&format!("{QUOTES_PATH}/{quote_id}"), "Failed to load quote")
            .await
    }
}

#[async_trait]
impl DocumentGenerator for RemoteBackend {
    async fn generate(&self, quote_id: i64) -> Result<Vec<u8>, String> {
        let request = self
            .client
            .get(self.url(&format!("{QUOTES_PATH}/{quote_id}/pdf")));
        let response = self.send(request, "PDF generation failed").await?;
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| format!("PDF generation failed: {err}"))
    }
}

/// Pricing stand-in for a local backend with no service configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePricing;

pub const OFFLINE_PRICING_MESSAGE: &str =
    "No pricing service configured. Set `backend.base_url` to price configurations.";

#[async_trait]
impl PricingEngine for OfflinePricing {
    async fn calculate(&self, _selection: &SelectionState) -> Result<PricedBreakdown, String> {
        Err(OFFLINE_PRICING_MESSAGE.to_string())
    }
}
