//! Builds the collaborator set a session runs against from [`Config`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tracing::info;

use alu_config::{BackendKind, Config};
use alu_core::{MoneyFormat, PricingEngine, Services};
use alu_storage_json::{JsonCatalog, JsonQuoteStore, StoragePaths, TextDocumentGenerator};

use crate::{
    errors::AppError,
    remote::{OfflinePricing, RemoteBackend},
};

/// Collaborators plus the local quote file when there is one, which backs
/// `quote list`.
#[derive(Clone)]
pub struct Backend {
    pub kind: BackendKind,
    pub services: Services,
    pub quote_book: Option<JsonQuoteStore>,
    pub data_dir: Option<PathBuf>,
}

pub fn money_format(config: &Config) -> MoneyFormat {
    MoneyFormat::for_locale(&config.locale, config.currency.clone(), config.precision())
}

pub fn build_backend(config: &Config, home: &Path) -> Result<Backend, AppError> {
    let settings = &config.backend;
    let remote = match settings.base_url.as_deref() {
        Some(url) => Some(Arc::new(RemoteBackend::new(
            url,
            settings.session_cookie.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )?)),
        None => None,
    };

    match settings.kind {
        BackendKind::Remote => {
            let remote = remote.ok_or_else(|| {
                AppError::Remote("`backend.base_url` is required for the remote backend".into())
            })?;
            info!(base_url = remote.base_url(), "using remote backend");
            Ok(Backend {
                kind: BackendKind::Remote,
                services: Services {
                    catalog: remote.clone(),
                    pricing: remote.clone(),
                    quotes: remote.clone(),
                    documents: remote,
                },
                quote_book: None,
                data_dir: None,
            })
        }
        BackendKind::Local => {
            let data_dir = settings.resolve_data_dir(home);
            let paths = StoragePaths::under(&data_dir);
            let quotes = JsonQuoteStore::new(paths.quotes_file.clone());
            let documents = TextDocumentGenerator::new(
                quotes.clone(),
                paths.documents_dir.clone(),
                money_format(config),
            );
            let pricing: Arc<dyn PricingEngine> = match remote {
                Some(remote) => remote,
                None => Arc::new(OfflinePricing),
            };
            info!(data_dir = %data_dir.display(), "using local backend");
            Ok(Backend {
                kind: BackendKind::Local,
                services: Services {
                    catalog: Arc::new(JsonCatalog::new(paths.catalog_file.clone())),
                    pricing,
                    quotes: Arc::new(quotes.clone()),
                    documents: Arc::new(documents),
                },
                quote_book: Some(quotes),
                data_dir: Some(data_dir),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alu_core::CurrencyFormatter;

    #[test]
    fn remote_backend_needs_a_base_url() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Remote;
        let err = build_backend(&config, Path::new("/tmp/alu")).err().expect("error");
        assert!(err.to_string().contains("backend.base_url"));
    }

    #[test]
    fn local_backend_keeps_data_under_home() {
        let backend = build_backend(&Config::default(), Path::new("/tmp/alu")).expect("backend");
        assert_eq!(backend.kind, BackendKind::Local);
        assert_eq!(backend.data_dir, Some(PathBuf::from("/tmp/alu/data")));
        assert!(backend.quote_book.is_some());
    }

    #[test]
    fn money_follows_configured_locale() {
        let mut config = Config::default();
        config.set_value("locale", "en-US").expect("locale");
        config.set_value("currency", "eur").expect("currency");
        assert_eq!(money_format(&config).format_amount(1234.5), "1,234.50 EUR");
    }
}
