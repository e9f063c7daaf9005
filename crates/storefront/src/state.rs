//! Application state shared across commands.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::BazarConfig;
use crate::gemini::GeminiClassifier;
use crate::services::cart::CartSession;
use crate::services::checkout::CheckoutService;
use crate::services::email_gate::EmailGate;
use crate::services::handoff::{BrowserOpener, LinkOpener};
use crate::services::order::OrderComposer;
use crate::storage::JsonFileStore;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and owns the configuration and
/// the checkout service (with its email gate).
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: BazarConfig,
    checkout: CheckoutService,
}

impl AppState {
    /// Create the state, opening order links in the system browser.
    ///
    /// Uses the Gemini classifier when an API key is configured. If the
    /// client cannot be built the gate runs offline instead.
    #[must_use]
    pub fn new(config: BazarConfig) -> Self {
        Self::with_opener(config, Arc::new(BrowserOpener))
    }

    /// Create the state with a custom link opener.
    #[must_use]
    pub fn with_opener(config: BazarConfig, opener: Arc<dyn LinkOpener>) -> Self {
        let gate = build_gate(&config);
        Self::with_services(config, gate, opener)
    }

    /// Create the state from explicit parts.
    #[must_use]
    pub fn with_services(config: BazarConfig, gate: EmailGate, opener: Arc<dyn LinkOpener>) -> Self {
        let composer = OrderComposer::from_config(&config);
        let checkout = CheckoutService::new(gate, composer, opener);

        Self {
            inner: Arc::new(AppStateInner { config, checkout }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BazarConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Open the cart persisted under the configured cart directory.
    #[must_use]
    pub fn cart_session(&self) -> CartSession<JsonFileStore> {
        CartSession::open(JsonFileStore::new(&self.inner.config.cart_dir))
    }
}

/// Build the email gate for `config`.
fn build_gate(config: &BazarConfig) -> EmailGate {
    let Some(gemini) = &config.gemini else {
        info!("GEMINI_API_KEY not set, emails are checked locally only");
        return EmailGate::offline();
    };

    match GeminiClassifier::new(gemini) {
        Ok(classifier) => {
            info!(model = %gemini.model, "Email classifier enabled");
            EmailGate::new(Arc::new(classifier))
        }
        Err(e) => {
            warn!(error = %e, "Could not build email classifier, checking emails locally");
            EmailGate::offline()
        }
    }
}
