//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything a storefront operation
//! can fail with. Infrastructure failures are captured to Sentry; mistakes the
//! customer can fix are only logged.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::checkout::CheckoutError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart snapshot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout attempt stopped.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Requested product does not exist.
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the customer caused this and can fix it.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Checkout(e) => e.is_user_error(),
            Self::ProductNotFound(_) => true,
            Self::Config(_) | Self::Storage(_) | Self::Io(_) => false,
        }
    }

    /// Log the error, capturing infrastructure failures to Sentry.
    pub fn report(&self) {
        if self.is_user_error() {
            tracing::info!(error = %self, "Request rejected");
        } else {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        }
    }

    /// Message safe to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "Error de configuración de la tienda.".to_string(),
            Self::Storage(_) => "No se pudo guardar el carrito.".to_string(),
            Self::Io(_) => "Error de entrada/salida.".to_string(),
            Self::Checkout(e) => e.to_string(),
            Self::ProductNotFound(_) => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
