//! Checkout: validate the customer, compose the order and hand it off.
//!
//! ```text
//! empty cart? -> required fields? -> email gate -> compose -> link -> open
//! ```
//!
//! Each step short-circuits with a [`CheckoutError`] whose `Display` is the
//! message shown to the customer. The email gate is only consulted once the
//! cheaper checks have passed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bazar_core::{Cart, CustomerInfo};
use thiserror::Error;
use tracing::{info, instrument};

use super::deep_link::Platform;
use super::email_gate::{EmailGate, EmailValidation};
use super::handoff::{HandoffError, LinkOpener};
use super::order::{OrderComposer, OrderDraft};
use crate::error::add_breadcrumb;

pub const MSG_EMPTY_CART: &str = "Tu carrito está vacío.";
pub const MSG_MISSING_FIELDS: &str = "Por favor completa todos los campos obligatorios.";
pub const MSG_IN_PROGRESS: &str = "Ya estamos procesando tu pedido.";

/// Reasons a checkout attempt stops.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{}", MSG_EMPTY_CART)]
    EmptyCart,

    #[error("{}", MSG_MISSING_FIELDS)]
    MissingFields,

    /// The email gate rejected the address; carries the gate's message.
    #[error("{0}")]
    EmailRejected(String),

    /// Another submission on the same service has not finished.
    #[error("{}", MSG_IN_PROGRESS)]
    SubmissionInProgress,

    #[error("No se pudo abrir WhatsApp: {0}")]
    Handoff(#[from] HandoffError),
}

impl CheckoutError {
    /// Whether the customer can fix this by editing the form.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyCart | Self::MissingFields | Self::EmailRejected(_)
        )
    }
}

/// An order that passed validation.
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub draft: OrderDraft,
    /// WhatsApp deep link carrying the message.
    pub link: String,
    /// What the email gate said about the customer's address.
    pub validation: EmailValidation,
}

/// Runs checkout attempts, one at a time.
pub struct CheckoutService {
    gate: EmailGate,
    composer: OrderComposer,
    opener: Arc<dyn LinkOpener>,
    in_flight: AtomicBool,
}

impl CheckoutService {
    #[must_use]
    pub fn new(gate: EmailGate, composer: OrderComposer, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            gate,
            composer,
            opener,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn gate(&self) -> &EmailGate {
        &self.gate
    }

    #[must_use]
    pub const fn composer(&self) -> &OrderComposer {
        &self.composer
    }

    /// Validate and compose the order without opening the link.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, or `SubmissionInProgress` when another
    /// attempt is running.
    pub async fn prepare(
        &self,
        cart: &Cart,
        customer: &CustomerInfo,
        platform: Platform,
    ) -> Result<PreparedOrder, CheckoutError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        self.prepare_unguarded(cart, customer, platform).await
    }

    /// Validate, compose and open the order link.
    ///
    /// The link is opened exactly once per successful call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::prepare`], plus `Handoff` when the link cannot be
    /// opened.
    pub async fn submit(
        &self,
        cart: &Cart,
        customer: &CustomerInfo,
        platform: Platform,
    ) -> Result<PreparedOrder, CheckoutError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let order = self.prepare_unguarded(cart, customer, platform).await?;
        self.opener.open(&order.link)?;

        info!(
            items = order.draft.item_count,
            total = order.draft.total.units(),
            ?platform,
            "Order handed off to WhatsApp"
        );
        add_breadcrumb("checkout", "Order handed off", None);
        Ok(order)
    }

    #[instrument(skip_all, fields(lines = cart.lines().len()))]
    async fn prepare_unguarded(
        &self,
        cart: &Cart,
        customer: &CustomerInfo,
        platform: Platform,
    ) -> Result<PreparedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !customer.has_required_fields() {
            return Err(CheckoutError::MissingFields);
        }

        add_breadcrumb("checkout", "Validating email", None);
        let validation = self.gate.validate(customer.email.trim()).await;
        if !validation.is_valid {
            return Err(CheckoutError::EmailRejected(validation.message));
        }

        let draft = self.composer.compose(cart.lines(), customer);
        let link = self.composer.link(&draft, platform);
        Ok(PreparedOrder {
            draft,
            link,
            validation,
        })
    }
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("composer", &self.composer)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// Holds the in-flight flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CheckoutError::SubmissionInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Where the checkout form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Editing,
    /// The order was handed off and the form's data discarded.
    Sent,
}

/// The checkout form: customer details plus the last error shown.
///
/// A failed submission keeps every field as typed so the customer can fix
/// and retry. A successful one discards them.
#[derive(Debug, Default)]
pub struct CheckoutForm {
    customer: CustomerInfo,
    error: Option<String>,
    status: FormStatus,
}

impl CheckoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_customer(customer: CustomerInfo) -> Self {
        Self {
            customer,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Edit the details. Clears the last error.
    pub fn customer_mut(&mut self) -> &mut CustomerInfo {
        self.error = None;
        &mut self.customer
    }

    /// Message from the last failed submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> FormStatus {
        self.status
    }

    /// Submit through `service`.
    ///
    /// # Errors
    ///
    /// Returns the failing `CheckoutError`; its message is also kept in
    /// [`Self::error`].
    pub async fn submit(
        &mut self,
        service: &CheckoutService,
        cart: &Cart,
        platform: Platform,
    ) -> Result<PreparedOrder, CheckoutError> {
        self.error = None;
        match service.submit(cart, &self.customer, platform).await {
            Ok(order) => {
                self.customer = CustomerInfo::default();
                self.status = FormStatus::Sent;
                Ok(order)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.status = FormStatus::Editing;
                Err(e)
            }
        }
    }
}
