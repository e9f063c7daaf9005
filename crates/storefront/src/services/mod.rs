//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Cart session with persisted snapshot
//! - `email_gate` - Email acceptance policy and local fallback
//! - `order` - WhatsApp order message composition
//! - `deep_link` - Platform detection and WhatsApp links
//! - `handoff` - Opening the order link in a browser
//! - `checkout` - The checkout flow tying the above together

pub mod cart;
pub mod checkout;
pub mod deep_link;
pub mod email_gate;
pub mod handoff;
pub mod order;

pub use cart::CartSession;
pub use checkout::{CheckoutError, CheckoutForm, CheckoutService, FormStatus, PreparedOrder};
pub use deep_link::Platform;
pub use email_gate::{EmailClassifier, EmailGate, EmailValidation, EmailVerdict};
pub use handoff::{BrowserOpener, HandoffError, LinkOpener};
pub use order::{OrderComposer, OrderDraft};
