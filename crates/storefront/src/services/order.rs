//! Order message composition.
//!
//! Turns a cart snapshot and the customer's details into the plain-text
//! WhatsApp message and the deep link that carries it.

use bazar_core::{CartLine, CustomerInfo, Price, PriceFormat, normalize_phone};

use super::deep_link::{Platform, whatsapp_link};
use crate::config::BazarConfig;

/// Text used when the customer left no comments.
pub const NO_COMMENTS: &str = "Sin comentarios.";

/// A composed order, ready to hand off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// The full message text, before URL encoding.
    pub message: String,
    /// Sum of line subtotals at the moment of composition.
    pub total: Price,
    /// Units across all lines.
    pub item_count: u64,
    /// Customer phone with the prefix applied and whitespace removed.
    pub phone: String,
}

/// Builds order messages in the store's format.
#[derive(Debug, Clone)]
pub struct OrderComposer {
    store_name: String,
    whatsapp_number: String,
    price_format: PriceFormat,
}

impl OrderComposer {
    #[must_use]
    pub fn new(
        store_name: impl Into<String>,
        whatsapp_number: impl Into<String>,
        price_format: PriceFormat,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            whatsapp_number: whatsapp_number.into(),
            price_format,
        }
    }

    #[must_use]
    pub fn from_config(config: &BazarConfig) -> Self {
        Self::new(
            config.store_name.clone(),
            config.whatsapp_number.clone(),
            config.price_format.clone(),
        )
    }

    /// The store's WhatsApp number (digits only).
    #[must_use]
    pub fn whatsapp_number(&self) -> &str {
        &self.whatsapp_number
    }

    /// One `- {name} ({category}) x{qty} – ${subtotal}` row per line, in
    /// cart order.
    #[must_use]
    pub fn product_lines(&self, lines: &[CartLine]) -> String {
        lines
            .iter()
            .map(|line| {
                format!(
                    "- {} ({}) x{} – {}",
                    line.product.name,
                    line.product.category,
                    line.quantity,
                    line.subtotal().display(&self.price_format)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Compose the order message for `lines` and `customer`.
    ///
    /// The caller is responsible for validating `customer` first.
    #[must_use]
    pub fn compose(&self, lines: &[CartLine], customer: &CustomerInfo) -> OrderDraft {
        let total: Price = lines.iter().map(CartLine::subtotal).sum();
        let item_count = lines.iter().map(|line| u64::from(line.quantity)).sum();
        let phone = normalize_phone(customer.phone_prefix, &customer.phone);

        let message = format!(
            "🛒 *Pedido desde la web – {store}*\n\n\
             👤 *Cliente:*\n\
             Nombre: {name}\n\
             Email: {email}\n\
             Teléfono: {phone}\n\n\
             📦 *Productos:*\n\
             {products}\n\n\
             💰 *Total: {total}*\n\n\
             📝 *Comentarios:*\n\
             {comments}",
            store = self.store_name,
            name = customer.full_name(),
            email = customer.email.trim(),
            products = self.product_lines(lines),
            total = total.display(&self.price_format),
            comments = customer.comments().unwrap_or(NO_COMMENTS),
        );

        OrderDraft {
            message,
            total,
            item_count,
            phone,
        }
    }

    /// Deep link that opens a chat with the store, pre-filled with `draft`.
    #[must_use]
    pub fn link(&self, draft: &OrderDraft, platform: Platform) -> String {
        whatsapp_link(&self.whatsapp_number, &draft.message, platform)
    }
}
