//! Email validation and checkout commands.

use std::io::Write;

use bazar_core::{Cart, CustomerInfo};
use bazar_storefront::error::Result;
use bazar_storefront::services::{CheckoutForm, Platform};
use bazar_storefront::services::email_gate::ValidationSource;
use bazar_storefront::state::AppState;

/// Input for [`checkout`].
#[derive(Debug)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
    /// Used to choose between the mobile and the desktop link.
    pub user_agent: String,
    /// Open the link in a browser; otherwise only print it.
    pub open: bool,
}

/// Run the email gate on `email` and print the verdict.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub async fn validate_email(out: &mut impl Write, state: &AppState, email: &str) -> Result<()> {
    let result = state.checkout().gate().validate(email.trim()).await;
    let mark = if result.is_valid { "✔" } else { "✘" };
    let source = match result.source {
        ValidationSource::Classifier => "clasificador",
        ValidationSource::Fallback => "validación básica",
    };

    match result.score {
        Some(score) => writeln!(out, "{mark} {} ({source}, reputación {score:.0})", result.message)?,
        None => writeln!(out, "{mark} {} ({source})", result.message)?,
    }
    Ok(())
}

/// Validate the customer, compose the order and hand it off.
///
/// The cart is left as it is.
///
/// # Errors
///
/// Returns the checkout error shown to the customer, or an I/O error.
pub async fn checkout(
    out: &mut impl Write,
    state: &AppState,
    cart: &Cart,
    request: CheckoutRequest,
) -> Result<()> {
    let platform = Platform::from_user_agent(&request.user_agent);

    let order = if request.open {
        let mut form = CheckoutForm::with_customer(request.customer);
        form.submit(state.checkout(), cart, platform).await?
    } else {
        state
            .checkout()
            .prepare(cart, &request.customer, platform)
            .await?
    };

    writeln!(out, "{}", order.draft.message)?;
    writeln!(out)?;
    if request.open {
        writeln!(out, "Abriendo WhatsApp: {}", order.link)?;
    } else {
        writeln!(out, "{}", order.link)?;
    }
    Ok(())
}
