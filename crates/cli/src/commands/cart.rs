//! Cart commands.

use std::io::Write;

use bazar_core::{Catalog, ProductId};
use bazar_storefront::error::{AppError, Result};
use bazar_storefront::services::CartSession;
use bazar_storefront::state::AppState;
use bazar_storefront::storage::CartStore;

/// Print each line with its subtotal, then the total.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show<S: CartStore>(
    out: &mut impl Write,
    state: &AppState,
    session: &CartSession<S>,
) -> Result<()> {
    if session.is_empty() {
        writeln!(out, "Tu carrito está vacío.")?;
        return Ok(());
    }

    let format = &state.config().price_format;
    for line in session.lines() {
        writeln!(
            out,
            "{:>3}  {:<30} x{:<3} {:>10}",
            line.id(),
            line.product.name,
            line.quantity,
            line.subtotal().display(format)
        )?;
    }
    writeln!(
        out,
        "Total ({} productos): {}",
        session.item_count(),
        session.total().display(format)
    )?;
    Ok(())
}

/// Add one unit of catalog product `id`.
///
/// # Errors
///
/// Returns `ProductNotFound` for unknown ids, or a storage error if the cart
/// could not be saved.
pub fn add<S: CartStore>(
    out: &mut impl Write,
    state: &AppState,
    session: &mut CartSession<S>,
    id: &str,
) -> Result<()> {
    let product = Catalog::embedded()
        .find(&ProductId::new(id))
        .ok_or_else(|| AppError::ProductNotFound(id.to_string()))?;
    session.add(product)?;
    writeln!(out, "Agregado: {}", product.name)?;
    show(out, state, session)
}

/// Shift the quantity of `id` by `delta`.
///
/// # Errors
///
/// Returns `ProductNotFound` if `id` is not in the cart, or a storage error.
pub fn shift<S: CartStore>(
    out: &mut impl Write,
    state: &AppState,
    session: &mut CartSession<S>,
    id: &str,
    delta: i64,
) -> Result<()> {
    if !session.set_quantity(&ProductId::new(id), delta)? {
        return Err(AppError::ProductNotFound(id.to_string()));
    }
    show(out, state, session)
}

/// Remove `id` from the cart.
///
/// # Errors
///
/// Returns `ProductNotFound` if `id` is not in the cart, or a storage error.
pub fn remove<S: CartStore>(
    out: &mut impl Write,
    state: &AppState,
    session: &mut CartSession<S>,
    id: &str,
) -> Result<()> {
    if !session.remove(&ProductId::new(id))? {
        return Err(AppError::ProductNotFound(id.to_string()));
    }
    show(out, state, session)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a storage error if the cart could not be saved.
pub fn clear<S: CartStore>(out: &mut impl Write, session: &mut CartSession<S>) -> Result<()> {
    session.clear()?;
    writeln!(out, "Carrito vaciado.")?;
    Ok(())
}
