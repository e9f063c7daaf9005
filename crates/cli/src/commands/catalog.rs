//! Catalog browsing commands.

use std::io::Write;

use bazar_core::{COUNTRY_CODES, Catalog, CategoryFilter};
use bazar_storefront::state::AppState;

/// List products matching `category` and `query`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn products(
    out: &mut impl Write,
    state: &AppState,
    category: CategoryFilter,
    query: &str,
) -> std::io::Result<()> {
    let format = &state.config().price_format;
    let matches = Catalog::embedded().filter(category, query);

    if matches.is_empty() {
        writeln!(out, "No se encontraron productos.")?;
        return Ok(());
    }

    for product in matches {
        writeln!(
            out,
            "{:>3}  {:<30} {:<22} {:>10}",
            product.id,
            product.name,
            product.category,
            product.price.display(format)
        )?;
    }
    Ok(())
}

/// List supported calling codes.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn countries(out: &mut impl Write) -> std::io::Result<()> {
    for country in COUNTRY_CODES {
        writeln!(out, "{} {:<5} {}", country.flag, country.code, country.name)?;
    }
    Ok(())
}
