//! Whole-unit prices and their display format.
//!
//! Catalog prices carry no minor units: `45000` is forty-five thousand pesos.
//! Display grouping is configurable so the same amounts can be rendered as
//! `$45,000` or `$45.000`.

use core::fmt;
use core::iter::Sum;

use num_format::{CustomFormat, Grouping, Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PriceFormat`].
#[derive(thiserror::Error, Debug)]
#[error("invalid thousands separator {separator:?}: {source}")]
pub struct PriceFormatError {
    separator: String,
    #[source]
    source: num_format::Error,
}

/// A non-negative amount in whole currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create a price from whole units.
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// The amount in whole units.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Price of `quantity` items, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Render with a currency sign and thousands grouping.
    ///
    /// ```
    /// use bazar_core::{Price, PriceFormat};
    ///
    /// let format = PriceFormat::default();
    /// assert_eq!(Price::new(2000).display(&format), "$2,000");
    /// ```
    #[must_use]
    pub fn display(self, format: &PriceFormat) -> String {
        let grouped = match &format.inner {
            FormatKind::Locale(locale) => self.0.to_formatted_string(locale),
            FormatKind::Custom(custom) => self.0.to_formatted_string(custom),
        };
        format!("${grouped}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(&PriceFormat::default()))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| Self(acc.0.saturating_add(p.0)))
    }
}

impl From<u64> for Price {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

/// Thousands-grouping rules for displaying prices.
///
/// The default groups with commas (`2,000`).
#[derive(Debug, Clone)]
pub struct PriceFormat {
    inner: FormatKind,
}

#[derive(Debug, Clone)]
enum FormatKind {
    Locale(Locale),
    Custom(CustomFormat),
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            inner: FormatKind::Locale(Locale::en),
        }
    }
}

impl PriceFormat {
    /// Standard three-digit grouping with the given separator.
    ///
    /// # Errors
    ///
    /// Returns an error if the separator is longer than `num-format` allows.
    pub fn with_separator(separator: &str) -> Result<Self, PriceFormatError> {
        let inner = CustomFormat::builder()
            .grouping(Grouping::Standard)
            .separator(separator)
            .build()
            .map_err(|source| PriceFormatError {
                separator: separator.to_string(),
                source,
            })?;
        Ok(Self {
            inner: FormatKind::Custom(inner),
        })
    }
}
