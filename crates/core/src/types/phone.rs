//! Calling-code prefixes and phone normalization.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The calling code is not one the storefront ships to.
    #[error("unsupported calling code: {0}")]
    UnsupportedPrefix(String),
}

/// A selectable phone prefix: calling code, country name and flag marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode {
    /// Calling code including the leading `+`.
    pub code: &'static str,
    /// Country name shown next to the code.
    pub name: &'static str,
    /// Flag marker shown in selectors.
    pub flag: &'static str,
}

/// Calling codes offered in the checkout form, in display order.
pub const COUNTRY_CODES: &[CountryCode] = &[
    CountryCode { code: "+54", name: "Argentina", flag: "🇦🇷" },
    CountryCode { code: "+598", name: "Uruguay", flag: "🇺🇾" },
    CountryCode { code: "+56", name: "Chile", flag: "🇨🇱" },
    CountryCode { code: "+55", name: "Brasil", flag: "🇧🇷" },
    CountryCode { code: "+51", name: "Perú", flag: "🇵🇪" },
    CountryCode { code: "+57", name: "Colombia", flag: "🇨🇴" },
    CountryCode { code: "+52", name: "México", flag: "🇲🇽" },
    CountryCode { code: "+34", name: "España", flag: "es" },
    CountryCode { code: "+1", name: "EE.UU.", flag: "🇺🇸" },
];

impl CountryCode {
    /// Look up a calling code (e.g. `"+598"`).
    #[must_use]
    pub fn find(code: &str) -> Option<Self> {
        COUNTRY_CODES.iter().copied().find(|c| c.code == code)
    }
}

impl Default for CountryCode {
    /// Argentina, the storefront's home market.
    fn default() -> Self {
        Self {
            code: "+54",
            name: "Argentina",
            flag: "🇦🇷",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for CountryCode {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Accept "54" as well as "+54"
        let lookup = if trimmed.starts_with('+') {
            trimmed.to_string()
        } else {
            format!("+{trimmed}")
        };
        Self::find(&lookup).ok_or_else(|| PhoneError::UnsupportedPrefix(s.to_string()))
    }
}

impl Serialize for CountryCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Join a calling code and a local number, dropping every whitespace
/// character from the number. The prefix is used as-is.
///
/// ```
/// use bazar_core::{CountryCode, normalize_phone};
///
/// let prefix = CountryCode::find("+54").unwrap();
/// assert_eq!(normalize_phone(prefix, "11 1234\t5678"), "+541112345678");
/// ```
#[must_use]
pub fn normalize_phone(prefix: CountryCode, number: &str) -> String {
    let mut phone = String::with_capacity(prefix.code.len() + number.len());
    phone.push_str(prefix.code);
    phone.extend(number.chars().filter(|c| !c.is_whitespace()));
    phone
}
