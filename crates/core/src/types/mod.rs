//! Core types for Bazar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod customer;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod product;

pub use category::{Category, CategoryFilter, CategoryError};
pub use customer::CustomerInfo;
pub use email::{Email, EmailError};
pub use id::ProductId;
pub use phone::{COUNTRY_CODES, CountryCode, PhoneError, normalize_phone};
pub use price::{Price, PriceFormat, PriceFormatError};
pub use product::Product;
