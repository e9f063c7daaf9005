//! Bazar Core - Shared types library.
//!
//! This crate provides the domain types used across all Bazar components:
//! - `storefront` - Checkout services (email gate, order composer, cart persistence)
//! - `cli` - Command-line front end for browsing, cart editing and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, categories, prices, emails and phone prefixes
//! - [`catalog`] - The embedded product catalog and its filter
//! - [`cart`] - Cart lines and the cart mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, filter_products};
pub use types::*;
