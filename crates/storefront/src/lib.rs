//! Bazar storefront library.
//!
//! Cart persistence, the email gate and the WhatsApp checkout flow, on top of
//! the domain types in `bazar-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod services;
pub mod state;
pub mod storage;
