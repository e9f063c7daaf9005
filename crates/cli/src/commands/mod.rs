//! Subcommand implementations.
//!
//! Every command writes to the `out` it is given, so tests can capture it.

pub mod cart;
pub mod catalog;
pub mod checkout;
