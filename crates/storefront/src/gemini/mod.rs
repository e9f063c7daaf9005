//! Google Generative Language API integration.
//!
//! Used for one thing only: classifying customer email addresses during
//! checkout. The model is asked for a JSON verdict constrained by a response
//! schema; anything else it sends back is treated as a failed call.

mod client;
mod types;

pub use client::GeminiClassifier;
