//! Shared types and models for the crop advisory service
//!
//! Holds the pure parts of the recommendation engine (crop taxonomy,
//! suitability, revenue) so they can be used by the backend and, via WASM,
//! by offline clients.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
