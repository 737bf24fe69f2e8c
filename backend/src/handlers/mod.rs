//! HTTP handlers for the crop advisory service

pub mod health;
pub mod prediction;

pub use health::*;
pub use prediction::*;
