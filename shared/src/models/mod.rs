//! Domain models for the crop advisory service

mod crop;
mod observation;
mod prediction;
mod revenue;
mod suitability;

pub use crop::*;
pub use observation::*;
pub use prediction::*;
pub use revenue::*;
pub use suitability::*;
