//! External integrations

pub mod model_gateway;

pub use model_gateway::{ModelGateway, ModelInvocationError, RemoteModelGateway};
