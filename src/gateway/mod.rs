//! Implementations of [`TaskGateway`](crate::traits::TaskGateway)

pub mod local;
pub mod rest;

pub use local::LocalStore;
pub use rest::RestGateway;
