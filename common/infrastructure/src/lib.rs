mod infra;

pub mod app;
pub mod endpoint;
pub mod health;
pub mod tracing;

pub use infra::*;
