pub mod aggregate;
pub mod config;
pub mod endpoints;
pub mod index;
pub mod model;
pub mod query;
pub mod service;
pub mod session;

pub use endpoints::configure;
pub use service::{Error, SearchService};
