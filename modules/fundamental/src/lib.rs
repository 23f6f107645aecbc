pub mod catalog;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod purl;

pub use endpoints::{configure, Config};
pub use error::Error;
