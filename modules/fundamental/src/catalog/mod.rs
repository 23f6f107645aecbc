//! Access to the catalog of known package versions.

mod memory;

pub use memory::InMemoryCatalog;

use crate::purl::model::recommend::RecommendEntry;
use async_trait::async_trait;
use std::fmt::Debug;
use trustify_common::purl::Purl;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// A read-only source of recommendations.
#[async_trait]
pub trait Catalog: Debug + Send + Sync {
    /// Find the recommended versions for a pURL, best first.
    ///
    /// An unknown package, or one without a superior build, results in an empty list. Failing
    /// to reach the catalog is an error, and not an empty list.
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError>;
}
