//! The search backend.

mod memory;

pub use memory::InMemoryIndex;

use crate::{model::Category, model::SearchResultItem, query::Query};
use async_trait::async_trait;
use std::fmt::Debug;
use trustify_common::model::{Paginated, PaginatedResults};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SearchIndex: Debug + Send + Sync {
    /// Search a single category.
    ///
    /// Without a query, all items of the category are returned, ordered by id. Otherwise only
    /// matching items, ordered by relevance.
    async fn search(
        &self,
        category: Category,
        query: Option<&Query>,
        paginated: Paginated,
    ) -> Result<PaginatedResults<SearchResultItem>, IndexError>;
}
