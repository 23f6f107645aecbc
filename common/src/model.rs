use utoipa::{IntoParams, ToSchema};

/// Paging parameters of list style endpoints.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema, IntoParams,
)]
#[serde(rename_all = "camelCase")]
pub struct Paginated {
    /// The first item to return, skipping all that come before it.
    #[serde(default)]
    pub offset: u64,
    /// The maximum number of entries to return. Zero means: no limit.
    #[serde(default)]
    pub limit: u64,
}

impl Paginated {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Apply the paging window to an iterator of all results.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let items = items.into_iter().skip(self.offset as usize);
        match self.limit {
            0 => items.collect(),
            limit => items.take(limit as usize).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct PaginatedResults<R> {
    pub items: Vec<R>,
    /// The total number of matching items, independent of paging.
    pub total: u64,
}

impl<R> Default for PaginatedResults<R> {
    fn default() -> Self {
        Self {
            items: vec![],
            total: 0,
        }
    }
}
