use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A kind of item that can be searched for.
///
/// The order of the variants is the order categories are displayed in.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    #[strum(to_string = "vulnerability", serialize = "vulnerabilities")]
    Vulnerability,
    #[strum(to_string = "sbom", serialize = "sboms")]
    Sbom,
    #[strum(to_string = "advisory", serialize = "advisories")]
    Advisory,
    #[strum(to_string = "package", serialize = "packages")]
    Package,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Vulnerability,
        Category::Sbom,
        Category::Advisory,
        Category::Package,
    ];

    /// The path prefix of the details page of an item.
    pub fn href_prefix(&self) -> &'static str {
        match self {
            Self::Vulnerability => "/vulnerabilities",
            Self::Sbom => "/sboms",
            Self::Advisory => "/advisories",
            Self::Package => "/packages",
        }
    }

    pub fn href(&self, id: &str) -> String {
        format!("{}/{id}", self.href_prefix())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResultItem {
    pub category: Category,
    pub id: String,
    /// Link to the details of the item
    pub href: String,
    /// What is shown to the user
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchResultItem {
    pub fn new(category: Category, id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            category,
            href: category.href(&id),
            id,
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<Option<String>>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailureReason {
    /// The index failed answering the query
    Unavailable,
    /// The index took too long
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryFailure {
    pub category: Category,
    pub reason: FailureReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AutocompleteResponse {
    /// Matching items, grouped by category in display order
    pub items: Vec<SearchResultItem>,
    /// Categories which could not be searched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<CategoryFailure>,
}

impl AutocompleteResponse {
    /// Number of items per category.
    pub fn count(&self, category: Category) -> usize {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
pub struct AutocompleteOptions {
    /// The text to search for
    #[serde(default)]
    pub q: String,
    /// The maximum number of items per category
    #[serde(default)]
    pub limit: Option<usize>,
    /// Identifies the client, a new query replaces a running one of the same session
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
pub struct SearchOptions {
    /// The text to search for
    #[serde(default)]
    pub q: String,
}
