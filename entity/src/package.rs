use crate::status::Status;
use serde::{Deserialize, Serialize};
use trustify_common::purl::Purl;

/// A known, fully qualified package version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub purl: Purl,
    /// Vulnerability statuses, in the order they were recorded. May contain the same
    /// vulnerability more than once.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<PackageStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatus {
    pub vulnerability: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}
