use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt::Formatter;
use trustify_common::purl::Purl;
use trustify_entity::{package, status::Status};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// The pURLs to find recommendations for
    pub purls: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendResponse {
    /// The recommendations, for each distinct requested pURL
    #[schema(value_type = Object)]
    pub recommendations: Recommendations,
    /// Requested pURLs for which the lookup failed. Their recommendations are empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendEntry {
    /// The recommended package
    #[schema(value_type = String)]
    pub package: Purl,
    pub vulnerabilities: Vec<VulnerabilityStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VulnerabilityStatus {
    /// The vulnerability identifier, e.g. `CVE-2024-1234`
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl RecommendEntry {
    /// Drop repeated vulnerabilities, keeping the first occurrence.
    pub fn dedup_vulnerabilities(mut self) -> Self {
        let mut seen = HashSet::new();
        self.vulnerabilities.retain(|v| seen.insert(v.id.clone()));
        self
    }
}

impl From<&package::Model> for RecommendEntry {
    fn from(value: &package::Model) -> Self {
        Self {
            package: value.purl.clone(),
            vulnerabilities: value
                .statuses
                .iter()
                .map(|status| VulnerabilityStatus {
                    id: status.vulnerability.clone(),
                    status: Some(status.status),
                    justification: status.justification.clone(),
                })
                .collect(),
        }
    }
}

/// Recommendations per requested pURL, in the order the pURLs were first requested.
///
/// Serialized as a JSON object, keeping that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recommendations {
    entries: Vec<(String, Vec<RecommendEntry>)>,
    // position of each key in `entries`
    index: HashMap<String, usize>,
}

impl Recommendations {
    /// Add the recommendations for a key, replacing existing ones.
    pub fn insert(&mut self, key: impl Into<String>, entries: Vec<RecommendEntry>) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&n) => self.entries[n].1 = entries,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entries));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[RecommendEntry]> {
        self.index.get(key).map(|&n| self.entries[n].1.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RecommendEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Recommendations {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entries) in &self.entries {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Recommendations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecommendationsVisitor)
    }
}

struct RecommendationsVisitor;

impl<'de> Visitor<'de> for RecommendationsVisitor {
    type Value = Recommendations;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a map of pURLs to recommendations")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut result = Recommendations::default();
        while let Some((key, entries)) = access.next_entry::<String, Vec<RecommendEntry>>()? {
            result.insert(key, entries);
        }
        Ok(result)
    }
}
