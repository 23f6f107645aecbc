use crate::{advisory, package, sbom, vulnerability};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// The full content backing the catalog and the search index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub packages: Vec<package::Model>,
    #[serde(default)]
    pub vulnerabilities: Vec<vulnerability::Model>,
    #[serde(default)]
    pub advisories: Vec<advisory::Model>,
    #[serde(default)]
    pub sboms: Vec<sbom::Model>,
}

impl Dataset {
    pub fn from_slice(data: &[u8]) -> anyhow::Result<Self> {
        let result: Self = serde_json::from_slice(data).context("failed to parse dataset")?;
        result.check()?;
        Ok(result)
    }

    pub fn from_reader(reader: impl Read) -> anyhow::Result<Self> {
        let result: Self = serde_json::from_reader(reader).context("failed to parse dataset")?;
        result.check()?;
        Ok(result)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open dataset: {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("failed to load dataset: {}", path.display()))
    }

    /// Identifiers must be unique per kind, they end up in hrefs.
    fn check(&self) -> anyhow::Result<()> {
        fn unique<'a>(kind: &str, ids: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    bail!("duplicate {kind} id: {id}");
                }
            }
            Ok(())
        }

        unique("package", self.packages.iter().map(|p| p.id.as_str()))?;
        unique(
            "vulnerability",
            self.vulnerabilities.iter().map(|v| v.id.as_str()),
        )?;
        unique("advisory", self.advisories.iter().map(|a| a.id.as_str()))?;
        unique("sbom", self.sboms.iter().map(|s| s.id.as_str()))?;

        for package in &self.packages {
            if package.purl.version.is_none() {
                log::warn!("package {} has no version: {}", package.id, package.purl);
            }
        }

        Ok(())
    }
}
