use anyhow::Context;
use std::path::PathBuf;
use trustify_entity::dataset::Dataset;

const SAMPLE_DATASET: &str = include_str!("../../etc/datasets/catalog.json");

/// The data which is served
#[derive(clap::Args, Debug, Clone, Default)]
#[command(next_help_heading = "Dataset")]
pub struct DatasetConfig {
    /// JSON file with packages, vulnerabilities, advisories and SBOMs. Defaults to a bundled
    /// sample.
    #[arg(id = "dataset", long = "dataset", env = "TRUSTIFY_DATASET")]
    pub dataset: Option<PathBuf>,
}

impl DatasetConfig {
    pub fn load(&self) -> anyhow::Result<Dataset> {
        let dataset = match &self.dataset {
            Some(path) => {
                log::info!("Loading dataset: {}", path.display());
                Dataset::from_path(path)?
            }
            None => {
                log::info!("Loading bundled sample dataset");
                Dataset::from_slice(SAMPLE_DATASET.as_bytes())
                    .context("failed to load the bundled sample dataset")?
            }
        };

        log::info!(
            "Dataset: {} packages, {} vulnerabilities, {} advisories, {} SBOMs",
            dataset.packages.len(),
            dataset.vulnerabilities.len(),
            dataset.advisories.len(),
            dataset.sboms.len()
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;
    use trustify_test_context::dataset_path;

    #[test]
    fn bundled() {
        let dataset = DatasetConfig::default().load().unwrap();
        assert!(!dataset.packages.is_empty());
    }

    #[test]
    fn from_file() {
        let dataset = DatasetConfig {
            dataset: Some(dataset_path("catalog.json")),
        }
        .load()
        .unwrap();
        assert_eq!(dataset, DatasetConfig::default().load().unwrap());
    }

    #[test]
    fn missing_file() {
        let err = DatasetConfig {
            dataset: Some(dataset_path("does-not-exist.json")),
        }
        .load()
        .unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.json"), "{err:#}");
    }
}
