#![allow(clippy::expect_used)]

pub mod call;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tracing::instrument;
use trustify_entity::dataset::Dataset;

/// The sample dataset bundled with the workspace.
pub const SAMPLE_DATASET: &str = include_str!("../../etc/datasets/catalog.json");

#[derive(Debug)]
pub struct TrustifyContext {
    pub dataset: Arc<Dataset>,
}

impl TrustifyContext {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

impl AsyncTestContext for TrustifyContext {
    #[instrument]
    async fn setup() -> TrustifyContext {
        if let Ok(path) = env::var("TRUSTIFY_TEST_DATASET") {
            log::warn!("Using dataset from 'TRUSTIFY_TEST_DATASET': {path}");
            let dataset = Dataset::from_path(&path).expect("loading the external test dataset");
            return TrustifyContext::new(dataset);
        }

        let dataset =
            Dataset::from_slice(SAMPLE_DATASET.as_bytes()).expect("loading the sample dataset");
        TrustifyContext::new(dataset)
    }

    async fn teardown(self) {
        log::debug!(
            "dropping context with {} packages",
            self.dataset.packages.len()
        );
    }
}

/// Absolute path of a file in the workspace `etc/datasets` directory.
pub fn dataset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../etc/datasets")
        .join(name)
}
