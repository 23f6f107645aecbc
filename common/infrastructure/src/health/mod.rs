pub mod checks;

use futures::future::{join_all, BoxFuture};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

/// A single health check.
pub trait Check: Send + Sync + 'static {
    type Error: Display;

    fn run(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

trait DynCheck: Send + Sync {
    fn run(&self) -> BoxFuture<'_, Result<(), String>>;
}

impl<C: Check> DynCheck for C {
    fn run(&self) -> BoxFuture<'_, Result<(), String>> {
        Box::pin(async move { Check::run(self).await.map_err(|err| err.to_string()) })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckResults {
    #[serde(flatten)]
    pub results: BTreeMap<String, CheckResult>,
}

impl CheckResults {
    pub fn all_up(&self) -> bool {
        self.results.values().all(|result| result.up)
    }
}

/// A named set of checks.
#[derive(Default)]
pub struct Checks {
    checks: RwLock<BTreeMap<String, Arc<dyn DynCheck>>>,
}

impl Checks {
    pub fn register(&self, name: impl Into<String>, check: impl Check) {
        self.checks.write().insert(name.into(), Arc::new(check));
    }

    pub async fn run(&self) -> CheckResults {
        // don't hold the lock while running the checks
        let checks: Vec<_> = self
            .checks
            .read()
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect();

        let results = join_all(checks.into_iter().map(|(name, check)| async move {
            let result = match check.run().await {
                Ok(()) => CheckResult {
                    up: true,
                    error: None,
                },
                Err(err) => CheckResult {
                    up: false,
                    error: Some(err),
                },
            };
            (name, result)
        }))
        .await;

        CheckResults {
            results: results.into_iter().collect(),
        }
    }
}

#[derive(Default)]
pub struct HealthChecks {
    pub startup: Checks,
    pub liveness: Checks,
    pub readiness: Checks,
}
