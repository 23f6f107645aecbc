use crate::{
    catalog::{Catalog, CatalogError},
    config::{LookupFailurePolicy, RecommendConfig},
    purl::model::recommend::{RecommendEntry, RecommendResponse},
    Error,
};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use trustify_common::purl::{validate, Purl};

#[derive(Debug, thiserror::Error)]
enum LookupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves recommendations for a batch of pURLs.
#[derive(Clone, Debug)]
pub struct RecommendService {
    catalog: Arc<dyn Catalog>,
    config: RecommendConfig,
}

impl RecommendService {
    pub fn new(catalog: Arc<dyn Catalog>, config: RecommendConfig) -> Self {
        Self { catalog, config }
    }

    /// Find recommendations for each distinct pURL.
    ///
    /// All inputs are validated before the catalog is consulted. The first invalid one fails
    /// the whole request.
    #[instrument(skip(self, purls), fields(purls = purls.len()), err(level = tracing::Level::INFO))]
    pub async fn recommend(&self, purls: &[String]) -> Result<RecommendResponse, Error> {
        if purls.is_empty() {
            return Ok(RecommendResponse::default());
        }

        let mut seen = HashSet::new();
        let mut requested = Vec::new();
        for raw in purls {
            let purl = validate(raw).map_err(|err| Error::Purl {
                purl: raw.clone(),
                err,
            })?;
            if seen.insert(raw.as_str()) {
                requested.push((raw.as_str(), purl));
            }
        }

        let results = stream::iter(requested.iter().map(|(_, purl)| self.lookup(purl)))
            .buffered(self.config.concurrency.get())
            .collect::<Vec<_>>()
            .await;

        let mut response = RecommendResponse::default();

        for ((raw, _), result) in requested.iter().zip(results) {
            match result {
                Ok(entries) => {
                    let entries = entries
                        .into_iter()
                        .map(RecommendEntry::dedup_vulnerabilities)
                        .collect();
                    response.recommendations.insert(*raw, entries);
                }
                Err(err) => match self.config.failure_policy {
                    LookupFailurePolicy::Fail => {
                        return Err(Error::CatalogUnavailable(format!(
                            "lookup of '{raw}' failed: {err}"
                        )));
                    }
                    LookupFailurePolicy::Degrade => {
                        log::warn!("lookup of '{raw}' failed, degrading: {err}");
                        response.recommendations.insert(*raw, vec![]);
                        response.degraded.push(raw.to_string());
                    }
                },
            }
        }

        if response.degraded.len() == requested.len() {
            return Err(Error::CatalogUnavailable(format!(
                "all {} lookups failed",
                requested.len()
            )));
        }

        Ok(response)
    }

    /// Look up a single pURL, retrying failures with an exponential backoff.
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, LookupError> {
        let timeout = *self.config.lookup_timeout;
        let mut backoff = *self.config.retry_backoff;
        let mut attempt = 0;

        loop {
            let err = match tokio::time::timeout(timeout, self.catalog.lookup(purl)).await {
                Ok(Ok(entries)) => return Ok(entries),
                Ok(Err(err)) => LookupError::from(err),
                Err(_) => LookupError::Timeout(timeout),
            };

            if attempt >= self.config.retries {
                return Err(err);
            }
            attempt += 1;

            log::debug!("lookup of {purl} failed ({err}), retry {attempt} in {backoff:?}");
            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
        }
    }
}

#[cfg(test)]
mod test;
