use super::*;
use crate::catalog::InMemoryCatalog;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_context::test_context;
use test_log::test;
use trustify_common::purl::PurlErr;
use trustify_test_context::TrustifyContext;

const ARC_3_20_2: &str = "pkg:maven/io.quarkus.arc/arc-processor@3.20.2";
const ARC_3_20_2_JAR: &str = "pkg:maven/io.quarkus.arc/arc-processor@3.20.2?type=jar";
const QUARKUS_CORE: &str = "pkg:maven/io.quarkus/quarkus-core@3.20.2";
const UNKNOWN: &str = "pkg:maven/org.example/unknown@1.0.0";

fn quick() -> RecommendConfig {
    RecommendConfig {
        lookup_timeout: Duration::from_millis(200).into(),
        retry_backoff: Duration::from_millis(1).into(),
        ..Default::default()
    }
}

fn service(catalog: impl Catalog + 'static, config: RecommendConfig) -> RecommendService {
    RecommendService::new(Arc::new(catalog), config)
}

fn strings(purls: &[&str]) -> Vec<String> {
    purls.iter().map(ToString::to_string).collect()
}

/// Counts calls before handing them to an inner catalog.
#[derive(Debug)]
struct Counting<C> {
    inner: C,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl<C: Catalog> Catalog for Counting<C> {
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(purl).await
    }
}

/// Fails the first `failures` calls.
#[derive(Debug)]
struct Flaky<C> {
    inner: C,
    failures: AtomicUsize,
}

#[async_trait]
impl<C: Catalog> Catalog for Flaky<C> {
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(CatalogError::Unavailable("flaky".into()));
        }
        self.inner.lookup(purl).await
    }
}

/// Fails every lookup for a package name.
#[derive(Debug)]
struct Broken<C> {
    inner: C,
    name: &'static str,
}

#[async_trait]
impl<C: Catalog> Catalog for Broken<C> {
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError> {
        if purl.name == self.name {
            return Err(CatalogError::Unavailable("broken".into()));
        }
        self.inner.lookup(purl).await
    }
}

/// Never answers in time.
#[derive(Debug)]
struct Stuck;

#[async_trait]
impl Catalog for Stuck {
    async fn lookup(&self, _purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(vec![])
    }
}

#[test(tokio::test)]
async fn empty_request_skips_catalog() -> Result<(), anyhow::Error> {
    let calls = Arc::new(AtomicUsize::default());
    let service = service(
        Counting {
            inner: Stuck,
            calls: calls.clone(),
        },
        quick(),
    );

    let response = service.recommend(&[]).await?;

    assert!(response.recommendations.is_empty());
    assert!(response.degraded.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn invalid_purl_fails_before_lookup(ctx: &TrustifyContext) {
    let calls = Arc::new(AtomicUsize::default());
    let service = service(
        Counting {
            inner: InMemoryCatalog::new(&ctx.dataset, "redhat"),
            calls: calls.clone(),
        },
        quick(),
    );

    let result = service
        .recommend(&strings(&[ARC_3_20_2, "pkg:maven/@3.20.2"]))
        .await;

    match result {
        Err(Error::Purl { purl, err }) => {
            assert_eq!(purl, "pkg:maven/@3.20.2");
            assert_eq!(err, PurlErr::MissingName);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn duplicates_collapse(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let calls = Arc::new(AtomicUsize::default());
    let service = service(
        Counting {
            inner: InMemoryCatalog::new(&ctx.dataset, "redhat"),
            calls: calls.clone(),
        },
        quick(),
    );

    let response = service
        .recommend(&strings(&[QUARKUS_CORE, ARC_3_20_2, QUARKUS_CORE, ARC_3_20_2_JAR]))
        .await?;

    assert_eq!(
        response.recommendations.keys().collect::<Vec<_>>(),
        [QUARKUS_CORE, ARC_3_20_2, ARC_3_20_2_JAR]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // qualifiers of the input don't change the outcome
    assert_eq!(
        response.recommendations.get(ARC_3_20_2),
        response.recommendations.get(ARC_3_20_2_JAR)
    );

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn vulnerabilities_are_unique(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let service = service(InMemoryCatalog::new(&ctx.dataset, "redhat"), quick());

    let response = service.recommend(&strings(&[ARC_3_20_2])).await?;

    let entries = response.recommendations.get(ARC_3_20_2).unwrap_or_default();
    assert_eq!(entries.len(), 4);
    for entry in entries {
        let mut ids = entry
            .vulnerabilities
            .iter()
            .map(|v| v.id.as_str())
            .collect::<Vec<_>>();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total, "duplicates in {}", entry.package);
    }

    let top = &entries[0];
    assert_eq!(
        top.vulnerabilities
            .iter()
            .map(|v| v.id.as_str())
            .collect::<Vec<_>>(),
        ["CVE-2025-1247", "CVE-2025-49574", "CVE-2024-12397"]
    );

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn unknown_maps_to_empty(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let service = service(InMemoryCatalog::new(&ctx.dataset, "redhat"), quick());

    let response = service.recommend(&strings(&[UNKNOWN])).await?;

    assert_eq!(response.recommendations.get(UNKNOWN), Some(&[][..]));
    assert!(response.degraded.is_empty());

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn retries_recover(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let service = service(
        Flaky {
            inner: InMemoryCatalog::new(&ctx.dataset, "redhat"),
            failures: AtomicUsize::new(2),
        },
        quick(),
    );

    let response = service.recommend(&strings(&[ARC_3_20_2])).await?;

    assert!(response.degraded.is_empty());
    assert_eq!(
        response
            .recommendations
            .get(ARC_3_20_2)
            .map(<[_]>::len),
        Some(4)
    );

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn degrade_reports_failed_keys(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let service = service(
        Broken {
            inner: InMemoryCatalog::new(&ctx.dataset, "redhat"),
            name: "quarkus-core",
        },
        quick(),
    );

    let response = service
        .recommend(&strings(&[ARC_3_20_2, QUARKUS_CORE]))
        .await?;

    assert_eq!(response.degraded, [QUARKUS_CORE]);
    assert_eq!(response.recommendations.get(QUARKUS_CORE), Some(&[][..]));
    assert!(!response
        .recommendations
        .get(ARC_3_20_2)
        .unwrap_or_default()
        .is_empty());

    Ok(())
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn fail_policy_fails_request(ctx: &TrustifyContext) {
    let service = service(
        Broken {
            inner: InMemoryCatalog::new(&ctx.dataset, "redhat"),
            name: "quarkus-core",
        },
        RecommendConfig {
            failure_policy: LookupFailurePolicy::Fail,
            ..quick()
        },
    );

    let result = service
        .recommend(&strings(&[ARC_3_20_2, QUARKUS_CORE]))
        .await;

    assert!(
        matches!(result, Err(Error::CatalogUnavailable(_))),
        "{result:?}"
    );
}

#[test(tokio::test)]
async fn everything_failed_is_unavailable() {
    let service = service(
        Stuck,
        RecommendConfig {
            lookup_timeout: Duration::from_millis(10).into(),
            retries: 1,
            ..quick()
        },
    );

    let result = service.recommend(&strings(&[ARC_3_20_2, UNKNOWN])).await;

    match result {
        Err(Error::CatalogUnavailable(msg)) => assert!(msg.contains("all 2 lookups failed")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test_context(TrustifyContext)]
#[test(tokio::test)]
async fn distinct_inputs_keep_their_base(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
    let service = service(InMemoryCatalog::new(&ctx.dataset, "redhat"), quick());

    let response = service
        .recommend(&strings(&[ARC_3_20_2, QUARKUS_CORE]))
        .await?;

    assert_eq!(response.recommendations.len(), 2);
    for (key, entries) in response.recommendations.iter() {
        let base = validate(key)?.base();
        assert!(!entries.is_empty(), "{key}");
        for entry in entries {
            assert_eq!(entry.package.base(), base);
        }
    }

    Ok(())
}
