use super::{Catalog, CatalogError};
use crate::purl::model::recommend::RecommendEntry;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use trustify_common::purl::Purl;
use trustify_entity::{dataset::Dataset, package};

/// A catalog backed by a dataset held in memory.
///
/// A version `U.<vendor>-<build>` is considered a recommendation for `U`, as well as for
/// `U.<vendor>-<older build>`. Qualifiers of the requested pURL are not taken into account.
#[derive(Clone, Debug)]
pub struct InMemoryCatalog {
    vendor: String,
    packages: HashMap<Purl, Vec<Arc<package::Model>>>,
}

impl InMemoryCatalog {
    pub fn new(dataset: &Dataset, vendor: impl Into<String>) -> Self {
        let mut packages: HashMap<Purl, Vec<Arc<package::Model>>> = HashMap::new();
        for package in &dataset.packages {
            packages
                .entry(package.purl.base())
                .or_default()
                .push(Arc::new(package.clone()));
        }

        let vendor = vendor.into();
        log::debug!(
            "catalog with {} packages, vendor: {vendor}",
            dataset.packages.len()
        );

        Self { vendor, packages }
    }

    fn candidates(&self, purl: &Purl) -> Vec<&package::Model> {
        let Some(version) = purl.version.as_deref() else {
            return vec![];
        };
        let (upstream, current) = split_build(version, &self.vendor);

        let mut candidates = self
            .packages
            .get(&purl.base())
            .into_iter()
            .flatten()
            .filter_map(|package| {
                let (candidate, build) =
                    split_build(package.purl.version.as_deref()?, &self.vendor);
                let build = build?;
                (candidate == upstream && current.map_or(true, |current| build > current))
                    .then_some((build, package.as_ref()))
            })
            .collect::<Vec<_>>();

        // stable, so equal builds stay in dataset order
        candidates.sort_by(|(a, _), (b, _)| b.cmp(a));
        candidates.into_iter().map(|(_, package)| package).collect()
    }
}

/// Split a version into the upstream part and the vendor build number.
///
/// `3.20.2.redhat-00004` results in `("3.20.2", Some(4))`, a version without a vendor build in
/// itself and `None`.
fn split_build<'a>(version: &'a str, vendor: &str) -> (&'a str, Option<u64>) {
    let marker = format!(".{vendor}-");
    if let Some(pos) = version.rfind(&marker) {
        let build = &version[pos + marker.len()..];
        if !build.is_empty() && build.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(build) = build.parse() {
                return (&version[..pos], Some(build));
            }
        }
    }
    (version, None)
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn lookup(&self, purl: &Purl) -> Result<Vec<RecommendEntry>, CatalogError> {
        Ok(self
            .candidates(purl)
            .into_iter()
            .map(RecommendEntry::from)
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;
    use test_context::test_context;
    use trustify_test_context::TrustifyContext;

    fn versions(entries: &[RecommendEntry]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|entry| entry.package.version.clone())
            .collect()
    }

    #[rstest]
    #[case("3.20.2", "redhat", "3.20.2", None)]
    #[case("3.20.2.redhat-00004", "redhat", "3.20.2", Some(4))]
    #[case("3.20.2.redhat-", "redhat", "3.20.2.redhat-", None)]
    #[case("3.20.2.redhat-00a1", "redhat", "3.20.2.redhat-00a1", None)]
    #[case("3.20.2.redhat-00004", "acme", "3.20.2.redhat-00004", None)]
    #[case("1.0.acme-7", "acme", "1.0", Some(7))]
    fn split(
        #[case] version: &str,
        #[case] vendor: &str,
        #[case] upstream: &str,
        #[case] build: Option<u64>,
    ) {
        assert_eq!(split_build(version, vendor), (upstream, build));
    }

    #[test_context(TrustifyContext)]
    #[test_log::test(tokio::test)]
    async fn upstream_version(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
        let catalog = InMemoryCatalog::new(&ctx.dataset, "redhat");

        let result = catalog
            .lookup(&Purl::from_str(
                "pkg:maven/io.quarkus.arc/arc-processor@3.20.2?type=jar",
            )?)
            .await?;

        assert_eq!(
            versions(&result),
            [
                "3.20.2.redhat-00004",
                "3.20.2.redhat-00003",
                "3.20.2.redhat-00002",
                "3.20.2.redhat-00001",
            ]
        );
        assert_eq!(
            result[0].package.to_string(),
            "pkg:maven/io.quarkus.arc/arc-processor@3.20.2.redhat-00004?repository_url=https://maven.repository.redhat.com/ga/&type=jar"
        );

        Ok(())
    }

    #[test_context(TrustifyContext)]
    #[test_log::test(tokio::test)]
    async fn only_newer_builds(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
        let catalog = InMemoryCatalog::new(&ctx.dataset, "redhat");

        let result = catalog
            .lookup(&Purl::from_str(
                "pkg:maven/io.quarkus.arc/arc-processor@3.20.3.redhat-00001",
            )?)
            .await?;
        assert_eq!(
            versions(&result),
            ["3.20.3.redhat-00003", "3.20.3.redhat-00002"]
        );

        let result = catalog
            .lookup(&Purl::from_str(
                "pkg:maven/io.quarkus.arc/arc-processor@3.20.3.redhat-00003",
            )?)
            .await?;
        assert!(result.is_empty());

        Ok(())
    }

    #[test_context(TrustifyContext)]
    #[test_log::test(tokio::test)]
    async fn no_recommendation(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
        let catalog = InMemoryCatalog::new(&ctx.dataset, "redhat");

        for purl in [
            // no vendor build
            "pkg:maven/net.minidev/accessors-smart@2.5.1",
            // unknown package
            "pkg:maven/org.example/unknown@1.0.0",
            // known package, unknown version
            "pkg:maven/io.quarkus.arc/arc-processor@9.9.9",
            // same name, other namespace
            "pkg:maven/org.example/arc-processor@3.20.2",
        ] {
            let result = catalog.lookup(&Purl::from_str(purl)?).await?;
            assert!(result.is_empty(), "{purl}: {result:?}");
        }

        Ok(())
    }

    #[test_context(TrustifyContext)]
    #[test_log::test(tokio::test)]
    async fn entries_carry_statuses(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
        let catalog = InMemoryCatalog::new(&ctx.dataset, "redhat");

        let result = catalog
            .lookup(&Purl::from_str(
                "pkg:maven/io.quarkus.arc/arc-processor@3.20.2.redhat-00003",
            )?)
            .await?;

        assert_eq!(versions(&result), ["3.20.2.redhat-00004"]);
        // the catalog reports what it knows, including duplicates
        let ids = result[0]
            .vulnerabilities
            .iter()
            .map(|v| v.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                "CVE-2025-1247",
                "CVE-2025-49574",
                "CVE-2025-1247",
                "CVE-2024-12397"
            ]
        );
        assert!(result[0].vulnerabilities.iter().all(|v| v.status.is_some()));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn other_vendor() -> Result<(), anyhow::Error> {
        let dataset = Dataset::from_slice(
            br#"{"packages": [
                {"id": "a", "purl": "pkg:npm/left-pad@1.3.0.acme-2"},
                {"id": "b", "purl": "pkg:npm/left-pad@1.3.0.acme-10"},
                {"id": "c", "purl": "pkg:npm/left-pad@1.3.0.redhat-00001"}
            ]}"#,
        )?;
        let catalog = InMemoryCatalog::new(&dataset, "acme");

        let result = catalog
            .lookup(&Purl::from_str("pkg:npm/left-pad@1.3.0")?)
            .await?;
        assert_eq!(versions(&result), ["1.3.0.acme-10", "1.3.0.acme-2"]);

        Ok(())
    }
}
