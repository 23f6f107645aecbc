pub mod dataset;
pub mod openapi;

use crate::{dataset::DatasetConfig, openapi::default_openapi_info};
use std::process::ExitCode;
use std::sync::Arc;
use trustify_entity::dataset::Dataset;
use trustify_infrastructure::{
    app::http::{HttpServerBuilder, HttpServerConfig},
    endpoint::Trustify,
    health::checks::Probe,
    Infrastructure, InfrastructureConfig, InitContext,
};
use trustify_module_fundamental::{
    catalog::{Catalog, InMemoryCatalog},
    config::RecommendConfig,
};
use trustify_module_search::{
    config::SearchConfig,
    index::{InMemoryIndex, SearchIndex},
    SearchService,
};
use utoipa_actix_web::service_config::ServiceConfig;

/// Run the API server
#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(flatten)]
    pub dataset: DatasetConfig,

    #[command(flatten)]
    pub recommend: RecommendConfig,

    #[command(flatten)]
    pub search: SearchConfig,

    #[command(flatten)]
    pub infra: InfrastructureConfig,

    #[command(flatten)]
    pub http: HttpServerConfig<Trustify>,
}

const SERVICE_ID: &str = "trustify";

struct InitData {
    config: Config,
    http: HttpServerConfig<Trustify>,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        // logging is only active once the infrastructure run method has been called
        Infrastructure::from(self.infra.clone())
            .run(
                SERVICE_ID,
                |context| async move { InitData::new(context, self).await },
                |context| async move { context.init_data.run().await },
            )
            .await?;

        Ok(ExitCode::SUCCESS)
    }
}

impl InitData {
    async fn new(context: InitContext, run: Run) -> anyhow::Result<Self> {
        let (probe, check) = Probe::new("dataset not loaded");
        context.health.readiness.register("dataset", check);

        let dataset = run.dataset.load()?;
        let config = Config::new(&dataset, run.recommend, run.search);
        probe.set(true);

        Ok(InitData {
            config,
            http: run.http,
        })
    }

    async fn run(self) -> anyhow::Result<()> {
        let config = self.config;

        let http = HttpServerBuilder::try_from(self.http)?
            .openapi_info(default_openapi_info())
            .configure(move |svc| configure(svc, config.clone()));

        let result = http.run().await;
        log::info!("API server returned, exiting: {result:?}");
        result
    }
}

/// State shared by all workers of the API server.
#[derive(Clone, Debug)]
pub struct Config {
    pub recommend: RecommendConfig,
    pub catalog: Arc<dyn Catalog>,
    pub search: SearchService,
}

impl Config {
    pub fn new(dataset: &Dataset, recommend: RecommendConfig, search: SearchConfig) -> Self {
        let catalog: Arc<dyn Catalog> =
            Arc::new(InMemoryCatalog::new(dataset, recommend.vendor.clone()));
        let index: Arc<dyn SearchIndex> = Arc::new(InMemoryIndex::new(dataset));

        Self {
            recommend,
            catalog,
            search: SearchService::new(index, search),
        }
    }
}

/// Mount all modules under `/api`.
pub fn configure(svc: &mut ServiceConfig, config: Config) {
    let Config {
        recommend,
        catalog,
        search,
    } = config;

    svc.service(utoipa_actix_web::scope("/api").configure(|svc| {
        trustify_module_fundamental::configure(
            svc,
            trustify_module_fundamental::Config { recommend },
            catalog,
        );
        trustify_module_search::configure(svc, search);
    }));
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::{test::TestRequest, App};
    use serde_json::{json, Value};
    use test_context::test_context;
    use test_log::test;
    use trustify_test_context::{call::CallService, TrustifyContext};
    use utoipa_actix_web::AppExt;

    #[test_context(TrustifyContext)]
    #[test(actix_web::test)]
    async fn all_mounted(ctx: &TrustifyContext) -> Result<(), anyhow::Error> {
        let config = Config::new(&ctx.dataset, Default::default(), Default::default());
        let app = actix_web::test::init_service(
            App::new()
                .into_utoipa_app()
                .configure(|svc| configure(svc, config))
                .into_app(),
        )
        .await;

        let request = TestRequest::post()
            .uri("/api/v2/purl/recommend")
            .set_json(json!({ "purls": [] }))
            .to_request();
        let response: Value = app.call_and_read_body_json(request).await;
        assert_eq!(response, json!({ "recommendations": {} }));

        let request = TestRequest::get()
            .uri("/api/v2/search/autocomplete?q=quarkus")
            .to_request();
        let response: Value = app.call_and_read_body_json(request).await;
        assert!(!response["items"].as_array().unwrap().is_empty());

        Ok(())
    }
}
