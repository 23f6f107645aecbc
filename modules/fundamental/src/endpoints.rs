use crate::{catalog::Catalog, config::RecommendConfig, purl::service::RecommendService};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub recommend: RecommendConfig,
}

pub fn configure(
    svc: &mut utoipa_actix_web::service_config::ServiceConfig,
    config: Config,
    catalog: Arc<dyn Catalog>,
) {
    let recommend = RecommendService::new(catalog, config.recommend);
    crate::purl::endpoints::configure(svc, recommend);
}
