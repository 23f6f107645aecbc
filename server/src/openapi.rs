use crate::{configure, Config};
use actix_web::App;
use trustify_entity::dataset::Dataset;
use utoipa::openapi::{Info, License, OpenApi};
use utoipa_actix_web::AppExt;

pub fn default_openapi_info() -> Info {
    let mut info = Info::new("Trustify", env!("CARGO_PKG_VERSION"));
    info.description = Some("Package recommendations and search".into());
    info.license = {
        let mut license = License::new("Apache License, Version 2.0");
        license.identifier = Some("Apache-2.0".into());
        Some(license)
    };
    info
}

/// Create the OpenAPI document, as served by the API server.
pub async fn create_openapi() -> anyhow::Result<OpenApi> {
    let config = Config::new(&Dataset::default(), Default::default(), Default::default());
    let (_, mut openapi) = App::new()
        .into_utoipa_app()
        .configure(|svc| configure(svc, config))
        .split_for_parts();

    openapi.info = default_openapi_info();
    Ok(openapi)
}
