use crate::purl::{
    model::recommend::{RecommendRequest, RecommendResponse},
    service::RecommendService,
};
use actix_web::{post, web, HttpResponse, Responder};
use trustify_common::error::ErrorInformation;

pub fn configure(
    config: &mut utoipa_actix_web::service_config::ServiceConfig,
    service: RecommendService,
) {
    config
        .app_data(web::Data::new(service))
        .service(recommend);
}

#[utoipa::path(
    operation_id = "recommendPurls",
    tag = "purl",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendations for each of the requested pURLs", body = RecommendResponse),
        (status = 400, description = "One of the pURLs is invalid", body = ErrorInformation),
        (status = 503, description = "The catalog could not be consulted", body = ErrorInformation),
    ),
)]
#[post("/v2/purl/recommend")]
/// Recommend patched versions for a list of pURLs
pub async fn recommend(
    service: web::Data<RecommendService>,
    web::Json(request): web::Json<RecommendRequest>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(service.recommend(&request.purls).await?))
}
