use crate::{
    model::{AutocompleteOptions, AutocompleteResponse, Category, SearchOptions, SearchResultItem},
    service::{Error, SearchService},
};
use actix_web::{get, web, HttpResponse, Responder};
use std::str::FromStr;
use trustify_common::{
    error::ErrorInformation,
    model::{Paginated, PaginatedResults},
};

/// mount the "search" module
pub fn configure(
    svc: &mut utoipa_actix_web::service_config::ServiceConfig,
    service: SearchService,
) {
    svc.app_data(web::Data::new(service))
        // must come before the per category search, which would match "autocomplete" as well
        .service(autocomplete)
        .service(search);
}

#[utoipa::path(
    operation_id = "autocomplete",
    tag = "search",
    params(AutocompleteOptions),
    responses(
        (status = 200, description = "Matching items of all categories", body = AutocompleteResponse),
        (status = 204, description = "The query was superseded by a newer query of the same session"),
        (status = 503, description = "None of the categories could be searched", body = ErrorInformation),
    ),
)]
#[get("/v2/search/autocomplete")]
/// Search all categories, for suggestions while typing
pub async fn autocomplete(
    service: web::Data<SearchService>,
    web::Query(options): web::Query<AutocompleteOptions>,
) -> Result<impl Responder, Error> {
    let result = service
        .autocomplete(&options.q, options.limit, options.session.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    operation_id = "searchCategory",
    tag = "search",
    params(
        ("category" = String, Path, description = "The category to search: vulnerabilities, sboms, advisories, or packages"),
        SearchOptions,
        Paginated,
    ),
    responses(
        (status = 200, description = "Matching items of the category", body = PaginatedResults<SearchResultItem>),
        (status = 400, description = "Unknown category", body = ErrorInformation),
        (status = 503, description = "The category could not be searched", body = ErrorInformation),
    ),
)]
#[get("/v2/search/{category}")]
/// Search a single category
pub async fn search(
    service: web::Data<SearchService>,
    category: web::Path<String>,
    web::Query(SearchOptions { q }): web::Query<SearchOptions>,
    web::Query(paginated): web::Query<Paginated>,
) -> Result<impl Responder, Error> {
    let category = category.into_inner();
    let category = Category::from_str(&category).map_err(|_| Error::UnknownCategory(category))?;
    Ok(HttpResponse::Ok().json(service.search(category, &q, paginated).await?))
}
