use actix_http::StatusCode;
use actix_web::body::BoxBody;
use actix_web::{HttpResponse, ResponseError};
use trustify_common::error::ErrorInformation;
use trustify_common::purl::PurlErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid pURL '{purl}': {err}")]
    Purl { purl: String, err: PurlErr },
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Purl { .. } => StatusCode::BAD_REQUEST,
            Self::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::Purl { err, .. } => HttpResponse::BadRequest()
                .json(ErrorInformation::new("InvalidPurlSyntax", self).with_details(err)),
            Self::CatalogUnavailable(msg) => HttpResponse::ServiceUnavailable()
                .json(ErrorInformation::new("CatalogUnavailable", msg)),
        }
    }
}
