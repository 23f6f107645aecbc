pub mod http;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Compress, Condition, Logger},
    App, Error,
};

#[derive(Default)]
pub struct AppOptions {
    pub cors: Option<Cors>,
    pub logger: Option<Logger>,
}

/// Build a new HTTP app in a consistent way.
///
/// Middleware is executed in the reverse order of being added. Middleware of services runs
/// after the middleware added here.
pub fn new_app(
    options: AppOptions,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors_enabled = options.cors.is_some();
    let logger_enabled = options.logger.is_some();

    App::new()
        // Handle CORS requests, this might finish early and not pass requests to the next entry
        .wrap(Condition::new(
            cors_enabled,
            options.cors.unwrap_or_default(),
        ))
        // Compress everything
        .wrap(Compress::default())
        // First log the request, so that we know what happens (can't fail)
        .wrap(Condition::new(
            logger_enabled,
            options.logger.unwrap_or_default(),
        ))
}
