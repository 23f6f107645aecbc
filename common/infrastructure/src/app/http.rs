use crate::app::{new_app, AppOptions};
use crate::endpoint::Endpoint;
use actix_cors::Cors;
use actix_web::dev::{ServiceFactory, ServiceRequest};
use actix_web::{
    middleware::Logger,
    web::{self, JsonConfig},
    App, HttpServer,
};
use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Args, Command, Error, FromArgMatches};
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::openapi::Info;
use utoipa_actix_web::AppExt;
use utoipa_rapidoc::RapiDoc;

const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 8080);

#[derive(Clone, Debug)]
pub struct BindPort<E: Endpoint> {
    /// The port to listen on
    pub bind_port: u16,

    _marker: Marker<E>,
}

impl<E: Endpoint> Deref for BindPort<E> {
    type Target = u16;

    fn deref(&self) -> &Self::Target {
        &self.bind_port
    }
}

impl<E: Endpoint> Default for BindPort<E> {
    fn default() -> Self {
        Self {
            bind_port: E::PORT,
            _marker: Default::default(),
        }
    }
}

impl<E: Endpoint> Args for BindPort<E> {
    fn augment_args(cmd: Command) -> Command {
        Self::augment_args_for_update(cmd)
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        cmd.arg(
            Arg::new("http-server-bind-port")
                .short('p')
                .long("http-server-bind-port")
                .env("HTTP_SERVER_BIND_PORT")
                .help("The port to listen on")
                .value_parser(value_parser!(u16))
                .default_value(E::PORT.to_string()),
        )
    }
}

impl<E: Endpoint> FromArgMatches for BindPort<E> {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, Error> {
        Ok(Self {
            bind_port: matches
                .get_one::<u16>("http-server-bind-port")
                .cloned()
                .unwrap_or(E::port()),
            _marker: Default::default(),
        })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), Error> {
        if let Some(port) = matches.get_one::<u16>("http-server-bind-port") {
            self.bind_port = *port;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, clap::Args)]
#[command(
    rename_all_env = "SCREAMING_SNAKE_CASE",
    next_help_heading = "HTTP endpoint"
)]
#[group(id = "http")]
pub struct HttpServerConfig<E>
where
    E: Endpoint + Send + Sync,
{
    /// The number of worker threads, defaults to zero, which falls back to the number of cores.
    #[arg(
        id = "http-server-workers",
        long,
        env = "HTTP_SERVER_WORKERS",
        default_value_t = 0
    )]
    pub workers: usize,

    /// The address to listen on
    #[arg(
        id = "http-server-bind-address",
        long,
        env = "HTTP_SERVER_BIND_ADDR",
        default_value_t = default::bind_addr(),
    )]
    pub bind_addr: String,

    // This is required due to: https://github.com/clap-rs/clap/issues/5127
    #[command(flatten)]
    pub bind_port: BindPort<E>,

    /// The overall request limit, in bytes
    #[arg(
        id = "http-server-request-limit",
        long,
        env = "HTTP_SERVER_REQUEST_LIMIT",
        default_value_t = default::request_limit(),
    )]
    pub request_limit: usize,

    /// The JSON request limit, in bytes
    #[arg(
        id = "http-server-json-limit",
        long,
        env = "HTTP_SERVER_JSON_LIMIT",
        default_value_t = default::json_limit(),
    )]
    pub json_limit: usize,

    #[arg(skip)]
    _marker: Marker<E>,
}

mod default {
    pub fn bind_addr() -> String {
        "::1".to_string()
    }

    pub const fn request_limit() -> usize {
        256 * 1024
    }

    pub const fn json_limit() -> usize {
        2 * 1024 * 1024
    }
}

impl<E: Endpoint> Default for HttpServerConfig<E>
where
    E: Endpoint + Send + Sync,
{
    fn default() -> Self {
        Self {
            workers: 0,
            bind_addr: default::bind_addr(),
            bind_port: BindPort::<E>::default(),
            request_limit: default::request_limit(),
            json_limit: default::json_limit(),
            _marker: Default::default(),
        }
    }
}

#[derive(Debug)]
struct Marker<E>(PhantomData<E>);

impl<E> Default for Marker<E> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<E> Clone for Marker<E> {
    fn clone(&self) -> Self {
        Default::default()
    }
}

impl<E> TryFrom<HttpServerConfig<E>> for HttpServerBuilder
where
    E: Endpoint + Send + Sync,
{
    type Error = anyhow::Error;

    fn try_from(value: HttpServerConfig<E>) -> Result<Self, Self::Error> {
        let ip = IpAddr::from_str(&value.bind_addr)
            .with_context(|| format!("invalid bind address: {}", value.bind_addr))?;

        Ok(Self {
            addr: SocketAddr::new(ip, *value.bind_port),
            workers: value.workers,
            request_limit: value.request_limit,
            json_limit: value.json_limit,
            ..Default::default()
        })
    }
}

pub type ConfiguratorFn =
    dyn Fn(&mut utoipa_actix_web::service_config::ServiceConfig) + Send + Sync;

/// Serves the API, with permissive CORS, compression, access logs and the OpenAPI document.
pub struct HttpServerBuilder {
    configurator: Option<Arc<ConfiguratorFn>>,
    addr: SocketAddr,
    workers: usize,
    request_limit: usize,
    json_limit: usize,
    openapi_info: Option<Info>,
}

impl Default for HttpServerBuilder {
    fn default() -> Self {
        Self {
            configurator: None,
            addr: DEFAULT_ADDR,
            workers: 0,
            request_limit: default::request_limit(),
            json_limit: default::json_limit(),
            openapi_info: None,
        }
    }
}

impl HttpServerBuilder {
    pub fn openapi_info(mut self, openapi_info: Info) -> Self {
        self.openapi_info = Some(openapi_info);
        self
    }

    pub fn configure<F>(mut self, configurator: F) -> Self
    where
        F: Fn(&mut utoipa_actix_web::service_config::ServiceConfig) + Send + Sync + 'static,
    {
        self.configurator = Some(Arc::new(configurator));
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            configurator,
            addr,
            workers,
            request_limit,
            json_limit,
            openapi_info,
        } = self;

        log::info!("Request limit: {request_limit} bytes, JSON limit: {json_limit} bytes");

        let mut http = HttpServer::new(move || {
            new_app(AppOptions {
                cors: Some(Cors::permissive()),
                logger: Some(Logger::default()),
            })
            .app_data(JsonConfig::default().limit(json_limit))
            .app_data(web::PayloadConfig::new(request_limit))
            .into_utoipa_app()
            .configure(|svc| {
                if let Some(configurator) = &configurator {
                    configurator(svc);
                }
            })
            .apply_openapi(openapi_info.clone())
        });

        if workers > 0 {
            log::info!("Using {workers} worker(s)");
            http = http.workers(workers);
        }

        log::info!("Binding to: {addr}");
        http.bind(addr)
            .with_context(|| format!("failed to bind: {addr}"))?
            .run()
            .await
            .context("API server failed")
    }
}

pub trait ApplyOpenApi<T> {
    /// Turn a [`UtoipaApp`] into a [`App`] by applying the API spec
    fn apply_openapi(self, openapi_info: Option<Info>) -> App<T>;
}

impl<T> ApplyOpenApi<T> for utoipa_actix_web::UtoipaApp<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    fn apply_openapi(self, openapi_info: Option<Info>) -> App<T> {
        let (app, mut openapi) = self.split_for_parts();
        if let Some(info) = openapi_info {
            openapi.info = info;
        }

        app.service(RapiDoc::with_openapi("/openapi.json", openapi).path("/openapi/"))
            .service(web::redirect("/openapi", "/openapi/"))
    }
}
