use crate::{
    health::{CheckResults, Checks, HealthChecks},
    tracing::{init_tracing, LogFormat},
};
use actix_web::{
    http::uri::Builder, middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer,
    Responder,
};
use anyhow::Context;
use futures::future::select_all;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio::signal;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

const DEFAULT_BIND_ADDR: &str = "localhost:9010";

/// Infrastructure
#[derive(Clone, Debug, clap::Args)]
#[command(
    rename_all_env = "SCREAMING_SNAKE_CASE",
    next_help_heading = "Infrastructure"
)]
#[group(id = "infrastructure")]
pub struct InfrastructureConfig {
    /// Enable the infrastructure endpoint
    #[arg(env, long)]
    pub infrastructure_enabled: bool,
    /// Bind addresses of the infrastructure endpoint
    #[arg(long, env, default_value_t = DEFAULT_BIND_ADDR.into())]
    pub infrastructure_bind: String,
    /// Number of workers
    #[arg(long, env, default_value = "1")]
    pub infrastructure_workers: usize,
    /// The format of the log output
    #[arg(long, env, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            infrastructure_enabled: false,
            infrastructure_bind: DEFAULT_BIND_ADDR.into(),
            infrastructure_workers: 1,
            log_format: LogFormat::Compact,
        }
    }
}

pub struct InitContext {
    pub health: Arc<HealthChecks>,
}

pub struct MainContext<T> {
    pub health: Arc<HealthChecks>,
    pub init_data: T,
}

async fn index(req: HttpRequest) -> HttpResponse {
    let conn = req.connection_info();

    let apis = ["/health/live", "/health/ready", "/health/startup"]
        .into_iter()
        .filter_map(|api| {
            Builder::new()
                .authority(conn.host())
                .scheme(conn.scheme())
                .path_and_query(api)
                .build()
                .ok()
                .map(|uri| uri.to_string())
        })
        .collect::<Vec<_>>();

    HttpResponse::Ok().json(apis)
}

async fn startup(health: web::Data<HealthChecks>) -> impl Responder {
    run_checks(&health.startup).await
}

async fn liveness(health: web::Data<HealthChecks>) -> impl Responder {
    run_checks(&health.liveness).await
}

async fn readiness(health: web::Data<HealthChecks>) -> impl Responder {
    run_checks(&health.readiness).await
}

async fn run_checks(checks: &Checks) -> HttpResponse {
    let checks: CheckResults = checks.run().await;

    log::debug!("checks: {checks:?}");

    let mut result = match checks.all_up() {
        true => HttpResponse::Ok(),
        false => HttpResponse::ServiceUnavailable(),
    };

    result.json(checks.results)
}

/// Mount the health endpoints.
pub fn configure_health(svc: &mut web::ServiceConfig, health: Arc<HealthChecks>) {
    svc.app_data(web::Data::from(health))
        .service(web::resource("/").to(index))
        .service(
            web::scope("/health")
                .service(web::resource("/live").to(liveness))
                .service(web::resource("/ready").to(readiness))
                .service(web::resource("/startup").to(startup)),
        );
}

type Task = Pin<Box<dyn Future<Output = anyhow::Result<()>>>>;

pub struct Infrastructure {
    config: InfrastructureConfig,
    health: Arc<HealthChecks>,
}

impl From<InfrastructureConfig> for Infrastructure {
    fn from(config: InfrastructureConfig) -> Self {
        Self {
            config,
            health: Default::default(),
        }
    }
}

impl Infrastructure {
    async fn start_internal(&self) -> anyhow::Result<Task> {
        if !self.config.infrastructure_enabled {
            log::info!("Infrastructure endpoint is disabled");
            return Ok(Box::pin(futures::future::pending()));
        }

        log::info!("Setting up infrastructure endpoint");

        let health = self.health.clone();
        let mut http = HttpServer::new(move || {
            let health = health.clone();
            App::new()
                .wrap(Logger::default())
                .configure(|svc| configure_health(svc, health))
        });

        if self.config.infrastructure_workers > 0 {
            http = http.workers(self.config.infrastructure_workers);
        }

        http = http
            .bind(&self.config.infrastructure_bind)
            .context("Failed to bind infrastructure endpoint")?;

        Ok(Box::pin(async move {
            log::info!("Running infrastructure endpoint on:");
            for (addr, scheme) in http.addrs_with_scheme() {
                log::info!("   {scheme}://{addr}");
            }
            http.run()
                .await
                .context("Failed to run infrastructure endpoint")?;
            Ok::<_, anyhow::Error>(())
        }))
    }

    /// Run the main application with a set of infrastructure services.
    ///
    /// This initializes logging, and, if configured, serves the health endpoints. It then runs
    /// `main` until it exits or the process receives a termination signal. The `init` function
    /// is guaranteed to be executed before the `main` function.
    pub async fn run<I, IFut, M, MFut, D>(
        self,
        id: &'static str,
        init: I,
        main: M,
    ) -> anyhow::Result<()>
    where
        I: FnOnce(InitContext) -> IFut,
        IFut: Future<Output = anyhow::Result<D>>,
        M: FnOnce(MainContext<D>) -> MFut,
        MFut: Future<Output = anyhow::Result<()>> + 'static,
    {
        init_tracing(id, self.config.log_format);

        let init_data = init(InitContext {
            health: self.health.clone(),
        })
        .await?;

        let main: Task = Box::pin(main(MainContext {
            init_data,
            health: self.health.clone(),
        }));
        let runner = self.start_internal().await?;
        let sigint: Task =
            Box::pin(async { signal::ctrl_c().await.context("termination failed") });

        #[allow(unused_mut)]
        let mut tasks = vec![runner, main, sigint];

        #[cfg(unix)]
        {
            let sigterm: Task = Box::pin(async {
                signal(SignalKind::terminate())?.recv().await;
                Ok(())
            });
            tasks.push(sigterm);
        }

        let (result, _index, _others) = select_all(tasks).await;
        result
    }
}
