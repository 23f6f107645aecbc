use clap::Parser;
use std::process::{ExitCode, Termination};

mod openapi;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Work with the OpenAPI document
    Openapi(openapi::Run),
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "trustd",
    long_about = None
)]
pub struct Trustd {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten)]
    pub server: trustify_server::Run,
}

impl Trustd {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Openapi(run)) => run.run().await,
            None => self.server.run().await,
        }
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    Trustd::parse().run().await
}
