use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use trustify_server::openapi::create_openapi;

#[derive(clap::Args, Debug)]
pub struct Run {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Write the OpenAPI document to a file
    Export(Export),
}

impl Run {
    pub async fn run(self) -> Result<ExitCode> {
        use Command::*;
        match self.command {
            Export(export) => export.run().await,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct Export {
    /// The file the OpenAPI document should be exported to, as JSON
    #[arg(long, env)]
    pub file: PathBuf,
}

impl Export {
    pub async fn run(self) -> Result<ExitCode> {
        match self.file.file_name() {
            Some(name) if !name.is_empty() => {}
            _ => return Err(anyhow!("Invalid file name: {}", self.file.display())),
        }

        let doc = create_openapi().await?.to_pretty_json()?;
        fs::write(&self.file, doc)?;

        Ok(ExitCode::SUCCESS)
    }
}
