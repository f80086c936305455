mod generate;
mod publish;

use super::Args;

use bufpack::engine::{Docker, Engine};
use bufpack::{PackageName, ReferenceError, Registry};
use clap::{Parser, Subcommand};
use config::CONFIG;
use thiserror::Error;

#[derive(Subcommand, Debug)]
pub(super) enum Commands {
    /// Lint a proto package and publish it to a container registry.
    ///
    /// The protos are copied into a `buf` image under the package's path
    /// and linted while the image builds. The image is then pushed as
    /// `<REGISTRY>/<PACKAGE_PATH>:<TAG>`, where the package path is the
    /// package name with every `.` replaced by `/`.
    #[command(verbatim_doc_comment)]
    Publish(publish::Args),
    /// Generate code from a published proto package.
    ///
    /// Runs `buf generate` with the `buf.gen.yaml` of the working
    /// directory against the published package image, and copies the
    /// generated code back into the working directory.
    #[command(verbatim_doc_comment)]
    Generate(generate::Args),
}

/// Arguments locating a package in a registry, shared by every command.
#[derive(Parser, Debug)]
struct PackageArgs {
    /// The container registry packages live in
    ///
    /// Falls back to the `BUFAR_REGISTRY` environment variable, or the
    /// `registry` key of `bufar.toml` in the user's config directory.
    #[arg(long, value_name = "REGISTRY", verbatim_doc_comment)]
    registry: Option<Registry>,

    /// The proto package name, e.g. `mypackage.v1`
    #[arg(long, value_name = "NAME")]
    package: PackageName,
}

#[derive(Error, Debug)]
pub(crate) enum ArgError {
    #[error("No registry given; pass `--registry` or set `BUFAR_REGISTRY`")]
    NoRegistry,
    #[error("Invalid registry in configuration")]
    Registry(#[from] ReferenceError),
}

impl PackageArgs {
    /// The registry flag, or the configured registry when it is absent.
    fn registry(&self, configured: Option<&str>) -> Result<Registry, ArgError> {
        if let Some(registry) = &self.registry {
            return Ok(registry.clone());
        }
        let configured = configured.ok_or(ArgError::NoRegistry)?;
        tracing::debug!(registry = configured, "Using configured registry");
        Ok(configured.parse()?)
    }
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let workdir = args.working_directory()?;
    let engine = Docker::new(CONFIG.engine());
    tracing::debug!(
        engine = engine.program(),
        dir = %workdir.display(),
        "Starting"
    );

    tokio::select! {
        res = dispatch(&engine, &workdir, args.command) => res,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            anyhow::bail!("Interrupted")
        }
    }
}

async fn dispatch<E: Engine>(
    engine: &E,
    workdir: &std::path::Path,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Publish(args) => {
            let image = publish::run(engine, workdir, args, &CONFIG).await?;
            println!("Published proto package: {}", image);
        }
        Commands::Generate(args) => {
            generate::run(engine, workdir, args, &CONFIG).await?;
        }
    }
    Ok(())
}
