use super::PackageArgs;

use bufpack::engine::Engine;
use bufpack::publish::{self, PublishRequest};
use bufpack::{ImageRef, Tag};
use clap::Parser;
use config::Config;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
pub(in super::super) struct Args {
    #[command(flatten)]
    package: PackageArgs,

    /// Directory holding the package's protos, inside the working directory
    #[arg(long, value_name = "DIR")]
    protos: PathBuf,

    /// Tag to publish the package under
    #[arg(long, default_value_t = Tag::latest())]
    tag: Tag,
}

pub(super) async fn run<E: Engine>(
    engine: &E,
    workdir: &Path,
    args: Args,
    config: &Config,
) -> anyhow::Result<ImageRef> {
    let request = PublishRequest {
        registry: args.package.registry(config.registry())?,
        package: args.package.package,
        protos: args.protos,
        tag: args.tag,
    };
    Ok(publish::publish(engine, workdir, &request).await?)
}
