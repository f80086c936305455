use super::PackageArgs;

use bufpack::engine::Engine;
use bufpack::generate::{self, GenerateRequest};
use bufpack::{ImageRef, Tag};
use clap::Parser;
use config::Config;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
pub(in super::super) struct Args {
    #[command(flatten)]
    package: PackageArgs,

    /// Tag of the published package to generate from
    #[arg(long, default_value_t = Tag::latest())]
    tag: Tag,
}

pub(super) async fn run<E: Engine>(
    engine: &E,
    workdir: &Path,
    args: Args,
    config: &Config,
) -> anyhow::Result<ImageRef> {
    let request = GenerateRequest {
        registry: args.package.registry(config.registry())?,
        package: args.package.package,
        tag: args.tag,
    };
    Ok(generate::generate(engine, workdir, &request).await?)
}
