//! # Code Generation
//!
//! Code is generated by building an image on top of a published package
//! image, with `buf generate` run as a build step. The output is then copied
//! out of a container created from that image, which is never started.
//!
//! Every temporary artifact is released whatever the outcome: the rendered
//! Dockerfile when the flow returns, and the container right after the copy
//! attempt. The `:gen` image itself is kept so later runs can reuse its
//! layers.

use std::path::Path;

use crate::dockerfile::{self, GEN_CONFIG, WORKSPACE};
use crate::engine::Engine;
use crate::error::Error;
use crate::reference::{ImageRef, Registry, Tag};
use crate::scoped::{EphemeralContainer, TempDockerfile};
use crate::PackageName;

/// Name of the temporary Dockerfile written into the working directory.
pub const GENERATE_DOCKERFILE: &str = "Dockerfile.proto_gen";

/// Everything needed to generate code for a single package.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub registry: Registry,
    pub package: PackageName,
    /// Tag of the published image to generate from.
    pub tag: Tag,
}

impl GenerateRequest {
    /// The published image generation starts from.
    pub fn base_image(&self) -> ImageRef {
        ImageRef::new(&self.registry, &self.package, self.tag.clone())
    }

    /// The local image holding the generated code.
    pub fn gen_image(&self) -> ImageRef {
        ImageRef::new(&self.registry, &self.package, Tag::codegen())
    }
}

/// Generates code for the requested package into `workdir`, which must
/// contain a `buf.gen.yaml`. Returns the local image that was built.
#[tracing::instrument(skip_all, fields(package = %request.package))]
pub async fn generate<E: Engine>(
    engine: &E,
    workdir: &Path,
    request: &GenerateRequest,
) -> Result<ImageRef, Error> {
    let config = workdir.join(GEN_CONFIG);
    if !config.is_file() {
        return Err(Error::MissingConfig(config));
    }

    let base = request.base_image();
    let image = request.gen_image();

    let contents = dockerfile::generate(&base, &request.package.source_root());
    let dockerfile = TempDockerfile::write(workdir, GENERATE_DOCKERFILE, &contents)?;

    let args: Vec<String> = vec![
        "buildx".into(),
        "build".into(),
        "--load".into(),
        "-t".into(),
        image.to_string(),
        "-f".into(),
        dockerfile.name().into(),
        ".".into(),
    ];

    tracing::info!(base = %base, image = %image, "Building codegen image");
    engine.run(workdir, &args).await.map_err(Error::Build)?;

    let container = EphemeralContainer::create(engine, workdir, &image).await?;

    let source = format!("{}:{}/.", container.id(), WORKSPACE);
    let copied = engine
        .run(workdir, &["cp".into(), source, ".".into()])
        .await
        .map_err(Error::Extract);

    container.release(engine, workdir).await;
    copied?;

    tracing::info!(dir = %workdir.display(), "Generated code extracted");
    Ok(image)
}
