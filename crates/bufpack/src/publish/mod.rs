//! # Package Publishing
//!
//! Packages are published as container images. The proto sources are copied
//! under the package's path inside a `buf` image, linted as part of the build,
//! and the result is pushed to `{registry}/{package-path}:{tag}` in one
//! `buildx build --push` invocation. A lint failure is a build failure, so an
//! image that fails lint is never pushed.
#[cfg(test)]
mod test;

use std::fs;
use std::path::{Path, PathBuf};

use crate::dockerfile::{self, PACKAGE_DIR_ARG, PROTOS_DIR_ARG};
use crate::engine::Engine;
use crate::error::Error;
use crate::reference::{ImageRef, Registry, Tag};
use crate::scoped::TempDockerfile;
use crate::PackageName;

/// Name of the temporary Dockerfile written into the build context.
pub const PUBLISH_DOCKERFILE: &str = "Dockerfile.proto_pub";

/// Everything needed to publish a single package.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub registry: Registry,
    pub package: PackageName,
    /// Directory holding the package's protos, absolute or relative to the
    /// build context.
    pub protos: PathBuf,
    pub tag: Tag,
}

impl PublishRequest {
    pub fn image(&self) -> ImageRef {
        ImageRef::new(&self.registry, &self.package, self.tag.clone())
    }
}

/// Lints, builds and pushes the package image, returning the reference it
/// was pushed under.
///
/// `context` is the build context and the directory the temporary Dockerfile
/// is written to. The Dockerfile is removed again before returning, whether or
/// not the build succeeded.
#[tracing::instrument(skip_all, fields(package = %request.package))]
pub async fn publish<E: Engine>(
    engine: &E,
    context: &Path,
    request: &PublishRequest,
) -> Result<ImageRef, Error> {
    let protos = protos_dir(context, &request.protos)?;
    let image = request.image();
    let package_dir = request.package.path();

    let dockerfile = TempDockerfile::write(context, PUBLISH_DOCKERFILE, &dockerfile::publish())?;

    let args: Vec<String> = vec![
        "buildx".into(),
        "build".into(),
        "--push".into(),
        "-t".into(),
        image.to_string(),
        "--build-arg".into(),
        format!("{}={}", PROTOS_DIR_ARG, protos),
        "--build-arg".into(),
        format!("{}={}", PACKAGE_DIR_ARG, package_dir),
        "-f".into(),
        dockerfile.name().into(),
        ".".into(),
    ];

    tracing::info!(image = %image, protos = %protos, "Building and pushing package image");
    engine
        .run(context, &args)
        .await
        .map_err(Error::Publish)?;

    tracing::info!(image = %image, "Published proto package");
    Ok(image)
}

/// Resolves `protos` to a `/` separated path relative to `context`, as `COPY`
/// in the Dockerfile expects.
fn protos_dir(context: &Path, protos: &Path) -> Result<String, Error> {
    let joined = context.join(protos);
    if !joined.is_dir() {
        return Err(Error::MissingProtos(protos.to_path_buf()));
    }

    let context = fs::canonicalize(context)?;
    let resolved = fs::canonicalize(&joined)?;
    let relative = resolved
        .strip_prefix(&context)
        .map_err(|_| Error::ProtosOutsideContext {
            protos: protos.to_path_buf(),
            context: context.clone(),
        })?;

    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();

    if parts.is_empty() {
        Ok(".".into())
    } else {
        Ok(parts.join("/"))
    }
}
