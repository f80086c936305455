//! # Publishing and Generation Errors
//!
//! Each variant names the stage that failed, so a failure surfaced at the
//! command line says where in the flow it happened. Failures to clean up
//! temporary resources never show up here; they are only logged.
use crate::engine::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The code generation config is missing from the working directory.
    #[error("`{}` not found", .0.display())]
    MissingConfig(PathBuf),
    /// The given protos directory does not exist or is not a directory.
    #[error("The protos directory `{}` does not exist", .0.display())]
    MissingProtos(PathBuf),
    /// The protos directory lies outside the build context.
    #[error("The protos directory `{}` must be inside `{}`", .protos.display(), .context.display())]
    ProtosOutsideContext { protos: PathBuf, context: PathBuf },
    /// Writing the temporary Dockerfile failed.
    #[error("Failed to write {}", .path.display())]
    WriteDockerfile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The lint, build or push of the package image failed.
    #[error("Failed to publish protos")]
    Publish(#[source] EngineError),
    /// Building the code generation image failed.
    #[error("Failed to build codegen container")]
    Build(#[source] EngineError),
    /// Creating the container to extract generated code from failed.
    #[error("Failed to create codegen container")]
    Create(#[source] EngineError),
    /// The engine created a container but did not print its id.
    #[error("Failed to create codegen container: the engine reported no container id")]
    NoContainerId,
    /// Copying `/workspace` out of the container failed.
    #[error("Failed to extract generated code")]
    Extract(#[source] EngineError),
    /// A transparent wrapper for a [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error was raised before any file was written or any
    /// process was started.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingConfig(_) | Error::MissingProtos(_) | Error::ProtosOutsideContext { .. }
        )
    }
}
