//! # Scoped Temporary Resources
//!
//! Guards for the artifacts a flow creates on the way to its result: the
//! rendered Dockerfile and the never-started container generated code is
//! copied out of. Both are released on every exit path. Release failures are
//! logged with enough detail to clean up by hand and are never returned.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::Engine;
use crate::error::Error;
use crate::reference::ImageRef;

/// A Dockerfile written into the build context, removed again on drop.
#[derive(Debug)]
pub struct TempDockerfile {
    name: &'static str,
    path: PathBuf,
}

impl TempDockerfile {
    pub fn write(dir: &Path, name: &'static str, contents: &str) -> Result<Self, Error> {
        let path = dir.join(name);
        let wrap = |source| Error::WriteDockerfile {
            path: path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&path).map_err(wrap)?;
        // from here on the file exists, so hand ownership to the guard before
        // anything else can fail
        let guard = TempDockerfile {
            name,
            path: path.clone(),
        };
        file.write_all(contents.as_bytes()).map_err(wrap)?;

        tracing::debug!(path = %path.display(), "Wrote temporary Dockerfile");
        Ok(guard)
    }

    /// The file name, relative to the build context.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDockerfile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temporary Dockerfile"),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove {}; please remove manually",
                self.name
            ),
        }
    }
}

/// A container created, but never started, from an image so files can be
/// copied out of it.
///
/// Call [`EphemeralContainer::release`] to remove it. A container dropped
/// without being released, e.g. because the flow was cancelled, is reported
/// so it can be removed by hand.
#[derive(Debug)]
pub struct EphemeralContainer {
    id: String,
    released: bool,
}

impl EphemeralContainer {
    pub async fn create<E: Engine>(
        engine: &E,
        dir: &Path,
        image: &ImageRef,
    ) -> Result<Self, Error> {
        let out = engine
            .output(dir, &["create".into(), image.to_string()])
            .await
            .map_err(Error::Create)?;

        // the id is the last line printed; pull progress may precede it
        let id = out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .ok_or(Error::NoContainerId)?;

        tracing::debug!(container = %id, image = %image, "Created codegen container");
        Ok(EphemeralContainer {
            id: id.to_owned(),
            released: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Removes the container along with its anonymous volumes.
    pub async fn release<E: Engine>(mut self, engine: &E, dir: &Path) {
        let args = ["rm".into(), "-v".into(), self.id.clone()];
        match engine.run(dir, &args).await {
            Ok(()) => tracing::debug!(container = %self.id, "Removed codegen container"),
            Err(e) => tracing::error!(
                container = %self.id,
                error = %e,
                "Failed to remove codegen container; please remove manually"
            ),
        }
        self.released = true;
    }
}

impl Drop for EphemeralContainer {
    fn drop(&mut self) {
        if !self.released {
            tracing::error!(
                container = %self.id,
                "Codegen container was not removed; please remove manually"
            );
        }
    }
}
