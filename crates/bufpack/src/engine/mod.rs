//! # Container Engine
//!
//! Every external process this crate starts goes through the [`Engine`] trait,
//! so the flows can be exercised against a recording stub and the production
//! [`Docker`] implementation stays a thin wrapper over the engine's CLI.
//!
//! Invocations are awaited one at a time. Children are spawned with
//! `kill_on_drop`, so dropping an in-flight future (e.g. on Ctrl-C) terminates
//! the child process instead of leaving it running detached.

use std::future::Future;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be started at all.
    #[error("Failed to execute `{program}`, is it installed and in PATH?")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The engine ran but reported failure.
    #[error("`{command}` {}", describe_exit(.code))]
    Status { command: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".into(),
    }
}

/// A container engine CLI, e.g. `docker`.
pub trait Engine {
    /// Runs the engine with `args` in `dir`, forwarding its stdout and stderr
    /// to ours, and waits for it to exit successfully.
    fn run(&self, dir: &Path, args: &[String]) -> impl Future<Output = Result<(), EngineError>>;

    /// Runs the engine with `args` in `dir` and returns everything it wrote to
    /// stdout. Stderr is forwarded.
    fn output(
        &self,
        dir: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<String, EngineError>>;
}

/// The [`Engine`] backed by a docker compatible CLI.
#[derive(Debug, Clone)]
pub struct Docker {
    program: String,
}

impl Docker {
    pub fn new(program: impl Into<String>) -> Self {
        Docker {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, dir: &Path, args: &[String]) -> Command {
        tracing::debug!(
            dir = %dir.display(),
            "Running: {} {}",
            self.program,
            args.join(" ")
        );
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: io::Error) -> EngineError {
        EngineError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn check(&self, args: &[String], status: ExitStatus) -> Result<(), EngineError> {
        if status.success() {
            return Ok(());
        }
        Err(EngineError::Status {
            command: command_line(&self.program, args),
            code: status.code(),
        })
    }
}

impl Engine for Docker {
    async fn run(&self, dir: &Path, args: &[String]) -> Result<(), EngineError> {
        let status = self
            .command(dir, args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        self.check(args, status)
    }

    async fn output(&self, dir: &Path, args: &[String]) -> Result<String, EngineError> {
        let output = self
            .command(dir, args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        self.check(args, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A shortened command line for error messages: the program and its
/// arguments up to the first flag.
fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(
            args.iter()
                .map(String::as_str)
                .take_while(|arg| !arg.starts_with('-')),
        )
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn command_line_stops_at_flags() {
        let build = args(&["buildx", "build", "--push", "-t", "example.com/reg/foo:latest", "."]);
        assert_eq!(command_line("docker", &build), "docker buildx build");
        assert_eq!(
            command_line("docker", &args(&["rm", "-v", "abc"])),
            "docker rm"
        );
        assert_eq!(
            command_line("podman", &args(&["create", "example.com/reg/foo:gen"])),
            "podman create example.com/reg/foo:gen"
        );
    }

    #[test]
    fn status_messages() {
        let failed = EngineError::Status {
            command: "docker cp".into(),
            code: Some(1),
        };
        assert_eq!(failed.to_string(), "`docker cp` exited with status 1");

        let killed = EngineError::Status {
            command: "docker cp".into(),
            code: None,
        };
        assert_eq!(killed.to_string(), "`docker cp` was terminated by a signal");
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let engine = Docker::new("bufar-test-engine-that-does-not-exist");

        let err = engine.run(dir.path(), &args(&["version"])).await;
        assert!(matches!(err, Err(EngineError::Spawn { .. })));

        let err = engine.output(dir.path(), &args(&["version"])).await;
        assert!(matches!(err, Err(EngineError::Spawn { .. })));
        Ok(())
    }
}
