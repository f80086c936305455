mod commands;
pub mod logging;

pub use commands::run;
pub use logging::init_global_subscriber;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short = 'C', value_name = "DIR", global = true, verbatim_doc_comment, value_parser = validate_path)]

    /// Change the current working directory
    ///
    /// If specified, commands run as if started in the given directory:
    /// it is the build context, the place temporary Dockerfiles are
    /// written to, and where generated code is extracted.
    working_directory: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    command: commands::Commands,
}

#[derive(Parser, Clone, Copy, Debug)]
#[command(next_help_heading = "Log Options")]
pub struct LogArgs {
    /// Set the level of verbosity
    ///
    /// This flag can be used multiple times to increase verbosity:
    ///   -v    for INFO level
    ///   -vv   for DEBUG level
    ///   -vvv  for TRACE level
    ///
    /// If not specified, defaults to WARN level.
    ///
    /// Alternatively, set the `RUST_LOG` environment variable
    /// (e.g., `RUST_LOG=info`), which takes precedence over this flag.
    ///
    /// Note: This flag is silently ignored when `--quiet` is also set.
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
        verbatim_doc_comment
    )]
    verbosity: u8,

    /// Suppress all output except errors
    ///
    /// This flag overrides any verbosity settings and sets the log
    /// level to ERROR. It takes precedence over both the `--verbosity`
    /// flag and the `RUST_LOG` environment variable.
    ///
    /// Output of the container engine itself is not affected.
    #[arg(short, long, global = true, verbatim_doc_comment)]
    quiet: bool,
}

fn validate_path(path: &str) -> Result<PathBuf, std::io::Error> {
    std::fs::canonicalize(path)
}

impl Args {
    /// The directory commands operate in.
    fn working_directory(&self) -> std::io::Result<PathBuf> {
        match &self.working_directory {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}
