//! # Bufpack
//!
//! Distributes protobuf packages as container images and generates code from
//! them, driving an external container engine through the [`engine::Engine`]
//! trait.
//!
//! - [`publish::publish`] lints a package's protos in a `buf` image and
//!   pushes the image to `{registry}/{package-path}:latest`.
//! - [`generate::generate`] builds a code generation image on top of a
//!   published one and copies the generated code into the working directory.
mod id;
mod scoped;

pub mod dockerfile;
pub mod engine;
pub mod error;
pub mod generate;
pub mod publish;
pub mod reference;

pub use error::Error;
pub use id::{PackageError, PackageName};
pub use reference::{ImageRef, ReferenceError, Registry, Tag};
