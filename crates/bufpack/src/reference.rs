//! # Image References
//!
//! Types naming where a package's image lives: the [`Registry`] root it is
//! published under, the [`Tag`] distinguishing published from locally built
//! images, and the fully qualified [`ImageRef`] handed to the container engine.
use crate::PackageName;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("A registry cannot be empty")]
    EmptyRegistry,
    #[error("A tag cannot be empty")]
    EmptyTag,
    #[error("A tag cannot be longer than {max} characters, found {0}", max = Tag::MAX_LEN)]
    TagTooLong(usize),
    #[error("A tag cannot start with '{0}'")]
    InvalidTagStart(char),
    #[error("The tag contains invalid characters: '{0}'")]
    InvalidTagCharacters(String),
}

/// The root of a container registry, e.g. `us-docker.pkg.dev/project-foo/registry-bar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry(String);

impl FromStr for Registry {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let root = s.trim().trim_end_matches('/');
        if root.is_empty() {
            return Err(ReferenceError::EmptyRegistry);
        }
        Ok(Registry(root.to_owned()))
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(String);

impl Tag {
    const MAX_LEN: usize = 128;
    const LATEST: &'static str = "latest";
    const GEN: &'static str = "gen";

    /// The tag published packages are pushed under by default.
    pub fn latest() -> Self {
        Tag(Tag::LATEST.into())
    }

    /// The tag of the local-only image that holds generated code.
    pub fn codegen() -> Self {
        Tag(Tag::GEN.into())
    }

    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::latest()
    }
}

impl FromStr for Tag {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next() {
            None => return Err(ReferenceError::EmptyTag),
            Some(c) if c == '.' || c == '-' => return Err(ReferenceError::InvalidTagStart(c)),
            Some(_) => (),
        }

        let invalid_chars: String = s.chars().filter(|&c| !Tag::is_valid_char(c)).collect();
        if !invalid_chars.is_empty() {
            return Err(ReferenceError::InvalidTagCharacters(invalid_chars));
        }

        if s.len() > Tag::MAX_LEN {
            return Err(ReferenceError::TagTooLong(s.len()));
        }

        Ok(Tag(s.to_owned()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully qualified image reference: `{registry}/{package-path}:{tag}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Tag,
}

impl ImageRef {
    pub fn new(registry: &Registry, package: &PackageName, tag: Tag) -> Self {
        ImageRef {
            repository: format!("{}/{}", registry, package.path()),
            tag,
        }
    }

    /// The reference without its tag.
    pub fn repository(&self) -> &str {
        &self.repository
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
