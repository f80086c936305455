#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A dot-delimited proto package name, e.g. `mypackage.v1`.
///
/// Every segment follows the proto identifier grammar: an ASCII letter
/// followed by any number of ASCII letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackageError {
    #[error("A package name cannot be empty")]
    Empty,
    #[error("The package name `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("A package segment must start with an ASCII letter, found '{0}'")]
    InvalidStart(char),
    #[error("The package name contains invalid characters: '{0}'")]
    InvalidCharacters(String),
}

impl PackageName {
    const SEPARATOR: char = '.';

    pub(super) fn validate(s: &str) -> Result<(), PackageError> {
        if s.is_empty() {
            return Err(PackageError::Empty);
        }

        let invalid_chars: String = s
            .chars()
            .filter(|&c| c != PackageName::SEPARATOR && !PackageName::is_valid_char(c))
            .collect();

        if !invalid_chars.is_empty() {
            return Err(PackageError::InvalidCharacters(invalid_chars));
        }

        for segment in s.split(PackageName::SEPARATOR) {
            match segment.chars().next() {
                None => return Err(PackageError::EmptySegment(s.to_owned())),
                Some(c) if !c.is_ascii_alphabetic() => return Err(PackageError::InvalidStart(c)),
                Some(_) => (),
            }
        }

        Ok(())
    }

    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// The slash-delimited path the package occupies, both inside the
    /// published image and under the registry root: `foo.bar.v1` maps to
    /// `foo/bar/v1`.
    pub fn path(&self) -> String {
        self.0.replace(PackageName::SEPARATOR, "/")
    }

    /// The directory that holds the package's sources once copied into an
    /// image. This is the parent of [`PackageName::path`], or the path itself
    /// for a single segment package, so it is never the workspace root.
    pub fn source_root(&self) -> String {
        match self.0.rsplit_once(PackageName::SEPARATOR) {
            Some((parent, _)) => parent.replace(PackageName::SEPARATOR, "/"),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageName {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageName::validate(s)?;
        Ok(PackageName(s.to_string()))
    }
}

impl TryFrom<&str> for PackageName {
    type Error = PackageError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PackageName::from_str(s)
    }
}
