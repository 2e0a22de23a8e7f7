use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
};

/// Errors reported while loading triangle data.
///
/// The acceleration structure itself has no recoverable error states: build
/// preconditions are documented on [`crate::Bvh::build`] and violations are
/// programming errors.
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure while reading a mesh file.
    Io(std::io::Error),
    /// A mesh file could not be parsed as whitespace-separated vertex data.
    ParseMesh {
        /// Path of the offending file.
        path: PathBuf,
        /// One-based line number where parsing failed.
        line: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => {
                write!(f, "IO error - {err}")
            }
            Error::ParseMesh { path, line } => {
                write!(
                    f,
                    "Malformed triangle data in {} at line {line}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self { Error::Io(err) }
}
