//! Error types for design-system reads.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for design-system operations.
pub type DesignSystemResult<T> = Result<T, DesignSystemError>;

/// Errors that can occur while reading the design system.
///
/// Pattern mismatches during extraction are not errors: the affected field
/// falls back to its empty default instead.
#[derive(Debug, Error)]
pub enum DesignSystemError {
    /// The component's main source file does not exist.
    #[error("Component not found: {name}")]
    ComponentNotFound {
        /// Requested component name.
        name: String,
    },

    /// Failed to open or read a file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to list a directory.
    #[error("Failed to list directory: {path}")]
    DirectoryRead {
        /// Path to the directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DesignSystemError {
    /// Creates a component-not-found error.
    pub fn component_not_found(name: impl Into<String>) -> Self {
        Self::ComponentNotFound { name: name.into() }
    }

    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a directory listing error.
    pub fn directory_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error means the named entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ComponentNotFound { .. })
    }

    /// Renders the error together with its underlying cause, if any.
    #[must_use]
    pub fn detailed(&self) -> String {
        match self {
            Self::ComponentNotFound { .. } => self.to_string(),
            Self::FileRead { source, .. } | Self::DirectoryRead { source, .. } => {
                format!("{self} ({source})")
            }
        }
    }
}
