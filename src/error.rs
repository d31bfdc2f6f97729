//! Error types for pixpack.
//!
//! Only [`Error::FatalEncode`] aborts a run. Every other variant is scoped to
//! a single file or image: it is handed to the
//! [`ProgressObserver`](crate::progress::ProgressObserver) and the run moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pixpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while packing or unpacking.
#[derive(Error, Debug)]
pub enum Error {
    /// Nothing to encode; raised before any output is produced.
    #[error("Fatal encode error: {0}")]
    FatalEncode(String),

    /// A source file could not be read.
    #[error("Unable to read file {path}: {reason}")]
    FileRead {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// An extracted file could not be written.
    #[error("Failed to create file {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The canvas could not be persisted.
    #[error("Error creating image {path}: {reason}")]
    ImageWrite { path: PathBuf, reason: String },

    /// A candidate image could not be read or decoded.
    #[error("Failed to read image {path}: {reason}")]
    ImageRead { path: PathBuf, reason: String },

    /// Record framing inside a decoded image is malformed.
    #[error("Incorrectly encoded container{}: {reason} (at byte {offset})", image_suffix(.path))]
    CorruptContainer {
        path: Option<PathBuf>,
        offset: usize,
        reason: String,
    },

    /// A file cannot be given a container name.
    #[error("Invalid container name for {path}: {reason}")]
    InvalidName { path: PathBuf, reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error outside of a per-item operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification handed to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FatalEncode,
    FileRead,
    FileWrite,
    ImageWrite,
    ImageRead,
    CorruptContainer,
    InvalidName,
    Config,
    Io,
}

impl ErrorKind {
    /// Whether this kind aborts the whole run.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::FatalEncode)
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FatalEncode(_) => ErrorKind::FatalEncode,
            Error::FileRead { .. } => ErrorKind::FileRead,
            Error::FileWrite { .. } => ErrorKind::FileWrite,
            Error::ImageWrite { .. } => ErrorKind::ImageWrite,
            Error::ImageRead { .. } => ErrorKind::ImageRead,
            Error::CorruptContainer { .. } => ErrorKind::CorruptContainer,
            Error::InvalidName { .. } => ErrorKind::InvalidName,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileRead {
            path: path.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Attach the image path to a corrupt-container error coming out of the parser.
    pub(crate) fn in_image(self, image: &std::path::Path) -> Self {
        match self {
            Error::CorruptContainer { offset, reason, .. } => Error::CorruptContainer {
                path: Some(image.to_path_buf()),
                offset,
                reason,
            },
            other => other,
        }
    }
}

fn image_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
