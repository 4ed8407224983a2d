use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for WAD operations
pub type Result<T> = std::result::Result<T, WadError>;

/// Unified error type for all WAD operations
#[derive(Debug, Error)]
pub enum WadError {
    // Archive errors
    #[error("Failed to open {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read archive: {0}")]
    FileRead(String),

    #[error("Cannot seek to offset {offset}")]
    FileSeek { offset: i64 },

    // Build errors
    #[error("Lump source {} is unavailable: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copy mismatch for lump {name}: expected {expected} bytes, copied {actual}")]
    CopyMismatch {
        name: String,
        expected: i64,
        actual: u64,
    },

    #[error("Refusing to overwrite the archive being read: {}", .0.display())]
    SelfOverwrite(PathBuf),

    #[error("Lump {0} lives in the original archive but no archive is loaded")]
    MissingArchive(String),

    #[error("Archive would exceed the 2 GiB offset range at byte {0}")]
    ArchiveTooLarge(u64),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    // Table errors
    #[error("Lump index {index} out of range (table has {len} lumps)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("File {} is too large for a lump: {len} bytes", .path.display())]
    LumpTooLarge { path: PathBuf, len: u64 },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML error: {0}")]
    TomlError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for WadError {
    fn from(err: toml::de::Error) -> Self {
        WadError::TomlError(err.to_string())
    }
}

impl From<toml::ser::Error> for WadError {
    fn from(err: toml::ser::Error) -> Self {
        WadError::TomlError(err.to_string())
    }
}
