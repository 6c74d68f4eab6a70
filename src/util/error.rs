// Cercanos - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Review validation failures are NOT errors; see core::review::ReviewRejection.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Cercanos operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CercanosError {
    /// Roster seeding or mutation failed.
    Roster(RosterError),

    /// Local storage read or write failed.
    Storage(StorageError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CercanosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roster(e) => write!(f, "Roster error: {e}"),
            Self::Storage(e) => write!(f, "Storage error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CercanosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Roster(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Roster errors
// ---------------------------------------------------------------------------

/// Errors related to the professional roster.
#[derive(Debug)]
pub enum RosterError {
    /// Seed dataset JSON could not be parsed.
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Two professionals in the seed dataset share an identifier.
    DuplicateId { id: String },

    /// No professional with this identifier exists.
    NotFound { id: String },

    /// A professional's average rating is off the 0.0-5.0 scale.
    InvalidRating { id: String, rating: f64 },

    /// A seeded review has a star rating outside 1-5.
    InvalidReviewRating {
        id: String,
        review_id: String,
        rating: u8,
    },

    /// I/O error reading a seed file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeedParse { path, source } => {
                write!(f, "Failed to parse roster '{}': {source}", path.display())
            }
            Self::DuplicateId { id } => {
                write!(f, "Duplicate professional ID '{id}' in roster")
            }
            Self::NotFound { id } => write!(f, "No professional with ID '{id}'"),
            Self::InvalidRating { id, rating } => write!(
                f,
                "Professional '{id}' has rating {rating}, expected 0.0 to 5.0"
            ),
            Self::InvalidReviewRating {
                id,
                review_id,
                rating,
            } => write!(
                f,
                "Review '{review_id}' of professional '{id}' has {rating} stars, expected 1 to 5"
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading roster '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SeedParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RosterError> for CercanosError {
    fn from(e: RosterError) -> Self {
        Self::Roster(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors related to the local storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the storage file failed.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// The storage file itself is not a valid JSON string map.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// A stored value could not be decoded into the expected type.
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "Storage I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Json { path, source } => {
                write!(f, "Storage file '{}' is malformed: {source}", path.display())
            }
            Self::Encode { key, source } => {
                write!(f, "Cannot encode value for key '{key}': {source}")
            }
            Self::Decode { key, source } => {
                write!(f, "Cannot decode value stored under key '{key}': {source}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<StorageError> for CercanosError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { target: String, source: io::Error },

    /// CSV serialisation error.
    Csv { target: String, source: csv::Error },

    /// JSON serialisation error.
    Json {
        target: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { target, source } => write!(f, "Export I/O error '{target}': {source}"),
            Self::Csv { target, source } => write!(f, "CSV export error '{target}': {source}"),
            Self::Json { target, source } => write!(f, "JSON export error '{target}': {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for CercanosError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading config.toml.
///
/// Never fatal: `load_config` returns them as warnings alongside defaults,
/// so they are not part of `CercanosError`.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for Cercanos results.
pub type Result<T> = std::result::Result<T, CercanosError>;
