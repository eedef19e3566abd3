use std::path::PathBuf;

use thiserror::Error;

use crate::load::client::RemoteError;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort a whole extraction or import
/// run. Per-row and per-record problems never surface here; they are logged
/// and collected into the run reports instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the workbook cannot be opened as a zip package.
    #[error("workbook package error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// Raised when one of the workbook XML parts is malformed.
    #[error("workbook XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Raised when the HTTP client cannot be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the store configuration cannot be turned into a client.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the pod anchoring every imported meeting cannot be
    /// created or found.
    #[error("could not create or find the import pod: {0}")]
    PodUnavailable(RemoteError),

    /// Raised by the commitments-only import when no previously imported
    /// users can be resolved.
    #[error("no imported users found in the store; run the full import first")]
    NoImportedUsers,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
