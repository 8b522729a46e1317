//! # Error Types
//!
//! Structured error types for glaze_core. Every failure carries enough
//! context to identify the offending cart item or file without re-running
//! the calculation.
//!
//! ## Example
//!
//! ```rust
//! use glaze_core::errors::{GlazeError, GlazeResult};
//!
//! fn validate_width(width_mm: f64) -> GlazeResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(GlazeError::invalid_parameter(
//!             "M1_Casement_DCurve",
//!             "W",
//!             width_mm.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for glaze_core operations
pub type GlazeResult<T> = Result<T, GlazeError>;

/// Structured error type for estimation operations.
///
/// All calculation-side variants are deterministic input-validation
/// failures: they are raised before any packing work begins where possible,
/// abort the whole run, and are not retryable without correcting the
/// offending cart item.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GlazeError {
    /// A module id string does not name a registered module
    #[error("Unknown module: {module_id}")]
    UnknownModule { module_id: String },

    /// A parameter required by the selected module is absent
    #[error("Module {module_id}: missing required parameter '{field}'")]
    MissingParameter { module_id: String, field: String },

    /// A parameter is present but out of range (non-positive, inconsistent)
    #[error("Module {module_id}: invalid '{field}': {value} - {reason}")]
    InvalidParameter {
        module_id: String,
        field: String,
        value: String,
        reason: String,
    },

    /// A calculation setting is out of range
    #[error("Invalid setting '{field}': {value} - {reason}")]
    InvalidSettings {
        field: String,
        value: String,
        reason: String,
    },

    /// A required profile piece is longer than the stock bar
    #[error("Profile '{profile_name}': piece of {length_mm}mm exceeds stock length {stock_length_mm}mm")]
    PieceTooLong {
        profile_name: String,
        length_mm: f64,
        stock_length_mm: f64,
    },

    /// A glass pane does not fit the stock sheet in any permitted orientation
    #[error("Glass pane {width_mm}x{height_mm}mm does not fit {sheet_width_mm}x{sheet_height_mm}mm sheet")]
    PaneTooLarge {
        width_mm: f64,
        height_mm: f64,
        sheet_width_mm: f64,
        sheet_height_mm: f64,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GlazeError {
    /// Create an UnknownModule error
    pub fn unknown_module(module_id: impl Into<String>) -> Self {
        GlazeError::UnknownModule {
            module_id: module_id.into(),
        }
    }

    /// Create a MissingParameter error
    pub fn missing_parameter(module_id: impl Into<String>, field: impl Into<String>) -> Self {
        GlazeError::MissingParameter {
            module_id: module_id.into(),
            field: field.into(),
        }
    }

    /// Create an InvalidParameter error
    pub fn invalid_parameter(
        module_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GlazeError::InvalidParameter {
            module_id: module_id.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSettings error
    pub fn invalid_settings(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GlazeError::InvalidSettings {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PieceTooLong error
    pub fn piece_too_long(
        profile_name: impl Into<String>,
        length_mm: f64,
        stock_length_mm: f64,
    ) -> Self {
        GlazeError::PieceTooLong {
            profile_name: profile_name.into(),
            length_mm,
            stock_length_mm,
        }
    }

    /// Create a PaneTooLarge error
    pub fn pane_too_large(
        width_mm: f64,
        height_mm: f64,
        sheet_width_mm: f64,
        sheet_height_mm: f64,
    ) -> Self {
        GlazeError::PaneTooLarge {
            width_mm,
            height_mm,
            sheet_width_mm,
            sheet_height_mm,
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GlazeError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        GlazeError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GlazeError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GlazeError::UnknownModule { .. } => "UNKNOWN_MODULE",
            GlazeError::MissingParameter { .. } => "MISSING_PARAMETER",
            GlazeError::InvalidParameter { .. } => "INVALID_PARAMETER",
            GlazeError::InvalidSettings { .. } => "INVALID_SETTINGS",
            GlazeError::PieceTooLong { .. } => "PIECE_TOO_LONG",
            GlazeError::PaneTooLarge { .. } => "PANE_TOO_LARGE",
            GlazeError::FileError { .. } => "FILE_ERROR",
            GlazeError::FileLocked { .. } => "FILE_LOCKED",
            GlazeError::SerializationError { .. } => "SERIALIZATION_ERROR",
            GlazeError::VersionMismatch { .. } => "VERSION_MISMATCH",
            GlazeError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
