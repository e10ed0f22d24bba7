//! Custom error types for the preprocessing pipeline.
//!
//! Structural failures (no input, a stage that could not complete) abort the
//! whole call. Numeric edge cases inside a stage never surface here: the
//! affected column is skipped instead.
//!
//! Errors are serializable so a host service can forward them as
//! `{ "code", "message" }` payloads.

use crate::pipeline::PipelineStage;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessingError {
    /// The dataset had no rows, or its first row had no columns.
    #[error("Dataset is empty: at least one row with one column is required")]
    EmptyInput,

    /// A pipeline stage failed. Carries the warnings and recoverable errors
    /// accumulated before the failure.
    #[error("Preprocessing failed during {stage}: {message}")]
    StageFailed {
        stage: PipelineStage,
        message: String,
        warnings: Vec<String>,
        errors: Vec<String>,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap a stage-internal failure.
    pub(crate) fn stage_failed(
        stage: PipelineStage,
        err: impl std::fmt::Display,
        warnings: &[String],
        errors: &[String],
    ) -> Self {
        PreprocessingError::StageFailed {
            stage,
            message: err.to_string(),
            warnings: warnings.to_vec(),
            errors: errors.to_vec(),
        }
    }

    /// Get error code for host-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::StageFailed { .. } => "PREPROCESSING_FAILED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by empty input.
    pub fn is_empty_input(&self) -> bool {
        match self {
            Self::EmptyInput => true,
            Self::WithContext { source, .. } => source.is_empty_input(),
            _ => false,
        }
    }

    /// Check if the caller can fix the problem and retry (as opposed to a
    /// failure inside the pipeline itself).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::InvalidConfig(_) | Self::ColumnNotFound(_)
        )
    }

    /// Warnings collected before a stage failure, if any.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::StageFailed { warnings, .. } => warnings,
            Self::WithContext { source, .. } => source.warnings(),
            _ => &[],
        }
    }

    /// Recoverable errors recorded before a stage failure, if any.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::StageFailed { errors, .. } => errors,
            Self::WithContext { source, .. } => source.errors(),
            _ => &[],
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PreprocessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PreprocessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessingError::Polars(e).with_context(context))
    }
}
