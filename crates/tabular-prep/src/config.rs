//! Configuration types for the preprocessing pipeline.
//!
//! This module provides [`PreprocessingOptions`] and its builder for
//! flexible and ergonomic pipeline setup.

use crate::types::EncodingStrategy;
use serde::{Deserialize, Serialize};

/// Strategy for filling missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Remove every row with a missing value in any profiled column
    Drop,
    /// Numeric columns get their mean
    #[default]
    Mean,
    /// Numeric columns get their median
    Median,
    /// Categorical columns get their most frequent value
    Mode,
    /// Carry the last seen value forward
    ForwardFill,
    /// Numeric columns get the midpoint of their neighbours
    Interpolate,
}

impl MissingValueStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::ForwardFill => "forward_fill",
            Self::Interpolate => "interpolate",
        }
    }
}

/// Strategy for handling outliers in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutlierStrategy {
    /// Remove rows containing outliers
    Remove,
    /// Clamp outliers to the Tukey fences
    #[default]
    Cap,
    /// Apply ln(1 + x) to strongly right-skewed columns
    Transform,
    /// Keep outliers as-is
    Ignore,
}

impl OutlierStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Cap => "cap",
            Self::Transform => "transform",
            Self::Ignore => "ignore",
        }
    }
}

/// Options for a single preprocessing run.
///
/// Use [`PreprocessingOptions::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_prep::config::{PreprocessingOptions, MissingValueStrategy};
///
/// let options = PreprocessingOptions::builder()
///     .handle_missing(MissingValueStrategy::Median)
///     .feature_selection(true)
///     .max_features(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingOptions {
    /// Explicit target column. Must exist in the dataset when set.
    /// Default: None
    pub target_column: Option<String>,

    /// Pick the best-scoring target candidate when no target is given.
    /// Default: true
    pub auto_detect_target: bool,

    /// Missing value strategy.
    /// Default: Mean
    pub handle_missing: MissingValueStrategy,

    /// Outlier strategy.
    /// Default: Cap
    pub handle_outliers: OutlierStrategy,

    /// Encode categorical columns.
    /// Default: true
    pub encode_categorical: bool,

    /// Scale numeric columns.
    /// Default: true
    pub scale_numeric: bool,

    /// Rank features against the target and keep the best ones.
    /// Default: false
    pub feature_selection: bool,

    /// Number of features to keep besides the target.
    /// If None, keeps min(20, available).
    /// Default: None
    pub max_features: Option<usize>,

    /// Force one encoding for every categorical column instead of the
    /// per-column suggestion.
    /// Default: None
    pub categorical_encoding: Option<EncodingStrategy>,

    /// Fill value for numeric columns when a sequential strategy has no
    /// neighbour to copy from.
    /// Default: 0.0
    pub numeric_fill_value: f64,

    /// Fill value for non-numeric columns in the same situation.
    /// Default: "Unknown"
    pub categorical_fill_value: String,
}

impl Default for PreprocessingOptions {
    fn default() -> Self {
        Self {
            target_column: None,
            auto_detect_target: true,
            handle_missing: MissingValueStrategy::default(),
            handle_outliers: OutlierStrategy::default(),
            encode_categorical: true,
            scale_numeric: true,
            feature_selection: false,
            max_features: None,
            categorical_encoding: None,
            numeric_fill_value: 0.0,
            categorical_fill_value: "Unknown".to_string(),
        }
    }
}

impl PreprocessingOptions {
    /// Create a new options builder.
    pub fn builder() -> PreprocessingOptionsBuilder {
        PreprocessingOptionsBuilder::default()
    }

    /// Validate the options and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_features == Some(0) {
            return Err(ConfigValidationError::InvalidMaxFeatures(0));
        }

        if !self.numeric_fill_value.is_finite() {
            return Err(ConfigValidationError::InvalidFillValue(
                self.numeric_fill_value,
            ));
        }

        if let Some(target) = &self.target_column
            && target.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyTargetColumn);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid max_features: {0} (must be at least 1)")]
    InvalidMaxFeatures(usize),

    #[error("Invalid numeric fill value: {0} (must be finite)")]
    InvalidFillValue(f64),

    #[error("Target column name must not be empty")]
    EmptyTargetColumn,
}

/// Builder for [`PreprocessingOptions`] with fluent API.
#[derive(Debug, Default)]
pub struct PreprocessingOptionsBuilder {
    target_column: Option<String>,
    auto_detect_target: Option<bool>,
    handle_missing: Option<MissingValueStrategy>,
    handle_outliers: Option<OutlierStrategy>,
    encode_categorical: Option<bool>,
    scale_numeric: Option<bool>,
    feature_selection: Option<bool>,
    max_features: Option<usize>,
    categorical_encoding: Option<EncodingStrategy>,
    numeric_fill_value: Option<f64>,
    categorical_fill_value: Option<String>,
}

impl PreprocessingOptionsBuilder {
    /// Set an explicit target column.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Enable or disable automatic target detection.
    pub fn auto_detect_target(mut self, enable: bool) -> Self {
        self.auto_detect_target = Some(enable);
        self
    }

    /// Set the missing value strategy.
    pub fn handle_missing(mut self, strategy: MissingValueStrategy) -> Self {
        self.handle_missing = Some(strategy);
        self
    }

    /// Set the outlier strategy.
    pub fn handle_outliers(mut self, strategy: OutlierStrategy) -> Self {
        self.handle_outliers = Some(strategy);
        self
    }

    /// Enable or disable categorical encoding.
    pub fn encode_categorical(mut self, enable: bool) -> Self {
        self.encode_categorical = Some(enable);
        self
    }

    /// Enable or disable numeric scaling.
    pub fn scale_numeric(mut self, enable: bool) -> Self {
        self.scale_numeric = Some(enable);
        self
    }

    /// Enable or disable target-based feature selection.
    pub fn feature_selection(mut self, enable: bool) -> Self {
        self.feature_selection = Some(enable);
        self
    }

    /// Set how many features feature selection keeps.
    pub fn max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Force a single encoding strategy for all categorical columns.
    pub fn categorical_encoding(mut self, strategy: EncodingStrategy) -> Self {
        self.categorical_encoding = Some(strategy);
        self
    }

    /// Set the numeric fallback fill value.
    pub fn numeric_fill_value(mut self, value: f64) -> Self {
        self.numeric_fill_value = Some(value);
        self
    }

    /// Set the categorical fallback fill value.
    pub fn categorical_fill_value(mut self, value: impl Into<String>) -> Self {
        self.categorical_fill_value = Some(value.into());
        self
    }

    /// Build the options.
    ///
    /// Returns validated `PreprocessingOptions` or an error if validation fails.
    pub fn build(self) -> Result<PreprocessingOptions, ConfigValidationError> {
        let defaults = PreprocessingOptions::default();
        let options = PreprocessingOptions {
            target_column: self.target_column,
            auto_detect_target: self.auto_detect_target.unwrap_or(defaults.auto_detect_target),
            handle_missing: self.handle_missing.unwrap_or_default(),
            handle_outliers: self.handle_outliers.unwrap_or_default(),
            encode_categorical: self.encode_categorical.unwrap_or(defaults.encode_categorical),
            scale_numeric: self.scale_numeric.unwrap_or(defaults.scale_numeric),
            feature_selection: self.feature_selection.unwrap_or(defaults.feature_selection),
            max_features: self.max_features,
            categorical_encoding: self.categorical_encoding,
            numeric_fill_value: self.numeric_fill_value.unwrap_or(defaults.numeric_fill_value),
            categorical_fill_value: self
                .categorical_fill_value
                .unwrap_or(defaults.categorical_fill_value),
        };

        options.validate()?;
        Ok(options)
    }
}
