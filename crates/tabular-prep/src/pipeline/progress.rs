//! Progress reporting for the preprocessing pipeline.
//!
//! The pipeline emits a [`ProgressUpdate`] when each stage starts and ends,
//! plus a terminal `Complete` or `Failed` update. There is no cancellation:
//! a run is a single synchronous call, so deadlines belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_prep::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&dataset);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of the preprocessing pipeline, in execution order.
///
/// Stages never run backwards; optional stages are reported as skipped
/// rather than omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Profiling the dataset (type inference, statistics)
    Profiling,
    /// Rebuilding rows and coercing values to their column types
    Cleaning,
    /// Filling or dropping missing values
    Imputing,
    /// Removing, capping or transforming outliers
    OutlierHandling,
    /// Choosing the prediction target
    TargetDetection,
    /// Deriving date parts and numeric interactions
    FeatureEngineering,
    /// Encoding categorical columns
    Encoding,
    /// Scaling numeric columns
    Scaling,
    /// Ranking features against the target
    FeatureSelection,
    /// Computing pairwise correlations
    CorrelationMatrix,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Stages that do work, in execution order.
    pub const PROCESSING: [PipelineStage; 10] = [
        Self::Profiling,
        Self::Cleaning,
        Self::Imputing,
        Self::OutlierHandling,
        Self::TargetDetection,
        Self::FeatureEngineering,
        Self::Encoding,
        Self::Scaling,
        Self::FeatureSelection,
        Self::CorrelationMatrix,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Profiling => "Profiling Dataset",
            Self::Cleaning => "Cleaning Data",
            Self::Imputing => "Imputing Values",
            Self::OutlierHandling => "Handling Outliers",
            Self::TargetDetection => "Detecting Target",
            Self::FeatureEngineering => "Engineering Features",
            Self::Encoding => "Encoding Categories",
            Self::Scaling => "Scaling Numeric Columns",
            Self::FeatureSelection => "Selecting Features",
            Self::CorrelationMatrix => "Computing Correlations",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// The weights of the processing stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Profiling => 0.20,
            Self::Cleaning => 0.10,
            Self::Imputing => 0.10,
            Self::OutlierHandling => 0.08,
            Self::TargetDetection => 0.02,
            Self::FeatureEngineering => 0.10,
            Self::Encoding => 0.10,
            Self::Scaling => 0.08,
            Self::FeatureSelection => 0.10,
            Self::CorrelationMatrix => 0.12,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => Self::PROCESSING
                .iter()
                .take_while(|s| *s != stage)
                .map(|s| s.weight())
                .sum(),
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Progress update emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates during preprocessing.
///
/// Implementations must be `Send + Sync` so a host can run the pipeline on a
/// worker thread and forward updates elsewhere.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_prep::{ProgressReporter, ProgressUpdate};
/// use std::sync::mpsc::Sender;
/// use std::sync::Mutex;
///
/// struct ChannelReporter {
///     tx: Mutex<Sender<ProgressUpdate>>,
/// }
///
/// impl ProgressReporter for ChannelReporter {
///     fn report(&self, update: ProgressUpdate) {
///         if let Ok(tx) = self.tx.lock() {
///             tx.send(update).ok();
///         }
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made during preprocessing.
    ///
    /// Implementations should be efficient and non-blocking.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
