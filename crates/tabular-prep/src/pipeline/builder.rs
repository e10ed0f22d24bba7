//! Main preprocessing pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the data preprocessing workflow.

use crate::cleaner::DataCleaner;
use crate::config::PreprocessingOptions;
use crate::dataset::Dataset;
use crate::error::{PreprocessingError, Result};
use crate::features::{
    CategoricalEncoder, FeatureEngineer, FeatureSelector, NumericScaler, correlation_matrix,
};
use crate::imputers::MissingValueImputer;
use crate::pipeline::OutlierHandler;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{DataProfiler, detect_target_column};
use crate::types::{
    ActionType, PreprocessingAction, PreprocessingResult, PreprocessingSummary,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Share of removed rows above which the run carries a data-loss warning.
const HIGH_ROW_LOSS_PERCENT: f64 = 30.0;

/// The main preprocessing pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom options.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_prep::{Pipeline, PreprocessingOptions, MissingValueStrategy};
///
/// let options = PreprocessingOptions::builder()
///     .handle_missing(MissingValueStrategy::Median)
///     .feature_selection(true)
///     .build()?;
///
/// let result = Pipeline::builder()
///     .options(options)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(&dataset)?;
/// ```
pub struct Pipeline {
    options: PreprocessingOptions,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    imputer: MissingValueImputer,
    encoder: CategoricalEncoder,
}

// A host may build a pipeline once and share it across worker threads
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

/// Mutable state threaded through one run.
#[derive(Default)]
struct RunState {
    transformations: Vec<String>,
    cleaning_steps: Vec<String>,
    feature_engineering_steps: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    summary: PreprocessingSummary,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &PreprocessingOptions {
        &self.options
    }

    /// Run every stage over `dataset`.
    ///
    /// The input is never modified. A terminal `Complete` or `Failed`
    /// progress update is always emitted.
    ///
    /// # Errors
    ///
    /// `EmptyInput` when there is nothing to profile, `ColumnNotFound` when
    /// the explicit target does not exist, `StageFailed` when a stage could
    /// not complete.
    pub fn process(&self, dataset: &Dataset) -> Result<PreprocessingResult> {
        match self.process_internal(dataset) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Preprocessing complete: {} rows x {} columns",
                    result.summary.rows_after, result.summary.columns_after
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    /// Run one stage, bracketing it with progress updates and mapping its
    /// failure into [`PreprocessingError::StageFailed`].
    fn run_stage<T>(
        &self,
        stage: PipelineStage,
        state: &RunState,
        f: impl FnOnce() -> anyhow::Result<T>,
    ) -> Result<T> {
        self.report_progress(ProgressUpdate::new(
            stage,
            0.0,
            format!("{}...", stage.display_name()),
        ));
        let output = f().map_err(|e| {
            PreprocessingError::stage_failed(stage, e, &state.warnings, &state.errors)
        })?;
        self.report_progress(ProgressUpdate::new(
            stage,
            1.0,
            format!("{} complete", stage.display_name()),
        ));
        Ok(output)
    }

    fn skip_stage(&self, stage: PipelineStage, reason: &str) {
        debug!(%stage, reason, "Stage skipped");
        self.report_progress(ProgressUpdate::new(
            stage,
            1.0,
            format!("{} skipped ({})", stage.display_name(), reason),
        ));
    }

    fn process_internal(&self, dataset: &Dataset) -> Result<PreprocessingResult> {
        let start_time = Instant::now();
        let options = &self.options;
        let mut state = RunState::default();

        info!("Starting preprocessing pipeline...");

        // Step 1: Profile the raw dataset
        info!("Step 1: Profiling dataset...");
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Profiling,
            0.0,
            "Profiling dataset...",
        ));
        let metadata = DataProfiler::extract_feature_metadata(dataset)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Profiling,
            1.0,
            format!("Profiled {} columns", metadata.total_columns),
        ));

        state.summary.rows_before = dataset.len();
        state.summary.columns_before = metadata.total_columns;
        let columns_before: Vec<String> = metadata.column_profiles.keys().cloned().collect();

        // Step 2: Clean and coerce values
        info!("Step 2: Cleaning data...");
        let (data, steps) = self.run_stage(PipelineStage::Cleaning, &state, || {
            self.cleaner.clean(dataset, &metadata)
        })?;
        for step in steps.iter().filter(|s| s.contains("converted")) {
            state.summary.add_action(PreprocessingAction::new(
                ActionType::ValueCleaned,
                "dataset",
                step.clone(),
            ));
        }
        state.cleaning_steps.extend(steps);

        // Step 3: Missing values
        info!("Step 3: Handling missing values ({})", options.handle_missing.as_str());
        let rows_before_imputation = data.len();
        let (data, steps) = self.run_stage(PipelineStage::Imputing, &state, || {
            self.imputer.impute(&data, &metadata)
        })?;
        let dropped = rows_before_imputation - data.len();
        if dropped > 0 {
            state.summary.add_action(PreprocessingAction::new(
                ActionType::RowsRemoved,
                "dataset",
                format!("Dropped {} rows with missing values", dropped),
            ));
        } else {
            for step in &steps {
                state.summary.add_action(PreprocessingAction::new(
                    ActionType::ValueImputed,
                    "dataset",
                    step.clone(),
                ));
            }
        }
        state.cleaning_steps.extend(steps);

        // Step 4: Outliers
        info!("Step 4: Handling outliers ({})", options.handle_outliers.as_str());
        let (data, steps) = self.run_stage(PipelineStage::OutlierHandling, &state, || {
            OutlierHandler::handle_outliers(&data, &metadata, options.handle_outliers)
        })?;
        for step in &steps {
            state.summary.add_action(PreprocessingAction::new(
                ActionType::OutlierHandled,
                "dataset",
                step.clone(),
            ));
        }
        state.cleaning_steps.extend(steps);

        // Step 5: Target
        info!("Step 5: Detecting target column...");
        let target_column = match &options.target_column {
            Some(column) if metadata.profile(column).is_none() => {
                return Err(PreprocessingError::ColumnNotFound(column.clone()));
            }
            Some(column) => Some(column.clone()),
            None if options.auto_detect_target => {
                detect_target_column(metadata.column_profiles.values())
            }
            None => None,
        };
        match &target_column {
            Some(target) => {
                state
                    .transformations
                    .push(format!("Identified target column '{}'", target));
                state.summary.add_action(PreprocessingAction::new(
                    ActionType::TargetIdentified,
                    target.as_str(),
                    format!("Identified target column: {}", target),
                ));
            }
            None => debug!("No target column"),
        }
        self.report_progress(ProgressUpdate::new(
            PipelineStage::TargetDetection,
            1.0,
            match &target_column {
                Some(target) => format!("Target: {}", target),
                None => "No target column".to_string(),
            },
        ));

        // Step 6: Derived features
        info!("Step 6: Engineering features...");
        let (data, steps) = self.run_stage(PipelineStage::FeatureEngineering, &state, || {
            FeatureEngineer::engineer(&data, &metadata)
        })?;
        for step in &steps {
            state.summary.add_action(PreprocessingAction::new(
                ActionType::FeatureCreated,
                "dataset",
                step.clone(),
            ));
        }
        state.feature_engineering_steps.extend(steps);

        // Step 7: Categorical encoding
        let (data, encoding_params) = if options.encode_categorical {
            info!("Step 7: Encoding categorical columns...");
            let encoder = self.encoder.clone().excluding(target_column.as_deref());
            let (data, steps, params) = self.run_stage(PipelineStage::Encoding, &state, || {
                encoder.encode(&data, &metadata)
            })?;
            for encoded in &params {
                state.summary.add_action(PreprocessingAction::new(
                    ActionType::CategoriesEncoded,
                    encoded.column(),
                    format!("Encoded '{}'", encoded.column()),
                ));
            }
            state.transformations.extend(steps);
            (data, params)
        } else {
            self.skip_stage(PipelineStage::Encoding, "disabled");
            (data, Vec::new())
        };

        // Step 8: Numeric scaling
        let (data, scaling_params) = if options.scale_numeric {
            info!("Step 8: Scaling numeric columns...");
            let (data, steps, params) = self.run_stage(PipelineStage::Scaling, &state, || {
                NumericScaler::scale(&data, &metadata)
            })?;
            for scaled in &params {
                state.summary.add_action(
                    PreprocessingAction::new(
                        ActionType::DataNormalized,
                        scaled.column.as_str(),
                        format!("Applied {} scaling", scaled.strategy.as_str()),
                    )
                    .with_details(format!("center = {:.4}, scale = {:.4}", scaled.center, scaled.scale)),
                );
            }
            state.transformations.extend(steps);
            (data, params)
        } else {
            self.skip_stage(PipelineStage::Scaling, "disabled");
            (data, Vec::new())
        };

        // Step 9: Feature selection
        let (data, feature_importance) = match (&target_column, options.feature_selection) {
            (_, false) => {
                self.skip_stage(PipelineStage::FeatureSelection, "disabled");
                (data, None)
            }
            (None, true) => {
                let message = "Feature selection requested but no target column is available; skipped";
                warn!("{}", message);
                state.warnings.push(message.to_string());
                self.skip_stage(PipelineStage::FeatureSelection, "no target");
                (data, None)
            }
            (Some(target), true) if !data.all_columns().contains(target) => {
                let message = format!(
                    "Target column '{}' is no longer present; feature selection skipped",
                    target
                );
                warn!("{}", message);
                state.errors.push(message);
                self.skip_stage(PipelineStage::FeatureSelection, "target missing");
                (data, None)
            }
            (Some(target), true) => {
                info!("Step 9: Selecting features against '{}'...", target);
                let selection = self.run_stage(PipelineStage::FeatureSelection, &state, || {
                    FeatureSelector::select(&data, target, options.max_features)
                })?;
                let description = format!(
                    "Selected {} features by correlation with '{}'",
                    selection.selected.len(),
                    target
                );
                state.summary.add_action(
                    PreprocessingAction::new(ActionType::FeaturesSelected, target.as_str(), &description)
                        .with_details(format!("dropped: {}", selection.dropped.join(", "))),
                );
                state.transformations.push(description);
                (selection.dataset, Some(selection.importance))
            }
        };

        // Step 10: Correlations
        info!("Step 10: Computing correlation matrix...");
        let correlations = self.run_stage(PipelineStage::CorrelationMatrix, &state, || {
            Ok(correlation_matrix(&data))
        })?;

        // Finalize summary
        let columns_after = data.all_columns();
        let summary = &mut state.summary;
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.rows_after = data.len();
        summary.rows_removed = summary.rows_before.saturating_sub(summary.rows_after);
        summary.columns_after = columns_after.len();
        summary.columns_added = columns_after
            .iter()
            .filter(|c| !columns_before.contains(c))
            .count();
        summary.columns_removed = columns_before
            .iter()
            .filter(|c| !columns_after.contains(c))
            .count();

        if summary.rows_removed_percentage() > HIGH_ROW_LOSS_PERCENT {
            let message = format!(
                "High data loss: {:.1}% of rows were removed",
                summary.rows_removed_percentage()
            );
            warn!("{}", message);
            state.warnings.push(message);
        }

        info!(
            rows = state.summary.rows_after,
            columns = state.summary.columns_after,
            duration_ms = state.summary.duration_ms,
            "Preprocessing finished"
        );

        Ok(PreprocessingResult {
            processed_data: data,
            feature_metadata: metadata,
            transformations_applied: state.transformations,
            cleaning_steps: state.cleaning_steps,
            feature_engineering_steps: state.feature_engineering_steps,
            target_column,
            feature_importance,
            correlation_matrix: correlations,
            scaling_params,
            encoding_params,
            summary: state.summary,
            warnings: state.warnings,
            errors: state.errors,
        })
    }
}

/// Builder for creating a [`Pipeline`] with custom options.
#[derive(Default)]
pub struct PipelineBuilder {
    options: Option<PreprocessingOptions>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the preprocessing options.
    pub fn options(mut self, options: PreprocessingOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns `InvalidConfig` if the options do not validate.
    pub fn build(self) -> Result<Pipeline> {
        let options = self.options.unwrap_or_default();
        options
            .validate()
            .map_err(|e| PreprocessingError::InvalidConfig(e.to_string()))?;

        let imputer = MissingValueImputer::new(
            options.handle_missing,
            options.numeric_fill_value,
            options.categorical_fill_value.clone(),
        );
        let encoder = CategoricalEncoder::new(options.categorical_encoding);

        Ok(Pipeline {
            options,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
            imputer,
            encoder,
        })
    }
}
