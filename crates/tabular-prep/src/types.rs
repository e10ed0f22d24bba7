use crate::dataset::Dataset;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Column Classification
// ============================================================================

/// Semantic type of a column. Inferred once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Temporal,
    Boolean,
    Text,
    Id,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Temporal => "temporal",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Id => "id",
        }
    }
}

/// Raw scalar representation observed in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    Number,
    String,
    Boolean,
    Date,
}

/// Secondary classification refining [`ColumnType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Continuous,
    Discrete,
    Ordinal,
    Nominal,
    Datetime,
    Binary,
    Text,
    Identifier,
}

/// Advisory encoding for categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    None,
    Label,
    OneHot,
    /// Reserved: performs no transformation.
    Target,
}

/// Advisory scaling for numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStrategy {
    None,
    Standard,
    MinMax,
    Robust,
}

impl ScalingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::MinMax => "min-max",
            Self::Robust => "robust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    Normal,
    Uniform,
    Skewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Irregular,
}

/// Coarse verdict on whether a dataset can go straight into model training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MlReadiness {
    Ready,
    NeedsCleaning,
    NeedsEngineering,
    NotSuitable,
}

impl MlReadiness {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::NeedsCleaning => "needs cleaning",
            Self::NeedsEngineering => "needs feature engineering",
            Self::NotSuitable => "not suitable",
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub iqr: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub outlier_count: usize,
    pub outlier_percentage: f64,
    /// Tukey fence `q25 - 1.5 * iqr`.
    pub lower_fence: f64,
    /// Tukey fence `q75 + 1.5 * iqr`.
    pub upper_fence: f64,
    pub zero_count: usize,
    pub negative_count: usize,
    pub distribution_type: DistributionType,
}

impl NumericStatistics {
    /// Whether `value` lies outside the Tukey fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_fence || value > self.upper_fence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStatistics {
    pub value_counts: IndexMap<String, usize>,
    pub top_values: Vec<ValueFrequency>,
    pub entropy: f64,
    pub cardinality: usize,
    pub most_frequent: Option<String>,
    pub least_frequent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalStatistics {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub date_range_days: f64,
    pub has_time_component: bool,
    pub frequency: TemporalFrequency,
    /// Reserved; always 0.
    pub gaps_detected: usize,
    pub parsed_count: usize,
}

impl TemporalStatistics {
    pub fn empty() -> Self {
        Self {
            min_date: None,
            max_date: None,
            date_range_days: 0.0,
            has_time_component: false,
            frequency: TemporalFrequency::Irregular,
            gaps_detected: 0,
            parsed_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStatistics {
    Numeric(NumericStatistics),
    Categorical(CategoricalStatistics),
    Temporal(TemporalStatistics),
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub dtype: Dtype,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    pub unique_percentage: f64,
    pub sample_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ColumnStatistics>,
    pub feature_type: FeatureType,
    pub encoding_suggested: EncodingStrategy,
    pub scaling_suggested: ScalingStrategy,
    pub is_target_candidate: bool,
    pub target_score: f64,
}

impl ColumnProfile {
    pub fn numeric_stats(&self) -> Option<&NumericStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Numeric(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn categorical_stats(&self) -> Option<&CategoricalStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Categorical(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn temporal_stats(&self) -> Option<&TemporalStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Temporal(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn is(&self, column_type: ColumnType) -> bool {
        self.column_type == column_type
    }
}

/// Pipeline-wide profiling result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub temporal_columns: usize,
    pub boolean_columns: usize,
    pub text_columns: usize,
    pub id_columns: usize,
    pub column_profiles: IndexMap<String, ColumnProfile>,
    pub data_quality_score: f64,
    pub ml_readiness: MlReadiness,
    pub preprocessing_recommendations: Vec<String>,
}

impl FeatureMetadata {
    pub fn profile(&self, column: &str) -> Option<&ColumnProfile> {
        self.column_profiles.get(column)
    }

    /// Profiles of one type, in column order.
    pub fn profiles_of_type(&self, column_type: ColumnType) -> impl Iterator<Item = &ColumnProfile> {
        self.column_profiles
            .values()
            .filter(move |p| p.column_type == column_type)
    }

    /// Target candidates, best score first.
    pub fn target_candidates(&self) -> Vec<&ColumnProfile> {
        let mut candidates: Vec<&ColumnProfile> = self
            .column_profiles
            .values()
            .filter(|p| p.is_target_candidate)
            .collect();
        candidates.sort_by(|a, b| {
            b.target_score
                .partial_cmp(&a.target_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }
}

// ============================================================================
// Fitted Transformation Parameters
// ============================================================================

/// Parameters of one fitted scaler: `scaled = (x - center) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub column: String,
    pub strategy: ScalingStrategy,
    pub center: f64,
    pub scale: f64,
}

impl ScalingParams {
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.scale + self.center
    }
}

/// Parameters of one fitted categorical encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodingParams {
    Label {
        column: String,
        mapping: IndexMap<String, usize>,
    },
    OneHot {
        column: String,
        categories: Vec<String>,
        output_columns: Vec<String>,
    },
}

impl EncodingParams {
    pub fn column(&self) -> &str {
        match self {
            Self::Label { column, .. } | Self::OneHot { column, .. } => column,
        }
    }
}

// ============================================================================
// Pipeline Result
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingResult {
    pub processed_data: Dataset,
    pub feature_metadata: FeatureMetadata,
    pub transformations_applied: Vec<String>,
    pub cleaning_steps: Vec<String>,
    pub feature_engineering_steps: Vec<String>,
    pub target_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<IndexMap<String, f64>>,
    pub correlation_matrix: IndexMap<String, IndexMap<String, f64>>,
    pub scaling_params: Vec<ScalingParams>,
    pub encoding_params: Vec<EncodingParams>,
    pub summary: PreprocessingSummary,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

// ============================================================================
// Preprocessing Summary Types
// ============================================================================

/// Human-readable summary of what the pipeline did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,

    pub columns_before: usize,
    pub columns_after: usize,

    /// Columns added by feature engineering and one-hot encoding.
    pub columns_added: usize,
    /// Columns removed by encoding or feature selection.
    pub columns_removed: usize,

    /// List of actions taken during preprocessing.
    pub actions: Vec<PreprocessingAction>,
}

impl PreprocessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: PreprocessingAction) {
        self.actions.push(action);
    }

    /// Calculate the percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f64 / self.rows_before as f64) * 100.0
        }
    }
}

/// A single action taken during preprocessing.
///
/// Actions are logged throughout the pipeline execution to provide
/// a typed audit trail alongside the free-text step lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingAction {
    pub action_type: ActionType,
    /// Column name or "dataset".
    pub target: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PreprocessingAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ValueCleaned,
    RowsRemoved,
    ValueImputed,
    OutlierHandled,
    TargetIdentified,
    FeatureCreated,
    CategoriesEncoded,
    DataNormalized,
    FeaturesSelected,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ValueCleaned => "Value Cleaned",
            Self::RowsRemoved => "Rows Removed",
            Self::ValueImputed => "Value Imputed",
            Self::OutlierHandled => "Outlier Handled",
            Self::TargetIdentified => "Target Identified",
            Self::FeatureCreated => "Feature Created",
            Self::CategoriesEncoded => "Categories Encoded",
            Self::DataNormalized => "Data Normalized",
            Self::FeaturesSelected => "Features Selected",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_params_round_trip() {
        let params = ScalingParams {
            column: "x".to_string(),
            strategy: ScalingStrategy::Standard,
            center: 10.0,
            scale: 4.0,
        };
        let scaled = params.transform(18.0);
        assert_eq!(scaled, 2.0);
        assert_eq!(params.inverse_transform(scaled), 18.0);
    }

    #[test]
    fn test_summary_rows_removed_percentage() {
        let mut summary = PreprocessingSummary::new();
        assert_eq!(summary.rows_removed_percentage(), 0.0);
        summary.rows_before = 200;
        summary.rows_removed = 50;
        assert!((summary.rows_removed_percentage() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_action_with_details() {
        let action = PreprocessingAction::new(ActionType::ValueImputed, "age", "Filled 3 values")
            .with_details("mean = 31.50");
        assert_eq!(action.action_type, ActionType::ValueImputed);
        assert_eq!(action.details.as_deref(), Some("mean = 31.50"));
    }

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&EncodingStrategy::OneHot).unwrap(),
            "\"one_hot\""
        );
        assert_eq!(
            serde_json::to_string(&MlReadiness::NeedsEngineering).unwrap(),
            "\"needs_engineering\""
        );
        assert_eq!(
            serde_json::to_string(&ActionType::FeaturesSelected).unwrap(),
            "\"features_selected\""
        );
    }

    #[test]
    fn test_statistics_tagged_serialization() {
        let stats = ColumnStatistics::Temporal(TemporalStatistics::empty());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["kind"], "temporal");
        assert_eq!(json["frequency"], "irregular");
    }

    #[test]
    fn test_encoding_params_column() {
        let params = EncodingParams::OneHot {
            column: "color".to_string(),
            categories: vec!["red".to_string()],
            output_columns: vec!["color_red".to_string()],
        };
        assert_eq!(params.column(), "color");
    }
}
