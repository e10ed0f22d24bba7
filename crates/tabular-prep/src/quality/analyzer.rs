use crate::types::{ColumnType, FeatureMetadata, MlReadiness};
use serde::{Deserialize, Serialize};

/// Columns missing more than this share of values cost the dataset points.
const HIGH_MISSING_PERCENTAGE: f64 = 50.0;
/// Numeric columns with more than this share of outliers cost points.
const HIGH_OUTLIER_PERCENTAGE: f64 = 10.0;
/// Categorical columns above this cardinality get a grouping hint.
const HIGH_CARDINALITY: usize = 10;

const MISSING_PENALTY: f64 = 20.0;
const OUTLIER_PENALTY: f64 = 10.0;

/// Outcome of a quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: f64,
    pub readiness: MlReadiness,
    pub recommendations: Vec<String>,
}

pub struct QualityAssessor;

impl QualityAssessor {
    /// Score the dataset, classify its ML readiness and list recommendations.
    ///
    /// Only reads the column profiles; `data_quality_score`, `ml_readiness`
    /// and `preprocessing_recommendations` on the input are ignored.
    pub fn assess(metadata: &FeatureMetadata) -> QualityAssessment {
        let score = Self::quality_score(metadata);
        let readiness = Self::readiness(score, metadata);
        let recommendations = Self::recommendations(metadata, readiness);

        QualityAssessment {
            score,
            readiness,
            recommendations,
        }
    }

    fn quality_score(metadata: &FeatureMetadata) -> f64 {
        let mut score: f64 = 100.0;

        for profile in metadata.column_profiles.values() {
            if profile.null_percentage > HIGH_MISSING_PERCENTAGE {
                score -= MISSING_PENALTY;
            }
            if let Some(stats) = profile.numeric_stats()
                && stats.outlier_percentage > HIGH_OUTLIER_PERCENTAGE
            {
                score -= OUTLIER_PENALTY;
            }
        }

        score.max(0.0)
    }

    fn readiness(score: f64, metadata: &FeatureMetadata) -> MlReadiness {
        if score < 50.0 {
            MlReadiness::NotSuitable
        } else if score < 70.0 {
            MlReadiness::NeedsCleaning
        } else if metadata.numeric_columns == 0 && metadata.categorical_columns == 0 {
            MlReadiness::NeedsEngineering
        } else {
            MlReadiness::Ready
        }
    }

    fn recommendations(metadata: &FeatureMetadata, readiness: MlReadiness) -> Vec<String> {
        let mut recommendations = Vec::new();

        for profile in metadata.column_profiles.values() {
            let name = &profile.name;

            if profile.null_percentage > HIGH_MISSING_PERCENTAGE {
                recommendations.push(format!(
                    "Column '{}' is {:.1}% missing; consider dropping it or imputing carefully",
                    name, profile.null_percentage
                ));
            }

            match profile.column_type {
                ColumnType::Numeric => {
                    if let Some(stats) = profile.numeric_stats() {
                        if stats.outlier_percentage > HIGH_OUTLIER_PERCENTAGE {
                            recommendations.push(format!(
                                "Column '{}' has {:.1}% outliers; consider capping or removing them",
                                name, stats.outlier_percentage
                            ));
                        }
                        if stats.skewness.abs() > 1.0 {
                            recommendations.push(format!(
                                "Column '{}' is skewed ({:.2}); a log transform may help",
                                name, stats.skewness
                            ));
                        }
                    }
                }
                ColumnType::Categorical if profile.unique_count > HIGH_CARDINALITY => {
                    recommendations.push(format!(
                        "Column '{}' has {} categories; consider target encoding or grouping rare values",
                        name, profile.unique_count
                    ));
                }
                ColumnType::Temporal => {
                    recommendations.push(format!(
                        "Extract date parts (year, month, day of week) from '{}'",
                        name
                    ));
                }
                ColumnType::Id => {
                    recommendations.push(format!(
                        "Exclude identifier column '{}' from modelling",
                        name
                    ));
                }
                ColumnType::Text => {
                    recommendations.push(format!(
                        "Column '{}' holds free text; consider NLP feature extraction",
                        name
                    ));
                }
                _ => {}
            }
        }

        recommendations.push(match readiness {
            MlReadiness::Ready => "Dataset is ready for model training".to_string(),
            MlReadiness::NeedsCleaning => {
                "Dataset needs cleaning before model training".to_string()
            }
            MlReadiness::NeedsEngineering => {
                "Dataset has no numeric or categorical features; feature engineering is required"
                    .to_string()
            }
            MlReadiness::NotSuitable => {
                "Dataset quality is too low for reliable model training".to_string()
            }
        });

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    fn metadata_for(value: serde_json::Value) -> FeatureMetadata {
        DataProfiler::extract_feature_metadata(&Dataset::from_json(value).unwrap()).unwrap()
    }

    #[test]
    fn test_clean_dataset_is_ready() {
        let metadata = metadata_for(json!([
            {"height": 1.5, "color": "red"},
            {"height": 1.7, "color": "blue"},
            {"height": 1.6, "color": "red"}
        ]));
        let assessment = QualityAssessor::assess(&metadata);
        assert_eq!(assessment.score, 100.0);
        assert_eq!(assessment.readiness, MlReadiness::Ready);
        assert_eq!(
            assessment.recommendations.last().map(String::as_str),
            Some("Dataset is ready for model training")
        );
    }

    #[test]
    fn test_missing_columns_lower_score() {
        let metadata = metadata_for(json!([
            {"a": 1, "b": null, "c": null},
            {"a": 2, "b": null, "c": null},
            {"a": 3, "b": "x", "c": null}
        ]));
        let assessment = QualityAssessor::assess(&metadata);
        assert_eq!(assessment.score, 60.0);
        assert_eq!(assessment.readiness, MlReadiness::NeedsCleaning);
        assert!(assessment.recommendations[0].contains("'b'"));
    }

    #[test]
    fn test_score_floors_at_zero() {
        let row: serde_json::Map<String, serde_json::Value> = (0..6)
            .map(|i| (format!("col{i}"), serde_json::Value::Null))
            .collect();
        let metadata = metadata_for(json!([row.clone(), row]));
        let assessment = QualityAssessor::assess(&metadata);
        assert_eq!(assessment.score, 0.0);
        assert_eq!(assessment.readiness, MlReadiness::NotSuitable);
    }

    #[test]
    fn test_only_temporal_needs_engineering() {
        let metadata = metadata_for(json!([
            {"created_date": "2024-01-01", "flag": true},
            {"created_date": "2024-01-02", "flag": false}
        ]));
        let assessment = QualityAssessor::assess(&metadata);
        assert_eq!(assessment.readiness, MlReadiness::NeedsEngineering);
        assert!(
            assessment
                .recommendations
                .iter()
                .any(|r| r.contains("Extract date parts"))
        );
    }
}
