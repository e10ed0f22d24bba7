//! Plain-text dataset summary for prompts and terminals.

use crate::dataset::Dataset;
use crate::types::{ColumnProfile, ColumnStatistics, FeatureMetadata};

/// Number of target candidates listed in the summary.
const MAX_LISTED_CANDIDATES: usize = 5;

/// Render a multi-line summary of a dataset and its profile.
///
/// Sections: shape, quality and readiness, per-type counts, one line per
/// column, target candidates and recommendations. Pure formatting; the
/// dataset is only read for its shape.
pub fn generate_data_summary(dataset: &Dataset, metadata: &FeatureMetadata) -> String {
    let mut lines = vec![
        "Dataset Summary".to_string(),
        "===============".to_string(),
        format!("Rows: {}", dataset.len()),
        format!("Columns: {}", metadata.total_columns),
        format!(
            "Data quality score: {:.1}/100 ({})",
            metadata.data_quality_score,
            metadata.ml_readiness.display_name()
        ),
        String::new(),
        "Column types:".to_string(),
    ];

    lines.extend(
        [
            ("numeric", metadata.numeric_columns),
            ("categorical", metadata.categorical_columns),
            ("temporal", metadata.temporal_columns),
            ("boolean", metadata.boolean_columns),
            ("text", metadata.text_columns),
            ("id", metadata.id_columns),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("  - {}: {}", label, count)),
    );

    lines.push(String::new());
    lines.push("Columns:".to_string());
    lines.extend(
        metadata
            .column_profiles
            .values()
            .map(|profile| format!("  - {}", column_line(profile))),
    );

    let candidates = metadata.target_candidates();
    if !candidates.is_empty() {
        lines.push(String::new());
        lines.push("Target candidates:".to_string());
        lines.extend(
            candidates
                .iter()
                .take(MAX_LISTED_CANDIDATES)
                .map(|profile| format!("  - {} (score {:.0})", profile.name, profile.target_score)),
        );
    }

    if !metadata.preprocessing_recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        lines.extend(
            metadata
                .preprocessing_recommendations
                .iter()
                .map(|recommendation| format!("  - {}", recommendation)),
        );
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn column_line(profile: &ColumnProfile) -> String {
    let mut line = format!(
        "{} [{}]: {:.1}% missing, {} unique",
        profile.name,
        profile.column_type.as_str(),
        profile.null_percentage,
        profile.unique_count
    );

    match &profile.statistics {
        Some(ColumnStatistics::Numeric(stats)) => {
            line.push_str(&format!(
                ", mean {:.2}, median {:.2}, std {:.2}, range [{:.2}, {:.2}]",
                stats.mean, stats.median, stats.std, stats.min, stats.max
            ));
            if stats.outlier_count > 0 {
                line.push_str(&format!(", {} outliers", stats.outlier_count));
            }
        }
        Some(ColumnStatistics::Categorical(stats)) => {
            if let Some(top) = &stats.most_frequent {
                line.push_str(&format!(", most frequent '{}'", top));
            }
            line.push_str(&format!(", entropy {:.2}", stats.entropy));
        }
        Some(ColumnStatistics::Temporal(stats)) => {
            if let (Some(min), Some(max)) = (&stats.min_date, &stats.max_date) {
                line.push_str(&format!(", {} to {}", min, max));
            }
            line.push_str(&format!(", {:?} frequency", stats.frequency));
        }
        None => {}
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    #[test]
    fn test_summary_sections() {
        let dataset = Dataset::from_json(json!([
            {"city": "Oslo", "price": 100},
            {"city": "Bergen", "price": 150},
            {"city": "Oslo", "price": 200}
        ]))
        .unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let summary = generate_data_summary(&dataset, &metadata);

        assert!(summary.contains("Rows: 3"));
        assert!(summary.contains("Columns: 2"));
        assert!(summary.contains("price [numeric]"));
        assert!(summary.contains("city [categorical]"));
        assert!(summary.contains("most frequent 'Oslo'"));
        assert!(summary.contains("Target candidates:"));
        assert!(summary.contains("price (score"));
    }

    #[test]
    fn test_summary_layout() {
        let dataset = Dataset::from_json(json!([
            {"shade": "red"},
            {"shade": "blue"},
            {"shade": "red"}
        ]))
        .unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let summary = generate_data_summary(&dataset, &metadata);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "Dataset Summary");
        assert_eq!(lines[1], "===============");
        assert!(lines.contains(&"  - categorical: 1"));
        assert!(lines.iter().any(|l| l.starts_with("  - shade [categorical]")));
        // No numeric columns, so no candidate section
        assert!(!summary.contains("Target candidates:"));
        assert!(summary.ends_with('\n'));
        assert!(!summary.ends_with("\n\n"));
    }
}
