//! Statistical analysis functions for column profiling.

use crate::dataset::{ISO_FORMAT, Value};
use crate::types::{
    CategoricalStatistics, ColumnProfile, ColumnType, DistributionType, EncodingStrategy,
    NumericStatistics, ScalingStrategy, TemporalFrequency, TemporalStatistics, ValueFrequency,
};
use crate::utils::{median_sorted, nearest_rank, parse_datetime};
use chrono::NaiveTime;
use indexmap::IndexMap;

const MS_PER_DAY: f64 = 86_400_000.0;
const TOP_VALUES: usize = 10;

/// Compute numeric statistics over every value coercible to a finite number.
///
/// Returns `None` when no value is numeric.
pub(crate) fn numeric_statistics(values: &[&Value]) -> Option<NumericStatistics> {
    let mut sorted: Vec<f64> = values.iter().filter_map(|v| v.coerce_f64()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let nf = n as f64;
    let min = sorted[0];
    let max = sorted[n - 1];
    let mean = sorted.iter().sum::<f64>() / nf;
    let median = median_sorted(&sorted);

    let variance = if n > 1 {
        sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0)
    } else {
        0.0
    };
    let std = variance.sqrt();

    let q25 = nearest_rank(&sorted, 0.25);
    let q75 = nearest_rank(&sorted, 0.75);
    let iqr = q75 - q25;
    let lower_fence = q25 - 1.5 * iqr;
    let upper_fence = q75 + 1.5 * iqr;

    let skewness = calculate_skewness(&sorted, mean, std);
    let kurtosis = calculate_kurtosis(&sorted, mean, std);

    let outlier_count = sorted
        .iter()
        .filter(|&&x| x < lower_fence || x > upper_fence)
        .count();

    let distribution_type = if skewness.abs() > 1.0 {
        DistributionType::Skewed
    } else if kurtosis.abs() < 0.5 {
        DistributionType::Uniform
    } else {
        DistributionType::Normal
    };

    Some(NumericStatistics {
        count: n,
        min,
        max,
        mean,
        median,
        std,
        variance,
        q25,
        q50: median,
        q75,
        iqr,
        skewness,
        kurtosis,
        outlier_count,
        outlier_percentage: outlier_count as f64 / nf * 100.0,
        lower_fence,
        upper_fence,
        zero_count: sorted.iter().filter(|&&x| x == 0.0).count(),
        negative_count: sorted.iter().filter(|&&x| x < 0.0).count(),
        distribution_type,
    })
}

/// Adjusted Fisher-Pearson skewness. 0 when n <= 2 or std is 0.
pub(crate) fn calculate_skewness(values: &[f64], mean: f64, std: f64) -> f64 {
    let n = values.len() as f64;
    if values.len() <= 2 || std == 0.0 {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|x| ((x - mean) / std).powi(3)).sum();
    let skew = (n / ((n - 1.0) * (n - 2.0))) * sum;
    if skew.is_finite() { skew } else { 0.0 }
}

/// Bias-corrected excess kurtosis. 0 when n <= 3 or std is 0.
pub(crate) fn calculate_kurtosis(values: &[f64], mean: f64, std: f64) -> f64 {
    let n = values.len() as f64;
    if values.len() <= 3 || std == 0.0 {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|x| ((x - mean) / std).powi(4)).sum();
    let kurt = (n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0))) * sum
        - 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    if kurt.is_finite() { kurt } else { 0.0 }
}

/// Frequency statistics over the string representation of each value.
pub(crate) fn categorical_statistics(values: &[&Value]) -> CategoricalStatistics {
    let mut value_counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        *value_counts.entry(value.to_key()).or_insert(0) += 1;
    }

    let total = values.len() as f64;
    let entropy = if total > 0.0 {
        value_counts
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    } else {
        0.0
    };

    // Stable sort keeps first-seen order among equal counts
    let mut ranked: Vec<(&String, &usize)> = value_counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1));

    let top_values = ranked
        .iter()
        .take(TOP_VALUES)
        .map(|&(value, &count)| ValueFrequency {
            value: value.clone(),
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();

    let most_frequent = ranked.first().map(|&(v, _)| v.clone());
    let least_frequent = ranked.last().map(|&(v, _)| v.clone());

    CategoricalStatistics {
        cardinality: value_counts.len(),
        value_counts,
        top_values,
        entropy,
        most_frequent,
        least_frequent,
    }
}

/// Date-range statistics over every value that parses as a date.
pub(crate) fn temporal_statistics(values: &[&Value]) -> TemporalStatistics {
    let mut dates: Vec<_> = values.iter().filter_map(|v| parse_datetime(v)).collect();
    if dates.is_empty() {
        return TemporalStatistics::empty();
    }
    dates.sort();

    let first = dates[0];
    let last = dates[dates.len() - 1];
    let date_range_days = (last - first).num_milliseconds() as f64 / MS_PER_DAY;
    let has_time_component = dates.iter().any(|d| d.time() != NaiveTime::MIN);

    let frequency = if dates.len() < 2 {
        TemporalFrequency::Irregular
    } else {
        classify_frequency(date_range_days / (dates.len() - 1) as f64)
    };

    TemporalStatistics {
        min_date: Some(first.format(ISO_FORMAT).to_string()),
        max_date: Some(last.format(ISO_FORMAT).to_string()),
        date_range_days,
        has_time_component,
        frequency,
        gaps_detected: 0,
        parsed_count: dates.len(),
    }
}

/// Classify the average gap between consecutive dates.
fn classify_frequency(avg_gap_days: f64) -> TemporalFrequency {
    if avg_gap_days <= 1.5 {
        TemporalFrequency::Daily
    } else if (6.0..=8.0).contains(&avg_gap_days) {
        TemporalFrequency::Weekly
    } else if (28.0..=31.0).contains(&avg_gap_days) {
        TemporalFrequency::Monthly
    } else if (360.0..=370.0).contains(&avg_gap_days) {
        TemporalFrequency::Yearly
    } else {
        TemporalFrequency::Irregular
    }
}

/// Advisory encoding for a profiled column.
pub(crate) fn suggest_encoding(profile: &ColumnProfile) -> EncodingStrategy {
    if profile.column_type != ColumnType::Categorical {
        return EncodingStrategy::None;
    }
    match profile.unique_count {
        0..=2 => EncodingStrategy::Label,
        3..=10 => EncodingStrategy::OneHot,
        _ => EncodingStrategy::Target,
    }
}

/// Advisory scaling for a profiled column.
pub(crate) fn suggest_scaling(profile: &ColumnProfile) -> ScalingStrategy {
    let Some(stats) = profile.numeric_stats() else {
        return ScalingStrategy::None;
    };
    if stats.distribution_type == DistributionType::Skewed || stats.outlier_percentage > 5.0 {
        ScalingStrategy::Robust
    } else if stats.distribution_type == DistributionType::Uniform {
        ScalingStrategy::MinMax
    } else {
        ScalingStrategy::Standard
    }
}
