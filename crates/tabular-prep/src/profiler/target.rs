//! Target candidate detection.
//!
//! Every numeric column is scored by name (tiered keyword families) and by
//! the shape of its distribution. Any numeric column with spread qualifies
//! as a candidate, so the score is what separates a plausible target from a
//! plain feature.

use crate::types::{ColumnProfile, ColumnType, NumericStatistics};
use once_cell::sync::Lazy;
use regex::Regex;

// Name tiers, most specific first - compiled once at startup
static TARGET_TIERS: Lazy<Vec<(Regex, f64)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)target|label|y|output|prediction|result|outcome|class|category")
                .expect("Invalid regex: target tier"),
            50.0,
        ),
        (
            Regex::new(r"(?i)price|cost|amount|value|revenue|sales|profit|loss")
                .expect("Invalid regex: monetary tier"),
            40.0,
        ),
        (
            Regex::new(r"(?i)score|rating|rank|priority").expect("Invalid regex: score tier"),
            30.0,
        ),
        (
            Regex::new(r"(?i)status|state|condition|quality").expect("Invalid regex: status tier"),
            10.0,
        ),
    ]
});

const MAX_SCORE: f64 = 100.0;

/// Base score of the first name tier matching `name`, if any.
pub(crate) fn name_tier_score(name: &str) -> Option<f64> {
    TARGET_TIERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(name))
        .map(|(_, score)| *score)
}

/// Score a column as a prediction target.
///
/// Returns `None` when the column is not numeric or not a candidate.
pub(crate) fn score_target_candidate(profile: &ColumnProfile) -> Option<f64> {
    if profile.column_type != ColumnType::Numeric {
        return None;
    }
    let stats = profile.numeric_stats()?;

    let tier = name_tier_score(&profile.name);
    if tier.is_none() && stats.variance <= 0.0 {
        return None;
    }

    let score = tier.unwrap_or(0.0) + variation_bonus(stats) + outlier_bonus(stats);
    Some(score.min(MAX_SCORE))
}

fn variation_bonus(stats: &NumericStatistics) -> f64 {
    let denominator = if stats.mean == 0.0 {
        1.0
    } else {
        stats.mean.abs()
    };
    let cv = stats.std / denominator;
    if cv > 0.1 && cv < 2.0 {
        30.0
    } else if cv > 0.0 {
        10.0
    } else {
        0.0
    }
}

fn outlier_bonus(stats: &NumericStatistics) -> f64 {
    if stats.outlier_percentage < 5.0 {
        20.0
    } else if stats.outlier_percentage < 10.0 {
        10.0
    } else {
        0.0
    }
}

/// Mark target candidates on a set of profiles in place.
pub(crate) fn mark_target_candidates<'a>(profiles: impl Iterator<Item = &'a mut ColumnProfile>) {
    for profile in profiles {
        if let Some(score) = score_target_candidate(profile) {
            profile.is_target_candidate = true;
            profile.target_score = score;
        }
    }
}

/// Pick the highest-scoring candidate. Ties go to the earlier column.
pub(crate) fn detect_target_column<'a>(
    profiles: impl Iterator<Item = &'a ColumnProfile>,
) -> Option<String> {
    let mut best: Option<&ColumnProfile> = None;
    for profile in profiles.filter(|p| p.is_target_candidate) {
        match best {
            Some(current) if profile.target_score <= current.target_score => {}
            _ => best = Some(profile),
        }
    }
    best.map(|p| p.name.clone())
}
