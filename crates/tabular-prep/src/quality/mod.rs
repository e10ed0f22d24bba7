//! Data quality assessment module.
//!
//! This module scores a profiled dataset, classifies its ML readiness and
//! produces human-readable preprocessing recommendations.

mod analyzer;

pub use analyzer::{QualityAssessment, QualityAssessor};
