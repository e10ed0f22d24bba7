//! Report generation module.
//!
//! This module provides the plain-text data summary and functionality for
//! generating JSON reports and saving processed datasets.
//!
//! # Comprehensive Reports
//!
//! Use [`ComprehensiveReport`] to generate unified reports suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_prep::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_comprehensive_report(
//!     "data/train.csv",
//!     Some("outputs/train_processed.csv"),
//!     &result,
//! );
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! generator.write_report_to_file(&report, "train")?;
//! ```

mod generator;
mod summary;

pub use generator::{
    ComprehensiveReport, DatasetProfileSummary, ProcessingSummaryReport, QualityReport,
    ReportGenerator,
};
pub use summary::generate_data_summary;
