//! Feature construction and transformation stages.
//!
//! Each stage takes the current dataset plus the profile computed up front
//! and returns a new dataset together with human-readable step descriptions.

mod correlation;
mod encoder;
mod engineer;
mod scaler;
mod selection;

pub use correlation::{CorrelationMatrix, correlation_matrix, numeric_columns};
pub use encoder::CategoricalEncoder;
pub use engineer::FeatureEngineer;
pub use scaler::NumericScaler;
pub use selection::{FeatureSelector, Selection};
