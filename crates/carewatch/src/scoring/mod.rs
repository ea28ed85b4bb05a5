//! Risk scoring and explanation building.

pub mod explanation;
pub mod scorer;

pub use explanation::{ExplanationBuilder, ExplanationOutput, Factor};
pub use scorer::RiskScorer;
