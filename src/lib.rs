//! Scholar Triage - Deterministic risk scoring engine for student wellbeing signals
//!
//! Triage transforms a raw self-reported student record into a risk report
//! through a deterministic pipeline: diary text preprocessing → stress
//! classification → feature engineering → risk scoring → recommendation
//! selection, with counterfactual simulation on top.
//!
//! ## Modules
//!
//! - **Pipeline**: Assess records end to end with loaded models
//! - **Simulation**: Re-score records under what-if interventions
//! - **Report**: Encode assessments into versioned JSON payloads

pub mod classifier;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod recommend;
pub mod report;
pub mod schema;
pub mod scorer;
pub mod simulate;
pub mod text;
pub mod types;

pub use error::ScoreError;
pub use pipeline::{assess_record, Assessment, AssessmentEngine};

// Schema exports
pub use schema::{FeatureName, FeatureSchema, SCHEMA_VERSION};

// Scoring exports
pub use scorer::{DriverThresholds, RiskBands, RiskScorer};
pub use simulate::{Intervention, SimulationOutcome};
pub use types::{RawStudentRecord, RiskAssessment, RiskDriver, RiskTier};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "scholar-triage";
