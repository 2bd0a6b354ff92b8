//! Counterfactual simulation
//!
//! Re-scores a record under a named intervention ("what happens to risk if
//! sleep is fixed"). An intervention edits raw fields only; the feature
//! engineer then rebuilds the whole vector from the edited record, so every
//! dependent derived field is recomputed. Derived fields are never patched
//! or carried over, which is what keeps a simulation from reusing a stale
//! value.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::TabularClassifier;
use crate::error::ScoreError;
use crate::features::{FeatureEngineer, IDEAL_SLEEP_HOURS};
use crate::schema::FeatureSchema;
use crate::scorer::RiskScorer;
use crate::types::{FeatureVector, RawStudentRecord, RiskAssessment};

/// Named counterfactual intervention over raw record fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intervention {
    /// Set sleep to the 8-hour ideal
    NormalizeSleep,
    /// Add hours of daily study time (capped at 24)
    AddStudyHours { hours: f64 },
    /// Halve daily social media time
    HalveSocialMedia,
    /// Raise attendance to at least the given percentage (capped at 100)
    RaiseAttendance { floor_pct: u32 },
    /// Clear all backlogs
    ClearBacklog,
}

impl Intervention {
    /// Apply the intervention to a copy of the record. Only raw fields are
    /// touched; derived features are rebuilt downstream.
    pub fn apply(&self, raw: &RawStudentRecord) -> RawStudentRecord {
        let mut modified = raw.clone();
        match *self {
            Intervention::NormalizeSleep => {
                modified.sleep_hours_avg = IDEAL_SLEEP_HOURS;
            }
            Intervention::AddStudyHours { hours } => {
                modified.avg_daily_study_hours =
                    (modified.avg_daily_study_hours + hours).clamp(0.0, 24.0);
            }
            Intervention::HalveSocialMedia => {
                modified.social_media_hours_per_day /= 2.0;
            }
            Intervention::RaiseAttendance { floor_pct } => {
                modified.attendance_pct = modified.attendance_pct.max(floor_pct).min(100);
            }
            Intervention::ClearBacklog => {
                modified.is_backlog = false;
            }
        }
        modified
    }

    /// Human-readable label for reports.
    pub fn describe(&self) -> String {
        match *self {
            Intervention::NormalizeSleep => "Normalize sleep to 8 hours".to_string(),
            Intervention::AddStudyHours { hours } => {
                format!("Add {hours} daily study hours")
            }
            Intervention::HalveSocialMedia => "Halve social media time".to_string(),
            Intervention::RaiseAttendance { floor_pct } => {
                format!("Raise attendance to {floor_pct}%")
            }
            Intervention::ClearBacklog => "Clear all backlogs".to_string(),
        }
    }
}

/// Result of re-scoring one intervention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub intervention: Intervention,
    /// Feature vector rebuilt from the modified record
    pub features: FeatureVector,
    pub risk: RiskAssessment,
    /// New probability minus baseline probability (negative = improvement)
    pub delta: f64,
}

/// Re-score a record under each intervention.
///
/// The stress score is held constant: interventions change reported habits,
/// not the diary text. Each outcome goes through the full engineer-then-
/// classify path; classifier failure on any variant is fatal for the batch.
pub fn rescore(
    raw: &RawStudentRecord,
    nlp_stress_score: f64,
    baseline_probability: f64,
    interventions: &[Intervention],
    scorer: &RiskScorer,
    schema: &FeatureSchema,
    model: &dyn TabularClassifier,
) -> Result<Vec<SimulationOutcome>, ScoreError> {
    interventions
        .iter()
        .map(|intervention| {
            let modified = intervention.apply(raw);
            let features = FeatureEngineer::engineer(&modified, nlp_stress_score);
            let risk = scorer.score(&features, schema, model)?;
            let delta = risk.risk_probability - baseline_probability;
            debug!(
                intervention = %intervention.describe(),
                probability = risk.risk_probability,
                delta,
                "simulated intervention"
            );
            Ok(SimulationOutcome {
                intervention: *intervention,
                features,
                risk,
                delta,
            })
        })
        .collect()
}
