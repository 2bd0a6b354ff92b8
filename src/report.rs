//! Report encoding
//!
//! Encodes an assessment (plus optional simulations and recommendations)
//! into a versioned JSON payload with producer and provenance metadata.
//! Rendering the payload to HTML or plain text is a caller concern.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScoreError;
use crate::pipeline::Assessment;
use crate::recommend::ActionPlan;
use crate::simulate::SimulationOutcome;
use crate::types::RiskTier;
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Current report payload version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata stamped on every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Headline risk numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub probability: f64,
    /// Probability as a percentage, as shown to counselors
    pub percentage: f64,
    pub tier: RiskTier,
    pub stress_score: f64,
    pub stress_percentage: f64,
}

/// One triggered driver, labelled for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverReport {
    pub label: String,
    pub severity: String,
    pub observed: f64,
}

/// One what-if outcome, labelled for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub label: String,
    pub probability: f64,
    pub delta: f64,
    pub tier: RiskTier,
}

/// Complete report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPayload {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub risk: RiskSummary,
    pub drivers: Vec<DriverReport>,
    pub recommendations: Vec<String>,
    pub simulations: Vec<SimulationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<ActionPlan>,
}

/// Report encoder for producing versioned payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode an assessment into a report payload.
    pub fn encode(
        &self,
        assessment: &Assessment,
        recommendations: &[&str],
        simulations: &[SimulationOutcome],
        action_plan: Option<ActionPlan>,
    ) -> ReportPayload {
        let risk = &assessment.risk;

        ReportPayload {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            risk: RiskSummary {
                probability: risk.risk_probability,
                percentage: risk.risk_probability * 100.0,
                tier: risk.risk_tier,
                stress_score: risk.nlp_stress_score,
                stress_percentage: risk.nlp_stress_score * 100.0,
            },
            drivers: risk
                .drivers
                .iter()
                .map(|f| DriverReport {
                    label: f.driver.as_str().to_string(),
                    severity: f.severity.as_str().to_string(),
                    observed: f.observed,
                })
                .collect(),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            simulations: simulations
                .iter()
                .map(|o| SimulationReport {
                    label: o.intervention.describe(),
                    probability: o.risk.risk_probability,
                    delta: o.delta,
                    tier: o.risk.risk_tier,
                })
                .collect(),
            action_plan,
        }
    }

    /// Encode to a pretty-printed JSON string.
    pub fn encode_to_json(
        &self,
        assessment: &Assessment,
        recommendations: &[&str],
        simulations: &[SimulationOutcome],
        action_plan: Option<ActionPlan>,
    ) -> Result<String, ScoreError> {
        let payload = self.encode(assessment, recommendations, simulations, action_plan);
        serde_json::to_string_pretty(&payload).map_err(ScoreError::JsonError)
    }
}
