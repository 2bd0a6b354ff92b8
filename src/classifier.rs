//! Classifier seam
//!
//! The engine consumes two externally trained models through the traits
//! defined here. Both are treated as pure, reentrant functions: construct
//! once at process start, share read-only across requests.
//!
//! Reference implementations are provided so the engine runs end to end
//! without a model server: a weighted-lexicon text model and a logistic
//! tabular model, both loadable from JSON parameter files.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Text classifier producing the probability of the "high stress" class.
pub trait TextClassifier: Send + Sync {
    /// Probability of high stress for a cleaned diary entry, in [0,1].
    fn predict_probability(&self, cleaned_text: &str) -> Result<f64, ScoreError>;
}

/// Tabular classifier producing the probability of the "at risk" class.
///
/// `values` arrives in the exact training order owned by the
/// [`FeatureSchema`](crate::schema::FeatureSchema) that travels with the model.
pub trait TabularClassifier: Send + Sync {
    /// Probability of the positive ("at risk") class, in [0,1].
    fn predict_probability(&self, values: &[f64]) -> Result<f64, ScoreError>;
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

static DEFAULT_LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../stress_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid stress lexicon")
});

/// Weighted-lexicon text model.
///
/// Sums per-token weights over the cleaned text, scales by token count, and
/// squashes through a sigmoid. Tokens missing from the lexicon score zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconModel {
    /// Token weight table; positive weights indicate stress
    pub weights: HashMap<String, f64>,
    /// Bias applied before the sigmoid
    #[serde(default)]
    pub bias: f64,
}

impl LexiconModel {
    /// Model with the built-in stress lexicon.
    pub fn builtin() -> Self {
        Self {
            weights: DEFAULT_LEXICON.clone(),
            // Empty or neutral text should land well below 0.5
            bias: -1.0,
        }
    }

    /// Load model parameters from a JSON file body.
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TextClassifier for LexiconModel {
    fn predict_probability(&self, cleaned_text: &str) -> Result<f64, ScoreError> {
        let tokens: Vec<&str> = cleaned_text.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(sigmoid(self.bias));
        }

        let sum: f64 = tokens
            .iter()
            .filter_map(|t| self.weights.get(*t))
            .sum();
        // Scale by sqrt of length so one loaded word in a long entry does
        // not vanish, but repetition still accumulates.
        let z = self.bias + sum / (tokens.len() as f64).sqrt();

        Ok(sigmoid(z))
    }
}

/// Logistic tabular model: dot product of trained coefficients with the
/// ordered feature values, plus intercept, through a sigmoid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Coefficients in the training order of the accompanying schema
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Load model parameters from a JSON file body.
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reference parameters for the default twelve-feature training order.
    pub fn reference() -> Self {
        Self {
            // previous_sem_gpa, last_test_score, attendance_pct,
            // avg_daily_study_hours, social_media_hours_per_day,
            // sleep_hours_avg, is_backlog, nlp_stress_score, academic_index,
            // sleep_deviation, focus_ratio, risk_alarm
            coefficients: vec![
                -0.12, -0.015, -0.03, -0.25, 0.12, -0.08, 0.9, 1.8, -0.04, 0.35, -0.8, 1.5,
            ],
            intercept: 4.2,
        }
    }
}

impl TabularClassifier for LogisticModel {
    fn predict_probability(&self, values: &[f64]) -> Result<f64, ScoreError> {
        if values.len() != self.coefficients.len() {
            return Err(ScoreError::TabularModel(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                values.len()
            )));
        }

        let z: f64 = self
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum::<f64>()
            + self.intercept;

        Ok(sigmoid(z))
    }
}
