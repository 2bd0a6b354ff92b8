//! Pipeline orchestration
//!
//! This module provides the public API for Scholar Triage.
//! It orchestrates the full pipeline from raw student record to risk
//! assessment: text preprocessing → stress classification → feature
//! engineering → risk scoring, plus counterfactual simulation on top.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{TabularClassifier, TextClassifier};
use crate::error::ScoreError;
use crate::features::FeatureEngineer;
use crate::recommend::RecommendationCatalog;
use crate::schema::FeatureSchema;
use crate::scorer::RiskScorer;
use crate::simulate::{self, Intervention, SimulationOutcome};
use crate::text;
use crate::types::{FeatureVector, RawStudentRecord, RiskAssessment};

/// Result of one full assessment: the engineered vector and the scored risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub features: FeatureVector,
    pub risk: RiskAssessment,
}

/// Assess a record with the default schema, bands, and thresholds.
///
/// One-shot convenience over [`AssessmentEngine`] for callers that hold the
/// two models and need nothing configured.
pub fn assess_record(
    record: &RawStudentRecord,
    text_model: &dyn TextClassifier,
    tabular_model: &dyn TabularClassifier,
) -> Result<Assessment, ScoreError> {
    // Stage 1: Clean the diary entry
    let cleaned = text::clean(&record.diary_text);

    // Stage 2: Stress probability from the text classifier
    let nlp_stress_score = stress_probability(text_model, &cleaned)?;

    // Stage 3: Engineer the feature vector
    let features = FeatureEngineer::engineer(record, nlp_stress_score);

    // Stage 4: Score against the tabular classifier
    let risk = RiskScorer::default().score(
        &features,
        &FeatureSchema::default_training_order(),
        tabular_model,
    )?;

    Ok(Assessment { features, risk })
}

fn stress_probability(
    model: &dyn TextClassifier,
    cleaned: &str,
) -> Result<f64, ScoreError> {
    let p = model.predict_probability(cleaned)?;
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return Err(ScoreError::InvalidProbability(p));
    }
    debug!(stress = p, tokens = cleaned.split_whitespace().count(), "classified diary text");
    Ok(p)
}

/// Configured scoring engine holding the loaded models.
///
/// Models are expensive to load, so construct the engine once at process
/// start and share it. All state is read-only after construction; the
/// engine is `Send + Sync` and one instance can serve concurrent requests
/// without locking, provided the classifier implementations are reentrant.
pub struct AssessmentEngine {
    text_model: Arc<dyn TextClassifier>,
    tabular_model: Arc<dyn TabularClassifier>,
    schema: FeatureSchema,
    scorer: RiskScorer,
    catalog: RecommendationCatalog,
}

impl AssessmentEngine {
    /// Create an engine with default schema, bands, thresholds, and catalog.
    pub fn new(
        text_model: Arc<dyn TextClassifier>,
        tabular_model: Arc<dyn TabularClassifier>,
    ) -> Self {
        Self {
            text_model,
            tabular_model,
            schema: FeatureSchema::default_training_order(),
            scorer: RiskScorer::default(),
            catalog: RecommendationCatalog::default(),
        }
    }

    /// Replace the feature schema (must match the tabular model's training
    /// order; schema metadata travels with the model).
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Replace the band and driver-threshold configuration.
    pub fn with_scorer(mut self, scorer: RiskScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the recommendation catalog.
    pub fn with_catalog(mut self, catalog: RecommendationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn catalog(&self) -> &RecommendationCatalog {
        &self.catalog
    }

    /// Run the full pipeline on one record.
    pub fn assess(&self, record: &RawStudentRecord) -> Result<Assessment, ScoreError> {
        // Stage 1: Clean the diary entry
        let cleaned = text::clean(&record.diary_text);

        // Stage 2: Stress probability from the text classifier
        let nlp_stress_score = stress_probability(self.text_model.as_ref(), &cleaned)?;

        // Stage 3: Engineer the feature vector
        let features = FeatureEngineer::engineer(record, nlp_stress_score);

        // Stage 4: Score against the tabular classifier
        let risk = self
            .scorer
            .score(&features, &self.schema, self.tabular_model.as_ref())?;

        Ok(Assessment { features, risk })
    }

    /// Recommendations for an assessment's triggered drivers.
    pub fn recommendations<'a>(&'a self, assessment: &Assessment) -> Vec<&'a str> {
        self.catalog.for_drivers(&assessment.risk.drivers)
    }

    /// Re-score the record under each intervention.
    ///
    /// The diary is classified once; its stress score is held constant
    /// across variants. Each variant rebuilds the feature vector from the
    /// edited raw record before re-invoking the classifier.
    pub fn simulate(
        &self,
        record: &RawStudentRecord,
        interventions: &[Intervention],
    ) -> Result<Vec<SimulationOutcome>, ScoreError> {
        let baseline = self.assess(record)?;
        simulate::rescore(
            record,
            baseline.features.nlp_stress_score,
            baseline.risk.risk_probability,
            interventions,
            &self.scorer,
            &self.schema,
            self.tabular_model.as_ref(),
        )
    }
}
