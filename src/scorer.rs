//! Risk scoring
//!
//! This module bands the classifier's risk probability into a tier and
//! evaluates the independent risk-driver rules. Every threshold is
//! configuration: deployments tune the bands and trigger points without
//! touching the scoring logic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::TabularClassifier;
use crate::error::ScoreError;
use crate::schema::FeatureSchema;
use crate::types::{
    DriverFinding, DriverSeverity, FeatureVector, RiskAssessment, RiskDriver, RiskTier,
};

/// Tier band floors partitioning [0,1] into LOW / MEDIUM / HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    /// Probability at or above which a record is MEDIUM
    pub medium_floor: f64,
    /// Probability at or above which a record is HIGH
    pub high_floor: f64,
}

impl RiskBands {
    /// Validated constructor: bands must satisfy 0 < medium < high <= 1 so
    /// the three tiers are contiguous, non-overlapping, and cover [0,1].
    pub fn new(medium_floor: f64, high_floor: f64) -> Result<Self, ScoreError> {
        if !(medium_floor > 0.0 && medium_floor < high_floor && high_floor <= 1.0) {
            return Err(ScoreError::InvalidBands(format!(
                "need 0 < medium ({medium_floor}) < high ({high_floor}) <= 1"
            )));
        }
        Ok(Self {
            medium_floor,
            high_floor,
        })
    }

    /// Band a probability into its tier.
    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability >= self.high_floor {
            RiskTier::High
        } else if probability >= self.medium_floor {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium_floor: 0.3,
            high_floor: 0.5,
        }
    }
}

/// Trigger and severity-escalation points for the risk-driver rules.
///
/// `*_trigger` is the boundary at which a driver fires at MEDIUM severity;
/// `*_severe` is the boundary past which it escalates to HIGH. The
/// backlog/attendance compound flag has no thresholds here: it is computed
/// by the feature engineer and is always HIGH when set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverThresholds {
    /// Sleep driver fires when sleep_deviation exceeds this
    pub sleep_trigger: f64,
    pub sleep_severe: f64,
    /// Focus driver fires when focus_ratio falls below this
    pub focus_trigger: f64,
    pub focus_severe: f64,
    /// Grades driver fires when academic_index falls below this
    pub grades_trigger: f64,
    pub grades_severe: f64,
    /// Stress driver fires when nlp_stress_score exceeds this
    pub stress_trigger: f64,
    pub stress_severe: f64,
}

impl Default for DriverThresholds {
    fn default() -> Self {
        Self {
            sleep_trigger: 1.5,
            sleep_severe: 3.0,
            focus_trigger: 0.5,
            focus_severe: 0.3,
            grades_trigger: 50.0,
            grades_severe: 40.0,
            stress_trigger: 0.6,
            stress_severe: 0.85,
        }
    }
}

/// Risk scorer: probability banding plus driver-rule evaluation
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    pub bands: RiskBands,
    pub thresholds: DriverThresholds,
}

impl RiskScorer {
    pub fn new(bands: RiskBands, thresholds: DriverThresholds) -> Self {
        Self { bands, thresholds }
    }

    /// Score a feature vector against the tabular classifier.
    ///
    /// The vector is serialized through `schema` so field order always
    /// matches the model's training order. Classifier failure is fatal for
    /// the request and propagates; a probability outside [0,1] is treated
    /// as a model fault, not clamped.
    pub fn score(
        &self,
        features: &FeatureVector,
        schema: &FeatureSchema,
        model: &dyn TabularClassifier,
    ) -> Result<RiskAssessment, ScoreError> {
        let values = schema.vectorize(features)?;
        let probability = model.predict_probability(&values)?;
        if !(0.0..=1.0).contains(&probability) || probability.is_nan() {
            return Err(ScoreError::InvalidProbability(probability));
        }

        let tier = self.bands.classify(probability);
        let drivers = self.evaluate_drivers(features);
        debug!(
            probability,
            tier = tier.as_str(),
            driver_count = drivers.len(),
            "scored feature vector"
        );

        Ok(RiskAssessment {
            risk_probability: probability,
            risk_tier: tier,
            drivers,
            nlp_stress_score: features.nlp_stress_score,
        })
    }

    /// Evaluate every driver rule independently; a record can trigger
    /// several at once. Findings come back most severe first, with the
    /// compound backlog/attendance flag ahead of its severity peers.
    pub fn evaluate_drivers(&self, features: &FeatureVector) -> Vec<DriverFinding> {
        let t = &self.thresholds;
        let mut findings = Vec::new();

        if features.risk_alarm == 1.0 {
            findings.push(DriverFinding {
                driver: RiskDriver::BacklogAttendance,
                severity: DriverSeverity::High,
                // The alarm is boolean; attendance carries the detail
                observed: features.attendance_pct,
            });
        }

        if features.sleep_deviation > t.sleep_trigger {
            findings.push(DriverFinding {
                driver: RiskDriver::Sleep,
                severity: severity_above(features.sleep_deviation, t.sleep_severe),
                observed: features.sleep_deviation,
            });
        }

        if features.focus_ratio < t.focus_trigger {
            findings.push(DriverFinding {
                driver: RiskDriver::Focus,
                severity: severity_below(features.focus_ratio, t.focus_severe),
                observed: features.focus_ratio,
            });
        }

        if features.academic_index < t.grades_trigger {
            findings.push(DriverFinding {
                driver: RiskDriver::Grades,
                severity: severity_below(features.academic_index, t.grades_severe),
                observed: features.academic_index,
            });
        }

        if features.nlp_stress_score > t.stress_trigger {
            findings.push(DriverFinding {
                driver: RiskDriver::Stress,
                severity: severity_above(features.nlp_stress_score, t.stress_severe),
                observed: features.nlp_stress_score,
            });
        }

        // Stable: evaluation order above is kept within equal severity
        findings.sort_by(|a, b| b.severity.cmp(&a.severity));
        findings
    }
}

fn severity_above(observed: f64, severe: f64) -> DriverSeverity {
    if observed > severe {
        DriverSeverity::High
    } else {
        DriverSeverity::Medium
    }
}

fn severity_below(observed: f64, severe: f64) -> DriverSeverity {
    if observed < severe {
        DriverSeverity::High
    } else {
        DriverSeverity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEngineer;
    use crate::types::RawStudentRecord;
    use pretty_assertions::assert_eq;

    /// Classifier stub returning a fixed probability
    struct Fixed(f64);

    impl TabularClassifier for Fixed {
        fn predict_probability(&self, _values: &[f64]) -> Result<f64, ScoreError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl TabularClassifier for Failing {
        fn predict_probability(&self, _values: &[f64]) -> Result<f64, ScoreError> {
            Err(ScoreError::TabularModel("model file corrupt".to_string()))
        }
    }

    fn make_record() -> RawStudentRecord {
        RawStudentRecord {
            previous_sem_gpa: 7.5,
            last_test_score: 65,
            attendance_pct: 80,
            is_backlog: false,
            avg_daily_study_hours: 2.0,
            social_media_hours_per_day: 3.0,
            sleep_hours_avg: 6.5,
            diary_text: String::new(),
            avg_weekly_library_hours: None,
            extracurricular_engagement_score: None,
            is_exam_week: None,
        }
    }

    fn score_with(p: f64) -> RiskAssessment {
        let features = FeatureEngineer::engineer(&make_record(), 0.2);
        RiskScorer::default()
            .score(&features, &FeatureSchema::default_training_order(), &Fixed(p))
            .unwrap()
    }

    #[test]
    fn bands_partition_unit_interval() {
        assert_eq!(score_with(0.0).risk_tier, RiskTier::Low);
        assert_eq!(score_with(0.29).risk_tier, RiskTier::Low);
        // Floors are inclusive
        assert_eq!(score_with(0.3).risk_tier, RiskTier::Medium);
        assert_eq!(score_with(0.49).risk_tier, RiskTier::Medium);
        assert_eq!(score_with(0.5).risk_tier, RiskTier::High);
        assert_eq!(score_with(1.0).risk_tier, RiskTier::High);
    }

    #[test]
    fn custom_high_floor() {
        let bands = RiskBands::new(0.3, 0.6).unwrap();
        assert_eq!(bands.classify(0.55), RiskTier::Medium);
        assert_eq!(bands.classify(0.6), RiskTier::High);
    }

    #[test]
    fn degenerate_bands_rejected() {
        assert!(RiskBands::new(0.5, 0.3).is_err());
        assert!(RiskBands::new(0.0, 0.5).is_err());
        assert!(RiskBands::new(0.3, 1.1).is_err());
        assert!(RiskBands::new(0.4, 0.4).is_err());
    }

    #[test]
    fn quiet_record_triggers_no_drivers() {
        let mut record = make_record();
        record.sleep_hours_avg = 7.5;
        record.avg_daily_study_hours = 4.0;

        let features = FeatureEngineer::engineer(&record, 0.2);
        let drivers = RiskScorer::default().evaluate_drivers(&features);
        assert_eq!(drivers, vec![]);
    }

    #[test]
    fn drivers_fire_independently_and_stack() {
        let mut record = make_record();
        record.is_backlog = true;
        record.attendance_pct = 60;
        record.sleep_hours_avg = 4.0; // deviation 4.0 > severe 3.0
        record.avg_daily_study_hours = 0.5;
        record.social_media_hours_per_day = 5.0; // focus 0.083 < severe 0.3
        record.previous_sem_gpa = 3.0;
        record.last_test_score = 30; // academic_index 30 < severe 40

        let features = FeatureEngineer::engineer(&record, 0.9); // > severe 0.85
        let drivers = RiskScorer::default().evaluate_drivers(&features);

        let fired: Vec<RiskDriver> = drivers.iter().map(|f| f.driver).collect();
        assert_eq!(
            fired,
            vec![
                RiskDriver::BacklogAttendance,
                RiskDriver::Sleep,
                RiskDriver::Focus,
                RiskDriver::Grades,
                RiskDriver::Stress,
            ]
        );
        assert!(drivers.iter().all(|f| f.severity == DriverSeverity::High));
    }

    #[test]
    fn severity_sorts_high_first_with_compound_flag_leading() {
        let mut record = make_record();
        record.is_backlog = true;
        record.attendance_pct = 70; // compound flag, HIGH
        record.sleep_hours_avg = 6.0; // deviation 2.0, MEDIUM

        let features = FeatureEngineer::engineer(&record, 0.2);
        let drivers = RiskScorer::default().evaluate_drivers(&features);

        assert_eq!(drivers[0].driver, RiskDriver::BacklogAttendance);
        assert_eq!(drivers[0].severity, DriverSeverity::High);
        assert_eq!(drivers[1].driver, RiskDriver::Sleep);
        assert_eq!(drivers[1].severity, DriverSeverity::Medium);
    }

    #[test]
    fn trigger_boundaries_are_exclusive() {
        let mut record = make_record();
        record.sleep_hours_avg = 6.5; // deviation exactly 1.5
        let features = FeatureEngineer::engineer(&record, 0.6); // exactly at stress trigger

        let drivers = RiskScorer::default().evaluate_drivers(&features);
        assert!(drivers.iter().all(|f| f.driver != RiskDriver::Sleep));
        assert!(drivers.iter().all(|f| f.driver != RiskDriver::Stress));
    }

    #[test]
    fn focus_exactly_at_trigger_does_not_fire() {
        // Worked scenario: focus_ratio exactly 0.5
        let features = FeatureEngineer::engineer(&make_record(), 0.2);
        assert_eq!(features.focus_ratio, 0.5);

        let drivers = RiskScorer::default().evaluate_drivers(&features);
        assert!(drivers.iter().all(|f| f.driver != RiskDriver::Focus));
    }

    #[test]
    fn configurable_thresholds_shift_triggers() {
        let thresholds = DriverThresholds {
            sleep_trigger: 2.0,
            grades_trigger: 60.0,
            ..Default::default()
        };
        let scorer = RiskScorer::new(RiskBands::default(), thresholds);

        let mut record = make_record();
        record.sleep_hours_avg = 6.2; // deviation 1.8: fires at 1.5, not at 2.0
        let features = FeatureEngineer::engineer(&record, 0.2);

        let drivers = scorer.evaluate_drivers(&features);
        assert!(drivers.iter().all(|f| f.driver != RiskDriver::Sleep));
        // academic_index 70 < 60 is false, Grades still quiet
        assert!(drivers.iter().all(|f| f.driver != RiskDriver::Grades));
    }

    #[test]
    fn classifier_failure_propagates() {
        let features = FeatureEngineer::engineer(&make_record(), 0.2);
        let err = RiskScorer::default()
            .score(&features, &FeatureSchema::default_training_order(), &Failing)
            .unwrap_err();
        assert!(matches!(err, ScoreError::TabularModel(_)));
    }

    #[test]
    fn out_of_range_probability_is_a_model_fault() {
        let features = FeatureEngineer::engineer(&make_record(), 0.2);
        let err = RiskScorer::default()
            .score(
                &features,
                &FeatureSchema::default_training_order(),
                &Fixed(1.2),
            )
            .unwrap_err();
        assert!(matches!(err, ScoreError::InvalidProbability(p) if p == 1.2));
    }

    #[test]
    fn assessment_echoes_stress_score() {
        let features = FeatureEngineer::engineer(&make_record(), 0.42);
        let assessment = RiskScorer::default()
            .score(
                &features,
                &FeatureSchema::default_training_order(),
                &Fixed(0.1),
            )
            .unwrap();
        assert_eq!(assessment.nlp_stress_score, 0.42);
    }
}
