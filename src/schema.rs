//! Feature schema contract
//!
//! The tabular classifier was trained against one fixed ordering of named
//! features; feeding it a vector in any other order silently produces a
//! wrong prediction. This module makes that ordering an explicit, validated
//! contract: schema metadata travels with the model, is checked at
//! construction, and is the only way to turn a [`FeatureVector`] into the
//! ordered numeric slice the classifier consumes.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::FeatureVector;

/// Version of the feature schema contract
pub const SCHEMA_VERSION: &str = "student.features.v1";

/// Closed set of feature names known to the engine.
///
/// The core twelve are always available; the last three are schema-variant
/// additions that a record may or may not supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    PreviousSemGpa,
    LastTestScore,
    AttendancePct,
    AvgDailyStudyHours,
    SocialMediaHoursPerDay,
    SleepHoursAvg,
    IsBacklog,
    NlpStressScore,
    AcademicIndex,
    SleepDeviation,
    FocusRatio,
    RiskAlarm,
    AvgWeeklyLibraryHours,
    ExtracurricularEngagementScore,
    IsExamWeek,
}

impl FeatureName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::PreviousSemGpa => "previous_sem_gpa",
            FeatureName::LastTestScore => "last_test_score",
            FeatureName::AttendancePct => "attendance_pct",
            FeatureName::AvgDailyStudyHours => "avg_daily_study_hours",
            FeatureName::SocialMediaHoursPerDay => "social_media_hours_per_day",
            FeatureName::SleepHoursAvg => "sleep_hours_avg",
            FeatureName::IsBacklog => "is_backlog",
            FeatureName::NlpStressScore => "nlp_stress_score",
            FeatureName::AcademicIndex => "academic_index",
            FeatureName::SleepDeviation => "sleep_deviation",
            FeatureName::FocusRatio => "focus_ratio",
            FeatureName::RiskAlarm => "risk_alarm",
            FeatureName::AvgWeeklyLibraryHours => "avg_weekly_library_hours",
            FeatureName::ExtracurricularEngagementScore => "extracurricular_engagement_score",
            FeatureName::IsExamWeek => "is_exam_week",
        }
    }

    /// Parse a feature name as it appears in model metadata.
    pub fn parse(name: &str) -> Result<Self, ScoreError> {
        match name {
            "previous_sem_gpa" => Ok(FeatureName::PreviousSemGpa),
            "last_test_score" => Ok(FeatureName::LastTestScore),
            "attendance_pct" => Ok(FeatureName::AttendancePct),
            "avg_daily_study_hours" => Ok(FeatureName::AvgDailyStudyHours),
            "social_media_hours_per_day" => Ok(FeatureName::SocialMediaHoursPerDay),
            "sleep_hours_avg" => Ok(FeatureName::SleepHoursAvg),
            "is_backlog" => Ok(FeatureName::IsBacklog),
            "nlp_stress_score" => Ok(FeatureName::NlpStressScore),
            "academic_index" => Ok(FeatureName::AcademicIndex),
            "sleep_deviation" => Ok(FeatureName::SleepDeviation),
            "focus_ratio" => Ok(FeatureName::FocusRatio),
            "risk_alarm" => Ok(FeatureName::RiskAlarm),
            "avg_weekly_library_hours" => Ok(FeatureName::AvgWeeklyLibraryHours),
            "extracurricular_engagement_score" => Ok(FeatureName::ExtracurricularEngagementScore),
            "is_exam_week" => Ok(FeatureName::IsExamWeek),
            other => Err(ScoreError::UnknownFeature(other.to_string())),
        }
    }
}

impl FeatureVector {
    /// Look up one feature by name. Returns `None` for a schema-variant
    /// feature the record did not supply.
    pub fn value(&self, name: FeatureName) -> Option<f64> {
        match name {
            FeatureName::PreviousSemGpa => Some(self.previous_sem_gpa),
            FeatureName::LastTestScore => Some(self.last_test_score),
            FeatureName::AttendancePct => Some(self.attendance_pct),
            FeatureName::AvgDailyStudyHours => Some(self.avg_daily_study_hours),
            FeatureName::SocialMediaHoursPerDay => Some(self.social_media_hours_per_day),
            FeatureName::SleepHoursAvg => Some(self.sleep_hours_avg),
            FeatureName::IsBacklog => Some(self.is_backlog),
            FeatureName::NlpStressScore => Some(self.nlp_stress_score),
            FeatureName::AcademicIndex => Some(self.academic_index),
            FeatureName::SleepDeviation => Some(self.sleep_deviation),
            FeatureName::FocusRatio => Some(self.focus_ratio),
            FeatureName::RiskAlarm => Some(self.risk_alarm),
            FeatureName::AvgWeeklyLibraryHours => self.avg_weekly_library_hours,
            FeatureName::ExtracurricularEngagementScore => self.extracurricular_engagement_score,
            FeatureName::IsExamWeek => self.is_exam_week,
        }
    }
}

/// Ordered feature contract between the engine and one trained model.
///
/// Construction validates the name list (non-empty, known names, no
/// duplicates); [`FeatureSchema::vectorize`] is the only path from a feature
/// vector to classifier input, so a misordered or incomplete vector cannot
/// be produced silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<FeatureName>,
}

impl FeatureSchema {
    /// Build a schema from model metadata feature names, in training order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ScoreError> {
        if names.is_empty() {
            return Err(ScoreError::EmptySchema);
        }

        let mut parsed = Vec::with_capacity(names.len());
        for name in names {
            let feature = FeatureName::parse(name.as_ref())?;
            if parsed.contains(&feature) {
                return Err(ScoreError::DuplicateFeature(feature.as_str().to_string()));
            }
            parsed.push(feature);
        }

        Ok(Self { names: parsed })
    }

    /// The twelve-feature training order of the reference model.
    pub fn default_training_order() -> Self {
        Self {
            names: vec![
                FeatureName::PreviousSemGpa,
                FeatureName::LastTestScore,
                FeatureName::AttendancePct,
                FeatureName::AvgDailyStudyHours,
                FeatureName::SocialMediaHoursPerDay,
                FeatureName::SleepHoursAvg,
                FeatureName::IsBacklog,
                FeatureName::NlpStressScore,
                FeatureName::AcademicIndex,
                FeatureName::SleepDeviation,
                FeatureName::FocusRatio,
                FeatureName::RiskAlarm,
            ],
        }
    }

    /// Feature names in schema order.
    pub fn names(&self) -> &[FeatureName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Produce the ordered numeric vector the classifier consumes.
    ///
    /// Fails when the schema demands a schema-variant feature the record did
    /// not supply; a short or reordered vector is never produced.
    pub fn vectorize(&self, features: &FeatureVector) -> Result<Vec<f64>, ScoreError> {
        self.names
            .iter()
            .map(|&name| {
                features
                    .value(name)
                    .ok_or_else(|| ScoreError::MissingFeature(name.as_str().to_string()))
            })
            .collect()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::default_training_order()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = ScoreError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(&names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema
            .names
            .iter()
            .map(|n| n.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEngineer;
    use crate::types::RawStudentRecord;
    use pretty_assertions::assert_eq;

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

    #[test]
    fn default_order_matches_training_metadata() {
        let schema = FeatureSchema::default_training_order();
        let names: Vec<&str> = schema.names().iter().map(|n| n.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "previous_sem_gpa",
                "last_test_score",
                "attendance_pct",
                "avg_daily_study_hours",
                "social_media_hours_per_day",
                "sleep_hours_avg",
                "is_backlog",
                "nlp_stress_score",
                "academic_index",
                "sleep_deviation",
                "focus_ratio",
                "risk_alarm",
            ]
        );
    }

    #[test]
    fn vectorize_follows_schema_order() {
        let schema =
            FeatureSchema::from_names(&["focus_ratio", "academic_index", "risk_alarm"]).unwrap();
        let features = FeatureEngineer::engineer(&make_record(), 0.4);

        let values = schema.vectorize(&features).unwrap();
        assert_eq!(values, vec![0.5, 70.0, 0.0]);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let err = FeatureSchema::from_names(&["previous_sem_gpa", "shoe_size"]).unwrap_err();
        assert!(matches!(err, ScoreError::UnknownFeature(name) if name == "shoe_size"));
    }

    #[test]
    fn duplicate_feature_is_rejected() {
        let err =
            FeatureSchema::from_names(&["focus_ratio", "focus_ratio"]).unwrap_err();
        assert!(matches!(err, ScoreError::DuplicateFeature(name) if name == "focus_ratio"));
    }

    #[test]
    fn empty_schema_is_rejected() {
        let names: [&str; 0] = [];
        assert!(matches!(
            FeatureSchema::from_names(&names),
            Err(ScoreError::EmptySchema)
        ));
    }

    #[test]
    fn missing_variant_feature_fails_vectorize() {
        let schema =
            FeatureSchema::from_names(&["academic_index", "avg_weekly_library_hours"]).unwrap();
        let features = FeatureEngineer::engineer(&make_record(), 0.0);

        let err = schema.vectorize(&features).unwrap_err();
        assert!(
            matches!(err, ScoreError::MissingFeature(name) if name == "avg_weekly_library_hours")
        );
    }

    #[test]
    fn supplied_variant_feature_vectorizes() {
        let mut record = make_record();
        record.avg_weekly_library_hours = Some(4.0);
        record.is_exam_week = Some(false);

        let schema = FeatureSchema::from_names(&[
            "academic_index",
            "avg_weekly_library_hours",
            "is_exam_week",
        ])
        .unwrap();
        let features = FeatureEngineer::engineer(&record, 0.0);

        assert_eq!(schema.vectorize(&features).unwrap(), vec![70.0, 4.0, 0.0]);
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = FeatureSchema::default_training_order();
        let json = serde_json::to_string(&schema).unwrap();
        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn schema_json_with_unknown_name_fails() {
        let result: Result<FeatureSchema, _> =
            serde_json::from_str(r#"["previous_sem_gpa", "gpa_delta"]"#);
        assert!(result.is_err());
    }
}
