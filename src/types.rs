//! Core types for the Scholar Triage pipeline
//!
//! This module defines the data structures that flow through each stage of
//! the pipeline: the raw student record, the engineered feature vector, and
//! the risk assessment produced by the scorer.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw self-reported student record, one per assessment request.
///
/// Numeric ranges are enforced by the form layer upstream; the engine treats
/// the record as pre-validated and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStudentRecord {
    /// Previous semester GPA (0-10 scale)
    pub previous_sem_gpa: f64,
    /// Most recent test score (0-100)
    pub last_test_score: u32,
    /// Attendance percentage (0-100)
    pub attendance_pct: u32,
    /// Whether the student carries any backlog
    pub is_backlog: bool,
    /// Average daily study hours
    pub avg_daily_study_hours: f64,
    /// Daily social media hours
    pub social_media_hours_per_day: f64,
    /// Average nightly sleep hours
    pub sleep_hours_avg: f64,
    /// Free-form diary entry. Non-string JSON values degrade to "".
    #[serde(default, deserialize_with = "lenient_string")]
    pub diary_text: String,
    /// Weekly library hours (schema-variant field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_weekly_library_hours: Option<f64>,
    /// Extracurricular engagement score (schema-variant field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracurricular_engagement_score: Option<f64>,
    /// Whether the record was captured during an exam week (schema-variant field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exam_week: Option<bool>,
}

/// Accept any JSON value for the diary field, coercing non-strings to "".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Model-ready feature vector derived from a raw record and a stress score.
///
/// Indicator fields (`is_backlog`, `risk_alarm`, `is_exam_week`) are encoded
/// as 0.0/1.0 so the vector feeds the tabular classifier without further
/// conversion. A vector is only ever constructed by the feature engineer and
/// never mutated in place; simulations rebuild it from an edited raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub previous_sem_gpa: f64,
    pub last_test_score: f64,
    pub attendance_pct: f64,
    pub avg_daily_study_hours: f64,
    pub social_media_hours_per_day: f64,
    pub sleep_hours_avg: f64,
    /// 1.0 when the student carries a backlog, else 0.0
    pub is_backlog: f64,
    /// Stress probability from the text classifier (0-1)
    pub nlp_stress_score: f64,
    /// Blended 0-100 score: (gpa * 10 + last test score) / 2
    pub academic_index: f64,
    /// Unsigned distance from the 8-hour sleep ideal
    pub sleep_deviation: f64,
    /// Study hours per distraction hour: study / (social media + 1)
    pub focus_ratio: f64,
    /// 1.0 iff backlog and attendance below 75, else 0.0
    pub risk_alarm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_weekly_library_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracurricular_engagement_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exam_week: Option<f64>,
}

/// Risk tier banding of the continuous risk probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

/// Named risk driver, one per independently evaluated rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDriver {
    /// Compound early-warning flag: backlog plus low attendance
    BacklogAttendance,
    Sleep,
    Focus,
    Grades,
    Stress,
}

impl RiskDriver {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDriver::BacklogAttendance => "Backlogs/Attendance",
            RiskDriver::Sleep => "Sleep",
            RiskDriver::Focus => "Focus",
            RiskDriver::Grades => "Grades",
            RiskDriver::Stress => "Stress",
        }
    }
}

/// Severity attached to a triggered driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DriverSeverity {
    Medium,
    High,
}

impl DriverSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverSeverity::Medium => "MEDIUM",
            DriverSeverity::High => "HIGH",
        }
    }
}

/// One triggered risk-driver rule with the feature value that tripped it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFinding {
    pub driver: RiskDriver,
    pub severity: DriverSeverity,
    /// The feature value the rule observed (e.g. the focus ratio itself)
    pub observed: f64,
}

/// Result of scoring one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Probability of the "at risk" class (0-1)
    pub risk_probability: f64,
    pub risk_tier: RiskTier,
    /// Triggered drivers, most severe first. Empty means no critical risk
    /// factors were found, which is itself a reportable state.
    pub drivers: Vec<DriverFinding>,
    /// Stress probability echoed from the text classifier (0-1)
    pub nlp_stress_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn diary_text_accepts_non_string_values() {
        let json = r#"{
            "previous_sem_gpa": 7.5,
            "last_test_score": 65,
            "attendance_pct": 80,
            "is_backlog": false,
            "avg_daily_study_hours": 2.0,
            "social_media_hours_per_day": 3.0,
            "sleep_hours_avg": 6.5,
            "diary_text": 42
        }"#;

        let record: RawStudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.diary_text, "");
    }

    #[test]
    fn diary_text_defaults_to_empty_when_absent() {
        let json = r#"{
            "previous_sem_gpa": 7.5,
            "last_test_score": 65,
            "attendance_pct": 80,
            "is_backlog": false,
            "avg_daily_study_hours": 2.0,
            "social_media_hours_per_day": 3.0,
            "sleep_hours_avg": 6.5
        }"#;

        let record: RawStudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.diary_text, "");
        assert!(record.avg_weekly_library_hours.is_none());
        assert!(record.is_exam_week.is_none());
    }

    #[test]
    fn tier_and_driver_labels() {
        assert_eq!(RiskTier::High.as_str(), "HIGH");
        assert_eq!(RiskDriver::BacklogAttendance.as_str(), "Backlogs/Attendance");
        assert_eq!(DriverSeverity::Medium.as_str(), "MEDIUM");
    }

    #[test]
    fn severity_orders_high_above_medium() {
        assert!(DriverSeverity::High > DriverSeverity::Medium);
    }
}
