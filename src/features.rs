//! Feature engineering
//!
//! This module combines a raw student record with the text-derived stress
//! probability into the model-ready feature vector, computing the derived
//! features:
//! - Academic index (blended GPA + last test score)
//! - Sleep deviation from the 8-hour ideal
//! - Focus ratio (study vs. social media time)
//! - Risk alarm (compound backlog + attendance flag)

use crate::types::{FeatureVector, RawStudentRecord};

/// Nightly sleep hours treated as ideal; deviation is measured from here.
pub const IDEAL_SLEEP_HOURS: f64 = 8.0;

/// Attendance percentage below which a backlog escalates to the risk alarm.
pub const RISK_ALARM_ATTENDANCE_FLOOR: u32 = 75;

/// Feature engineer for building model-ready vectors
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Engineer a feature vector from a raw record and a stress probability.
    ///
    /// Pure and deterministic: the same record and stress score always
    /// produce a bit-identical vector. Derived fields are computed here and
    /// nowhere else; simulations rebuild the vector from an edited record
    /// rather than patching derived fields.
    pub fn engineer(raw: &RawStudentRecord, nlp_stress_score: f64) -> FeatureVector {
        FeatureVector {
            previous_sem_gpa: raw.previous_sem_gpa,
            last_test_score: raw.last_test_score as f64,
            attendance_pct: raw.attendance_pct as f64,
            avg_daily_study_hours: raw.avg_daily_study_hours,
            social_media_hours_per_day: raw.social_media_hours_per_day,
            sleep_hours_avg: raw.sleep_hours_avg,
            is_backlog: if raw.is_backlog { 1.0 } else { 0.0 },
            nlp_stress_score,
            academic_index: compute_academic_index(raw),
            sleep_deviation: compute_sleep_deviation(raw),
            focus_ratio: compute_focus_ratio(raw),
            risk_alarm: compute_risk_alarm(raw),
            avg_weekly_library_hours: raw.avg_weekly_library_hours,
            extracurricular_engagement_score: raw.extracurricular_engagement_score,
            is_exam_week: raw.is_exam_week.map(|b| if b { 1.0 } else { 0.0 }),
        }
    }
}

/// Blended 0-100 academic score: (gpa * 10 + last test score) / 2
fn compute_academic_index(raw: &RawStudentRecord) -> f64 {
    (raw.previous_sem_gpa * 10.0 + raw.last_test_score as f64) / 2.0
}

/// Unsigned distance from the 8-hour sleep ideal.
/// Over- and under-sleep are penalized identically.
fn compute_sleep_deviation(raw: &RawStudentRecord) -> f64 {
    (raw.sleep_hours_avg - IDEAL_SLEEP_HOURS).abs()
}

/// Study hours per distraction hour. The +1 offset keeps the ratio defined
/// at zero social media use and softens sensitivity near zero.
fn compute_focus_ratio(raw: &RawStudentRecord) -> f64 {
    raw.avg_daily_study_hours / (raw.social_media_hours_per_day + 1.0)
}

/// Compound early-warning flag: backlog plus attendance below the floor.
fn compute_risk_alarm(raw: &RawStudentRecord) -> f64 {
    if raw.is_backlog && raw.attendance_pct < RISK_ALARM_ATTENDANCE_FLOOR {
        1.0
    } else {
        0.0
    }
}
