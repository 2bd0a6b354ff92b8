//! Recommendation catalog
//!
//! Canned counseling text keyed by risk driver, held as data rather than
//! inline conditionals so deployments can swap in their own catalog and the
//! mapping can be tested independently of scoring. Also carries the default
//! four-week action plan handed out alongside a report.

use serde::{Deserialize, Serialize};

use crate::types::{DriverFinding, RiskDriver};

/// One driver's recommendation texts, in presentation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub driver: RiskDriver,
    pub recommendations: Vec<String>,
}

/// Declarative driver-to-recommendations mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl RecommendationCatalog {
    /// Load a catalog from a JSON file body.
    pub fn from_json(json: &str) -> Result<Self, crate::error::ScoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Recommendations for a set of triggered drivers, in finding order,
    /// without duplicates.
    pub fn for_drivers(&self, findings: &[DriverFinding]) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for finding in findings {
            if let Some(entry) = self.entries.iter().find(|e| e.driver == finding.driver) {
                for text in &entry.recommendations {
                    if !out.contains(&text.as_str()) {
                        out.push(text);
                    }
                }
            }
        }
        out
    }

    fn entry(driver: RiskDriver, texts: &[&str]) -> CatalogEntry {
        CatalogEntry {
            driver,
            recommendations: texts.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Default for RecommendationCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                Self::entry(
                    RiskDriver::BacklogAttendance,
                    &[
                        "Create backlog clearance timeline",
                        "Prioritize clearing 1-2 backlogs per month",
                        "Seek help from academic advisor",
                        "Set multiple alarms for classes",
                        "Find an attendance buddy",
                        "Reward yourself for perfect attendance weekly",
                    ],
                ),
                Self::entry(
                    RiskDriver::Sleep,
                    &[
                        "Establish fixed sleep schedule (10 PM - 6 AM)",
                        "Avoid screens 1 hour before bedtime",
                        "Create relaxing bedtime routine",
                        "Limit caffeine intake after 2 PM",
                    ],
                ),
                Self::entry(
                    RiskDriver::Focus,
                    &[
                        "Use Pomodoro technique (25 min study, 5 min break)",
                        "Study in distraction-free environment",
                        "Use website blockers during study hours",
                        "Keep phone in another room while studying",
                    ],
                ),
                Self::entry(
                    RiskDriver::Grades,
                    &[
                        "Schedule daily 2-hour focused study sessions",
                        "Join study groups with high-performing peers",
                        "Meet with professors during office hours",
                        "Use active learning techniques (flashcards, practice tests)",
                    ],
                ),
                Self::entry(
                    RiskDriver::Stress,
                    &[
                        "Book a session with the campus counseling center",
                        "Practice 10 minutes of daily breathing exercises",
                        "Talk to a trusted friend or mentor about workload",
                        "Schedule one screen-free evening per week",
                    ],
                ),
            ],
        }
    }
}

/// One week of the action plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWeek {
    pub theme: String,
    pub tasks: Vec<String>,
}

/// Multi-week action plan handed out with a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub weeks: Vec<PlanWeek>,
}

impl ActionPlan {
    /// The standard four-week plan.
    pub fn four_week() -> Self {
        fn week(theme: &str, tasks: &[&str]) -> PlanWeek {
            PlanWeek {
                theme: theme.to_string(),
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
            }
        }

        Self {
            weeks: vec![
                week(
                    "Assessment & Immediate Actions",
                    &[
                        "Complete detailed self-assessment of current habits",
                        "Meet with academic advisor to discuss backlogs",
                        "Set up study schedule and stick to it for 5 days",
                        "Start sleep hygiene routine (fixed bedtime)",
                        "Install focus apps (Forest, Cold Turkey, etc.)",
                    ],
                ),
                week(
                    "Building Foundations",
                    &[
                        "Join at least one study group",
                        "Complete backlog assignment #1",
                        "Maintain 90% attendance this week",
                        "Practice Pomodoro technique daily",
                        "Reduce social media by 25%",
                    ],
                ),
                week(
                    "Consistency & Improvement",
                    &[
                        "Meet with professor for difficult subjects",
                        "Complete backlog assignment #2",
                        "Achieve 95% attendance this week",
                        "Take practice test for upcoming exams",
                        "Maintain consistent sleep schedule",
                    ],
                ),
                week(
                    "Evaluation & Future Planning",
                    &[
                        "Evaluate progress with advisor",
                        "Complete final backlog assignment",
                        "Take mock exam to assess improvement",
                        "Plan next month's goals",
                        "Celebrate improvements (healthy reward)",
                    ],
                ),
            ],
        }
    }
}
