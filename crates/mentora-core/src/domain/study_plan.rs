use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step within a study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
    /// 1-based week the milestone belongs to.
    pub week: u32,
}

/// StudyPlan entity - an AI-generated plan for a user's learning goal.
///
/// No uniqueness invariant: a user may generate any number of plans,
/// including for the same topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: String,
    pub topic: String,
    pub level: Option<String>,
    pub weeks: u32,
    pub hours_per_week: u32,
    pub overview: String,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
}

impl StudyPlan {
    /// Create a new plan with generated ID and timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        topic: String,
        level: Option<String>,
        weeks: u32,
        hours_per_week: u32,
        overview: String,
        milestones: Vec<Milestone>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            topic,
            level,
            weeks,
            hours_per_week,
            overview,
            milestones,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_assigns_id_and_timestamp() {
        let plan = StudyPlan::new(
            "u1".into(),
            "Rust".into(),
            Some("beginner".into()),
            4,
            5,
            "Learn Rust in four weeks".into(),
            vec![],
        );
        assert!(!plan.id.is_nil());
        assert_eq!(plan.weeks, 4);
        assert!(plan.created_at <= Utc::now());
    }
}
