//! BSON document shapes for the collections, mirroring the domain entities.

use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mentora_core::domain::{CuratedResource, Milestone, ResourceSet, StudyPlan};
use mentora_core::error::RepoError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDoc {
    pub title: String,
    pub description: String,
    pub week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlanDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub level: Option<String>,
    pub weeks: u32,
    pub hours_per_week: u32,
    pub overview: String,
    pub milestones: Vec<MilestoneDoc>,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDoc {
    pub title: String,
    pub description: String,
    pub kind: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSetDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub resources: Vec<ResourceDoc>,
    pub created_at: bson::DateTime,
}

fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

fn from_bson_datetime(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn parse_id(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(|e| RepoError::Query(format!("invalid stored id: {e}")))
}

impl From<&StudyPlan> for StudyPlanDoc {
    fn from(plan: &StudyPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            user_id: plan.user_id.clone(),
            topic: plan.topic.clone(),
            level: plan.level.clone(),
            weeks: plan.weeks,
            hours_per_week: plan.hours_per_week,
            overview: plan.overview.clone(),
            milestones: plan
                .milestones
                .iter()
                .map(|m| MilestoneDoc {
                    title: m.title.clone(),
                    description: m.description.clone(),
                    week: m.week,
                })
                .collect(),
            created_at: to_bson_datetime(plan.created_at),
        }
    }
}

impl StudyPlanDoc {
    pub fn into_domain(self) -> Result<StudyPlan, RepoError> {
        Ok(StudyPlan {
            id: parse_id(&self.id)?,
            user_id: self.user_id,
            topic: self.topic,
            level: self.level,
            weeks: self.weeks,
            hours_per_week: self.hours_per_week,
            overview: self.overview,
            milestones: self
                .milestones
                .into_iter()
                .map(|m| Milestone {
                    title: m.title,
                    description: m.description,
                    week: m.week,
                })
                .collect(),
            created_at: from_bson_datetime(self.created_at),
        })
    }
}

impl From<&ResourceSet> for ResourceSetDoc {
    fn from(set: &ResourceSet) -> Self {
        Self {
            id: set.id.to_string(),
            user_id: set.user_id.clone(),
            subject: set.subject.clone(),
            resources: set
                .resources
                .iter()
                .map(|r| ResourceDoc {
                    title: r.title.clone(),
                    description: r.description.clone(),
                    kind: r.kind.clone(),
                    link: r.link.clone(),
                })
                .collect(),
            created_at: to_bson_datetime(set.created_at),
        }
    }
}

impl ResourceSetDoc {
    pub fn into_domain(self) -> Result<ResourceSet, RepoError> {
        Ok(ResourceSet {
            id: parse_id(&self.id)?,
            user_id: self.user_id,
            subject: self.subject,
            resources: self
                .resources
                .into_iter()
                .map(|r| CuratedResource {
                    title: r.title,
                    description: r.description,
                    kind: r.kind,
                    link: r.link,
                })
                .collect(),
            created_at: from_bson_datetime(self.created_at),
        })
    }
}
