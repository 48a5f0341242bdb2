//! Domain entities.

mod resource;
mod study_plan;

pub use resource::{CuratedResource, ResourceSet};
pub use study_plan::{Milestone, StudyPlan};
