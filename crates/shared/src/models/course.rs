use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub bootcamp_id: String,
    pub title: String,
    pub description: String,
    pub weeks: u32,
    pub tuition: u32,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRequest {
    pub bootcamp_id: String,
    pub title: String,
    pub description: String,
    pub weeks: u32,
    pub tuition: u32,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarship_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<u32>,
    pub tuition: Option<u32>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl Course {
    pub fn new(request: CourseRequest, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bootcamp_id: request.bootcamp_id,
            title: request.title,
            description: request.description,
            weeks: request.weeks,
            tuition: request.tuition,
            minimum_skill: request.minimum_skill,
            scholarship_available: request.scholarship_available,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: CourseUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(weeks) = update.weeks {
            self.weeks = weeks;
        }
        if let Some(tuition) = update.tuition {
            self.tuition = tuition;
        }
        if let Some(minimum_skill) = update.minimum_skill {
            self.minimum_skill = minimum_skill;
        }
        if let Some(scholarship_available) = update.scholarship_available {
            self.scholarship_available = scholarship_available;
        }
    }
}
