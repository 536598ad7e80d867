use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub bootcamp_id: String,
    pub user_id: String,
    pub title: String,
    pub text: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub bootcamp_id: String,
    pub title: String,
    pub text: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<u8>,
}

impl Review {
    pub fn new(request: ReviewRequest, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bootcamp_id: request.bootcamp_id,
            user_id: user_id.to_string(),
            title: request.title,
            text: request.text,
            rating: request.rating,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: ReviewUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
    }
}

pub fn rating_in_range(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
