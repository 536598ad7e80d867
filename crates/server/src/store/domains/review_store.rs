use crate::error::ServerError;
use crate::store::core::RedisStore;
use redis::Commands;
use shared::models::review::Review;
use std::sync::Arc;

const REVIEW_KEY_PREFIX: &str = "review:";

pub struct ReviewStore {
    redis: Arc<RedisStore>,
}

impl ReviewStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    fn key(id: &str) -> String {
        format!("{REVIEW_KEY_PREFIX}{id}")
    }

    pub fn add_review(&self, review: &Review) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let json = serde_json::to_string(review)?;
        let _: () = con.set(Self::key(&review.id), json)?;
        Ok(())
    }

    pub fn get_review(&self, id: &str) -> Result<Option<Review>, ServerError> {
        let mut con = self.redis.connection()?;
        let raw: Option<String> = con.get(Self::key(id))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_reviews(&self) -> Result<Vec<Review>, ServerError> {
        let mut con = self.redis.connection()?;
        let keys: Vec<String> = con.keys(format!("{REVIEW_KEY_PREFIX}*"))?;
        let mut reviews: Vec<Review> = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = con.get(&key)?;
            if let Some(raw) = raw {
                reviews.push(serde_json::from_str(&raw)?);
            }
        }
        reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reviews)
    }

    pub fn get_reviews_by_bootcamp(&self, bootcamp_id: &str) -> Result<Vec<Review>, ServerError> {
        Ok(self
            .get_reviews()?
            .into_iter()
            .filter(|r| r.bootcamp_id == bootcamp_id)
            .collect())
    }

    /// One review per user per bootcamp; used to reject duplicates.
    pub fn get_review_by_user_and_bootcamp(
        &self,
        user_id: &str,
        bootcamp_id: &str,
    ) -> Result<Option<Review>, ServerError> {
        Ok(self
            .get_reviews_by_bootcamp(bootcamp_id)?
            .into_iter()
            .find(|r| r.user_id == user_id))
    }

    pub fn update_review(&self, review: &Review) -> Result<(), ServerError> {
        self.add_review(review)
    }

    pub fn delete_review(&self, id: &str) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let _: () = con.del(Self::key(id))?;
        Ok(())
    }

    pub fn delete_reviews_by_bootcamp(&self, bootcamp_id: &str) -> Result<usize, ServerError> {
        let reviews = self.get_reviews_by_bootcamp(bootcamp_id)?;
        for review in &reviews {
            self.delete_review(&review.id)?;
        }
        Ok(reviews.len())
    }
}
