use crate::error::ServerError;
use crate::store::core::RedisStore;
use redis::Commands;
use shared::models::bootcamp::Bootcamp;
use std::sync::Arc;

const BOOTCAMP_KEY_PREFIX: &str = "bootcamp:";

pub struct BootcampStore {
    redis: Arc<RedisStore>,
}

impl BootcampStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    fn key(id: &str) -> String {
        format!("{BOOTCAMP_KEY_PREFIX}{id}")
    }

    pub fn add_bootcamp(&self, bootcamp: &Bootcamp) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let json = serde_json::to_string(bootcamp)?;
        let _: () = con.set(Self::key(&bootcamp.id), json)?;
        Ok(())
    }

    pub fn get_bootcamp(&self, id: &str) -> Result<Option<Bootcamp>, ServerError> {
        let mut con = self.redis.connection()?;
        let raw: Option<String> = con.get(Self::key(id))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_bootcamps(&self) -> Result<Vec<Bootcamp>, ServerError> {
        let mut con = self.redis.connection()?;
        let keys: Vec<String> = con.keys(format!("{BOOTCAMP_KEY_PREFIX}*"))?;
        let mut bootcamps: Vec<Bootcamp> = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = con.get(&key)?;
            if let Some(raw) = raw {
                bootcamps.push(serde_json::from_str(&raw)?);
            }
        }
        bootcamps.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(bootcamps)
    }

    pub fn update_bootcamp(&self, bootcamp: &Bootcamp) -> Result<(), ServerError> {
        self.add_bootcamp(bootcamp)
    }

    pub fn delete_bootcamp(&self, id: &str) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let _: () = con.del(Self::key(id))?;
        Ok(())
    }

    pub fn get_bootcamp_by_owner(&self, user_id: &str) -> Result<Option<Bootcamp>, ServerError> {
        Ok(self
            .get_bootcamps()?
            .into_iter()
            .find(|b| b.user_id == user_id))
    }

    pub fn set_photo(&self, id: &str, filename: &str) -> Result<(), ServerError> {
        let mut bootcamp = self.must_get(id)?;
        bootcamp.photo = Some(filename.to_string());
        self.update_bootcamp(&bootcamp)
    }

    pub fn set_average_cost(&self, id: &str, average: Option<u32>) -> Result<(), ServerError> {
        let mut bootcamp = self.must_get(id)?;
        bootcamp.average_cost = average;
        self.update_bootcamp(&bootcamp)
    }

    pub fn set_average_rating(&self, id: &str, average: Option<f64>) -> Result<(), ServerError> {
        let mut bootcamp = self.must_get(id)?;
        bootcamp.average_rating = average;
        self.update_bootcamp(&bootcamp)
    }

    fn must_get(&self, id: &str) -> Result<Bootcamp, ServerError> {
        self.get_bootcamp(id)?
            .ok_or_else(|| ServerError::NotFound(format!("Bootcamp not found with id {id}")))
    }
}
