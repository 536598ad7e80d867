use crate::error::ServerError;
use crate::store::core::RedisStore;
use redis::Commands;
use shared::models::user::User;
use std::sync::Arc;

const USER_KEY_PREFIX: &str = "user:";

pub struct UserStore {
    redis: Arc<RedisStore>,
}

impl UserStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    fn key(id: &str) -> String {
        format!("{USER_KEY_PREFIX}{id}")
    }

    pub fn add_user(&self, user: &User) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let json = serde_json::to_string(user)?;
        let _: () = con.set(Self::key(&user.id), json)?;
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>, ServerError> {
        let mut con = self.redis.connection()?;
        let raw: Option<String> = con.get(Self::key(id))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_users(&self) -> Result<Vec<User>, ServerError> {
        let mut con = self.redis.connection()?;
        let keys: Vec<String> = con.keys(format!("{USER_KEY_PREFIX}*"))?;
        let mut users: Vec<User> = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = con.get(&key)?;
            if let Some(raw) = raw {
                users.push(serde_json::from_str(&raw)?);
            }
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ServerError> {
        Ok(self.get_users()?.into_iter().find(|u| u.email == email))
    }

    pub fn update_user(&self, user: &User) -> Result<(), ServerError> {
        self.add_user(user)
    }

    pub fn delete_user(&self, id: &str) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let _: () = con.del(Self::key(id))?;
        Ok(())
    }
}
