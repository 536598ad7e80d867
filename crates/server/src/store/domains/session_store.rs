use crate::error::ServerError;
use crate::store::core::RedisStore;
use chrono::{DateTime, Duration, Utc};
use redis::Commands;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const SESSION_KEY_PREFIX: &str = "session:";

/// An opaque bearer token mapped to a user, with an absolute expiry. Expired
/// records are ignored by lookups and purged by the session sweeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: &str, ttl_secs: i64) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub struct SessionStore {
    redis: Arc<RedisStore>,
}

impl SessionStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    fn key(token: &str) -> String {
        format!("{SESSION_KEY_PREFIX}{token}")
    }

    pub fn put_session(&self, session: &Session) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let json = serde_json::to_string(session)?;
        let _: () = con.set(Self::key(&session.token), json)?;
        Ok(())
    }

    pub fn get_session(&self, token: &str) -> Result<Option<Session>, ServerError> {
        let mut con = self.redis.connection()?;
        let raw: Option<String> = con.get(Self::key(token))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let _: () = con.del(Self::key(token))?;
        Ok(())
    }

    pub fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, ServerError> {
        let mut con = self.redis.connection()?;
        let keys: Vec<String> = con.keys(format!("{SESSION_KEY_PREFIX}*"))?;
        let mut removed = 0;
        for key in keys {
            let raw: Option<String> = con.get(&key)?;
            let Some(raw) = raw else { continue };
            let session: Session = serde_json::from_str(&raw)?;
            if session.is_expired(now) {
                let _: () = con.del(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::helper::create_test_app_state;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let app_state = create_test_app_state().await;
        let store = &app_state.store_context.session_store;

        let session = Session::new("u-1", 3600);
        store.put_session(&session).unwrap();

        let stored = store.get_session(&session.token).unwrap().unwrap();
        assert_eq!(stored.user_id, "u-1");
        assert!(!stored.is_expired(Utc::now()));

        store.delete_session(&session.token).unwrap();
        assert!(store.get_session(&session.token).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_sessions() {
        let app_state = create_test_app_state().await;
        let store = &app_state.store_context.session_store;

        let live = Session::new("u-1", 3600);
        let expired = Session::new("u-2", -10);
        store.put_session(&live).unwrap();
        store.put_session(&expired).unwrap();

        let removed = store.delete_expired(Utc::now()).unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_session(&live.token).unwrap().is_some());
        assert!(store.get_session(&expired.token).unwrap().is_none());
    }
}
