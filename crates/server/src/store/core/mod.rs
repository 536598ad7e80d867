pub mod context;
pub mod redis;

pub use context::StoreContext;
pub use redis::RedisStore;
