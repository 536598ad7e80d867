pub mod api;
pub mod config;
pub mod error;
pub mod fatal;
pub mod store;
pub mod sweeper;

pub use api::server::{build_auth_state, build_server, AppState};
pub use config::Config;
pub use error::ServerError;
pub use fatal::FatalSender;
pub use store::core::RedisStore;
pub use store::core::StoreContext;
pub use sweeper::SessionSweeper;
