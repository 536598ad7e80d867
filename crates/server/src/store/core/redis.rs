use crate::fatal::FatalSender;
#[cfg(test)]
use log::debug;
use log::info;
use redis::{Client, Connection, RedisError};
#[cfg(test)]
use redis_test::server::RedisServer;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::thread;
#[cfg(test)]
use std::time::Duration;

#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    fatal: Option<FatalSender>,
    #[allow(dead_code)]
    #[cfg(test)]
    server: Arc<RedisServer>,
}

impl RedisStore {
    pub fn new(redis_url: &str) -> Self {
        match Client::open(redis_url) {
            Ok(client) => {
                info!("Document store client opened for {redis_url}");
                Self {
                    client,
                    fatal: None,
                    #[cfg(test)]
                    server: Arc::new(RedisServer::new()),
                }
            }
            Err(e) => {
                panic!("Document store connection error: {e}");
            }
        }
    }

    pub fn with_fatal_sender(mut self, fatal: FatalSender) -> Self {
        self.fatal = Some(fatal);
        self
    }

    /// All store access goes through here. Losing the document store is not
    /// survivable, so a connection failure is reported to the supervisor
    /// before the error propagates to the caller.
    pub fn connection(&self) -> Result<Connection, RedisError> {
        match self.client.get_connection() {
            Ok(con) => Ok(con),
            Err(e) => {
                if let Some(fatal) = &self.fatal {
                    fatal.report(format!("Document store unreachable: {e}"));
                }
                Err(e)
            }
        }
    }

    /// Startup reachability check.
    pub fn ping(&self) -> Result<(), RedisError> {
        let mut con = self.client.get_connection()?;
        redis::cmd("PING").query::<String>(&mut con)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let server = RedisServer::new();

        let (host, port) = match server.client_addr() {
            redis::ConnectionAddr::Tcp(host, port) => (host.clone(), *port),
            _ => panic!("Expected TCP connection"),
        };

        let redis_url = format!("redis://{}:{}", host, port);
        debug!("Starting test Redis server at {}", redis_url);

        thread::sleep(Duration::from_millis(100));

        let client = loop {
            if let Ok(client) = Client::open(redis_url.clone()) {
                if let Ok(mut conn) = client.get_connection() {
                    if redis::cmd("PING").query::<String>(&mut conn).is_ok() {
                        break client;
                    }
                }
            }
            thread::sleep(Duration::from_millis(100));
        };

        Self {
            client,
            fatal: None,
            server: Arc::new(server),
        }
    }
}
