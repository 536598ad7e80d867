use log::warn;
use std::env;
use std::fmt::Debug;
use std::str::FromStr;

const CONFIG_FILE: &str = "config/config.env";
const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration. No CLI flags; everything is driven by environment
/// variables, seeded from `config/config.env` when present. Values already in
/// the process environment win over the file.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub api_prefix: String,
    pub port: u16,
    pub redis_url: String,
    pub file_upload_path: String,
    pub max_file_upload: usize,
    pub token_expire_secs: i64,
    pub public_dir: String,
}

impl Config {
    pub fn load() -> Self {
        if dotenvy::from_filename(CONFIG_FILE).is_err() {
            warn!("No {CONFIG_FILE} file found, using process environment only");
        }
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self {
            environment: env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string()),
            api_prefix: env::var("API").unwrap_or_else(|_| "/api/v1".to_string()),
            port: parse_var("PORT", DEFAULT_PORT),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            file_upload_path: env::var("FILE_UPLOAD_PATH")
                .unwrap_or_else(|_| "./public/uploads".to_string()),
            max_file_upload: parse_var("MAX_FILE_UPLOAD", 1_000_000),
            token_expire_secs: parse_var("TOKEN_EXPIRE_SECS", 60 * 60 * 24 * 30),
            public_dir: "./public".to_string(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + Debug,
{
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {name} value {raw:?}, falling back to {default:?}");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env var mutations cannot race each other.
    #[test]
    fn test_from_env_defaults_and_overrides() {
        env::remove_var("NODE_ENV");
        env::remove_var("API");
        env::remove_var("PORT");

        let config = Config::from_env();
        assert_eq!(config.port, 5000);
        assert_eq!(config.api_prefix, "/api/v1");
        assert!(!config.is_development());

        env::set_var("NODE_ENV", "development");
        env::set_var("API", "/api/v2");
        env::set_var("PORT", "6000");
        let config = Config::from_env();
        assert_eq!(config.port, 6000);
        assert_eq!(config.api_prefix, "/api/v2");
        assert!(config.is_development());

        env::set_var("PORT", "not-a-port");
        let config = Config::from_env();
        assert_eq!(config.port, 5000);

        env::remove_var("NODE_ENV");
        env::remove_var("API");
        env::remove_var("PORT");
    }
}
