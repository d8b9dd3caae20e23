use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for environment variable {0}")]
    Invalid(&'static str),
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: optional("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: optional("PORT")
                .map(|v| v.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT")))
                .transpose()?
                .unwrap_or(5500),
            environment: optional("APP_ENV").unwrap_or_else(|| "development".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_minutes: optional("JWT_TTL_MINUTES")
                .map(|v| {
                    v.parse::<i64>()
                        .map_err(|_| ConfigError::Invalid("JWT_TTL_MINUTES"))
                })
                .transpose()?
                .unwrap_or(24 * 60),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_an_error() {
        std::env::remove_var("DATABASE_URL");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }
}
