// src/config.rs
//
// Application configuration, read once from the environment at startup.
// DB_HOST / DB_USER / DB_PASSWORD / DB_NAME / DB_PORT and JWT_SECRET are
// required (startup fails fast when any is absent); HOST and PORT are
// optional and fall back to 127.0.0.1:3000.

use std::net::IpAddr;

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Returns an error naming the first missing or malformed variable.
    pub fn from_env() -> Result<Config, String> {
        let db_host = required("DB_HOST")?;
        let db_user = required("DB_USER")?;
        let db_password = required("DB_PASSWORD")?;
        let db_name = required("DB_NAME")?;
        let db_port = required("DB_PORT")?
            .parse::<u16>()
            .map_err(|e| format!("DB_PORT is not a valid port: {e}"))?;
        let jwt_secret = required("JWT_SECRET")?;

        let host = std::env::var("HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| format!("HOST is not a valid IP address: {e}"))?;
        let port = match std::env::var("PORT") {
            Ok(p) => p
                .parse::<u16>()
                .map_err(|e| format!("PORT is not a valid port: {e}"))?,
            Err(_) => 3000,
        };

        Ok(Config {
            db_host,
            db_user,
            db_password,
            db_name,
            db_port,
            jwt_secret,
            host,
            port,
        })
    }

    /// Postgres connection string assembled from the DB_* parts.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }
}

fn required(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("{name} must be set"))
}
