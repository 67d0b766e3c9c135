use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// Lifetime of issued access tokens, in minutes.
    pub token_ttl_minutes: i64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("TEAMTRACK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TEAMTRACK_HOST: {e}"))?;

        let port: u16 = env_or("TEAMTRACK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TEAMTRACK_PORT: {e}"))?;

        let token_ttl_minutes: i64 = env_or("TEAMTRACK_TOKEN_TTL_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid TEAMTRACK_TOKEN_TTL_MINUTES: {e}"))?;
        if token_ttl_minutes <= 0 {
            return Err("TEAMTRACK_TOKEN_TTL_MINUTES must be positive".to_string());
        }

        let log_level = env_or("TEAMTRACK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            token_ttl_minutes,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
