use serde::Deserialize;

use crate::security::{MAX_HASH_COST, MIN_HASH_COST};

pub const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

/// Session lifetime ceiling: one year
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    #[serde(default = "default_environment")]
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt cost factor applied when a password is set
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    6000
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_password_hash_cost() -> u32 {
    12
}

fn default_environment() -> String {
    "development".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 6000)?
            .set_default("database.url", "postgres://localhost/doctor_booking")?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", DEV_JWT_SECRET)?
            .set_default("jwt.expiry_hours", 24)?
            .set_default("security.password_hash_cost", 12)?
            .set_default("environment", "development")?
            .add_source(config::Environment::default().separator("__"))
            // Flat deployment variables win over nested ones
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("SECRET_KEY").ok())?
            .set_override_option("environment", std::env::var("NODE_ENV").ok())?
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.is_production() && self.jwt.secret == DEV_JWT_SECRET {
            anyhow::bail!("SECRET_KEY must be set in production");
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.security.password_hash_cost) {
            anyhow::bail!(
                "security.password_hash_cost must be between {} and {}",
                MIN_HASH_COST,
                MAX_HASH_COST
            );
        }
        if !(1..=MAX_EXPIRY_HOURS).contains(&self.jwt.expiry_hours) {
            anyhow::bail!("jwt.expiry_hours must be between 1 and {}", MAX_EXPIRY_HOURS);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(environment: &str, secret: &str) -> Config {
        Config {
            server: ServerConfig { host: default_host(), port: default_port() },
            database: DatabaseConfig {
                url: "postgres://localhost/test".into(),
                max_connections: 1,
            },
            jwt: JwtConfig { secret: secret.into(), expiry_hours: 24 },
            security: SecurityConfig { password_hash_cost: 12 },
            environment: environment.into(),
        }
    }

    #[test]
    fn production_flag_is_case_insensitive() {
        assert!(sample("production", "s3cret").is_production());
        assert!(sample("PRODUCTION", "s3cret").is_production());
        assert!(!sample("development", "s3cret").is_production());
    }

    #[test]
    fn production_refuses_development_secret() {
        assert!(sample("production", DEV_JWT_SECRET).check().is_err());
        assert!(sample("development", DEV_JWT_SECRET).check().is_ok());
        assert!(sample("production", "real-secret").check().is_ok());
    }

    #[test]
    fn rejects_out_of_range_hash_cost() {
        let mut config = sample("development", "s3cret");
        config.security.password_hash_cost = 2;
        assert!(config.check().is_err());
        config.security.password_hash_cost = 32;
        assert!(config.check().is_err());
        config.security.password_hash_cost = MIN_HASH_COST;
        assert!(config.check().is_ok());
    }

    #[test]
    fn rejects_unbounded_session_lifetime() {
        let mut config = sample("development", "s3cret");
        config.jwt.expiry_hours = u64::MAX;
        assert!(config.check().is_err());
        config.jwt.expiry_hours = 0;
        assert!(config.check().is_err());
        config.jwt.expiry_hours = MAX_EXPIRY_HOURS;
        assert!(config.check().is_ok());
    }
}
