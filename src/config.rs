use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_PUBLIC_RPS: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub public_rps: u32,
    pub cors_allowed_origins: Vec<String>,
    /// Table holding shortlisted candidates; must exist before the interviews table is created.
    pub candidate_table: String,
    /// Table holding job descriptions; must exist before the interviews table is created.
    pub jd_table: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8000"),
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            public_rps: get_env_parse_or("PUBLIC_RPS", DEFAULT_PUBLIC_RPS)?,
            cors_allowed_origins: parse_list(&get_env_or("CORS_ALLOWED_ORIGINS", "")),
            candidate_table: get_env_or("CANDIDATE_TABLE", "shortlisted_candidate"),
            jd_table: get_env_or("JD_TABLE", "jd"),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_origin_list() {
        assert_eq!(
            parse_list(" http://localhost:5173, https://app.example.com ,,"),
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn reports_invalid_numbers() {
        let parsed: u32 = parse_value("PUBLIC_RPS", " 25 ").unwrap();
        assert_eq!(parsed, 25);

        let err = parse_value::<u32>("PUBLIC_RPS", "fast").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.starts_with("Invalid value for PUBLIC_RPS")));
    }
}
