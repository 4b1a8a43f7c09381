use crate::errors::ConfigError;
use std::{env, path::PathBuf};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/contacts.db";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub seed_users: Vec<SeedUser>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = env::var("APP_DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let seed_users = match env::var("APP_SEED_USERS") {
            Ok(raw) => parse_seed_users(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            port,
            database_url,
            seed_users,
        })
    }

    /// File backing the database, if the URL points at one.
    pub fn database_file(&self) -> Option<PathBuf> {
        database_file(&self.database_url)
    }
}

pub fn parse_seed_users(raw: &str) -> Result<Vec<SeedUser>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((username, password)) if !username.is_empty() && !password.is_empty() => {
                Ok(SeedUser {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidSeedUser(entry.to_string())),
        })
        .collect()
}

fn database_file(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}
