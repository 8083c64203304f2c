use chrono::{DateTime, Utc};
use std::{env, path::PathBuf};
use thiserror::Error;

use crate::dates::parse_timestamp;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/walkmate.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("APP_FIXED_NOW must be an RFC 3339 timestamp, got {0:?}")]
    InvalidFixedNow(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Pins the clock to one instant when set.
    pub fixed_now: Option<DateTime<Utc>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let data_path = lookup("APP_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let fixed_now = match lookup("APP_FIXED_NOW") {
            Some(value) => {
                Some(parse_timestamp(&value).ok_or(ConfigError::InvalidFixedNow(value))?)
            }
            None => None,
        };

        Ok(Self {
            port,
            data_path,
            fixed_now,
        })
    }
}
