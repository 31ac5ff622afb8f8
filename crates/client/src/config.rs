//! # Client Configuration Module
//!
//! Loads settings for talking to the scheduling service from environment
//! variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `SCHEDULING_API_URL`: Base URL of the scheduling service (required)
//! - `SCHEDULING_API_TOKEN`: Bearer token for the service (optional; calls fail with `AuthMissing` without it)
//! - `SCHEDULING_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `TIMETABLE_DAYS`: Comma-separated grid columns (default: all seven days)

use eyre::{Result, WrapErr, eyre};
use std::env;
use std::time::Duration;
use timetable_core::models::Day;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the scheduling service, without a trailing slash
    pub api_url: String,

    /// Bearer token supplied by the sign-in flow
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Log level for the application
    pub log_level: Level,

    /// Grid columns, in display order
    pub days: Vec<Day>,
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `SCHEDULING_API_URL` is not set
    /// - `TIMETABLE_DAYS` contains an unknown day or no day at all
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("SCHEDULING_API_URL")
            .wrap_err("SCHEDULING_API_URL environment variable must be set")?
            .trim_end_matches('/')
            .to_string();

        let api_token = env::var("SCHEDULING_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let request_timeout = env::var("SCHEDULING_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let days = match env::var("TIMETABLE_DAYS") {
            Ok(list) => parse_days(&list)?,
            Err(_) => Day::ALL.to_vec(),
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout,
            log_level,
            days,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_days(list: &str) -> Result<Vec<Day>> {
    let days = Day::parse_list(list).map_err(|err| eyre!("Invalid TIMETABLE_DAYS: {}", err))?;
    if days.is_empty() {
        return Err(eyre!("TIMETABLE_DAYS must name at least one day"));
    }
    Ok(days)
}
