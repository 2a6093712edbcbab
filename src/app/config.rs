//! Exporter configuration loaded from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::domain::ConfigError;
use crate::infra::{LndClientConfig, RetryPolicy};

use super::spec::DEFAULT_METRICS_SPEC;

pub const DEFAULT_MACAROON_PATH: &str = "/macaroon.hex";

/// Fully resolved exporter settings. Built once at startup.
#[derive(Debug, Validate)]
pub struct ExporterConfig {
    #[validate(length(min = 1))]
    pub lnd_host: String,
    #[validate(range(min = 1))]
    pub lnd_rest_port: u16,
    pub lnd_rest_tls: bool,
    pub metrics_bind: IpAddr,
    #[validate(range(min = 1))]
    pub metrics_port: u16,
    pub metrics_spec: String,
    #[validate(range(exclusive_min = 0.0))]
    pub timeout_secs: f64,
    #[validate(range(min = 1))]
    pub max_retries: u32,
    #[validate(range(min = 0.0))]
    pub retry_sleep_secs: f64,
    pub sleep_after_final_failure: bool,
    pub log_json: bool,
    pub credential: SecretString,
}

impl ExporterConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a value does not parse, fails
    /// validation, or no credential can be found.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let macaroon_path = lookup("MACAROON_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MACAROON_PATH));

        let config = Self {
            lnd_host: lookup("LND_HOST").unwrap_or_else(|| "localhost".to_string()),
            lnd_rest_port: parse_or(&lookup, "LND_REST_PORT", 8080)?,
            lnd_rest_tls: parse_bool_or(&lookup, "LND_REST_TLS", true)?,
            metrics_bind: parse_or(&lookup, "METRICS_BIND", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            metrics_port: parse_or(&lookup, "METRICS_PORT", 9332)?,
            metrics_spec: lookup("METRICS").unwrap_or_else(|| DEFAULT_METRICS_SPEC.to_string()),
            timeout_secs: parse_seconds_or(&lookup, "LND_REST_TIMEOUT", 60.0)?,
            max_retries: parse_or(&lookup, "LND_REST_RETRIES", 1)?,
            retry_sleep_secs: parse_seconds_or(&lookup, "LND_REST_RETRY_SLEEP", 10.0)?,
            sleep_after_final_failure: parse_bool_or(
                &lookup,
                "LND_REST_SLEEP_AFTER_FINAL_FAILURE",
                false,
            )?,
            log_json: log_json_from(&lookup),
            credential: load_credential(lookup("ADMIN_MACAROON_HEX"), &macaroon_path)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Read only the log format, so tracing can be installed before the rest
    /// of the configuration loads and its errors get logged.
    #[must_use]
    pub fn log_json_from_env() -> bool {
        log_json_from(&|key: &str| std::env::var(key).ok())
    }

    #[must_use]
    pub fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::new(self.metrics_bind, self.metrics_port)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs_f64(self.retry_sleep_secs),
            sleep_after_final_failure: self.sleep_after_final_failure,
        }
    }

    /// How recent the last successful fetch must be for the exporter to
    /// report ready: three worst-case request cycles.
    #[must_use]
    pub fn readiness_window(&self) -> Duration {
        let sleeps = f64::from(self.max_retries.saturating_sub(1)) * self.retry_sleep_secs;
        let cycle = self.timeout_secs * f64::from(self.max_retries) + sleeps;
        Duration::from_secs_f64(cycle * 3.0)
    }

    /// Client settings for the LND REST client.
    #[must_use]
    pub fn lnd_client_config(&self) -> LndClientConfig {
        let mut config = LndClientConfig::new(
            self.lnd_host.clone(),
            self.lnd_rest_port,
            SecretString::from(self.credential.expose_secret().to_string()),
        );
        config.tls = self.lnd_rest_tls;
        config.timeout = self.timeout();
        config.retry = self.retry_policy();
        config
    }
}

fn log_json_from<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_FORMAT").is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

/// Credential from the environment, falling back to the macaroon file.
fn load_credential(
    from_env: Option<String>,
    path: &std::path::Path,
) -> Result<SecretString, ConfigError> {
    if let Some(hex) = from_env.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(hex));
    }

    let missing = || ConfigError::MissingCredential {
        path: path.display().to_string(),
    };
    let contents = std::fs::read_to_string(path).map_err(|_| missing())?;
    let hex = contents.trim();
    if hex.is_empty() {
        return Err(missing());
    }
    Ok(SecretString::from(hex.to_string()))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_seconds_or<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: f64 = parse_or(lookup, key, default)?;
    // Upper bound keeps Duration::from_secs_f64 from overflowing.
    if !secs.is_finite() || !(0.0..=86_400.0).contains(&secs) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} is not a number of seconds between 0 and 86400", secs),
        });
    }
    Ok(secs)
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{}' is not a boolean", v),
            }),
        },
    }
}
