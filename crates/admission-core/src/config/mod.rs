use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the admissions desk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub reporting: ReportingConfig,
    pub access: AccessConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let store_path = env::var("ADMISSIONS_STORE_PATH")
            .unwrap_or_else(|_| "admissions.json".to_string());
        let report_dir =
            env::var("ADMISSIONS_REPORT_DIR").unwrap_or_else(|_| "reports".to_string());

        let raw_offset =
            env::var("ADMISSIONS_UTC_OFFSET").unwrap_or_else(|_| "+00:00".to_string());
        let zone = parse_utc_offset(&raw_offset)
            .ok_or_else(|| ConfigError::InvalidUtcOffset { value: raw_offset })?;

        let delivery_delay = env::var("ADMISSIONS_DELIVERY_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDeliveryDelay)?;

        let password = env::var("ADMISSIONS_ACCESS_PASSWORD")
            .ok()
            .filter(|value| !value.is_empty());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                store_path: PathBuf::from(store_path),
            },
            reporting: ReportingConfig {
                report_dir: PathBuf::from(report_dir),
                zone,
                delivery_delay,
            },
            access: AccessConfig { password },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the admissions table is persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub store_path: PathBuf,
}

/// Report output, reporting time zone, and delivery pacing.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub report_dir: PathBuf,
    pub zone: FixedOffset,
    pub delivery_delay: Duration,
}

/// Shared access secret. `None` rejects every attempt.
#[derive(Clone)]
pub struct AccessConfig {
    pub password: Option<String>,
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Parses `+HH:MM`, `-HH:MM`, `+HHMM`, or `Z`.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = if let Some(rest) = raw.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => return None,
    };
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return None;
    }
    let hours: u8 = hours.parse().ok()?;
    let minutes: u8 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (i32::from(hours) * 3600 + i32::from(minutes) * 60))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUtcOffset { value: String },
    InvalidDeliveryDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUtcOffset { value } => write!(
                f,
                "ADMISSIONS_UTC_OFFSET must look like +HH:MM or -HH:MM (got '{value}')"
            ),
            ConfigError::InvalidDeliveryDelay => {
                write!(f, "ADMISSIONS_DELIVERY_DELAY_MS must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ADMISSIONS_STORE_PATH");
        env::remove_var("ADMISSIONS_REPORT_DIR");
        env::remove_var("ADMISSIONS_ACCESS_PASSWORD");
        env::remove_var("ADMISSIONS_UTC_OFFSET");
        env::remove_var("ADMISSIONS_DELIVERY_DELAY_MS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.storage.store_path, PathBuf::from("admissions.json"));
        assert_eq!(config.reporting.report_dir, PathBuf::from("reports"));
        assert_eq!(config.reporting.zone.local_minus_utc(), 0);
        assert_eq!(config.reporting.delivery_delay, Duration::from_millis(2000));
        assert!(config.access.password.is_none());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_zone_delay_and_password() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("ADMISSIONS_UTC_OFFSET", "+05:30");
        env::set_var("ADMISSIONS_DELIVERY_DELAY_MS", "0");
        env::set_var("ADMISSIONS_ACCESS_PASSWORD", "s3cret");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.reporting.zone.local_minus_utc(), 5 * 3600 + 30 * 60);
        assert!(config.reporting.delivery_delay.is_zero());
        assert_eq!(config.access.password.as_deref(), Some("s3cret"));
        assert!(!format!("{:?}", config.access).contains("s3cret"));
    }

    #[test]
    fn rejects_malformed_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSIONS_UTC_OFFSET", "IST");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidUtcOffset { .. })
        ));

        reset_env();
        env::set_var("ADMISSIONS_DELIVERY_DELAY_MS", "soon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDeliveryDelay)
        ));
        reset_env();
    }

    #[test]
    fn parses_offset_forms() {
        assert_eq!(parse_utc_offset("Z").map(|z| z.local_minus_utc()), Some(0));
        assert_eq!(
            parse_utc_offset("-0400").map(|z| z.local_minus_utc()),
            Some(-4 * 3600)
        );
        assert_eq!(
            parse_utc_offset(" +09:00 ").map(|z| z.local_minus_utc()),
            Some(9 * 3600)
        );
        assert!(parse_utc_offset("+24:00").is_none());
        assert!(parse_utc_offset("05:30").is_none());
    }
}
