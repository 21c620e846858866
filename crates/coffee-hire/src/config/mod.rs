use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Cities offered as quick choices when the candidate is asked where they live. Spelled as in the
/// chain's vacancy sheet so a tapped choice matches its rows.
pub const DEFAULT_CITIES: [&str; 9] = [
    "Владивосток",
    "Артем",
    "Лучегорск",
    "Находка",
    "Южно-Сахалинск",
    "Кипарисово",
    "Шмаковка",
    "Дальнегорск",
    "Уссурийск",
];

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub hiring: HiringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        // Hosting platforms inject PORT; APP_PORT wins when both are present.
        let port = env::var("APP_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            hiring: HiringConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Data files, administrator identity, and questionnaire thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct HiringConfig {
    pub vacancies_path: PathBuf,
    pub application_log_path: PathBuf,
    pub faq_path: PathBuf,
    pub admin_id: Option<String>,
    /// `None` keeps abandoned sessions until the process restarts.
    pub session_idle_minutes: Option<u32>,
    pub minimum_age: u8,
    pub minimum_shift_minutes: u32,
    pub cities: Vec<String>,
}

impl Default for HiringConfig {
    fn default() -> Self {
        Self {
            vacancies_path: PathBuf::from("vacancies.csv"),
            application_log_path: PathBuf::from("applications_log.csv"),
            faq_path: PathBuf::from("faq.csv"),
            admin_id: None,
            session_idle_minutes: None,
            minimum_age: 18,
            minimum_shift_minutes: 360,
            cities: DEFAULT_CITIES.iter().map(|city| city.to_string()).collect(),
        }
    }
}

impl HiringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cities = match non_empty_var("HIRE_CITIES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cities,
        };

        Ok(Self {
            vacancies_path: non_empty_var("HIRE_VACANCIES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vacancies_path),
            application_log_path: non_empty_var("HIRE_APPLICATION_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.application_log_path),
            faq_path: non_empty_var("HIRE_FAQ_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.faq_path),
            admin_id: non_empty_var("HIRE_ADMIN_ID"),
            session_idle_minutes: optional_number("HIRE_SESSION_IDLE_MINUTES")?,
            minimum_age: optional_number("HIRE_MINIMUM_AGE")?.unwrap_or(defaults.minimum_age),
            minimum_shift_minutes: optional_number("HIRE_MINIMUM_SHIFT_MINUTES")?
                .unwrap_or(defaults.minimum_shift_minutes),
            cities,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional_number<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    non_empty_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        })
        .transpose()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
