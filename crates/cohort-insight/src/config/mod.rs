use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub data: DataConfig,
    pub grading: GradingCeilings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data = DataConfig {
            scores_path: path_var("APP_SCORES_PATH", "data/scores.csv"),
            ranks_path: path_var("APP_RANKS_PATH", "data/ranks.csv"),
            residency_dir: path_var("APP_RESIDENCY_DIR", "data/residency"),
            id_column: env::var("APP_ID_COLUMN")
                .map(|value| value.trim().to_string())
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| "ID".to_string()),
        };

        let grading = GradingCeilings::new(
            ceiling_var("GRADING_CURRENT_MAX", 3180.0)?,
            ceiling_var("GRADING_FINAL_MAX", 4875.0)?,
            ceiling_var("GRADING_REMAINING_MAX", 1695.0)?,
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                pretty: environment == AppEnvironment::Development,
            },
            data,
            grading,
        })
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn ceiling_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidCeiling { name })?,
        Err(_) => default,
    };

    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidCeiling { name });
    }

    Ok(value)
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
    pub pretty: bool,
}

/// Locations of the cohort exports the analytics snapshot is built from.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub scores_path: PathBuf,
    pub ranks_path: PathBuf,
    pub residency_dir: PathBuf,
    pub id_column: String,
}

/// Score ceilings of the grading structure.
///
/// `final_max` always equals `current_max + remaining_max`; the three values
/// are supplied by configuration so they can follow changes to the program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingCeilings {
    current_max: f64,
    final_max: f64,
    remaining_max: f64,
}

impl GradingCeilings {
    pub fn new(current_max: f64, final_max: f64, remaining_max: f64) -> Result<Self, ConfigError> {
        if (current_max + remaining_max - final_max).abs() > 1e-6 {
            return Err(ConfigError::InconsistentCeilings {
                current_max,
                final_max,
                remaining_max,
            });
        }

        Ok(Self {
            current_max,
            final_max,
            remaining_max,
        })
    }

    pub fn current_max(&self) -> f64 {
        self.current_max
    }

    pub fn final_max(&self) -> f64 {
        self.final_max
    }

    pub fn remaining_max(&self) -> f64 {
        self.remaining_max
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidCeiling {
        name: &'static str,
    },
    InconsistentCeilings {
        current_max: f64,
        final_max: f64,
        remaining_max: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCeiling { name } => {
                write!(f, "{name} must be a positive number")
            }
            ConfigError::InconsistentCeilings {
                current_max,
                final_max,
                remaining_max,
            } => write!(
                f,
                "GRADING_FINAL_MAX ({final_max}) must equal GRADING_CURRENT_MAX ({current_max}) + GRADING_REMAINING_MAX ({remaining_max})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCeiling { .. }
            | ConfigError::InconsistentCeilings { .. } => None,
        }
    }
}
