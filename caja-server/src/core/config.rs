//! Server configuration
//!
//! Every setting can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/caja | Work directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development / staging / production |
//! | TIMEZONE | Europe/Madrid | Business timezone |
//! | TAX_RATE | 10 | Tax rate percentage for drawer reports |
//! | CASH_METHOD | EFECTIVO | Method name counted as drawer cash |
//! | REQUEST_TIMEOUT_MS | 30000 | Request timeout (milliseconds) |
//! | LOG_LEVEL | info | Log level |

use chrono_tz::Tz;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Business timezone (receipt dates, report windows)
    pub timezone: Tz,
    /// Tax rate percentage used by the reconciler (e.g. 10 for 10% IVA)
    pub tax_rate: f64,
    /// Payment method name that counts as drawer cash
    pub cash_method: String,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/caja".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(10.0),
            cash_method: std::env::var("CASH_METHOD").unwrap_or_else(|_| "EFECTIVO".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// Path of the embedded database file
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("ledger.redb")
    }
}

/// Prepare the process environment: dotenv, work directory, logging
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/caja".into());
    std::fs::create_dir_all(&work_dir)?;
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    crate::utils::logger::init_logger_with_file(Some(&level), log_dir.to_str());

    Ok(())
}
