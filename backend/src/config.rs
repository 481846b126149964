use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// Runtime configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    /// Minimum paid amount (soles) for a voucher to be eligible
    pub min_payment_amount: f64,
    /// Institutional suffix appended to every correlative
    pub certificate_suffix: String,
    /// Place printed before the issue date
    pub certificate_place: String,
    pub pdf_template_path: PathBuf,
    pub docx_template_path: PathBuf,
    pub backup_dir: PathBuf,
    pub session_ttl_hours: i64,
    pub bootstrap_admin_password: String,
    pub secure_cookies: bool,
    pub allowed_origin: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self {
            bind_addr: try_load("PORTAL_BIND_ADDR", "127.0.0.1:3000")?,
            database_url: try_load("DATABASE_URL", "sqlite:constancias.db")?,
            min_payment_amount: try_load("MIN_PAYMENT_AMOUNT", "57.50")?,
            certificate_suffix: try_load("CERTIFICATE_SUFFIX", "UB/DBU-UNAP")?,
            certificate_place: try_load("CERTIFICATE_PLACE", "San Juan Bautista")?,
            pdf_template_path: try_load("PDF_TEMPLATE_PATH", "fondo_constancia.pdf")?,
            docx_template_path: try_load("DOCX_TEMPLATE_PATH", "plantilla_constancia.docx")?,
            backup_dir: try_load("BACKUP_DIR", "backups")?,
            session_ttl_hours: try_load("SESSION_TTL_HOURS", "8")?,
            bootstrap_admin_password: try_load("BOOTSTRAP_ADMIN_PASSWORD", "admin123")?,
            secure_cookies: try_load("SECURE_COOKIES", "false")?,
            allowed_origin: try_load("ALLOWED_ORIGIN", "http://localhost:8080")?,
        };

        if !config.min_payment_amount.is_finite() || config.min_payment_amount < 0.0 {
            return Err(anyhow!("MIN_PAYMENT_AMOUNT must be a non-negative number"));
        }
        if config.session_ttl_hours <= 0 {
            return Err(anyhow!("SESSION_TTL_HOURS must be positive"));
        }
        if env::var("BOOTSTRAP_ADMIN_PASSWORD").is_err() {
            warn!("Using the default bootstrap admin password, change it after the first login");
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_url: "sqlite:constancias.db".to_string(),
            min_payment_amount: 57.50,
            certificate_suffix: "UB/DBU-UNAP".to_string(),
            certificate_place: "San Juan Bautista".to_string(),
            pdf_template_path: PathBuf::from("fondo_constancia.pdf"),
            docx_template_path: PathBuf::from("plantilla_constancia.docx"),
            backup_dir: PathBuf::from("backups"),
            session_ttl_hours: 8,
            bootstrap_admin_password: "admin123".to_string(),
            secure_cookies: false,
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}"))
}
