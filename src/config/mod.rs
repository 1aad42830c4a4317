use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (`postgres://...` or `sqlite:...`)
    pub database_url: Option<String>,
    /// Address the HTTP API listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Upper bound for the connection pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Directory exported invoice PDFs are written to
    #[serde(default = "default_pdf_output_dir")]
    pub pdf_output_dir: String,
    /// Institution shown at the top of every invoice form
    #[serde(default = "default_institution_name")]
    pub institution_name: String,
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log sink while the terminal form owns stdout
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_pdf_output_dir() -> String {
    "invoices".to_string()
}

fn default_institution_name() -> String {
    "Institution name".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "invoice_desk.log".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists,
    /// then the environment is deserialized into `Config`.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Database URL, required by everything that talks to the store
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to run the API")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_settings() {
        let vars = vec![("DATABASE_URL".to_string(), "sqlite::memory:".to_string())];
        let config = envy::from_iter::<_, Config>(vars).unwrap();

        assert_eq!(config.database_url().unwrap(), "sqlite::memory:");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.pdf_output_dir, "invoices");
        assert_eq!(config.log_file, "invoice_desk.log");
    }

    #[test]
    fn missing_database_url_is_reported_on_use() {
        let vars = vec![("MAX_CONNECTIONS".to_string(), "2".to_string())];
        let config = envy::from_iter::<_, Config>(vars).unwrap();

        assert_eq!(config.max_connections, 2);
        assert!(config.database_url().is_err());
    }
}
