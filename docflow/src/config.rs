//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified via
//! `-f` flag or `DOCFLOW_CONFIG` environment variable.
//!
//! Sources are merged in order (later overrides earlier):
//!
//! 1. **YAML config file** - base configuration (default: `config.yaml`)
//! 2. **Environment variables** - variables prefixed with `DOCFLOW_`
//! 3. **DATABASE_URL** - special case: overrides `database.url` if set
//!
//! For nested values, use double underscores: `DOCFLOW_STORAGE__UPLOADS_DIR`
//! sets `storage.uploads_dir`.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DOCFLOW_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Convenience override for `database.url`, populated from DATABASE_URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Username for the initial admin credential (created/updated on startup)
    pub admin_username: String,
    /// Password for the initial admin credential (optional; if unset and the
    /// user does not exist yet, startup fails rather than creating a
    /// credential nobody can use)
    pub admin_password: Option<String>,
    /// File storage locations and the upload allow-list
    pub storage: StorageConfig,
    /// Payroll computation settings
    pub payroll: PayrollConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string for the database
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/docflow".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

/// File storage locations and upload restrictions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory for uploaded signed documents
    pub uploads_dir: PathBuf,
    /// Directory for fillable templates
    pub templates_dir: PathBuf,
    /// Allowed upload extensions (lowercase, no dot)
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("./ready_documents"),
            templates_dir: PathBuf::from("./templates"),
            allowed_extensions: vec!["docx".to_string(), "pdf".to_string(), "txt".to_string()],
        }
    }
}

/// Payroll computation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayrollConfig {
    /// VAT rate applied when the settings table has no row
    pub default_vat_rate: Decimal,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            // 5% - matches the seeded settings row
            default_vat_rate: Decimal::new(5, 2),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Password validation rules and argon2 cost parameters
    pub password: PasswordConfig,
}

/// Password validation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iterations
    pub argon2_iterations: u32,
    /// Argon2 parallelism
    pub argon2_parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 64,
            // Secure defaults for production (Argon2id RFC recommendations)
            argon2_memory_kib: 19456, // 19 MB
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials in CORS requests
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: true,
        }
    }
}

/// CORS origin specification: a wildcard (`*`) or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://office.example.com`)
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: None,
            database: DatabaseConfig::default(),
            admin_username: "admin".to_string(),
            admin_password: None,
            storage: StorageConfig::default(),
            payroll: PayrollConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL wins over everything else, preserving pool settings
        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("DOCFLOW_").split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database_url".into()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.storage.allowed_extensions.is_empty() {
            anyhow::bail!("storage.allowed_extensions must not be empty");
        }
        if self.payroll.default_vat_rate < Decimal::ZERO {
            anyhow::bail!("payroll.default_vat_rate must not be negative");
        }
        if self.auth.password.min_length > self.auth.password.max_length {
            anyhow::bail!("auth.password.min_length exceeds max_length");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load(&args_for("missing.yaml")).expect("defaults should load");
            assert_eq!(config.port, 3001);
            assert_eq!(config.storage.allowed_extensions, vec!["docx", "pdf", "txt"]);
            assert_eq!(config.payroll.default_vat_rate, Decimal::new(5, 2));
            Ok(())
        });
    }

    #[test]
    fn test_yaml_and_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 8080
                storage:
                  uploads_dir: /var/lib/docflow/uploads
                "#,
            )?;
            jail.set_env("DOCFLOW_PORT", "9090");
            jail.set_env("DATABASE_URL", "postgres://db.internal/docflow");

            let config = Config::load(&args_for("config.yaml")).expect("config should load");
            assert_eq!(config.port, 9090); // env beats yaml
            assert_eq!(config.storage.uploads_dir, PathBuf::from("/var/lib/docflow/uploads"));
            assert_eq!(config.database.url, "postgres://db.internal/docflow");
            Ok(())
        });
    }

    #[test]
    fn test_empty_extension_list_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                storage:
                  allowed_extensions: []
                "#,
            )?;
            assert!(Config::load(&args_for("config.yaml")).is_err());
            Ok(())
        });
    }
}
