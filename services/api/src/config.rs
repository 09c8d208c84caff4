//! Service settings loaded from the environment

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Settings for the API service
///
/// Every field maps to the upper-case environment variable of the same name,
/// e.g. `access_token_expire_minutes` reads `ACCESS_TOKEN_EXPIRE_MINUTES`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub secret_key: String,
    pub access_token_expire_minutes: u64,
    pub refresh_token_expire_days: u64,
    /// `production` restricts CORS to `allowed_hosts`
    pub environment: String,
    /// Comma-separated CORS origins
    pub allowed_hosts: String,
    /// Root served under `/static`
    pub static_dir: PathBuf,
    /// Where uploads are written; should live under `static_dir`
    pub upload_dir: PathBuf,
    pub max_file_size: usize,
    /// Comma-separated extensions including the dot
    pub allowed_extensions: String,
    pub host: String,
    pub port: u16,
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    /// Load settings, falling back to development defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("secret_key", "change-me-in-production")?
            .set_default("access_token_expire_minutes", 30)?
            .set_default("refresh_token_expire_days", 7)?
            .set_default("environment", "development")?
            .set_default(
                "allowed_hosts",
                "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000",
            )?
            .set_default("static_dir", "static")?
            .set_default("upload_dir", "static/images")?
            .set_default("max_file_size", 10 * 1024 * 1024)?
            .set_default("allowed_extensions", ".jpg,.jpeg,.png,.gif,.webp")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn cors_origins(&self) -> Vec<String> {
        split_list(&self.allowed_hosts)
    }

    /// Lower-cased extensions, each with its leading dot
    pub fn extensions(&self) -> Vec<String> {
        split_list(&self.allowed_extensions)
            .into_iter()
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                if ext.starts_with('.') { ext } else { format!(".{}", ext) }
            })
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().trim_end_matches('/'))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_source(
            Environment::default()
                .try_parsing(true)
                .source(Some(source)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]);
        assert_eq!(settings.access_token_expire_minutes, 30);
        assert_eq!(settings.refresh_token_expire_days, 7);
        assert_eq!(settings.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.upload_dir, PathBuf::from("static/images"));
        assert!(settings.admin_username.is_none());
        assert!(!settings.is_production());
    }

    #[test]
    fn test_environment_overrides() {
        let settings = settings(&[
            ("PORT", "9000"),
            ("SECRET_KEY", "s3cret"),
            ("ENVIRONMENT", "Production"),
            ("ADMIN_USERNAME", "admin"),
        ]);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.secret_key, "s3cret");
        assert!(settings.is_production());
        assert_eq!(settings.admin_username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_extension_list_is_normalised() {
        let settings = settings(&[("ALLOWED_EXTENSIONS", ".JPG, png ,,.webp")]);
        assert_eq!(settings.extensions(), vec![".jpg", ".png", ".webp"]);
    }
}
