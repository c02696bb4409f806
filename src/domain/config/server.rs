use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_STORAGE_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Lowercased extensions accepted on upload. Empty means any.
    pub allowed_extensions: Vec<String>,
    /// `None` keeps CORS permissive.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: Vec::new(),
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SERVER_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                expected: "a valid u16",
                value,
            })?,
            None => defaults.port,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MAX_UPLOAD_BYTES",
                        expected: "a positive byte count",
                        value,
                    })
                }
            },
            None => defaults.max_upload_bytes,
        };

        let allowed_extensions = lookup("ALLOWED_EXTENSIONS")
            .map(|value| {
                split_list(&value)
                    .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(value) => {
                let origins: Vec<String> = split_list(&value).map(str::to_string).collect();
                if let Some(bad) = origins
                    .iter()
                    .find(|origin| axum::http::HeaderValue::from_str(origin).is_err())
                {
                    return Err(ConfigError::InvalidValue {
                        key: "CORS_ALLOWED_ORIGINS",
                        expected: "a comma separated list of origins",
                        value: bad.clone(),
                    });
                }
                Some(origins)
            }
            None => None,
        };

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port,
            storage_dir: lookup("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            max_upload_bytes,
            allowed_extensions,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:7878");
        assert_eq!(config.storage_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert!(config.allowed_extensions.is_empty());
        assert!(config.cors_allowed_origins.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
            ("STORAGE_DIR", "/var/lib/filebox"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("ALLOWED_EXTENSIONS", "txt, .PNG,,jpg"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/filebox"));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.allowed_extensions, vec!["txt", "png", "jpg"]);
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        let err = ServerConfig::from_lookup(lookup_from(&[("SERVER_PORT", "70000")])).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));

        let err = ServerConfig::from_lookup(lookup_from(&[("MAX_UPLOAD_BYTES", "0")])).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));
    }
}
