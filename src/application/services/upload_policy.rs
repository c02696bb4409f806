use std::collections::HashSet;

use crate::{
    application::error::ApplicationError,
    domain::{config::server::ServerConfig, models::file_name::FileName},
};

/// Decides whether a declared upload name is acceptable before any bytes are
/// written.
#[derive(Debug, Clone, Default)]
pub struct UploadPolicy {
    allowed_extensions: HashSet<String>,
}

impl UploadPolicy {
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.into().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.allowed_extensions.iter().cloned())
    }

    pub fn allowed_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.allowed_extensions.iter().cloned().collect();
        extensions.sort();
        extensions
    }

    pub fn admit(&self, declared_name: &str) -> Result<FileName, ApplicationError> {
        let name = FileName::parse(declared_name)?;

        if self.allowed_extensions.is_empty() {
            return Ok(name);
        }

        match name.extension() {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(name),
            _ => Err(ApplicationError::UnsupportedMediaType(format!(
                "Extension of '{}' is not allowed",
                name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_extension_when_unrestricted() {
        let policy = UploadPolicy::default();
        assert!(policy.admit("archive.tar.gz").is_ok());
        assert!(policy.admit("README").is_ok());
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let policy = UploadPolicy::new(["txt", "PNG"]);
        assert!(policy.admit("notes.TXT").is_ok());
        assert!(policy.admit("cat.png").is_ok());
        assert!(matches!(
            policy.admit("script.sh"),
            Err(ApplicationError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            policy.admit("README"),
            Err(ApplicationError::UnsupportedMediaType(_))
        ));
        assert_eq!(policy.allowed_extensions(), vec!["png", "txt"]);
    }

    #[test]
    fn test_name_checks_run_first() {
        let policy = UploadPolicy::new(["txt"]);
        assert!(matches!(
            policy.admit("../../etc/passwd"),
            Err(ApplicationError::Forbidden(_))
        ));
        assert!(matches!(
            policy.admit(""),
            Err(ApplicationError::BadRequest(_))
        ));
    }
}
