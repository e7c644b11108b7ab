//! Error types for SDK generator

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during SDK generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Requested target language has no registered generator
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OpenAPI document could not be understood
    #[error("OpenAPI error: {0}")]
    OpenApi(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP error
    #[cfg(feature = "openapi-spec")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error
    #[error("Generator error: {0}")]
    Generic(String),
}

impl GeneratorError {
    /// Create a new template error
    pub fn template<T: Into<String>>(msg: T) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new OpenAPI error
    pub fn openapi<T: Into<String>>(msg: T) -> Self {
        Self::OpenApi(msg.into())
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::Template(_) => "template",
            Self::Configuration(_) => "config",
            Self::OpenApi(_) => "openapi",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Yaml(_) => "yaml",
            #[cfg(feature = "openapi-spec")]
            Self::Http(_) => "http",
            Self::Generic(_) => "generic",
        }
    }
}

impl From<tera::Error> for GeneratorError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Template(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::UnsupportedLanguage("ruby".to_string());
        assert_eq!(err.to_string(), "Unsupported language: ruby");
        assert_eq!(err.category(), "unsupported_language");

        let err = GeneratorError::configuration("output exists");
        assert_eq!(err.to_string(), "Configuration error: output exists");
    }

    #[test]
    fn test_tera_error_conversion() {
        let err: GeneratorError = tera::Error::msg("bad template").into();
        assert!(matches!(err, GeneratorError::Template(ref m) if m.contains("bad template")));
    }
}
