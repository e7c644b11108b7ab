//! SDK generator configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::Result, Language};

/// Generator configuration
///
/// Controls where generated SDKs are written and which templates render the
/// README and examples documents. Loaded from YAML or built in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
    /// Replace files that already exist in `output_dir`
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            template_dir: None,
            overwrite: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading generator configuration from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_yaml_str(&contents)
    }

    /// Directory the SDK for `language` is written into by default
    pub fn language_output_dir(&self, language: &Language) -> PathBuf {
        self.output_dir.join(language.to_string())
    }
}

/// Per-request SDK generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub language: Language,
    pub package_name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_url: String,
}

impl SdkConfig {
    pub fn new(
        language: impl Into<Language>,
        package_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            package_name: package_name.into(),
            version: "1.0.0".to_string(),
            author: None,
            description: None,
            base_url: base_url.into(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description text, falling back to a generic sentence naming the package
    pub fn description_or_default(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("API client for {}", self.package_name))
    }
}
