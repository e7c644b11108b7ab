//! # TSmart SDK Generator
//!
//! Multi-language client SDK generator for TSmart Hub.
//! Turns a list of API endpoint descriptors into the source of a client
//! library, so integrations registered in the hub can be consumed from the
//! developer's language of choice.
//!
//! ## Features
//!
//! - **Multi-language Support**: JavaScript, Python, Java, C#, Go, PHP
//! - **Service Grouping**: one service class per endpoint tag
//! - **OpenAPI Integration**: derive endpoint descriptors from OpenAPI 3 documents
//! - **Template Engine**: README and examples rendered from overridable templates
//! - **Package Manifests**: package.json, setup.py, pom.xml, .csproj, go.mod, composer.json
//!
//! ## Architecture
//!
//! The SDK generator consists of:
//! - SDK Generator: groups endpoints, plans methods and drives a language generator
//! - Language Registry: maps a language tag to its generator
//! - Template Engine: renders README and examples documents
//! - API Introspector: OpenAPI document importer
//! - SDK Writer: writes a generated SDK to disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use tsmart_sdk_generator::{EndpointDescriptor, SdkConfig, SdkGenerator, Language};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = SdkGenerator::new();
//!     let endpoints = vec![EndpointDescriptor::new("GET", "/widgets").with_tag("widgets")];
//!     let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");
//!
//!     let sdk = generator.generate_sdk(&endpoints, &config)?;
//!     for file in &sdk.files {
//!         println!("{}", file.path);
//!     }
//!
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
pub mod endpoint;
pub mod error;
pub mod generator;
#[cfg(feature = "openapi-spec")]
pub mod introspection;
pub mod languages;
pub mod naming;
pub mod output;
pub mod service;
pub mod templates;

pub use config::{GeneratorConfig, SdkConfig};
pub use endpoint::{EndpointDescriptor, Parameter, ParameterLocation};
pub use error::{GeneratorError, Result};
pub use generator::SdkGenerator;
#[cfg(feature = "openapi-spec")]
pub use introspection::{ApiIntrospector, ApiSpec};
pub use languages::{GenerationContext, Language, LanguageGenerator, LanguageRegistry};
pub use output::SdkWriter;
pub use service::{MethodSpec, ServiceSpec};
pub use templates::TemplateEngine;

/// Generated SDK artifact
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSdk {
    /// Language
    pub language: Language,
    /// Generated files, in generation order
    pub files: Vec<GeneratedFile>,
    /// Package manifest
    pub package_config: PackageConfig,
    /// README document (Markdown)
    pub readme: String,
    /// Usage examples document (Markdown)
    pub examples: String,
    /// Package metadata
    pub metadata: SdkMetadata,
}

impl GeneratedSdk {
    /// Look up a generated file by its relative path
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Files of the given type
    pub fn files_of_type(&self, file_type: FileType) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter(move |f| f.file_type == file_type)
    }
}

/// Generated file information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Forward-slash path relative to the package root
    pub path: String,
    /// File content
    pub content: String,
    /// File type
    pub file_type: FileType,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type,
        }
    }

    pub fn source(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileType::Source)
    }
}

/// File types in generated SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Client source file
    Client,
    /// Service source file
    Service,
    /// Type definitions
    Types,
    /// Other source code file
    Source,
    /// Configuration or build file
    Config,
}

/// Package manifest in the shape its ecosystem expects
#[derive(Debug, Clone, PartialEq)]
pub enum PackageConfig {
    /// Object serialized as JSON (package.json, setup.py arguments, composer.json)
    Json(serde_json::Value),
    /// Manifest file contents (pom.xml, .csproj, go.mod)
    Text(String),
}

impl PackageConfig {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            PackageConfig::Json(value) => Some(value),
            PackageConfig::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PackageConfig::Json(_) => None,
            PackageConfig::Text(text) => Some(text),
        }
    }

    /// Manifest file contents as written to disk
    pub fn render(&self) -> Result<String> {
        match self {
            PackageConfig::Json(value) => {
                let mut text = serde_json::to_string_pretty(value)?;
                text.push('\n');
                Ok(text)
            }
            PackageConfig::Text(text) => Ok(text.clone()),
        }
    }
}

/// SDK metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkMetadata {
    /// SDK name
    pub name: String,
    /// SDK version
    pub version: String,
    /// Target language
    pub language: Language,
    /// Generator version
    pub generator_version: String,
    /// Number of endpoints turned into methods
    pub endpoint_count: usize,
    /// Generated service class names, in emission order
    pub services: Vec<String>,
    /// Manifest file name, when the manifest is written separately
    pub manifest_file: Option<String>,
    /// Installation instructions
    pub installation_instructions: String,
}
