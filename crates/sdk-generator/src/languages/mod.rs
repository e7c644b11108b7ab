//! Language generators
//!
//! Each target language implements [`LanguageGenerator`]; the
//! [`LanguageRegistry`] maps a [`Language`] tag to its implementation so a new
//! target only needs a new module and a `register` call.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    config::SdkConfig,
    error::{GeneratorError, Result},
    naming::{sanitize_identifier, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    GeneratedFile, PackageConfig,
};

#[cfg(feature = "csharp-sdk")]
pub mod csharp;
#[cfg(feature = "go-sdk")]
pub mod go;
#[cfg(feature = "java-sdk")]
pub mod java;
#[cfg(feature = "javascript-sdk")]
pub mod javascript;
#[cfg(feature = "php-sdk")]
pub mod php;
#[cfg(feature = "python-sdk")]
pub mod python;

/// Supported programming languages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// JavaScript (CommonJS, fetch based)
    JavaScript,
    /// Python programming language
    Python,
    /// Java programming language
    Java,
    /// C# programming language
    CSharp,
    /// Go programming language
    Go,
    /// PHP programming language
    PHP,
    /// Any other language name; rejected at generation time
    Custom(String),
}

impl Language {
    /// Every language with a built-in generator, in registry order
    pub const BUILTIN: [Language; 6] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::PHP,
    ];

    /// Human readable name
    pub fn display_name(&self) -> &str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::PHP => "PHP",
            Language::Custom(name) => name,
        }
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Language::JavaScript,
            "python" | "py" => Language::Python,
            "java" => Language::Java,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "php" => Language::PHP,
            _ => Language::Custom(value.to_string()),
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::from(value.as_str())
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
            Language::CSharp => write!(f, "csharp"),
            Language::Go => write!(f, "go"),
            Language::PHP => write!(f, "php"),
            Language::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Everything a language generator needs for one generation call
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    pub config: &'a SdkConfig,
    pub services: Vec<ServiceSpec>,
    pub endpoint_count: usize,
}

impl<'a> GenerationContext<'a> {
    pub fn new(config: &'a SdkConfig, services: Vec<ServiceSpec>, endpoint_count: usize) -> Self {
        Self {
            config,
            services,
            endpoint_count,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.config.package_name
    }

    pub fn description(&self) -> String {
        self.config.description_or_default()
    }

    pub fn author(&self) -> &str {
        self.config.author.as_deref().unwrap_or("")
    }

    /// First method of the first service, used by usage examples
    pub fn first_method(&self) -> Option<(&ServiceSpec, &MethodSpec)> {
        self.services
            .iter()
            .find_map(|s| s.methods.first().map(|m| (s, m)))
    }
}

/// A titled code sample for the examples document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    pub title: String,
    pub code: String,
}

/// Language generator trait
///
/// Implementations emit syntax only. Names and argument order come from the
/// [`ServiceSpec`]s in the context.
pub trait LanguageGenerator: Send + Sync {
    fn language(&self) -> Language;

    /// Casing for method names
    fn method_naming(&self) -> NamingConvention;

    /// Casing for argument names
    fn argument_naming(&self) -> NamingConvention;

    /// Words that cannot be used as identifiers
    fn reserved_words(&self) -> &'static [&'static str];

    /// Markdown code fence tag
    fn code_fence(&self) -> &'static str;

    /// Package manager command (or snippet) that installs the SDK
    fn install_command(&self, ctx: &GenerationContext<'_>) -> String;

    /// Local variable names used inside generated method bodies
    fn local_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Name of the manifest file written next to the sources, if any
    fn manifest_file_name(&self, ctx: &GenerationContext<'_>) -> Option<String>;

    fn client_name(&self, ctx: &GenerationContext<'_>) -> String;

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile;

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile;

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile;

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig;

    /// Entry points and other files beyond client, services and types
    fn generate_support_files(&self, _ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        Vec::new()
    }

    /// Client construction snippet for the README
    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String;

    /// Snippet calling `method` through its service
    fn method_example(
        &self,
        ctx: &GenerationContext<'_>,
        service: &ServiceSpec,
        method: &MethodSpec,
    ) -> String;

    fn method_name(&self, method: &MethodSpec) -> String {
        sanitize_identifier(&method.name, self.method_naming(), self.reserved_words())
    }

    /// Path argument identifiers in argument order.
    ///
    /// Raw names that sanitize to the same identifier get a numeric suffix
    /// (`userId`, `userId2`).
    fn path_arguments(&self, method: &MethodSpec) -> Vec<String> {
        let mut arguments: Vec<String> = Vec::with_capacity(method.path_params.len());
        for raw in &method.path_params {
            let mut name = sanitize_identifier(raw, self.argument_naming(), self.reserved_words());
            if self.local_names().contains(&name.as_str()) {
                name.push('_');
            }

            let mut candidate = name.clone();
            let mut suffix = 2;
            while arguments.contains(&candidate) || self.local_names().contains(&candidate.as_str())
            {
                candidate = format!("{}{}", name, suffix);
                suffix += 1;
            }
            arguments.push(candidate);
        }
        arguments
    }

    /// Identifier for the raw path parameter `raw` of `method`
    fn argument_name(&self, method: &MethodSpec, raw: &str) -> String {
        let arguments = self.path_arguments(method);
        method
            .path_params
            .iter()
            .position(|p| p == raw)
            .and_then(|i| arguments.get(i).cloned())
            .unwrap_or_else(|| {
                sanitize_identifier(raw, self.argument_naming(), self.reserved_words())
            })
    }

    fn service_class_name(&self, service: &ServiceSpec) -> String {
        sanitize_identifier(
            &format!("{}Service", service.ident),
            NamingConvention::UpperCamel,
            self.reserved_words(),
        )
    }

    /// Examples document entries: setup followed by one call per service
    fn examples(&self, ctx: &GenerationContext<'_>) -> Vec<CodeExample> {
        let mut examples = vec![CodeExample {
            title: "Creating a client".to_string(),
            code: self.usage_example(ctx),
        }];
        for service in &ctx.services {
            if let Some(method) = service.methods.first() {
                examples.push(CodeExample {
                    title: format!("{}: {} {}", service.name, method.http_method, method.path),
                    code: self.method_example(ctx, service, method),
                });
            }
        }
        examples
    }
}

/// Maps language tags to generators
pub struct LanguageRegistry {
    generators: HashMap<Language, Box<dyn LanguageGenerator>>,
}

impl LanguageRegistry {
    /// Registry without any generator
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Registry holding every built-in generator enabled at compile time
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "javascript-sdk")]
        registry.register(Box::new(javascript::JavaScriptGenerator));
        #[cfg(feature = "python-sdk")]
        registry.register(Box::new(python::PythonGenerator));
        #[cfg(feature = "java-sdk")]
        registry.register(Box::new(java::JavaGenerator));
        #[cfg(feature = "csharp-sdk")]
        registry.register(Box::new(csharp::CSharpGenerator));
        #[cfg(feature = "go-sdk")]
        registry.register(Box::new(go::GoGenerator));
        #[cfg(feature = "php-sdk")]
        registry.register(Box::new(php::PhpGenerator));
        registry
    }

    /// Add or replace the generator for its language
    pub fn register(&mut self, generator: Box<dyn LanguageGenerator>) {
        self.generators.insert(generator.language(), generator);
    }

    pub fn get(&self, language: &Language) -> Result<&dyn LanguageGenerator> {
        self.generators
            .get(language)
            .map(|g| g.as_ref())
            .ok_or_else(|| GeneratorError::UnsupportedLanguage(language.to_string()))
    }

    pub fn is_supported(&self, language: &Language) -> bool {
        self.generators.contains_key(language)
    }

    /// Registered languages, built-ins first in their fixed order
    pub fn supported_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = Language::BUILTIN
            .iter()
            .filter(|l| self.generators.contains_key(*l))
            .cloned()
            .collect();
        let mut custom: Vec<Language> = self
            .generators
            .keys()
            .filter(|l| matches!(l, Language::Custom(_)))
            .cloned()
            .collect();
        custom.sort_by_key(|l| l.to_string());
        languages.extend(custom);
        languages
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("languages", &self.supported_languages())
            .finish()
    }
}

/// Escape text for a double-quoted string literal
pub(crate) fn escape_double_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text for a single-quoted string literal
pub(crate) fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape text for XML element content
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Path as a `+` concatenation of double-quoted literals and argument names
pub(crate) fn concat_path_expression(
    parts: &[crate::endpoint::PathPart<'_>],
    argument: impl Fn(&str) -> String,
) -> String {
    use crate::endpoint::PathPart;

    let pieces: Vec<String> = parts
        .iter()
        .map(|part| match part {
            PathPart::Literal(text) => format!("\"{}\"", escape_double_quoted(text)),
            PathPart::Param(name) => argument(name),
        })
        .collect();
    if pieces.is_empty() {
        "\"\"".to_string()
    } else {
        pieces.join(" + ")
    }
}

/// Collapse a summary onto one comment line
pub(crate) fn comment_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
