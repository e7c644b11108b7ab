//! API introspection
//!
//! Imports endpoint descriptors from OpenAPI 3 documents, read from a
//! string, a file or a URL.

use std::path::Path;

use openapiv3::{OpenAPI, Operation, PathItem, ReferenceOr};
use tracing::{debug, info, warn};

use crate::{
    config::SdkConfig,
    endpoint::{EndpointDescriptor, Parameter, ParameterLocation},
    error::{GeneratorError, Result},
    Language,
};

const COMPONENT_PARAMETER_PREFIX: &str = "#/components/parameters/";
const MAX_REF_DEPTH: usize = 8;

/// Endpoints and service information extracted from an OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSpec {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    /// First server URL, empty when the document lists none
    pub base_url: String,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl ApiSpec {
    /// SDK configuration seeded from the document's info and servers
    pub fn sdk_config(
        &self,
        language: impl Into<Language>,
        package_name: impl Into<String>,
    ) -> SdkConfig {
        let description = self
            .description
            .clone()
            .unwrap_or_else(|| self.title.clone());
        let config = SdkConfig::new(language, package_name, self.base_url.clone())
            .with_version(self.version.clone());
        if description.is_empty() {
            config
        } else {
            config.with_description(description)
        }
    }
}

/// OpenAPI document importer
pub struct ApiIntrospector;

impl ApiIntrospector {
    /// Parse a JSON document
    pub fn from_json(document: &str) -> Result<ApiSpec> {
        let openapi: OpenAPI = serde_json::from_str(document)
            .map_err(|e| GeneratorError::openapi(format!("invalid JSON document: {}", e)))?;
        Ok(Self::from_openapi(&openapi))
    }

    /// Parse a YAML document
    pub fn from_yaml(document: &str) -> Result<ApiSpec> {
        let openapi: OpenAPI = serde_yaml::from_str(document)
            .map_err(|e| GeneratorError::openapi(format!("invalid YAML document: {}", e)))?;
        Ok(Self::from_openapi(&openapi))
    }

    /// Parse a document as JSON, falling back to YAML
    pub fn from_str(document: &str) -> Result<ApiSpec> {
        match serde_json::from_str::<OpenAPI>(document) {
            Ok(openapi) => Ok(Self::from_openapi(&openapi)),
            Err(e) => {
                debug!("Document is not JSON ({}), trying YAML", e);
                Self::from_yaml(document)
            }
        }
    }

    /// Read and parse a document from disk
    pub async fn from_file(path: impl AsRef<Path>) -> Result<ApiSpec> {
        let path = path.as_ref();
        info!("Loading OpenAPI document from {}", path.display());
        let document = tokio::fs::read_to_string(path).await?;
        Self::from_str(&document)
    }

    /// Download and parse a document
    pub async fn fetch(url: &str) -> Result<ApiSpec> {
        info!("Fetching OpenAPI document from {}", url);
        let document = reqwest::get(url)
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::from_str(&document)
    }

    /// Extract endpoint descriptors from a parsed document
    pub fn from_openapi(openapi: &OpenAPI) -> ApiSpec {
        let mut endpoints = Vec::new();

        for (path, item) in openapi.paths.paths.iter() {
            let item = match item {
                ReferenceOr::Item(item) => item,
                ReferenceOr::Reference { reference } => {
                    warn!("Skipping path {}: path item references ({}) are not supported", path, reference);
                    continue;
                }
            };

            let shared = Self::parameters(openapi, path, &item.parameters, Vec::new());
            for (method, operation) in operations(item) {
                let parameters =
                    Self::parameters(openapi, path, &operation.parameters, shared.clone());
                endpoints.push(EndpointDescriptor {
                    path: path.clone(),
                    method: method.to_string(),
                    parameters,
                    has_request_body: operation.request_body.is_some(),
                    tags: operation.tags.clone(),
                    operation_id: operation.operation_id.clone(),
                    summary: operation.summary.clone(),
                });
            }
        }

        info!(
            "Imported {} endpoint(s) from OpenAPI document {} {}",
            endpoints.len(),
            openapi.info.title,
            openapi.info.version
        );

        ApiSpec {
            title: openapi.info.title.clone(),
            version: openapi.info.version.clone(),
            description: openapi.info.description.clone(),
            base_url: openapi
                .servers
                .first()
                .map(|s| s.url.clone())
                .unwrap_or_default(),
            endpoints,
        }
    }

    /// Merge `declared` into `base`; a parameter with the same name and
    /// location replaces the inherited one
    fn parameters(
        openapi: &OpenAPI,
        path: &str,
        declared: &[ReferenceOr<openapiv3::Parameter>],
        mut base: Vec<Parameter>,
    ) -> Vec<Parameter> {
        for parameter in declared {
            let Some(parameter) = resolve_parameter(openapi, parameter, 0) else {
                warn!("Skipping unresolvable parameter on {}", path);
                continue;
            };
            let Some(parameter) = convert_parameter(parameter) else {
                continue;
            };

            match base
                .iter_mut()
                .find(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(existing) => *existing = parameter,
                None => base.push(parameter),
            }
        }
        base
    }
}

/// Operations of a path item in a fixed method order
fn operations(item: &PathItem) -> Vec<(&'static str, &Operation)> {
    [
        ("get", &item.get),
        ("put", &item.put),
        ("post", &item.post),
        ("delete", &item.delete),
        ("options", &item.options),
        ("head", &item.head),
        ("patch", &item.patch),
        ("trace", &item.trace),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
    .collect()
}

fn resolve_parameter<'a>(
    openapi: &'a OpenAPI,
    parameter: &'a ReferenceOr<openapiv3::Parameter>,
    depth: usize,
) -> Option<&'a openapiv3::Parameter> {
    match parameter {
        ReferenceOr::Item(parameter) => Some(parameter),
        ReferenceOr::Reference { reference } => {
            if depth >= MAX_REF_DEPTH {
                warn!("Parameter reference chain too deep at {}", reference);
                return None;
            }
            let name = reference.strip_prefix(COMPONENT_PARAMETER_PREFIX)?;
            let target = openapi.components.as_ref()?.parameters.get(name)?;
            resolve_parameter(openapi, target, depth + 1)
        }
    }
}

/// Cookie parameters have no counterpart in generated methods
fn convert_parameter(parameter: &openapiv3::Parameter) -> Option<Parameter> {
    let (data, location) = match parameter {
        openapiv3::Parameter::Path { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Path)
        }
        openapiv3::Parameter::Query { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Query)
        }
        openapiv3::Parameter::Header { parameter_data, .. } => {
            (parameter_data, ParameterLocation::Header)
        }
        openapiv3::Parameter::Cookie { parameter_data, .. } => {
            debug!("Dropping cookie parameter {}", parameter_data.name);
            return None;
        }
    };
    Some(Parameter::new(data.name.clone(), location, data.required))
}
