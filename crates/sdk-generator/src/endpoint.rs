//! Endpoint descriptors and service grouping

use serde::{Deserialize, Serialize};

/// Group name used for endpoints without tags
pub const DEFAULT_GROUP: &str = "default";

/// One API operation to expose in a generated SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub has_request_body: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Endpoint parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
        }
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path, true)
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query, false)
    }
}

impl EndpointDescriptor {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            parameters: Vec::new(),
            has_request_body: false,
            tags: Vec::new(),
            operation_id: None,
            summary: None,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_request_body(mut self) -> Self {
        self.has_request_body = true;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// HTTP method as emitted into generated code
    pub fn http_method(&self) -> String {
        self.method.to_ascii_uppercase()
    }

    /// Service group this endpoint belongs to
    pub fn group(&self) -> &str {
        self.tags
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_GROUP)
    }

    pub fn has_query_parameters(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Query)
    }

    /// Names of the path arguments, in argument order.
    ///
    /// Declared `in: path` parameters come first in declaration order, followed
    /// by any `{placeholder}` in the path that has no declared parameter.
    pub fn path_parameter_names(&self) -> Vec<String> {
        let declared = self
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
            .map(|p| p.name.as_str());

        let mut names: Vec<String> = Vec::new();
        for name in declared.chain(path_placeholders(&self.path)) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        names
    }
}

/// Piece of a path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPart<'a> {
    Literal(&'a str),
    Param(&'a str),
}

/// Split a path template into literal text and `{name}` placeholders.
///
/// An unterminated `{` is kept as literal text.
pub fn split_path_template(path: &str) -> Vec<PathPart<'_>> {
    let mut parts = Vec::new();
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if name.is_empty() {
            parts.push(PathPart::Literal(&rest[..start + len + 1]));
        } else {
            if start > 0 {
                parts.push(PathPart::Literal(&rest[..start]));
            }
            parts.push(PathPart::Param(name));
        }
        rest = &rest[start + len + 1..];
    }
    if !rest.is_empty() {
        parts.push(PathPart::Literal(rest));
    }

    parts
}

/// Placeholder names in a path template, in order of appearance
pub fn path_placeholders(path: &str) -> Vec<&str> {
    split_path_template(path)
        .into_iter()
        .filter_map(|part| match part {
            PathPart::Param(name) => Some(name),
            PathPart::Literal(_) => None,
        })
        .collect()
}

/// Returns the name inside a `{name}` path segment
pub fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|s| !s.is_empty())
}

/// Endpoints sharing a service group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroup<'a> {
    pub name: String,
    pub endpoints: Vec<&'a EndpointDescriptor>,
}

/// Partition endpoints by first tag.
///
/// Groups appear in the order their key is first seen and endpoints keep
/// their input order inside a group.
pub fn group_endpoints(endpoints: &[EndpointDescriptor]) -> Vec<ServiceGroup<'_>> {
    let mut groups: Vec<ServiceGroup<'_>> = Vec::new();

    for endpoint in endpoints {
        let key = endpoint.group();
        match groups.iter_mut().find(|g| g.name == key) {
            Some(group) => group.endpoints.push(endpoint),
            None => groups.push(ServiceGroup {
                name: key.to_string(),
                endpoints: vec![endpoint],
            }),
        }
    }

    groups
}
