//! Service and method planning
//!
//! Turns grouped endpoints into language-neutral method descriptions. The
//! language generators only decide syntax; names, argument lists and
//! ordering are fixed here.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    endpoint::{group_endpoints, split_path_template, EndpointDescriptor, PathPart, DEFAULT_GROUP},
    naming::{flat_case, method_base_name, pascal_case},
};

/// A generated service: one class/file per endpoint group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Group key as found in the endpoint tags
    pub name: String,
    /// PascalCase stem for class and file names, unique across services
    /// regardless of case
    pub ident: String,
    pub methods: Vec<MethodSpec>,
}

/// A generated method for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// lowerCamel name, unique within its service
    pub name: String,
    /// Upper-cased HTTP verb
    pub http_method: String,
    pub path: String,
    /// Raw path parameter names in argument order
    pub path_params: Vec<String>,
    pub has_query: bool,
    pub has_body: bool,
    pub summary: Option<String>,
}

impl MethodSpec {
    pub fn from_endpoint(endpoint: &EndpointDescriptor) -> Self {
        Self {
            name: method_base_name(&endpoint.method, &endpoint.path),
            http_method: endpoint.http_method(),
            path: endpoint.path.clone(),
            path_params: endpoint.path_parameter_names(),
            has_query: endpoint.has_query_parameters(),
            has_body: endpoint.has_request_body,
            summary: endpoint.summary.clone(),
        }
    }

    pub fn path_parts(&self) -> Vec<PathPart<'_>> {
        split_path_template(&self.path)
    }

    /// Method takes nothing but path arguments
    pub fn is_path_only(&self) -> bool {
        !self.has_query && !self.has_body
    }
}

/// Build the service list for a set of endpoints.
///
/// Services follow the grouping order. Every endpoint yields exactly one
/// method; a name already used in the same service is extended with its
/// path parameters (`getUsersById`) and then with a numeric suffix.
/// Groups whose names fold to the same identifier (`Users`, `users`) get
/// numbered identifiers (`Users`, `Users2`).
pub fn build_services(endpoints: &[EndpointDescriptor]) -> Vec<ServiceSpec> {
    let mut idents = HashSet::new();
    group_endpoints(endpoints)
        .into_iter()
        .map(|group| {
            let ident = unique_ident(&group.name, &idents);
            idents.insert(flat_case(&ident));

            let mut taken = HashSet::new();
            let methods = group
                .endpoints
                .into_iter()
                .map(|endpoint| {
                    let mut method = MethodSpec::from_endpoint(endpoint);
                    method.name = unique_name(&method, &taken);
                    taken.insert(method.name.clone());
                    method
                })
                .collect();

            ServiceSpec {
                name: group.name,
                ident,
                methods,
            }
        })
        .collect()
}

/// `folded` holds the `flat_case` form of every identifier already taken
fn unique_ident(group: &str, folded: &HashSet<String>) -> String {
    let mut stem = pascal_case(group);
    if stem.is_empty() {
        stem = pascal_case(DEFAULT_GROUP);
    }

    let mut candidate = stem.clone();
    let mut suffix = 2;
    while folded.contains(&flat_case(&candidate)) {
        candidate = format!("{}{}", stem, suffix);
        suffix += 1;
    }
    if candidate != stem {
        debug!("Renamed service group {:?} to {}", group, candidate);
    }
    candidate
}

fn unique_name(method: &MethodSpec, taken: &HashSet<String>) -> String {
    if !taken.contains(&method.name) {
        return method.name.clone();
    }

    let mut stem = method.name.clone();
    if !method.path_params.is_empty() {
        let params: Vec<String> = method.path_params.iter().map(|p| pascal_case(p)).collect();
        stem = format!("{}By{}", method.name, params.join("And"));
    }

    let mut candidate = stem.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}{}", stem, suffix);
        suffix += 1;
    }

    debug!(
        "Renamed colliding method {} {} from {} to {}",
        method.http_method, method.path, method.name, candidate
    );
    candidate
}
