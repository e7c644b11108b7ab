//! JavaScript SDK generator (CommonJS, global `fetch`)

use serde_json::json;

use super::{comment_text, escape_single_quoted, GenerationContext, Language, LanguageGenerator};
use crate::{
    endpoint::PathPart,
    naming::{kebab_case, pascal_case, sanitize_identifier, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "// Generated by TSmart SDK Generator. Do not edit.\n";
const METHOD_NAMING: NamingConvention = NamingConvention::LowerCamel;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::LowerCamel;
const QUERY_ARG: &str = "queryParams";
const BODY_ARG: &str = "data";

const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub struct JavaScriptGenerator;

impl JavaScriptGenerator {
    fn service_file_stem(service: &ServiceSpec) -> String {
        kebab_case(&service.ident)
    }

    /// Path as a template literal with `${arg}` substitutions
    fn path_literal(&self, method: &MethodSpec) -> String {
        let mut out = String::from("`");
        for part in method.path_parts() {
            match part {
                PathPart::Literal(text) => out.push_str(
                    &text
                        .replace('\\', "\\\\")
                        .replace('`', "\\`")
                        .replace("${", "\\${"),
                ),
                PathPart::Param(name) => {
                    out.push_str(&format!("${{{}}}", self.argument_name(method, name)));
                }
            }
        }
        out.push('`');
        out
    }

    fn method_arguments(&self, method: &MethodSpec) -> Vec<String> {
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| self.argument_name(method, p))
            .collect();
        if method.has_query {
            args.push(format!("{} = {{}}", QUERY_ARG));
        }
        if method.has_body {
            args.push(BODY_ARG.to_string());
        }
        args
    }

    fn generate_method(&self, method: &MethodSpec) -> String {
        let mut output = String::new();

        if let Some(summary) = &method.summary {
            output.push_str(&format!("  /** {} */\n", comment_text(summary)));
        }
        output.push_str(&format!(
            "  async {}({}) {{\n",
            self.method_name(method),
            self.method_arguments(method).join(", ")
        ));

        let binding = if method.has_query { "let" } else { "const" };
        output.push_str(&format!("    {} path = {};\n", binding, self.path_literal(method)));

        if method.has_query {
            output.push_str(&format!("    const query = new URLSearchParams({}).toString();\n", QUERY_ARG));
            output.push_str("    if (query) {\n");
            output.push_str("      path += `?${query}`;\n");
            output.push_str("    }\n");
        }

        if method.has_body {
            output.push_str(&format!(
                "    return this.client.request('{}', path, {});\n",
                method.http_method, BODY_ARG
            ));
        } else {
            output.push_str(&format!(
                "    return this.client.request('{}', path);\n",
                method.http_method
            ));
        }
        output.push_str("  }\n");

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("'{}'", escape_single_quoted(&format!("<{}>", p))))
            .collect();
        if method.has_body {
            if method.has_query {
                args.push("{}".to_string());
            }
            args.push("{ /* request body */ }".to_string());
        }
        args.join(", ")
    }
}

impl LanguageGenerator for JavaScriptGenerator {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn method_naming(&self) -> NamingConvention {
        METHOD_NAMING
    }

    fn argument_naming(&self) -> NamingConvention {
        ARGUMENT_NAMING
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn code_fence(&self) -> &'static str {
        "javascript"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!("npm install {}", ctx.package_name())
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "query", "queryParams", "data"]
    }

    fn manifest_file_name(&self, _ctx: &GenerationContext<'_>) -> Option<String> {
        Some("package.json".to_string())
    }

    fn client_name(&self, ctx: &GenerationContext<'_>) -> String {
        sanitize_identifier(
            &format!("{}Client", pascal_case(ctx.package_name())),
            NamingConvention::UpperCamel,
            RESERVED,
        )
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let client = self.client_name(ctx);
        let mut output = String::from(HEADER);

        output.push_str("'use strict';\n\n");
        output.push_str(&format!(
            "const DEFAULT_BASE_URL = '{}';\n\n",
            escape_single_quoted(&ctx.config.base_url)
        ));

        output.push_str("class ApiError extends Error {\n");
        output.push_str("  constructor(status, statusText, body) {\n");
        output.push_str("    super(`Request failed with status ${status}: ${statusText}`);\n");
        output.push_str("    this.name = 'ApiError';\n");
        output.push_str("    this.status = status;\n");
        output.push_str("    this.body = body;\n");
        output.push_str("  }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("class {} {{\n", client));
        output.push_str("  constructor(options = {}) {\n");
        output.push_str("    this.baseUrl = options.baseUrl || DEFAULT_BASE_URL;\n");
        output.push_str("    this.apiKey = options.apiKey;\n");
        output.push_str("  }\n\n");

        output.push_str("  async request(method, path, data) {\n");
        output.push_str("    const headers = { 'Content-Type': 'application/json' };\n");
        output.push_str("    if (this.apiKey) {\n");
        output.push_str("      headers['Authorization'] = `Bearer ${this.apiKey}`;\n");
        output.push_str("    }\n\n");
        output.push_str("    const response = await fetch(`${this.baseUrl}${path}`, {\n");
        output.push_str("      method,\n");
        output.push_str("      headers,\n");
        output.push_str("      body: data !== undefined ? JSON.stringify(data) : undefined,\n");
        output.push_str("    });\n\n");
        output.push_str("    if (!response.ok) {\n");
        output.push_str("      throw new ApiError(response.status, response.statusText, await response.text());\n");
        output.push_str("    }\n\n");
        output.push_str("    if (response.status === 204) {\n");
        output.push_str("      return null;\n");
        output.push_str("    }\n");
        output.push_str("    return response.json();\n");
        output.push_str("  }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("module.exports = {{ {}, ApiError }};\n", client));

        GeneratedFile::new("src/client.js", output, FileType::Client)
    }

    fn generate_service(&self, _ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let class = self.service_class_name(service);
        let mut output = String::from(HEADER);

        output.push_str("'use strict';\n\n");
        output.push_str(&format!("class {} {{\n", class));
        output.push_str("  constructor(client) {\n");
        output.push_str("    this.client = client;\n");
        output.push_str("  }\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(method));
        }

        output.push_str("}\n\n");
        output.push_str(&format!("module.exports = {{ {} }};\n", class));

        GeneratedFile::new(
            format!("src/services/{}.js", Self::service_file_stem(service)),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("// Type definitions for {}\n", ctx.package_name()));
        output.push_str(&format!(
            "// Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));
        output.push_str("'use strict';\n\n");
        output.push_str("module.exports = {};\n");

        GeneratedFile::new("src/types.js", output, FileType::Types)
    }

    fn generate_support_files(&self, ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        let client = self.client_name(ctx);
        let mut output = String::from(HEADER);

        output.push_str("'use strict';\n\n");
        output.push_str(&format!("const {{ {}, ApiError }} = require('./client');\n", client));
        for service in &ctx.services {
            output.push_str(&format!(
                "const {{ {} }} = require('./services/{}');\n",
                self.service_class_name(service),
                Self::service_file_stem(service)
            ));
        }
        output.push_str("\nmodule.exports = {\n");
        output.push_str(&format!("  {},\n", client));
        output.push_str("  ApiError,\n");
        for service in &ctx.services {
            output.push_str(&format!("  {},\n", self.service_class_name(service)));
        }
        output.push_str("};\n");

        vec![GeneratedFile::source("src/index.js", output)]
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        PackageConfig::Json(json!({
            "name": ctx.package_name(),
            "version": ctx.config.version,
            "description": ctx.description(),
            "main": "src/index.js",
            "files": ["src"],
            "keywords": ["api", "sdk", "client"],
            "author": ctx.author(),
            "license": "MIT",
            "engines": { "node": ">=18" },
        }))
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "const {{ {} }} = require('{}');\n\n",
            self.client_name(ctx),
            escape_single_quoted(ctx.package_name())
        ));
        output.push_str(&format!("const client = new {}({{\n", self.client_name(ctx)));
        output.push_str(&format!(
            "  baseUrl: '{}',\n",
            escape_single_quoted(&ctx.config.base_url)
        ));
        output.push_str(&format!(
            "  apiKey: process.env.{}_API_KEY,\n",
            snake_case(ctx.package_name()).to_ascii_uppercase()
        ));
        output.push_str("});\n");
        output
    }

    fn method_example(
        &self,
        ctx: &GenerationContext<'_>,
        service: &ServiceSpec,
        method: &MethodSpec,
    ) -> String {
        let class = self.service_class_name(service);
        let var = sanitize_identifier(&service.ident, NamingConvention::LowerCamel, RESERVED);

        let mut output = String::new();
        output.push_str(&format!(
            "const {{ {}, {} }} = require('{}');\n\n",
            self.client_name(ctx),
            class,
            escape_single_quoted(ctx.package_name())
        ));
        output.push_str(&format!(
            "const client = new {}({{ apiKey: process.env.{}_API_KEY }});\n",
            self.client_name(ctx),
            snake_case(ctx.package_name()).to_ascii_uppercase()
        ));
        output.push_str(&format!("const {} = new {}(client);\n\n", var, class));
        output.push_str(&format!(
            "const result = await {}.{}({});\n",
            var,
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("console.log(result);\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SdkConfig,
        endpoint::{EndpointDescriptor, Parameter},
        service::build_services,
    };

    fn context<'a>(config: &'a SdkConfig, endpoints: &[EndpointDescriptor]) -> GenerationContext<'a> {
        GenerationContext::new(config, build_services(endpoints), endpoints.len())
    }

    #[test]
    fn test_path_interpolation() {
        let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("GET", "/users/{id}")
            .with_parameter(Parameter::path("id"))
            .with_tag("users")];
        let ctx = context(&config, &endpoints);

        let file = JavaScriptGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "src/services/users.js");
        assert!(file.content.contains("class UsersService"));
        assert!(file.content.contains("async getUsers(id) {"));
        assert!(file.content.contains("const path = `/users/${id}`;"));
        assert!(file.content.contains("return this.client.request('GET', path);"));
    }

    #[test]
    fn test_query_and_body_arguments() {
        let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("put", "/users/{user-id}")
            .with_parameter(Parameter::path("user-id"))
            .with_parameter(Parameter::query("notify"))
            .with_request_body()];
        let ctx = context(&config, &endpoints);

        let file = JavaScriptGenerator.generate_service(&ctx, &ctx.services[0]);
        assert!(file.content.contains("async putUsers(userId, queryParams = {}, data) {"));
        assert!(file.content.contains("let path = `/users/${userId}`;"));
        assert!(file.content.contains("new URLSearchParams(queryParams)"));
        assert!(file.content.contains("return this.client.request('PUT', path, data);"));
    }

    #[test]
    fn test_client_and_manifest() {
        let config = SdkConfig::new(Language::JavaScript, "my-api", "https://api.example.test")
            .with_version("2.1.0");
        let ctx = context(&config, &[]);

        let client = JavaScriptGenerator.generate_client(&ctx);
        assert!(client.content.contains("class MyApiClient {"));
        assert!(client.content.contains("const DEFAULT_BASE_URL = 'https://api.example.test';"));
        assert!(client.content.contains("Bearer ${this.apiKey}"));

        let manifest = JavaScriptGenerator.generate_manifest(&ctx);
        let manifest = manifest.as_json().unwrap();
        assert_eq!(manifest["name"], "my-api");
        assert_eq!(manifest["version"], "2.1.0");
        assert_eq!(manifest["main"], "src/index.js");
    }

    #[test]
    fn test_path_arguments_folding_to_one_name() {
        let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("get", "/x/{user-id}/y/{user_id}")
            .with_parameter(Parameter::path("user-id"))
            .with_parameter(Parameter::path("user_id"))];
        let ctx = context(&config, &endpoints);

        let file = JavaScriptGenerator.generate_service(&ctx, &ctx.services[0]);
        assert!(file.content.contains("async getXY(userId, userId2) {"));
        assert!(file.content.contains("const path = `/x/${userId}/y/${userId2}`;"));
    }

    #[test]
    fn test_client_name_with_leading_digit() {
        let config = SdkConfig::new(Language::JavaScript, "3d-api", "https://api.example.test");
        let ctx = context(&config, &[]);

        assert_eq!(JavaScriptGenerator.client_name(&ctx), "_3dApiClient");
        let client = JavaScriptGenerator.generate_client(&ctx);
        assert!(client.content.contains("class _3dApiClient {"));
    }
}
