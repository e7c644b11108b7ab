//! Python SDK generator (`requests` based)

use serde_json::{json, Value};

use super::{
    comment_text, escape_double_quoted, GenerationContext, Language, LanguageGenerator,
};
use crate::{
    endpoint::PathPart,
    naming::{pascal_case, sanitize_identifier, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "# Generated by TSmart SDK Generator. Do not edit.\n";
const METHOD_NAMING: NamingConvention = NamingConvention::Snake;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::Snake;
const QUERY_ARG: &str = "query_params";
const BODY_ARG: &str = "data";
const INDENT: &str = "    ";

const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "self",
];

pub struct PythonGenerator;

impl PythonGenerator {
    fn module_name(ctx: &GenerationContext<'_>) -> String {
        sanitize_identifier(ctx.package_name(), NamingConvention::Snake, RESERVED)
    }

    fn service_module(service: &ServiceSpec) -> String {
        sanitize_identifier(&service.ident, NamingConvention::Snake, RESERVED)
    }

    /// Path as an f-string with `{arg}` substitutions
    fn path_literal(&self, method: &MethodSpec) -> String {
        let mut out = String::from("f\"");
        for part in method.path_parts() {
            match part {
                PathPart::Literal(text) => out.push_str(
                    &escape_double_quoted(text)
                        .replace('{', "{{")
                        .replace('}', "}}"),
                ),
                PathPart::Param(name) => {
                    out.push_str(&format!("{{{}}}", self.argument_name(method, name)));
                }
            }
        }
        out.push('"');
        out
    }

    fn method_arguments(&self, method: &MethodSpec) -> Vec<String> {
        let mut args = vec!["self".to_string()];
        args.extend(method.path_params.iter().map(|p| self.argument_name(method, p)));
        if method.has_query {
            args.push(format!("{}=None", QUERY_ARG));
        }
        if method.has_body {
            args.push(format!("{}=None", BODY_ARG));
        }
        args
    }

    fn generate_method(&self, method: &MethodSpec) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}def {}({}):\n",
            INDENT,
            self.method_name(method),
            self.method_arguments(method).join(", ")
        ));
        if let Some(summary) = &method.summary {
            output.push_str(&format!(
                "{0}{0}\"\"\"{1}\"\"\"\n",
                INDENT,
                comment_text(summary).replace("\"\"\"", "'''")
            ));
        }
        output.push_str(&format!("{0}{0}path = {1}\n", INDENT, self.path_literal(method)));

        if method.has_query {
            output.push_str(&format!("{0}{0}if {1}:\n", INDENT, QUERY_ARG));
            output.push_str(&format!(
                "{0}{0}{0}path += \"?\" + urlencode({1}, doseq=True)\n",
                INDENT, QUERY_ARG
            ));
        }

        if method.has_body {
            output.push_str(&format!(
                "{0}{0}return self.client.request(\"{1}\", path, {2})\n",
                INDENT, method.http_method, BODY_ARG
            ));
        } else {
            output.push_str(&format!(
                "{0}{0}return self.client.request(\"{1}\", path)\n",
                INDENT, method.http_method
            ));
        }

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("\"{}\"", escape_double_quoted(&format!("<{}>", p))))
            .collect();
        if method.has_body {
            args.push(format!("{}={{}}", BODY_ARG));
        }
        args.join(", ")
    }

    fn setup_py(manifest: &Value) -> String {
        let mut output = String::from(HEADER);
        output.push_str("from setuptools import setup\n\n");
        output.push_str("setup(\n");
        if let Value::Object(fields) = manifest {
            for (key, value) in fields {
                // JSON strings and string arrays are valid Python literals
                output.push_str(&format!("{}{}={},\n", INDENT, key, value));
            }
        }
        output.push_str(")\n");
        output
    }
}

impl LanguageGenerator for PythonGenerator {
    fn language(&self) -> Language {
        Language::Python
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
        "python"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!("pip install {}", ctx.package_name())
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "query_params", "data"]
    }

    fn manifest_file_name(&self, _ctx: &GenerationContext<'_>) -> Option<String> {
        // setup.py is emitted with the sources
        None
    }

    fn client_name(&self, ctx: &GenerationContext<'_>) -> String {
        sanitize_identifier(
            &format!("{}Client", pascal_case(ctx.package_name())),
            NamingConvention::UpperCamel,
            RESERVED,
        )
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let module = Self::module_name(ctx);
        let mut output = String::from(HEADER);

        output.push_str("import requests\n\n");
        output.push_str(&format!(
            "DEFAULT_BASE_URL = \"{}\"\n\n\n",
            escape_double_quoted(&ctx.config.base_url)
        ));

        output.push_str("class ApiError(Exception):\n");
        output.push_str("    def __init__(self, status_code, message, body=None):\n");
        output.push_str("        super().__init__(f\"Request failed with status {status_code}: {message}\")\n");
        output.push_str("        self.status_code = status_code\n");
        output.push_str("        self.body = body\n\n\n");

        output.push_str(&format!("class {}:\n", self.client_name(ctx)));
        output.push_str("    def __init__(self, api_key=None, base_url=DEFAULT_BASE_URL, timeout=30):\n");
        output.push_str("        self.base_url = base_url.rstrip(\"/\")\n");
        output.push_str("        self.api_key = api_key\n");
        output.push_str("        self.timeout = timeout\n");
        output.push_str("        self.session = requests.Session()\n\n");

        output.push_str("    def request(self, method, path, data=None):\n");
        output.push_str("        headers = {\"Content-Type\": \"application/json\"}\n");
        output.push_str("        if self.api_key:\n");
        output.push_str("            headers[\"Authorization\"] = f\"Bearer {self.api_key}\"\n\n");
        output.push_str("        response = self.session.request(\n");
        output.push_str("            method,\n");
        output.push_str("            f\"{self.base_url}{path}\",\n");
        output.push_str("            json=data,\n");
        output.push_str("            headers=headers,\n");
        output.push_str("            timeout=self.timeout,\n");
        output.push_str("        )\n");
        output.push_str("        if not response.ok:\n");
        output.push_str("            raise ApiError(response.status_code, response.reason, response.text)\n");
        output.push_str("        if response.status_code == 204 or not response.content:\n");
        output.push_str("            return None\n");
        output.push_str("        return response.json()\n");

        GeneratedFile::new(format!("{}/client.py", module), output, FileType::Client)
    }

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let mut output = String::from(HEADER);

        if service.methods.iter().any(|m| m.has_query) {
            output.push_str("from urllib.parse import urlencode\n\n\n");
        }

        output.push_str(&format!("class {}:\n", self.service_class_name(service)));
        output.push_str("    def __init__(self, client):\n");
        output.push_str("        self.client = client\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(method));
        }

        GeneratedFile::new(
            format!(
                "{}/services/{}.py",
                Self::module_name(ctx),
                Self::service_module(service)
            ),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("\"\"\"Type definitions for {}.\n\n", ctx.package_name()));
        output.push_str(&format!(
            "Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));
        output.push_str("\"\"\"\n");

        GeneratedFile::new(
            format!("{}/models.py", Self::module_name(ctx)),
            output,
            FileType::Types,
        )
    }

    fn generate_support_files(&self, ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        let module = Self::module_name(ctx);
        let client = self.client_name(ctx);

        let mut services_init = String::from(HEADER);
        for service in &ctx.services {
            services_init.push_str(&format!(
                "from .{} import {}\n",
                Self::service_module(service),
                self.service_class_name(service)
            ));
        }

        let mut exports = vec![format!("\"{}\"", client), "\"ApiError\"".to_string()];
        let mut package_init = String::from(HEADER);
        package_init.push_str(&format!("from .client import {}, ApiError\n", client));
        for service in &ctx.services {
            let class = self.service_class_name(service);
            package_init.push_str(&format!(
                "from .services.{} import {}\n",
                Self::service_module(service),
                class
            ));
            exports.push(format!("\"{}\"", class));
        }
        package_init.push_str(&format!("\n__all__ = [{}]\n", exports.join(", ")));
        package_init.push_str(&format!(
            "__version__ = \"{}\"\n",
            escape_double_quoted(&ctx.config.version)
        ));

        let manifest = match self.generate_manifest(ctx) {
            PackageConfig::Json(value) => value,
            PackageConfig::Text(_) => Value::Null,
        };

        vec![
            GeneratedFile::source(format!("{}/__init__.py", module), package_init),
            GeneratedFile::source(format!("{}/services/__init__.py", module), services_init),
            GeneratedFile::new("setup.py", Self::setup_py(&manifest), FileType::Config),
        ]
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        let module = Self::module_name(ctx);
        PackageConfig::Json(json!({
            "name": ctx.package_name(),
            "version": ctx.config.version,
            "description": ctx.description(),
            "author": ctx.author(),
            "packages": [module.clone(), format!("{}.services", module)],
            "install_requires": ["requests>=2.25"],
            "python_requires": ">=3.8",
        }))
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let mut output = String::new();
        output.push_str("import os\n\n");
        output.push_str(&format!(
            "from {} import {}\n\n",
            Self::module_name(ctx),
            self.client_name(ctx)
        ));
        output.push_str(&format!("client = {}(\n", self.client_name(ctx)));
        output.push_str(&format!(
            "    api_key=os.environ[\"{}_API_KEY\"],\n",
            snake_case(ctx.package_name()).to_ascii_uppercase()
        ));
        output.push_str(&format!(
            "    base_url=\"{}\",\n",
            escape_double_quoted(&ctx.config.base_url)
        ));
        output.push_str(")\n");
        output
    }

    fn method_example(
        &self,
        ctx: &GenerationContext<'_>,
        service: &ServiceSpec,
        method: &MethodSpec,
    ) -> String {
        let class = self.service_class_name(service);
        let var = Self::service_module(service);

        let mut output = String::new();
        output.push_str("import os\n\n");
        output.push_str(&format!(
            "from {} import {}, {}\n\n",
            Self::module_name(ctx),
            self.client_name(ctx),
            class
        ));
        output.push_str(&format!(
            "client = {}(api_key=os.environ[\"{}_API_KEY\"])\n",
            self.client_name(ctx),
            snake_case(ctx.package_name()).to_ascii_uppercase()
        ));
        output.push_str(&format!("{} = {}(client)\n\n", var, class));
        output.push_str(&format!(
            "result = {}.{}({})\n",
            var,
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("print(result)\n");
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
    fn test_fstring_path() {
        let config = SdkConfig::new(Language::Python, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("GET", "/users/{id}/orders")
            .with_parameter(Parameter::path("id"))
            .with_tag("users")];
        let ctx = context(&config, &endpoints);

        let file = PythonGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "acme/services/users.py");
        assert!(file.content.contains("class UsersService:"));
        assert!(file.content.contains("    def get_users_orders(self, id):\n"));
        assert!(file.content.contains("path = f\"/users/{id}/orders\""));
        assert!(file.content.contains("return self.client.request(\"GET\", path)"));
        assert!(!file.content.contains("urlencode"));
    }

    #[test]
    fn test_reserved_argument_and_query() {
        let config = SdkConfig::new(Language::Python, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("post", "/classes/{class}")
            .with_parameter(Parameter::path("class"))
            .with_parameter(Parameter::query("dryRun"))
            .with_request_body()
            .with_tag("class")];
        let ctx = context(&config, &endpoints);

        let file = PythonGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "acme/services/class_.py");
        assert!(file.content.contains("from urllib.parse import urlencode"));
        assert!(file
            .content
            .contains("def post_classes(self, class_, query_params=None, data=None):"));
        assert!(file.content.contains("path = f\"/classes/{class_}\""));
        assert!(file.content.contains("return self.client.request(\"POST\", path, data)"));
    }

    #[test]
    fn test_setup_py_matches_manifest() {
        let config = SdkConfig::new(Language::Python, "acme-tools", "https://api.acme.test")
            .with_author("Acme");
        let ctx = context(&config, &[]);

        let files = PythonGenerator.generate_support_files(&ctx);
        let setup = files.iter().find(|f| f.path == "setup.py").unwrap();
        assert!(setup.content.contains("    name=\"acme-tools\",\n"));
        assert!(setup.content.contains("    packages=[\"acme_tools\",\"acme_tools.services\"],\n"));

        let manifest = PythonGenerator.generate_manifest(&ctx);
        assert_eq!(manifest.as_json().unwrap()["author"], "Acme");
    }

    #[test]
    fn test_path_arguments_folding_to_one_name() {
        let config = SdkConfig::new(Language::Python, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("get", "/x/{user-id}/y/{userId}")
            .with_parameter(Parameter::path("user-id"))
            .with_parameter(Parameter::path("userId"))];
        let ctx = context(&config, &endpoints);

        let file = PythonGenerator.generate_service(&ctx, &ctx.services[0]);
        assert!(file.content.contains("def get_xy(self, user_id, user_id2):"));
        assert!(file.content.contains("path = f\"/x/{user_id}/y/{user_id2}\""));
    }

    #[test]
    fn test_client_name_with_leading_digit() {
        let config = SdkConfig::new(Language::Python, "3d-api", "https://api.example.test");
        let ctx = context(&config, &[]);

        let client = PythonGenerator.generate_client(&ctx);
        assert!(client.content.contains("class _3dApiClient:"));
    }
}
