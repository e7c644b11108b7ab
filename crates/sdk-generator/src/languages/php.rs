//! PHP SDK generator (curl + Composer PSR-4)

use serde_json::json;

use super::{
    comment_text, escape_single_quoted, GenerationContext, Language, LanguageGenerator,
};
use crate::{
    endpoint::PathPart,
    naming::{camel_case, kebab_case, pascal_case, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "<?php\n\n// Generated by TSmart SDK Generator. Do not edit.\n\n";
const METHOD_NAMING: NamingConvention = NamingConvention::LowerCamel;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::LowerCamel;
const QUERY_ARG: &str = "queryParams";
const BODY_ARG: &str = "data";
const PHP_CONSTRAINT: &str = ">=7.4";
const DEFAULT_VENDOR: &str = "sdk";

const RESERVED: &[&str] = &[
    "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
    "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "eval", "exit",
    "extends", "final", "finally", "fn", "for", "foreach", "function", "global", "goto", "if",
    "implements", "include", "instanceof", "insteadof", "interface", "isset", "list", "match",
    "namespace", "new", "or", "print", "private", "protected", "public", "require", "return",
    "static", "switch", "throw", "trait", "try", "unset", "use", "var", "while", "xor", "yield",
    "this",
];

pub struct PhpGenerator;

impl PhpGenerator {
    fn namespace(ctx: &GenerationContext<'_>) -> String {
        let name = pascal_case(ctx.package_name());
        if name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || RESERVED.contains(&name.to_ascii_lowercase().as_str())
        {
            format!("Sdk{}", name)
        } else {
            name
        }
    }

    fn composer_name(ctx: &GenerationContext<'_>) -> String {
        let vendor = kebab_case(ctx.author());
        let vendor = if vendor.is_empty() {
            DEFAULT_VENDOR.to_string()
        } else {
            vendor
        };
        let package = kebab_case(ctx.package_name());
        format!("{}/{}", vendor, package)
    }

    /// Path as a double-quoted string with `{$arg}` interpolation
    fn path_literal(&self, method: &MethodSpec) -> String {
        let mut out = String::from("\"");
        for part in method.path_parts() {
            match part {
                PathPart::Literal(text) => out.push_str(&escape_php_double_quoted(text)),
                PathPart::Param(name) => {
                    out.push_str(&format!("{{${}}}", self.argument_name(method, name)));
                }
            }
        }
        out.push('"');
        out
    }

    fn parameters(&self, method: &MethodSpec) -> String {
        let mut params: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("${}", self.argument_name(method, p)))
            .collect();
        if method.has_query {
            params.push(format!("array ${} = []", QUERY_ARG));
        }
        if method.has_body {
            params.push(format!("${} = null", BODY_ARG));
        }
        params.join(", ")
    }

    fn generate_method(&self, method: &MethodSpec) -> String {
        let mut output = String::new();

        if let Some(summary) = &method.summary {
            output.push_str("    /**\n");
            output.push_str(&format!(
                "     * {}\n",
                comment_text(summary).replace("*/", "* /")
            ));
            output.push_str("     */\n");
        }
        output.push_str(&format!(
            "    public function {}({})\n",
            self.method_name(method),
            self.parameters(method)
        ));
        output.push_str("    {\n");
        output.push_str(&format!("        $path = {};\n", self.path_literal(method)));

        if method.has_query {
            output.push_str(&format!("        if (!empty(${})) {{\n", QUERY_ARG));
            output.push_str(&format!(
                "            $path .= '?' . http_build_query(${});\n",
                QUERY_ARG
            ));
            output.push_str("        }\n");
        }

        let body = if method.has_body {
            format!("${}", BODY_ARG)
        } else {
            "null".to_string()
        };
        output.push_str(&format!(
            "        return $this->client->request('{}', $path, {});\n",
            method.http_method, body
        ));
        output.push_str("    }\n");

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        method
            .path_params
            .iter()
            .map(|p| format!("'{}'", escape_single_quoted(&format!("<{}>", p))))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn api_key_variable(ctx: &GenerationContext<'_>) -> String {
        format!("{}_API_KEY", snake_case(ctx.package_name()).to_ascii_uppercase())
    }
}

/// Escape text for a PHP double-quoted string, where `$` interpolates
fn escape_php_double_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

impl LanguageGenerator for PhpGenerator {
    fn language(&self) -> Language {
        Language::PHP
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
        "php"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!("composer require {}", Self::composer_name(ctx))
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "queryParams", "data", "this"]
    }

    fn manifest_file_name(&self, _ctx: &GenerationContext<'_>) -> Option<String> {
        Some("composer.json".to_string())
    }

    fn client_name(&self, _ctx: &GenerationContext<'_>) -> String {
        "Client".to_string()
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);

        output.push_str(&format!("namespace {};\n\n", Self::namespace(ctx)));
        output.push_str("class Client\n");
        output.push_str("{\n");
        output.push_str(&format!(
            "    public const DEFAULT_BASE_URL = '{}';\n\n",
            escape_single_quoted(&ctx.config.base_url)
        ));
        output.push_str("    private $apiKey;\n");
        output.push_str("    private $baseUrl;\n\n");

        output.push_str("    public function __construct($apiKey, $baseUrl = self::DEFAULT_BASE_URL)\n");
        output.push_str("    {\n");
        output.push_str("        $this->apiKey = $apiKey;\n");
        output.push_str("        $this->baseUrl = rtrim($baseUrl, '/');\n");
        output.push_str("    }\n\n");

        output.push_str("    public function request($method, $path, $data = null)\n");
        output.push_str("    {\n");
        output.push_str("        $headers = ['Content-Type: application/json'];\n");
        output.push_str("        if ($this->apiKey) {\n");
        output.push_str("            $headers[] = 'Authorization: Bearer ' . $this->apiKey;\n");
        output.push_str("        }\n\n");
        output.push_str("        $ch = curl_init($this->baseUrl . $path);\n");
        output.push_str("        curl_setopt($ch, CURLOPT_CUSTOMREQUEST, $method);\n");
        output.push_str("        curl_setopt($ch, CURLOPT_RETURNTRANSFER, true);\n");
        output.push_str("        curl_setopt($ch, CURLOPT_HTTPHEADER, $headers);\n");
        output.push_str("        if ($data !== null) {\n");
        output.push_str("            curl_setopt($ch, CURLOPT_POSTFIELDS, json_encode($data));\n");
        output.push_str("        }\n\n");
        output.push_str("        $body = curl_exec($ch);\n");
        output.push_str("        if ($body === false) {\n");
        output.push_str("            $error = curl_error($ch);\n");
        output.push_str("            curl_close($ch);\n");
        output.push_str("            throw new ApiException(0, $error);\n");
        output.push_str("        }\n");
        output.push_str("        $status = curl_getinfo($ch, CURLINFO_HTTP_CODE);\n");
        output.push_str("        curl_close($ch);\n\n");
        output.push_str("        if ($status < 200 || $status >= 300) {\n");
        output.push_str("            throw new ApiException($status, $body);\n");
        output.push_str("        }\n");
        output.push_str("        return json_decode($body, true);\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new("src/Client.php", output, FileType::Client)
    }

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let namespace = Self::namespace(ctx);
        let class = self.service_class_name(service);
        let mut output = String::from(HEADER);

        output.push_str(&format!("namespace {}\\Services;\n\n", namespace));
        output.push_str(&format!("use {}\\Client;\n\n", namespace));
        output.push_str(&format!("class {}\n", class));
        output.push_str("{\n");
        output.push_str("    private $client;\n\n");
        output.push_str("    public function __construct(Client $client)\n");
        output.push_str("    {\n");
        output.push_str("        $this->client = $client;\n");
        output.push_str("    }\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(method));
        }

        output.push_str("}\n");

        GeneratedFile::new(
            format!("src/Services/{}.php", class),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("namespace {}\\Models;\n\n", Self::namespace(ctx)));
        output.push_str(&format!(
            "// Type definitions for {}.\n",
            comment_text(ctx.package_name())
        ));
        output.push_str(&format!(
            "// Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));

        GeneratedFile::new("src/Models/Types.php", output, FileType::Types)
    }

    fn generate_support_files(&self, ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        let mut output = String::from(HEADER);
        output.push_str(&format!("namespace {};\n\n", Self::namespace(ctx)));
        output.push_str("class ApiException extends \\RuntimeException\n");
        output.push_str("{\n");
        output.push_str("    private $body;\n\n");
        output.push_str("    public function __construct($status, $body)\n");
        output.push_str("    {\n");
        output.push_str("        parent::__construct(\"Request failed with status {$status}: {$body}\", (int) $status);\n");
        output.push_str("        $this->body = $body;\n");
        output.push_str("    }\n\n");
        output.push_str("    public function getBody()\n");
        output.push_str("    {\n");
        output.push_str("        return $this->body;\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        vec![GeneratedFile::source("src/ApiException.php", output)]
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        let namespace = format!("{}\\", Self::namespace(ctx));
        let mut authors = Vec::new();
        if !ctx.author().is_empty() {
            authors.push(json!({ "name": ctx.author() }));
        }

        PackageConfig::Json(json!({
            "name": Self::composer_name(ctx),
            "version": ctx.config.version,
            "description": ctx.description(),
            "type": "library",
            "license": "MIT",
            "authors": authors,
            "require": {
                "php": PHP_CONSTRAINT,
                "ext-curl": "*",
                "ext-json": "*"
            },
            "autoload": {
                "psr-4": { namespace: "src/" }
            }
        }))
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let mut output = String::new();
        output.push_str("<?php\n\n");
        output.push_str("require 'vendor/autoload.php';\n\n");
        output.push_str(&format!("use {}\\Client;\n\n", Self::namespace(ctx)));
        output.push_str(&format!(
            "$client = new Client(getenv('{}'), '{}');\n",
            Self::api_key_variable(ctx),
            escape_single_quoted(&ctx.config.base_url)
        ));
        output
    }

    fn method_example(
        &self,
        ctx: &GenerationContext<'_>,
        service: &ServiceSpec,
        method: &MethodSpec,
    ) -> String {
        let namespace = Self::namespace(ctx);
        let class = self.service_class_name(service);
        let var = camel_case(&class);

        let mut output = String::new();
        output.push_str("<?php\n\n");
        output.push_str("require 'vendor/autoload.php';\n\n");
        output.push_str(&format!("use {}\\Client;\n", namespace));
        output.push_str(&format!("use {}\\Services\\{};\n\n", namespace, class));
        output.push_str(&format!(
            "$client = new Client(getenv('{}'));\n",
            Self::api_key_variable(ctx)
        ));
        output.push_str(&format!("${} = new {}($client);\n\n", var, class));
        output.push_str(&format!(
            "$result = ${}->{}({});\n",
            var,
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("print_r($result);\n");
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
    fn test_interpolated_path() {
        let config = SdkConfig::new(Language::PHP, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("get", "/users/{user_id}/orders")
            .with_parameter(Parameter::path("user_id"))
            .with_tag("users")];
        let ctx = context(&config, &endpoints);

        let file = PhpGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "src/Services/UsersService.php");
        assert!(file.content.starts_with("<?php"));
        assert!(file.content.contains("namespace Acme\\Services;"));
        assert!(file.content.contains("public function getUsersOrders($userId)"));
        assert!(file.content.contains("$path = \"/users/{$userId}/orders\";"));
        assert!(file
            .content
            .contains("return $this->client->request('GET', $path, null);"));
    }

    #[test]
    fn test_dollar_in_literal_is_escaped() {
        assert_eq!(escape_php_double_quoted("/price$"), "/price\\$");
    }

    #[test]
    fn test_composer_manifest() {
        let config = SdkConfig::new(Language::PHP, "my_api", "https://api.example.test")
            .with_author("Acme Corp");
        let ctx = context(&config, &[]);

        let manifest = PhpGenerator.generate_manifest(&ctx);
        let json = manifest.as_json().unwrap();
        assert_eq!(json["name"], "acme-corp/my-api");
        assert_eq!(json["autoload"]["psr-4"]["MyApi\\"], "src/");
        assert_eq!(json["authors"][0]["name"], "Acme Corp");
    }

    #[test]
    fn test_vendor_defaults_without_author() {
        let config = SdkConfig::new(Language::PHP, "widgets", "https://api.example.test");
        let ctx = context(&config, &[]);
        let manifest = PhpGenerator.generate_manifest(&ctx);
        assert_eq!(manifest.as_json().unwrap()["name"], "sdk/widgets");
    }
}
