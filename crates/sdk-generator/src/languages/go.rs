//! Go SDK generator (`net/http` + `encoding/json`)

use super::{
    comment_text, concat_path_expression, escape_double_quoted, GenerationContext, Language,
    LanguageGenerator,
};
use crate::{
    naming::{flat_case, kebab_case, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "// Code generated by TSmart SDK Generator. DO NOT EDIT.\n\n";
const METHOD_NAMING: NamingConvention = NamingConvention::UpperCamel;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::LowerCamel;
const QUERY_ARG: &str = "queryParams";
const BODY_ARG: &str = "data";
const GO_VERSION: &str = "1.20";

const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "string", "error", "nil", "true",
    "false", "url", "json",
];

pub struct GoGenerator;

impl GoGenerator {
    fn package(ctx: &GenerationContext<'_>) -> String {
        let name = flat_case(ctx.package_name());
        let name = if name.is_empty() || RESERVED.contains(&name.as_str()) {
            format!("{}sdk", name)
        } else {
            name
        };
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("sdk{}", name)
        } else {
            name
        }
    }

    fn module_path(ctx: &GenerationContext<'_>) -> String {
        let name = kebab_case(ctx.package_name());
        if name.is_empty() {
            Self::package(ctx)
        } else {
            name
        }
    }

    fn parameters(&self, method: &MethodSpec) -> String {
        let mut params: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("{} string", self.argument_name(method, p)))
            .collect();
        if method.has_query {
            params.push(format!("{} url.Values", QUERY_ARG));
        }
        if method.has_body {
            params.push(format!("{} interface{{}}", BODY_ARG));
        }
        params.join(", ")
    }

    fn generate_method(&self, class: &str, method: &MethodSpec) -> String {
        let name = self.method_name(method);
        let mut output = String::new();

        match &method.summary {
            Some(summary) => {
                output.push_str(&format!("// {} {}\n", name, comment_text(summary)));
            }
            None => {
                output.push_str(&format!(
                    "// {} calls {} {}\n",
                    name, method.http_method, method.path
                ));
            }
        }
        output.push_str(&format!(
            "func (s *{}) {}({}) (json.RawMessage, error) {{\n",
            class,
            name,
            self.parameters(method)
        ));
        output.push_str(&format!(
            "\tpath := {}\n",
            concat_path_expression(&method.path_parts(), |p| self.argument_name(method, p))
        ));

        if method.has_query {
            output.push_str(&format!("\tif len({}) > 0 {{\n", QUERY_ARG));
            output.push_str(&format!("\t\tpath += \"?\" + {}.Encode()\n", QUERY_ARG));
            output.push_str("\t}\n");
        }

        let body = if method.has_body { BODY_ARG } else { "nil" };
        output.push_str(&format!(
            "\treturn s.client.Request(\"{}\", path, {})\n",
            method.http_method, body
        ));
        output.push_str("}\n");

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("\"{}\"", escape_double_quoted(&format!("<{}>", p))))
            .collect();
        if method.has_query {
            args.push("nil".to_string());
        }
        if method.has_body {
            args.push("nil".to_string());
        }
        args.join(", ")
    }

    fn api_key_variable(ctx: &GenerationContext<'_>) -> String {
        format!("{}_API_KEY", snake_case(ctx.package_name()).to_ascii_uppercase())
    }
}

impl LanguageGenerator for GoGenerator {
    fn language(&self) -> Language {
        Language::Go
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
        "go"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!("go get {}", Self::module_path(ctx))
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "queryParams", "data", "s"]
    }

    fn manifest_file_name(&self, _ctx: &GenerationContext<'_>) -> Option<String> {
        Some("go.mod".to_string())
    }

    fn client_name(&self, _ctx: &GenerationContext<'_>) -> String {
        "Client".to_string()
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);

        output.push_str(&format!("package {}\n\n", Self::package(ctx)));
        output.push_str("import (\n");
        output.push_str("\t\"bytes\"\n");
        output.push_str("\t\"encoding/json\"\n");
        output.push_str("\t\"fmt\"\n");
        output.push_str("\t\"io\"\n");
        output.push_str("\t\"net/http\"\n");
        output.push_str("\t\"strings\"\n");
        output.push_str(")\n\n");

        output.push_str(&format!(
            "// DefaultBaseURL is the API endpoint used when none is given.\nconst DefaultBaseURL = \"{}\"\n\n",
            escape_double_quoted(&ctx.config.base_url)
        ));

        output.push_str("// APIError is returned for non-2xx responses.\n");
        output.push_str("type APIError struct {\n");
        output.push_str("\tStatusCode int\n");
        output.push_str("\tBody       string\n");
        output.push_str("}\n\n");
        output.push_str("func (e *APIError) Error() string {\n");
        output.push_str("\treturn fmt.Sprintf(\"request failed with status %d: %s\", e.StatusCode, e.Body)\n");
        output.push_str("}\n\n");

        output.push_str("// Client is the API client.\n");
        output.push_str("type Client struct {\n");
        output.push_str("\tBaseURL    string\n");
        output.push_str("\tAPIKey     string\n");
        output.push_str("\tHTTPClient *http.Client\n");
        output.push_str("}\n\n");

        output.push_str("// NewClient creates a client. An empty baseURL selects DefaultBaseURL.\n");
        output.push_str("func NewClient(apiKey, baseURL string) *Client {\n");
        output.push_str("\tif baseURL == \"\" {\n");
        output.push_str("\t\tbaseURL = DefaultBaseURL\n");
        output.push_str("\t}\n");
        output.push_str("\treturn &Client{\n");
        output.push_str("\t\tBaseURL:    strings.TrimRight(baseURL, \"/\"),\n");
        output.push_str("\t\tAPIKey:     apiKey,\n");
        output.push_str("\t\tHTTPClient: &http.Client{},\n");
        output.push_str("\t}\n");
        output.push_str("}\n\n");

        output.push_str("// Request performs an HTTP request and returns the raw JSON body.\n");
        output.push_str("func (c *Client) Request(method, path string, data interface{}) (json.RawMessage, error) {\n");
        output.push_str("\tvar body io.Reader\n");
        output.push_str("\tif data != nil {\n");
        output.push_str("\t\tencoded, err := json.Marshal(data)\n");
        output.push_str("\t\tif err != nil {\n");
        output.push_str("\t\t\treturn nil, err\n");
        output.push_str("\t\t}\n");
        output.push_str("\t\tbody = bytes.NewReader(encoded)\n");
        output.push_str("\t}\n\n");
        output.push_str("\treq, err := http.NewRequest(method, c.BaseURL+path, body)\n");
        output.push_str("\tif err != nil {\n");
        output.push_str("\t\treturn nil, err\n");
        output.push_str("\t}\n");
        output.push_str("\treq.Header.Set(\"Content-Type\", \"application/json\")\n");
        output.push_str("\tif c.APIKey != \"\" {\n");
        output.push_str("\t\treq.Header.Set(\"Authorization\", \"Bearer \"+c.APIKey)\n");
        output.push_str("\t}\n\n");
        output.push_str("\tresp, err := c.HTTPClient.Do(req)\n");
        output.push_str("\tif err != nil {\n");
        output.push_str("\t\treturn nil, err\n");
        output.push_str("\t}\n");
        output.push_str("\tdefer resp.Body.Close()\n\n");
        output.push_str("\tpayload, err := io.ReadAll(resp.Body)\n");
        output.push_str("\tif err != nil {\n");
        output.push_str("\t\treturn nil, err\n");
        output.push_str("\t}\n");
        output.push_str("\tif resp.StatusCode < 200 || resp.StatusCode >= 300 {\n");
        output.push_str("\t\treturn nil, &APIError{StatusCode: resp.StatusCode, Body: string(payload)}\n");
        output.push_str("\t}\n");
        output.push_str("\treturn json.RawMessage(payload), nil\n");
        output.push_str("}\n");

        GeneratedFile::new("client.go", output, FileType::Client)
    }

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let class = self.service_class_name(service);
        let mut output = String::from(HEADER);

        output.push_str(&format!("package {}\n\n", Self::package(ctx)));
        if service.methods.iter().any(|m| m.has_query) {
            output.push_str("import (\n");
            output.push_str("\t\"encoding/json\"\n");
            output.push_str("\t\"net/url\"\n");
            output.push_str(")\n\n");
        } else {
            output.push_str("import \"encoding/json\"\n\n");
        }

        output.push_str(&format!(
            "// {} groups the {} endpoints.\n",
            class,
            comment_text(&service.name)
        ));
        output.push_str(&format!("type {} struct {{\n", class));
        output.push_str("\tclient *Client\n");
        output.push_str("}\n\n");
        output.push_str(&format!("// New{0} creates a {0}.\n", class));
        output.push_str(&format!("func New{0}(client *Client) *{0} {{\n", class));
        output.push_str(&format!("\treturn &{}{{client: client}}\n", class));
        output.push_str("}\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(&class, method));
        }

        GeneratedFile::new(
            format!("{}_service.go", snake_case(&service.ident)),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("package {}\n\n", Self::package(ctx)));
        output.push_str(&format!(
            "// Type definitions for {}.\n",
            comment_text(ctx.package_name())
        ));
        output.push_str(&format!(
            "// Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));

        GeneratedFile::new("types.go", output, FileType::Types)
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        PackageConfig::Text(format!(
            "module {}\n\ngo {}\n",
            Self::module_path(ctx),
            GO_VERSION
        ))
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let package = Self::package(ctx);
        let mut output = String::new();
        output.push_str(&format!(
            "import {} \"{}\"\n\n",
            package,
            Self::module_path(ctx)
        ));
        output.push_str(&format!(
            "client := {}.NewClient(os.Getenv(\"{}\"), \"{}\")\n",
            package,
            Self::api_key_variable(ctx),
            escape_double_quoted(&ctx.config.base_url)
        ));
        output
    }

    fn method_example(
        &self,
        ctx: &GenerationContext<'_>,
        service: &ServiceSpec,
        method: &MethodSpec,
    ) -> String {
        let package = Self::package(ctx);
        let class = self.service_class_name(service);

        let mut output = String::new();
        output.push_str(&format!(
            "client := {}.NewClient(os.Getenv(\"{}\"), \"\")\n",
            package,
            Self::api_key_variable(ctx)
        ));
        output.push_str(&format!("service := {}.New{}(client)\n\n", package, class));
        output.push_str(&format!(
            "result, err := service.{}({})\n",
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("if err != nil {\n");
        output.push_str("\tlog.Fatal(err)\n");
        output.push_str("}\n");
        output.push_str("fmt.Println(string(result))\n");
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
    fn test_path_only_signature() {
        let config = SdkConfig::new(Language::Go, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("get", "/users/{id}/orders")
            .with_parameter(Parameter::path("id"))
            .with_tag("users")];
        let ctx = context(&config, &endpoints);

        let file = GoGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "users_service.go");
        assert!(file.content.starts_with("// Code generated"));
        assert!(file.content.contains("package acme"));
        assert!(file
            .content
            .contains("func (s *UsersService) GetUsersOrders(id string) (json.RawMessage, error) {"));
        assert!(file.content.contains("path := \"/users/\" + id + \"/orders\""));
        assert!(file.content.contains("return s.client.Request(\"GET\", path, nil)"));
        assert!(!file.content.contains("net/url"));
    }

    #[test]
    fn test_query_and_body_arguments() {
        let config = SdkConfig::new(Language::Go, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("post", "/search")
            .with_parameter(Parameter::query("q"))
            .with_request_body()];
        let ctx = context(&config, &endpoints);

        let file = GoGenerator.generate_service(&ctx, &ctx.services[0]);
        assert!(file
            .content
            .contains("PostSearch(queryParams url.Values, data interface{}) (json.RawMessage, error)"));
        assert!(file.content.contains("path += \"?\" + queryParams.Encode()"));
        assert!(file.content.contains("\"net/url\""));
    }

    #[test]
    fn test_reserved_package_name() {
        let config = SdkConfig::new(Language::Go, "type", "https://api.example.test");
        let ctx = context(&config, &[]);
        let client = GoGenerator.generate_client(&ctx);
        assert!(client.content.contains("package typesdk"));

        let manifest = GoGenerator.generate_manifest(&ctx);
        assert_eq!(manifest.as_text(), Some("module type\n\ngo 1.20\n"));
    }

    #[test]
    fn test_empty_tag_file_name() {
        let config = SdkConfig::new(Language::Go, "acme", "https://api.acme.test");
        let endpoints = vec![EndpointDescriptor::new("get", "/ping").with_tag("")];
        let ctx = context(&config, &endpoints);

        let file = GoGenerator.generate_service(&ctx, &ctx.services[0]);
        assert_eq!(file.path, "default_service.go");
        assert!(file.content.contains("type DefaultService struct {"));
    }
}
