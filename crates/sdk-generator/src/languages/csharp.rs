//! C# SDK generator (`HttpClient` + System.Text.Json)

use super::{
    comment_text, escape_double_quoted, escape_xml, GenerationContext, Language,
    LanguageGenerator,
};
use crate::{
    endpoint::PathPart,
    naming::{camel_case, pascal_case, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "// Generated by TSmart SDK Generator. Do not edit.\n";
const METHOD_NAMING: NamingConvention = NamingConvention::UpperCamel;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::LowerCamel;
const QUERY_ARG: &str = "queryParams";
const BODY_ARG: &str = "data";
const TARGET_FRAMEWORK: &str = "net6.0";

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub struct CSharpGenerator;

impl CSharpGenerator {
    fn namespace(ctx: &GenerationContext<'_>) -> String {
        let name = pascal_case(ctx.package_name());
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("Sdk{}", name)
        } else {
            name
        }
    }

    fn source_dir(ctx: &GenerationContext<'_>) -> String {
        format!("src/{}", Self::namespace(ctx))
    }

    /// Path as an interpolated string with `{arg}` substitutions
    fn path_literal(&self, method: &MethodSpec) -> String {
        let mut out = String::from("$\"");
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
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("string {}", self.argument_name(method, p)))
            .collect();
        if method.has_query {
            args.push(format!("IDictionary<string, string> {} = null", QUERY_ARG));
        }
        if method.has_body {
            args.push(format!("object {} = null", BODY_ARG));
        }
        args
    }

    fn generate_method(&self, method: &MethodSpec) -> String {
        let mut output = String::new();

        if let Some(summary) = &method.summary {
            output.push_str(&format!(
                "        /// <summary>{}</summary>\n",
                escape_xml(&comment_text(summary))
            ));
        }
        output.push_str(&format!(
            "        public async Task<string> {}({})\n",
            self.method_name(method),
            self.method_arguments(method).join(", ")
        ));
        output.push_str("        {\n");
        output.push_str(&format!("            var path = {};\n", self.path_literal(method)));

        if method.has_query {
            output.push_str(&format!(
                "            if ({0} != null && {0}.Count > 0)\n",
                QUERY_ARG
            ));
            output.push_str("            {\n");
            output.push_str(&format!(
                "                path += \"?\" + string.Join(\"&\", {}.Select(kv => $\"{{Uri.EscapeDataString(kv.Key)}}={{Uri.EscapeDataString(kv.Value)}}\"));\n",
                QUERY_ARG
            ));
            output.push_str("            }\n");
        }

        let body = if method.has_body { BODY_ARG } else { "null" };
        output.push_str(&format!(
            "            return await _client.RequestAsync(\"{}\", path, {});\n",
            method.http_method, body
        ));
        output.push_str("        }\n");

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        let mut args: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("\"{}\"", escape_double_quoted(&format!("<{}>", p))))
            .collect();
        if method.has_body {
            args.push(format!("{}: new {{ }}", BODY_ARG));
        }
        args.join(", ")
    }

    fn api_key_variable(ctx: &GenerationContext<'_>) -> String {
        format!("{}_API_KEY", snake_case(ctx.package_name()).to_ascii_uppercase())
    }
}

impl LanguageGenerator for CSharpGenerator {
    fn language(&self) -> Language {
        Language::CSharp
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
        "csharp"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!("dotnet add package {}", ctx.package_name())
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "queryParams", "data", "kv"]
    }

    fn manifest_file_name(&self, ctx: &GenerationContext<'_>) -> Option<String> {
        Some(format!("{}.csproj", Self::namespace(ctx)))
    }

    fn client_name(&self, _ctx: &GenerationContext<'_>) -> String {
        "Client".to_string()
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);

        output.push_str("using System.Net.Http;\n");
        output.push_str("using System.Net.Http.Headers;\n");
        output.push_str("using System.Text;\n");
        output.push_str("using System.Text.Json;\n");
        output.push_str("using System.Threading.Tasks;\n\n");

        output.push_str(&format!("namespace {}\n", Self::namespace(ctx)));
        output.push_str("{\n");
        output.push_str("    public class Client\n");
        output.push_str("    {\n");
        output.push_str(&format!(
            "        public const string DefaultBaseUrl = \"{}\";\n\n",
            escape_double_quoted(&ctx.config.base_url)
        ));
        output.push_str("        private readonly HttpClient _httpClient;\n\n");
        output.push_str("        public string BaseUrl { get; }\n");
        output.push_str("        public string ApiKey { get; }\n\n");

        output.push_str("        public Client(string apiKey, string baseUrl = DefaultBaseUrl, HttpClient httpClient = null)\n");
        output.push_str("        {\n");
        output.push_str("            ApiKey = apiKey;\n");
        output.push_str("            BaseUrl = baseUrl.TrimEnd('/');\n");
        output.push_str("            _httpClient = httpClient ?? new HttpClient();\n");
        output.push_str("        }\n\n");

        output.push_str("        public async Task<string> RequestAsync(string method, string path, object data = null)\n");
        output.push_str("        {\n");
        output.push_str("            using var request = new HttpRequestMessage(new HttpMethod(method), BaseUrl + path);\n");
        output.push_str("            if (!string.IsNullOrEmpty(ApiKey))\n");
        output.push_str("            {\n");
        output.push_str("                request.Headers.Authorization = new AuthenticationHeaderValue(\"Bearer\", ApiKey);\n");
        output.push_str("            }\n");
        output.push_str("            if (data != null)\n");
        output.push_str("            {\n");
        output.push_str("                request.Content = new StringContent(JsonSerializer.Serialize(data), Encoding.UTF8, \"application/json\");\n");
        output.push_str("            }\n\n");
        output.push_str("            using var response = await _httpClient.SendAsync(request);\n");
        output.push_str("            var body = await response.Content.ReadAsStringAsync();\n");
        output.push_str("            if (!response.IsSuccessStatusCode)\n");
        output.push_str("            {\n");
        output.push_str("                throw new ApiException((int)response.StatusCode, body);\n");
        output.push_str("            }\n");
        output.push_str("            return body;\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/Client.cs", Self::source_dir(ctx)),
            output,
            FileType::Client,
        )
    }

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let namespace = Self::namespace(ctx);
        let class = self.service_class_name(service);
        let mut output = String::from(HEADER);

        if service.methods.iter().any(|m| m.has_query) {
            output.push_str("using System;\n");
            output.push_str("using System.Collections.Generic;\n");
            output.push_str("using System.Linq;\n");
        }
        output.push_str("using System.Threading.Tasks;\n\n");

        output.push_str(&format!("namespace {}.Services\n", namespace));
        output.push_str("{\n");
        output.push_str(&format!("    public class {}\n", class));
        output.push_str("    {\n");
        output.push_str("        private readonly Client _client;\n\n");
        output.push_str(&format!("        public {}(Client client)\n", class));
        output.push_str("        {\n");
        output.push_str("            _client = client;\n");
        output.push_str("        }\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(method));
        }

        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/Services/{}.cs", Self::source_dir(ctx), class),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("namespace {}.Models\n", Self::namespace(ctx)));
        output.push_str("{\n");
        output.push_str(&format!(
            "    // Type definitions for {}.\n",
            comment_text(ctx.package_name())
        ));
        output.push_str(&format!(
            "    // Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));
        output.push_str("    public static class Models\n");
        output.push_str("    {\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/Models/Models.cs", Self::source_dir(ctx)),
            output,
            FileType::Types,
        )
    }

    fn generate_support_files(&self, ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        let mut output = String::from(HEADER);
        output.push_str("using System;\n\n");
        output.push_str(&format!("namespace {}\n", Self::namespace(ctx)));
        output.push_str("{\n");
        output.push_str("    public class ApiException : Exception\n");
        output.push_str("    {\n");
        output.push_str("        public int StatusCode { get; }\n");
        output.push_str("        public string Body { get; }\n\n");
        output.push_str("        public ApiException(int statusCode, string body)\n");
        output.push_str("            : base($\"Request failed with status {statusCode}: {body}\")\n");
        output.push_str("        {\n");
        output.push_str("            StatusCode = statusCode;\n");
        output.push_str("            Body = body;\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        vec![GeneratedFile::source(
            format!("{}/ApiException.cs", Self::source_dir(ctx)),
            output,
        )]
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        let mut output = String::new();
        output.push_str("<Project Sdk=\"Microsoft.NET.Sdk\">\n\n");
        output.push_str("  <PropertyGroup>\n");
        output.push_str(&format!("    <TargetFramework>{}</TargetFramework>\n", TARGET_FRAMEWORK));
        output.push_str(&format!("    <RootNamespace>{}</RootNamespace>\n", Self::namespace(ctx)));
        output.push_str(&format!("    <PackageId>{}</PackageId>\n", escape_xml(ctx.package_name())));
        output.push_str(&format!("    <Version>{}</Version>\n", escape_xml(&ctx.config.version)));
        output.push_str(&format!("    <Authors>{}</Authors>\n", escape_xml(ctx.author())));
        output.push_str(&format!("    <Description>{}</Description>\n", escape_xml(&ctx.description())));
        output.push_str("  </PropertyGroup>\n\n");
        output.push_str("</Project>\n");

        PackageConfig::Text(output)
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!("using {};\n\n", Self::namespace(ctx)));
        output.push_str(&format!(
            "var client = new Client(Environment.GetEnvironmentVariable(\"{}\"), \"{}\");\n",
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
        let namespace = Self::namespace(ctx);
        let class = self.service_class_name(service);
        let var = camel_case(&class);

        let mut output = String::new();
        output.push_str(&format!("using {};\n", namespace));
        output.push_str(&format!("using {}.Services;\n\n", namespace));
        output.push_str(&format!(
            "var client = new Client(Environment.GetEnvironmentVariable(\"{}\"));\n",
            Self::api_key_variable(ctx)
        ));
        output.push_str(&format!("var {} = new {}(client);\n\n", var, class));
        output.push_str(&format!(
            "var result = await {}.{}({});\n",
            var,
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("Console.WriteLine(result);\n");
        output
    }
}
