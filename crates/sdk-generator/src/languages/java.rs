//! Java SDK generator (`java.net.http` + Jackson)

use super::{
    comment_text, concat_path_expression, escape_double_quoted, escape_xml, GenerationContext,
    Language, LanguageGenerator,
};
use crate::{
    naming::{camel_case, flat_case, snake_case, NamingConvention},
    service::{MethodSpec, ServiceSpec},
    FileType, GeneratedFile, PackageConfig,
};

const HEADER: &str = "// Generated by TSmart SDK Generator. Do not edit.\n";
const METHOD_NAMING: NamingConvention = NamingConvention::LowerCamel;
const ARGUMENT_NAMING: NamingConvention = NamingConvention::LowerCamel;
const QUERY_ARG: &str = "queryParams";
const BODY_ARG: &str = "data";
const JACKSON_VERSION: &str = "2.15.2";

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while", "var", "record",
];

pub struct JavaGenerator;

impl JavaGenerator {
    fn base_package(ctx: &GenerationContext<'_>) -> String {
        let name = flat_case(ctx.package_name());
        let name = if name.is_empty() || RESERVED.contains(&name.as_str()) {
            format!("{}sdk", name)
        } else {
            name
        };
        let name = if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{}", name)
        } else {
            name
        };
        format!("com.{}", name)
    }

    fn source_dir(ctx: &GenerationContext<'_>) -> String {
        format!("src/main/java/{}", Self::base_package(ctx).replace('.', "/"))
    }

    fn parameters(&self, method: &MethodSpec, with_optional: bool) -> Vec<String> {
        let mut params: Vec<String> = method
            .path_params
            .iter()
            .map(|p| format!("String {}", self.argument_name(method, p)))
            .collect();
        if with_optional {
            if method.has_query {
                params.push(format!("Map<String, String> {}", QUERY_ARG));
            }
            if method.has_body {
                params.push(format!("Object {}", BODY_ARG));
            }
        }
        params
    }

    fn generate_method(&self, method: &MethodSpec) -> String {
        let name = self.method_name(method);
        let mut output = String::new();

        if let Some(summary) = &method.summary {
            output.push_str(&format!("    /** {} */\n", comment_text(summary).replace("*/", "* /")));
        }
        output.push_str(&format!(
            "    public String {}({}) {{\n",
            name,
            self.parameters(method, true).join(", ")
        ));
        output.push_str(&format!(
            "        String path = {};\n",
            concat_path_expression(&method.path_parts(), |p| self.argument_name(method, p))
        ));

        if method.has_query {
            output.push_str(&format!(
                "        if ({0} != null && !{0}.isEmpty()) {{\n",
                QUERY_ARG
            ));
            output.push_str(&format!("            path += \"?\" + {}.entrySet().stream()\n", QUERY_ARG));
            output.push_str("                .map(e -> URLEncoder.encode(e.getKey(), StandardCharsets.UTF_8)\n");
            output.push_str("                    + \"=\" + URLEncoder.encode(e.getValue(), StandardCharsets.UTF_8))\n");
            output.push_str("                .collect(Collectors.joining(\"&\"));\n");
            output.push_str("        }\n");
        }

        let body = if method.has_body { BODY_ARG } else { "null" };
        output.push_str(&format!(
            "        return client.request(\"{}\", path, {});\n",
            method.http_method, body
        ));
        output.push_str("    }\n");

        // Overload without the optional trailing arguments
        if !method.is_path_only() {
            let mut forwarded: Vec<String> = method
                .path_params
                .iter()
                .map(|p| self.argument_name(method, p))
                .collect();
            if method.has_query {
                forwarded.push("null".to_string());
            }
            if method.has_body {
                forwarded.push("null".to_string());
            }

            output.push('\n');
            output.push_str(&format!(
                "    public String {}({}) {{\n",
                name,
                self.parameters(method, false).join(", ")
            ));
            output.push_str(&format!("        return {}({});\n", name, forwarded.join(", ")));
            output.push_str("    }\n");
        }

        output
    }

    fn example_arguments(&self, method: &MethodSpec) -> String {
        method
            .path_params
            .iter()
            .map(|p| format!("\"{}\"", escape_double_quoted(&format!("<{}>", p))))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn api_key_variable(ctx: &GenerationContext<'_>) -> String {
        format!("{}_API_KEY", snake_case(ctx.package_name()).to_ascii_uppercase())
    }
}

impl LanguageGenerator for JavaGenerator {
    fn language(&self) -> Language {
        Language::Java
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
        "java"
    }

    fn install_command(&self, ctx: &GenerationContext<'_>) -> String {
        format!(
            "<dependency>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n</dependency>",
            Self::base_package(ctx),
            escape_xml(ctx.package_name()),
            escape_xml(&ctx.config.version)
        )
    }

    fn local_names(&self) -> &'static [&'static str] {
        &["path", "queryParams", "data", "client"]
    }

    fn manifest_file_name(&self, _ctx: &GenerationContext<'_>) -> Option<String> {
        Some("pom.xml".to_string())
    }

    fn client_name(&self, _ctx: &GenerationContext<'_>) -> String {
        "Client".to_string()
    }

    fn generate_client(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let package = Self::base_package(ctx);
        let mut output = String::from(HEADER);

        output.push_str(&format!("package {};\n\n", package));
        output.push_str("import com.fasterxml.jackson.databind.ObjectMapper;\n");
        output.push_str("import java.io.IOException;\n");
        output.push_str("import java.net.URI;\n");
        output.push_str("import java.net.http.HttpClient;\n");
        output.push_str("import java.net.http.HttpRequest;\n");
        output.push_str("import java.net.http.HttpResponse;\n\n");

        output.push_str("public class Client {\n");
        output.push_str(&format!(
            "    public static final String DEFAULT_BASE_URL = \"{}\";\n\n",
            escape_double_quoted(&ctx.config.base_url)
        ));
        output.push_str("    private final String baseUrl;\n");
        output.push_str("    private final String apiKey;\n");
        output.push_str("    private final HttpClient httpClient;\n");
        output.push_str("    private final ObjectMapper objectMapper;\n\n");

        output.push_str("    public Client(String apiKey) {\n");
        output.push_str("        this(apiKey, DEFAULT_BASE_URL);\n");
        output.push_str("    }\n\n");
        output.push_str("    public Client(String apiKey, String baseUrl) {\n");
        output.push_str("        this.apiKey = apiKey;\n");
        output.push_str("        this.baseUrl = baseUrl;\n");
        output.push_str("        this.httpClient = HttpClient.newHttpClient();\n");
        output.push_str("        this.objectMapper = new ObjectMapper();\n");
        output.push_str("    }\n\n");

        output.push_str("    public String getBaseUrl() {\n");
        output.push_str("        return baseUrl;\n");
        output.push_str("    }\n\n");

        output.push_str("    public String request(String method, String path, Object data) {\n");
        output.push_str("        try {\n");
        output.push_str("            HttpRequest.BodyPublisher body = data == null\n");
        output.push_str("                ? HttpRequest.BodyPublishers.noBody()\n");
        output.push_str("                : HttpRequest.BodyPublishers.ofString(objectMapper.writeValueAsString(data));\n");
        output.push_str("            HttpRequest.Builder builder = HttpRequest.newBuilder()\n");
        output.push_str("                .uri(URI.create(baseUrl + path))\n");
        output.push_str("                .header(\"Content-Type\", \"application/json\")\n");
        output.push_str("                .method(method, body);\n");
        output.push_str("            if (apiKey != null) {\n");
        output.push_str("                builder.header(\"Authorization\", \"Bearer \" + apiKey);\n");
        output.push_str("            }\n\n");
        output.push_str("            HttpResponse<String> response = httpClient.send(builder.build(), HttpResponse.BodyHandlers.ofString());\n");
        output.push_str("            if (response.statusCode() < 200 || response.statusCode() >= 300) {\n");
        output.push_str("                throw new ApiException(response.statusCode(), response.body());\n");
        output.push_str("            }\n");
        output.push_str("            return response.body();\n");
        output.push_str("        } catch (IOException e) {\n");
        output.push_str("            throw new ApiException(0, e.getMessage());\n");
        output.push_str("        } catch (InterruptedException e) {\n");
        output.push_str("            Thread.currentThread().interrupt();\n");
        output.push_str("            throw new ApiException(0, e.getMessage());\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/Client.java", Self::source_dir(ctx)),
            output,
            FileType::Client,
        )
    }

    fn generate_service(&self, ctx: &GenerationContext<'_>, service: &ServiceSpec) -> GeneratedFile {
        let package = Self::base_package(ctx);
        let class = self.service_class_name(service);
        let mut output = String::from(HEADER);

        output.push_str(&format!("package {}.services;\n\n", package));
        output.push_str(&format!("import {}.Client;\n", package));
        if service.methods.iter().any(|m| m.has_query) {
            output.push_str("import java.net.URLEncoder;\n");
            output.push_str("import java.nio.charset.StandardCharsets;\n");
            output.push_str("import java.util.Map;\n");
            output.push_str("import java.util.stream.Collectors;\n");
        }
        output.push('\n');

        output.push_str(&format!("public class {} {{\n", class));
        output.push_str("    private final Client client;\n\n");
        output.push_str(&format!("    public {}(Client client) {{\n", class));
        output.push_str("        this.client = client;\n");
        output.push_str("    }\n");

        for method in &service.methods {
            output.push('\n');
            output.push_str(&self.generate_method(method));
        }
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/services/{}.java", Self::source_dir(ctx), class),
            output,
            FileType::Service,
        )
    }

    fn generate_types(&self, ctx: &GenerationContext<'_>) -> GeneratedFile {
        let mut output = String::from(HEADER);
        output.push_str(&format!("package {}.models;\n\n", Self::base_package(ctx)));
        output.push_str("/**\n");
        output.push_str(&format!(" * Type definitions for {}.\n", comment_text(ctx.package_name())));
        output.push_str(&format!(
            " * Generated from {} endpoint(s); request and response shapes are not modelled.\n",
            ctx.endpoint_count
        ));
        output.push_str(" */\n");
        output.push_str("public final class Models {\n");
        output.push_str("    private Models() {\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        GeneratedFile::new(
            format!("{}/models/Models.java", Self::source_dir(ctx)),
            output,
            FileType::Types,
        )
    }

    fn generate_support_files(&self, ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
        let mut output = String::from(HEADER);
        output.push_str(&format!("package {};\n\n", Self::base_package(ctx)));
        output.push_str("public class ApiException extends RuntimeException {\n");
        output.push_str("    private final int statusCode;\n");
        output.push_str("    private final String body;\n\n");
        output.push_str("    public ApiException(int statusCode, String body) {\n");
        output.push_str("        super(\"Request failed with status \" + statusCode + \": \" + body);\n");
        output.push_str("        this.statusCode = statusCode;\n");
        output.push_str("        this.body = body;\n");
        output.push_str("    }\n\n");
        output.push_str("    public int getStatusCode() {\n");
        output.push_str("        return statusCode;\n");
        output.push_str("    }\n\n");
        output.push_str("    public String getBody() {\n");
        output.push_str("        return body;\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        vec![GeneratedFile::source(
            format!("{}/ApiException.java", Self::source_dir(ctx)),
            output,
        )]
    }

    fn generate_manifest(&self, ctx: &GenerationContext<'_>) -> PackageConfig {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str("<project xmlns=\"http://maven.apache.org/POM/4.0.0\"\n");
        output.push_str("         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
        output.push_str("         xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd\">\n");
        output.push_str("    <modelVersion>4.0.0</modelVersion>\n\n");
        output.push_str(&format!("    <groupId>{}</groupId>\n", Self::base_package(ctx)));
        output.push_str(&format!("    <artifactId>{}</artifactId>\n", escape_xml(ctx.package_name())));
        output.push_str(&format!("    <version>{}</version>\n", escape_xml(&ctx.config.version)));
        output.push_str("    <packaging>jar</packaging>\n\n");
        output.push_str(&format!("    <name>{}</name>\n", escape_xml(ctx.package_name())));
        output.push_str(&format!("    <description>{}</description>\n\n", escape_xml(&ctx.description())));
        output.push_str("    <properties>\n");
        output.push_str("        <maven.compiler.source>11</maven.compiler.source>\n");
        output.push_str("        <maven.compiler.target>11</maven.compiler.target>\n");
        output.push_str("        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>\n");
        output.push_str("    </properties>\n\n");
        output.push_str("    <dependencies>\n");
        output.push_str("        <dependency>\n");
        output.push_str("            <groupId>com.fasterxml.jackson.core</groupId>\n");
        output.push_str("            <artifactId>jackson-databind</artifactId>\n");
        output.push_str(&format!("            <version>{}</version>\n", JACKSON_VERSION));
        output.push_str("        </dependency>\n");
        output.push_str("    </dependencies>\n");
        output.push_str("</project>\n");

        PackageConfig::Text(output)
    }

    fn usage_example(&self, ctx: &GenerationContext<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!("import {}.Client;\n\n", Self::base_package(ctx)));
        output.push_str(&format!(
            "Client client = new Client(System.getenv(\"{}\"), \"{}\");\n",
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
        let package = Self::base_package(ctx);
        let class = self.service_class_name(service);
        let var = camel_case(&class);

        let mut output = String::new();
        output.push_str(&format!("import {}.Client;\n", package));
        output.push_str(&format!("import {}.services.{};\n\n", package, class));
        output.push_str(&format!(
            "Client client = new Client(System.getenv(\"{}\"));\n",
            Self::api_key_variable(ctx)
        ));
        output.push_str(&format!("{} {} = new {}(client);\n\n", class, var, class));
        output.push_str(&format!(
            "String result = {}.{}({});\n",
            var,
            self.method_name(method),
            self.example_arguments(method)
        ));
        output.push_str("System.out.println(result);\n");
        output
    }
}
