use proptest::prelude::*;
use tsmart_sdk_generator::{
    endpoint::group_endpoints, service::build_services, EndpointDescriptor, FileType,
    GeneratorConfig, GeneratorError, Language, Parameter, SdkConfig, SdkGenerator, SdkWriter,
};

fn widgets_api() -> Vec<EndpointDescriptor> {
    vec![EndpointDescriptor::new("GET", "/widgets").with_tag("widgets")]
}

fn users_api() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::new("get", "/users").with_tag("users"),
        EndpointDescriptor::new("get", "/users/{id}")
            .with_parameter(Parameter::path("id"))
            .with_tag("users"),
        EndpointDescriptor::new("post", "/users")
            .with_request_body()
            .with_tag("users"),
        EndpointDescriptor::new("get", "/orders")
            .with_parameter(Parameter::query("status"))
            .with_tag("orders"),
        EndpointDescriptor::new("delete", "/users/{id}/sessions/{sessionId}")
            .with_parameter(Parameter::path("id"))
            .with_parameter(Parameter::path("sessionId"))
            .with_parameter(Parameter::new(
                "X-Request-Id",
                tsmart_sdk_generator::ParameterLocation::Header,
                false,
            ))
            .with_tag("users"),
    ]
}

#[test]
fn test_javascript_end_to_end() {
    let generator = SdkGenerator::new();
    let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");

    let sdk = generator.generate_sdk(&widgets_api(), &config).unwrap();

    let client = sdk.file("src/client.js").expect("client file");
    assert!(client.content.contains("class AcmeClient"));
    assert!(client.content.contains("Bearer"));

    let service = sdk.file("src/services/widgets.js").expect("service file");
    assert!(service.content.contains("class WidgetsService"));
    assert!(service.content.contains("async getWidgets() {"));
    assert!(service.content.contains("const path = `/widgets`;"));
    assert!(service.content.contains("this.client.request('GET', path)"));

    assert_eq!(sdk.package_config.as_json().unwrap()["name"], "acme");
    assert!(sdk.readme.contains("npm install acme"));
    assert!(sdk.examples.contains("getWidgets"));
}

#[test]
fn test_path_substitution_per_language() {
    let generator = SdkGenerator::new();
    let endpoints = vec![EndpointDescriptor::new("get", "/users/{id}")
        .with_parameter(Parameter::path("id"))
        .with_tag("users")];

    let expectations = [
        (Language::JavaScript, "src/services/users.js", "`/users/${id}`"),
        (Language::Python, "acme/services/users.py", "f\"/users/{id}\""),
        (
            Language::Java,
            "src/main/java/com/acme/services/UsersService.java",
            "\"/users/\" + id",
        ),
        (Language::CSharp, "src/Acme/Services/UsersService.cs", "$\"/users/{id}\""),
        (Language::Go, "users_service.go", "\"/users/\" + id"),
        (Language::PHP, "src/Services/UsersService.php", "\"/users/{$id}\""),
    ];

    for (language, path, needle) in expectations {
        let config = SdkConfig::new(language.clone(), "acme", "https://api.acme.test");
        let sdk = generator.generate_sdk(&endpoints, &config).unwrap();
        let file = sdk
            .file(path)
            .unwrap_or_else(|| panic!("{} missing {}", language, path));
        assert!(
            file.content.contains(needle),
            "{}: expected {} in\n{}",
            language,
            needle,
            file.content
        );
    }
}

#[test]
fn test_path_only_methods_have_no_optional_arguments() {
    let generator = SdkGenerator::new();
    let endpoints = vec![EndpointDescriptor::new("get", "/users/{id}")
        .with_parameter(Parameter::path("id"))
        .with_tag("users")];

    for language in Language::BUILTIN {
        let config = SdkConfig::new(language.clone(), "acme", "https://api.acme.test");
        let sdk = generator.generate_sdk(&endpoints, &config).unwrap();
        let service = sdk.files_of_type(FileType::Service).next().unwrap();
        assert!(!service.content.contains("queryParams"), "{}", language);
        assert!(!service.content.contains("query_params"), "{}", language);
    }
}

#[test]
fn test_method_naming_conventions() {
    let generator = SdkGenerator::new();
    let endpoints = vec![EndpointDescriptor::new("get", "/users/{id}/orders")
        .with_parameter(Parameter::path("id"))
        .with_tag("users")];

    let expected = [
        (Language::JavaScript, "async getUsersOrders(id)"),
        (Language::Python, "def get_users_orders(self, id)"),
        (Language::Java, "public String getUsersOrders(String id)"),
        (Language::CSharp, "public async Task<string> GetUsersOrders(string id)"),
        (Language::Go, ") GetUsersOrders(id string)"),
        (Language::PHP, "public function getUsersOrders($id)"),
    ];

    for (language, signature) in expected {
        let config = SdkConfig::new(language.clone(), "acme", "https://api.acme.test");
        let sdk = generator.generate_sdk(&endpoints, &config).unwrap();
        let service = sdk.files_of_type(FileType::Service).next().unwrap();
        assert!(
            service.content.contains(signature),
            "{}: expected {} in\n{}",
            language,
            signature,
            service.content
        );
    }
}

#[test]
fn test_groups_differing_in_case_get_distinct_files() {
    let generator = SdkGenerator::new();
    let endpoints = vec![
        EndpointDescriptor::new("get", "/accounts").with_tag("Users"),
        EndpointDescriptor::new("get", "/profiles").with_tag("users"),
    ];

    for language in Language::BUILTIN {
        let config = SdkConfig::new(language.clone(), "acme", "https://api.acme.test");
        let sdk = generator.generate_sdk(&endpoints, &config).unwrap();

        assert_eq!(
            sdk.metadata.services,
            vec!["UsersService", "Users2Service"],
            "{}",
            language
        );

        let mut paths: Vec<String> = sdk.files.iter().map(|f| f.path.to_lowercase()).collect();
        paths.sort();
        let total = paths.len();
        paths.dedup();
        assert_eq!(paths.len(), total, "{}: duplicate file paths", language);

        let services: Vec<_> = sdk.files_of_type(FileType::Service).collect();
        assert_eq!(services.len(), 2, "{}", language);
        assert!(services[0].content.contains("/accounts"), "{}", language);
        assert!(services[1].content.contains("/profiles"), "{}", language);
    }
}

#[test]
fn test_header_parameters_produce_no_argument() {
    let generator = SdkGenerator::new();
    let config = SdkConfig::new(Language::JavaScript, "acme", "https://api.acme.test");

    let sdk = generator.generate_sdk(&users_api(), &config).unwrap();
    let users = sdk.file("src/services/users.js").unwrap();
    assert!(users
        .content
        .contains("async deleteUsersSessions(id, sessionId) {"));
    assert!(!users.content.contains("requestId"));
}

#[test]
fn test_manifests_per_language() {
    let generator = SdkGenerator::new();
    let config = |language: Language| {
        SdkConfig::new(language, "acme", "https://api.acme.test")
            .with_version("3.2.1")
            .with_author("Acme")
    };

    let js = generator.generate_sdk(&users_api(), &config(Language::JavaScript)).unwrap();
    assert_eq!(js.package_config.as_json().unwrap()["version"], "3.2.1");

    let python = generator.generate_sdk(&users_api(), &config(Language::Python)).unwrap();
    assert_eq!(python.package_config.as_json().unwrap()["name"], "acme");
    assert!(python.file("setup.py").is_some());
    assert_eq!(python.metadata.manifest_file, None);

    let java = generator.generate_sdk(&users_api(), &config(Language::Java)).unwrap();
    assert!(java.package_config.as_text().unwrap().contains("<version>3.2.1</version>"));
    assert_eq!(java.metadata.manifest_file.as_deref(), Some("pom.xml"));

    let csharp = generator.generate_sdk(&users_api(), &config(Language::CSharp)).unwrap();
    assert!(csharp.package_config.as_text().unwrap().contains("<PackageId>acme</PackageId>"));
    assert_eq!(csharp.metadata.manifest_file.as_deref(), Some("Acme.csproj"));

    let go = generator.generate_sdk(&users_api(), &config(Language::Go)).unwrap();
    assert!(go.package_config.as_text().unwrap().starts_with("module acme\n"));

    let php = generator.generate_sdk(&users_api(), &config(Language::PHP)).unwrap();
    assert_eq!(php.package_config.as_json().unwrap()["name"], "acme/acme");
}

#[test]
fn test_unsupported_language_produces_nothing() {
    let generator = SdkGenerator::new();
    let config: SdkConfig = serde_json::from_value(serde_json::json!({
        "language": "ruby",
        "packageName": "acme",
        "version": "1.0.0",
        "baseUrl": "https://api.acme.test"
    }))
    .unwrap();

    assert_eq!(config.language, Language::Custom("ruby".to_string()));
    let result = generator.generate_sdk(&users_api(), &config);
    assert!(matches!(result, Err(GeneratorError::UnsupportedLanguage(_))));
}

#[test]
fn test_endpoints_deserialize_from_camel_case_json() {
    let endpoints: Vec<EndpointDescriptor> = serde_json::from_str(
        r#"[
            {"path": "/widgets/{id}", "method": "put", "hasRequestBody": true,
             "parameters": [{"name": "id", "in": "path", "required": true}],
             "tags": ["widgets"]},
            {"path": "/ping", "method": "get"}
        ]"#,
    )
    .unwrap();

    let generator = SdkGenerator::new();
    let config = SdkConfig::new(Language::Python, "acme", "https://api.acme.test");
    let sdk = generator.generate_sdk(&endpoints, &config).unwrap();

    assert_eq!(sdk.metadata.services, vec!["WidgetsService", "DefaultService"]);
    let widgets = sdk.file("acme/services/widgets.py").unwrap();
    assert!(widgets.content.contains("def put_widgets(self, id, data=None):"));
}

#[tokio::test]
async fn test_generate_and_write() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = GeneratorConfig {
        output_dir: dir.path().join("go"),
        template_dir: None,
        overwrite: false,
    };

    let generator = SdkGenerator::from_config(&config)?;
    let sdk = generator.generate_sdk(
        &users_api(),
        &SdkConfig::new(Language::Go, "acme", "https://api.acme.test"),
    )?;
    let written = SdkWriter::new(&config).write(&sdk).await?;

    assert_eq!(written.len(), sdk.files.len() + 3);
    for name in ["client.go", "users_service.go", "orders_service.go", "go.mod", "README.md"] {
        assert!(dir.path().join("go").join(name).is_file(), "{} missing", name);
    }

    // A second run without overwrite is refused
    let err = SdkWriter::new(&config).write(&sdk).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Configuration(_)));
    Ok(())
}

fn arb_endpoint() -> impl Strategy<Value = EndpointDescriptor> {
    (
        prop::sample::select(vec!["get", "post", "put", "delete", "patch"]),
        prop::collection::vec(prop::sample::select(vec!["users", "{id}", "orders", "v1"]), 0..4),
        prop::option::of(prop::sample::select(vec!["a", "b", "c", "A", "a-", ""])),
        any::<bool>(),
    )
        .prop_map(|(method, segments, tag, body)| {
            let mut endpoint =
                EndpointDescriptor::new(method, format!("/{}", segments.join("/")));
            if let Some(tag) = tag {
                endpoint = endpoint.with_tag(tag);
            }
            if body {
                endpoint = endpoint.with_request_body();
            }
            endpoint
        })
}

proptest! {
    #[test]
    fn prop_every_endpoint_becomes_one_method(endpoints in prop::collection::vec(arb_endpoint(), 0..24)) {
        let services = build_services(&endpoints);
        let methods: usize = services.iter().map(|s| s.methods.len()).sum();
        prop_assert_eq!(methods, endpoints.len());

        for service in &services {
            let mut names: Vec<&str> = service.methods.iter().map(|m| m.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(names.len(), service.methods.len());
        }
    }

    #[test]
    fn prop_groups_follow_first_appearance(endpoints in prop::collection::vec(arb_endpoint(), 0..24)) {
        let groups = group_endpoints(&endpoints);

        let mut first_seen: Vec<&str> = Vec::new();
        for endpoint in &endpoints {
            if !first_seen.contains(&endpoint.group()) {
                first_seen.push(endpoint.group());
            }
        }
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        prop_assert_eq!(names, first_seen);

        for group in &groups {
            let expected: Vec<&EndpointDescriptor> =
                endpoints.iter().filter(|e| e.group() == group.name).collect();
            prop_assert_eq!(&group.endpoints, &expected);
        }
    }

    #[test]
    fn prop_generation_is_deterministic(endpoints in prop::collection::vec(arb_endpoint(), 0..8)) {
        let generator = SdkGenerator::new();
        for language in Language::BUILTIN {
            let config = SdkConfig::new(language, "acme", "https://api.acme.test");
            let first = generator.generate_sdk(&endpoints, &config).unwrap();
            let second = generator.generate_sdk(&endpoints, &config).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_generated_paths_are_unique(endpoints in prop::collection::vec(arb_endpoint(), 0..8)) {
        let generator = SdkGenerator::new();
        for language in Language::BUILTIN {
            let config = SdkConfig::new(language, "acme", "https://api.acme.test");
            let sdk = generator.generate_sdk(&endpoints, &config).unwrap();

            let mut paths: Vec<String> = sdk.files.iter().map(|f| f.path.to_lowercase()).collect();
            paths.sort();
            let total = paths.len();
            paths.dedup();
            prop_assert_eq!(paths.len(), total);
        }
    }
}
