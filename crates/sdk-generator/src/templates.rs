//! Template engine
//!
//! README and examples documents are rendered with [`tera`]. Both templates
//! ship built in and can be replaced by same-named files in a template
//! directory.

use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::{
    error::Result,
    languages::{CodeExample, GenerationContext, Language, LanguageGenerator},
};

/// README template name
pub const README_TEMPLATE: &str = "readme.md";
/// Examples document template name
pub const EXAMPLES_TEMPLATE: &str = "examples.md";

const DEFAULT_README: &str = r#"# {{ package_name }}

{{ description }}

## Installation

```{{ install_fence }}
{{ install }}
```

## Usage

```{{ code_fence }}
{{ usage }}```

The `{{ client_name }}` client talks to `{{ base_url }}` and sends your API key as a bearer token.
{% if services %}
## Services
{% for service in services %}
### {{ service.name }}

| Method | HTTP | Path |
|--------|------|------|
{% for method in service.methods -%}
| `{{ method.name }}` | {{ method.http_method }} | `{{ method.path | replace(from="|", to="\|") }}` |
{% endfor -%}
{% endfor %}{% endif %}
{{ endpoint_count }} endpoint(s), generated for {{ language_name }}. Version {{ version }}{% if author %} by {{ author }}{% endif %}.
"#;

const DEFAULT_EXAMPLES: &str = r#"# {{ package_name }} examples
{% for example in examples %}
## {{ example.title }}

```{{ code_fence }}
{{ example.code }}```
{% endfor -%}
"#;

/// Service summary exposed to templates
#[derive(Debug, Serialize)]
struct ServiceView {
    name: String,
    class_name: String,
    methods: Vec<MethodView>,
}

#[derive(Debug, Serialize)]
struct MethodView {
    name: String,
    http_method: String,
    path: String,
}

/// Template engine
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    readme: String,
    examples: String,
}

impl TemplateEngine {
    /// Create an engine holding the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose templates are overridden by files in `dir`
    ///
    /// Overrides are parsed on load; a broken file is a template error.
    pub fn with_template_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut engine = Self::new();

        for name in [README_TEMPLATE, EXAMPLES_TEMPLATE] {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            debug!("Loading template override {}", path.display());

            let source = std::fs::read_to_string(&path)?;
            Tera::default().add_raw_template(name, &source)?;
            if name == README_TEMPLATE {
                engine.readme = source;
            } else {
                engine.examples = source;
            }
        }

        Ok(engine)
    }

    /// Render the README document
    pub fn render_readme(
        &self,
        generator: &dyn LanguageGenerator,
        ctx: &GenerationContext<'_>,
    ) -> Result<String> {
        let context = self.context(generator, ctx);
        Ok(Tera::one_off(&self.readme, &context, false)?)
    }

    /// Render the examples document
    pub fn render_examples(
        &self,
        generator: &dyn LanguageGenerator,
        ctx: &GenerationContext<'_>,
    ) -> Result<String> {
        let mut context = self.context(generator, ctx);
        let examples: Vec<CodeExample> = generator.examples(ctx);
        context.insert("examples", &examples);
        Ok(Tera::one_off(&self.examples, &context, false)?)
    }

    fn context(&self, generator: &dyn LanguageGenerator, ctx: &GenerationContext<'_>) -> Context {
        let language = generator.language();
        let services: Vec<ServiceView> = ctx
            .services
            .iter()
            .map(|service| ServiceView {
                name: service.name.clone(),
                class_name: generator.service_class_name(service),
                methods: service
                    .methods
                    .iter()
                    .map(|method| MethodView {
                        name: generator.method_name(method),
                        http_method: method.http_method.clone(),
                        path: method.path.clone(),
                    })
                    .collect(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("package_name", ctx.package_name());
        context.insert("description", &ctx.description());
        context.insert("version", &ctx.config.version);
        context.insert("author", ctx.author());
        context.insert("language", &language.to_string());
        context.insert("language_name", language.display_name());
        context.insert("install", &generator.install_command(ctx));
        context.insert("install_fence", install_fence(&language));
        context.insert("usage", &generator.usage_example(ctx));
        context.insert("code_fence", generator.code_fence());
        context.insert("client_name", &generator.client_name(ctx));
        context.insert("services", &services);
        context.insert("endpoint_count", &ctx.endpoint_count);
        context.insert("base_url", &ctx.config.base_url);
        context
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self {
            readme: DEFAULT_README.to_string(),
            examples: DEFAULT_EXAMPLES.to_string(),
        }
    }
}

/// Fence tag for the install snippet
fn install_fence(language: &Language) -> &'static str {
    match language {
        Language::Java => "xml",
        _ => "bash",
    }
}
