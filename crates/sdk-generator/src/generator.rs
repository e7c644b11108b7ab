//! SDK generator implementation

use tracing::{debug, info};

use crate::{
    config::{GeneratorConfig, SdkConfig},
    endpoint::EndpointDescriptor,
    error::Result,
    languages::{GenerationContext, Language, LanguageRegistry},
    service::build_services,
    templates::TemplateEngine,
    GeneratedFile, GeneratedSdk, SdkMetadata,
};

/// SDK generator
///
/// Holds no per-call state; one instance can serve any number of
/// generation requests, from any thread.
#[derive(Debug)]
pub struct SdkGenerator {
    registry: LanguageRegistry,
    templates: TemplateEngine,
}

impl SdkGenerator {
    /// Create a generator with every built-in language and the default templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator from a configuration, loading template overrides
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let templates = match &config.template_dir {
            Some(dir) => TemplateEngine::with_template_dir(dir)?,
            None => TemplateEngine::new(),
        };
        Ok(Self {
            registry: LanguageRegistry::with_builtin(),
            templates,
        })
    }

    /// Replace the language registry
    pub fn with_registry(mut self, registry: LanguageRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the template engine
    pub fn with_templates(mut self, templates: TemplateEngine) -> Self {
        self.templates = templates;
        self
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Languages this generator can emit
    pub fn supported_languages(&self) -> Vec<Language> {
        self.registry.supported_languages()
    }

    pub fn is_language_supported(&self, language: &Language) -> bool {
        self.registry.is_supported(language)
    }

    /// Generate an SDK for `config.language` from the given endpoints
    pub fn generate_sdk(
        &self,
        endpoints: &[EndpointDescriptor],
        config: &SdkConfig,
    ) -> Result<GeneratedSdk> {
        let generator = self.registry.get(&config.language)?;

        info!(
            "Generating {} SDK {} v{} from {} endpoint(s)",
            config.language,
            config.package_name,
            config.version,
            endpoints.len()
        );

        let ctx = GenerationContext::new(config, build_services(endpoints), endpoints.len());

        let mut files: Vec<GeneratedFile> = Vec::with_capacity(ctx.services.len() + 3);
        files.push(generator.generate_client(&ctx));
        for service in &ctx.services {
            debug!(
                "Emitting service {} with {} method(s)",
                service.name,
                service.methods.len()
            );
            files.push(generator.generate_service(&ctx, service));
        }
        files.push(generator.generate_types(&ctx));
        files.extend(generator.generate_support_files(&ctx));

        let package_config = generator.generate_manifest(&ctx);
        let readme = self.templates.render_readme(generator, &ctx)?;
        let examples = self.templates.render_examples(generator, &ctx)?;

        let metadata = SdkMetadata {
            name: config.package_name.clone(),
            version: config.version.clone(),
            language: config.language.clone(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            endpoint_count: endpoints.len(),
            services: ctx
                .services
                .iter()
                .map(|s| generator.service_class_name(s))
                .collect(),
            manifest_file: generator.manifest_file_name(&ctx),
            installation_instructions: generator.install_command(&ctx),
        };

        info!(
            "Generated {} SDK {} with {} file(s) across {} service(s)",
            config.language,
            config.package_name,
            files.len(),
            metadata.services.len()
        );

        Ok(GeneratedSdk {
            language: config.language.clone(),
            files,
            package_config,
            readme,
            examples,
            metadata,
        })
    }
}

impl Default for SdkGenerator {
    fn default() -> Self {
        Self {
            registry: LanguageRegistry::with_builtin(),
            templates: TemplateEngine::default(),
        }
    }
}
