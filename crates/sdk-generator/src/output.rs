//! Writing generated SDKs to disk

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::{
    config::GeneratorConfig,
    error::{GeneratorError, Result},
    GeneratedSdk,
};

/// README file name in the package root
pub const README_FILE: &str = "README.md";
/// Examples file name in the package root
pub const EXAMPLES_FILE: &str = "EXAMPLES.md";

/// Writes a [`GeneratedSdk`] below an output directory
#[derive(Debug, Clone)]
pub struct SdkWriter {
    output_dir: PathBuf,
    overwrite: bool,
}

impl SdkWriter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            overwrite: config.overwrite,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write sources, manifest, README and examples; returns the written paths
    ///
    /// Nothing is written when a path is invalid or appears twice or, without
    /// `overwrite`, when any target already exists.
    pub async fn write(&self, sdk: &GeneratedSdk) -> Result<Vec<PathBuf>> {
        let mut entries: Vec<(PathBuf, String)> = Vec::with_capacity(sdk.files.len() + 3);
        for file in &sdk.files {
            entries.push((self.resolve(&file.path)?, file.content.clone()));
        }
        if let Some(manifest) = &sdk.metadata.manifest_file {
            entries.push((self.resolve(manifest)?, sdk.package_config.render()?));
        }
        entries.push((self.resolve(README_FILE)?, sdk.readme.clone()));
        entries.push((self.resolve(EXAMPLES_FILE)?, sdk.examples.clone()));

        let mut seen = HashSet::with_capacity(entries.len());
        for (path, _) in &entries {
            if !seen.insert(path) {
                return Err(GeneratorError::configuration(format!(
                    "{} is generated more than once",
                    path.display()
                )));
            }
        }

        if !self.overwrite {
            for (path, _) in &entries {
                if tokio::fs::try_exists(path).await? {
                    return Err(GeneratorError::configuration(format!(
                        "{} already exists and overwrite is disabled",
                        path.display()
                    )));
                }
            }
        }

        let writes = entries.iter().map(|(path, content)| async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, content).await?;
            debug!("Wrote {}", path.display());
            Ok::<_, GeneratorError>(path.clone())
        });
        let written = try_join_all(writes).await?;

        info!(
            "Wrote {} SDK {} ({} files) to {}",
            sdk.language,
            sdk.metadata.name,
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }

    /// Join a generated relative path onto the output directory
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let is_plain = path.components().any(|c| matches!(c, Component::Normal(_)))
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(GeneratorError::configuration(format!(
                "refusing to write outside the output directory: {}",
                relative
            )));
        }
        let mut resolved = self.output_dir.clone();
        for component in path.components() {
            if let Component::Normal(part) = component {
                resolved.push(part);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratedFile, Language, PackageConfig, SdkMetadata};
    use walkdir::WalkDir;

    fn sdk(files: Vec<GeneratedFile>, manifest: Option<&str>) -> GeneratedSdk {
        GeneratedSdk {
            language: Language::Go,
            files,
            package_config: PackageConfig::Text("module acme\n\ngo 1.20\n".to_string()),
            readme: "# acme\n".to_string(),
            examples: "# acme examples\n".to_string(),
            metadata: SdkMetadata {
                name: "acme".to_string(),
                version: "1.0.0".to_string(),
                language: Language::Go,
                generator_version: "0.1.0".to_string(),
                endpoint_count: 0,
                services: Vec::new(),
                manifest_file: manifest.map(str::to_string),
                installation_instructions: "go get acme".to_string(),
            },
        }
    }

    fn writer(dir: &Path, overwrite: bool) -> SdkWriter {
        SdkWriter::new(&GeneratorConfig {
            output_dir: dir.to_path_buf(),
            template_dir: None,
            overwrite,
        })
    }

    fn relative_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn test_write_tree() {
        let dir = tempfile::tempdir().unwrap();
        let sdk = sdk(
            vec![
                GeneratedFile::source("client.go", "package acme\n"),
                GeneratedFile::source("internal/util/helpers.go", "package util\n"),
            ],
            Some("go.mod"),
        );

        let written = writer(dir.path(), false).write(&sdk).await.unwrap();
        assert_eq!(written.len(), 5);

        assert_eq!(
            relative_files(dir.path()),
            vec![
                "EXAMPLES.md",
                "README.md",
                "client.go",
                "go.mod",
                "internal/util/helpers.go",
            ]
        );
        let manifest = tokio::fs::read_to_string(dir.path().join("go.mod")).await.unwrap();
        assert_eq!(manifest, "module acme\n\ngo 1.20\n");
    }

    #[tokio::test]
    async fn test_existing_file_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("README.md"), "keep me").await.unwrap();

        let sdk = sdk(vec![GeneratedFile::source("client.go", "package acme\n")], None);
        let err = writer(dir.path(), false).write(&sdk).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Configuration(_)));

        // Nothing else was written
        assert_eq!(relative_files(dir.path()), vec!["README.md"]);

        writer(dir.path(), true).write(&sdk).await.unwrap();
        let readme = tokio::fs::read_to_string(dir.path().join("README.md")).await.unwrap();
        assert_eq!(readme, "# acme\n");
    }

    #[tokio::test]
    async fn test_rejects_duplicate_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sdk = sdk(
            vec![
                GeneratedFile::source("users_service.go", "package acme\n"),
                GeneratedFile::source("./users_service.go", "package acme\n"),
            ],
            None,
        );

        let err = writer(dir.path(), true).write(&sdk).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Configuration(_)));
        assert!(relative_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["../client.go", "/etc/client.go", "src/../../x.go", "", "."] {
            let sdk = sdk(vec![GeneratedFile::source(bad, "x")], None);
            let err = writer(dir.path(), true).write(&sdk).await.unwrap_err();
            assert!(matches!(err, GeneratorError::Configuration(_)), "{}", bad);
        }
        assert!(relative_files(dir.path()).is_empty());
    }
}
