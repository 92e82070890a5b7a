//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ProxyConfig, ProxyDocument};
use crate::config::validation::{validate_document, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input document does not exist.
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The input document exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input document is not a well-formed document of the expected shape.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A required key is absent (or empty) on one app entry.
    #[error("missing key `{key}` in apps[{index}]")]
    KeyMissing { index: usize, key: &'static str },

    /// Semantic checks failed.
    #[error("validation failed: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from the file extension. Anything unknown is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => DocumentFormat::Json,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse a document from text. An empty document is an empty configuration.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<ProxyDocument, String> {
    if content.trim().is_empty() {
        return Ok(ProxyDocument::default());
    }

    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Read the raw input document.
pub fn load_document(path: &Path) -> Result<ProxyDocument, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_document(&content, DocumentFormat::from_path(path)).map_err(|message| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        }
    })
}

/// Load and validate configuration from a YAML, JSON or TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let document = load_document(path)?;
    tracing::debug!(
        path = %path.display(),
        apps = document.apps.len(),
        debug = document.debug,
        "Input document parsed"
    );

    validate_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_path() {
        let format = |p: &str| DocumentFormat::from_path(Path::new(p));
        assert_eq!(format("/data/options.json"), DocumentFormat::Json);
        assert_eq!(format("proxy.TOML"), DocumentFormat::Toml);
        assert_eq!(format("/app/config.yml"), DocumentFormat::Yaml);
        assert_eq!(format("config"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_parse_yaml_document() {
        let doc = parse_document(
            "debug: true\napps:\n  - name: Grafana\n    url: http://host:3000\n    rewrite: false\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        assert!(doc.debug);
        assert_eq!(doc.apps.len(), 1);
        assert_eq!(doc.apps[0].name.as_deref(), Some("Grafana"));
        assert_eq!(doc.apps[0].rewrite, Some(false));
    }

    #[test]
    fn test_parse_toml_document() {
        let doc = parse_document(
            "debug = false\n[[apps]]\nname = \"Grafana\"\nurl = \"http://host:3000\"\n",
            DocumentFormat::Toml,
        )
        .unwrap();
        assert_eq!(doc.apps[0].url.as_deref(), Some("http://host:3000"));
    }

    #[test]
    fn test_empty_document_is_empty_config() {
        let doc = parse_document("   \n", DocumentFormat::Yaml).unwrap();
        assert_eq!(doc, ProxyDocument::default());
    }

    #[test]
    fn test_parse_error_on_bad_shape() {
        assert!(parse_document("apps: 42\n", DocumentFormat::Yaml).is_err());
        assert!(parse_document("{\"apps\": [", DocumentFormat::Json).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        write!(file, "apps:\n  - name: My App\n    url: http://host:80\n").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps[0].path, "/my-app");
    }

    #[test]
    fn test_key_missing_message_names_key() {
        let err = ConfigError::KeyMissing { index: 2, key: "url" };
        assert_eq!(err.to_string(), "missing key `url` in apps[2]");
    }
}
