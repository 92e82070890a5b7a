//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use multiapp_proxy::config::Ingress;
use multiapp_proxy::lifecycle::GenerateOptions;
use tempfile::TempDir;

/// A scratch directory with an input document and two output paths.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> PathBuf {
        self.path("config.yml")
    }

    pub fn nginx_out(&self) -> PathBuf {
        self.path("nginx.conf")
    }

    pub fn registry_out(&self) -> PathBuf {
        self.path("apps.json")
    }

    pub fn write_config(&self, yaml: &str) {
        fs::write(self.config(), yaml).unwrap();
    }

    pub fn options(&self, ingress: &str) -> GenerateOptions {
        GenerateOptions {
            config_path: self.config(),
            nginx_out: self.nginx_out(),
            registry_out: self.registry_out(),
            ingress: Ingress::new(ingress),
        }
    }
}

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// The body of the first `location <prefix> {` block in `config`.
#[allow(dead_code)]
pub fn location_block<'a>(config: &'a str, head: &str) -> &'a str {
    let start = config
        .find(&format!("location {head} {{"))
        .unwrap_or_else(|| panic!("no location {head}"));
    let end = config[start..].find("\n        }\n").unwrap();
    &config[start..start + end]
}
