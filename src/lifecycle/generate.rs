//! The `generate` run.
//!
//! # Responsibilities
//! - Serialize against other runs (output lock)
//! - Load and validate the input document
//! - Synthesize both artifacts in memory
//! - Stage both into temp files, then rename them into place, registry first
//!
//! # Design Decisions
//! - Fail fast: any error before the first rename leaves previous outputs untouched
//! - Nothing is staged until synthesis has fully succeeded

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ingress::Ingress;
use crate::config::loader::load_config;
use crate::config::validation::validate_ingress;
use crate::error::{Error, Result};
use crate::lifecycle::lock::OutputLock;
use crate::lifecycle::output::{stage, StagedFile};
use crate::routing::synthesizer::synthesize;

/// Default input document, produced by `convert`.
pub const DEFAULT_CONFIG_PATH: &str = "/app/config.yml";
/// Default nginx configuration path.
pub const DEFAULT_NGINX_OUT: &str = "/etc/nginx/nginx.conf";
/// Default registry path, served by the landing page.
pub const DEFAULT_REGISTRY_OUT: &str = "/app/apps.json";

/// Inputs of one generate run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config_path: PathBuf,
    pub nginx_out: PathBuf,
    pub registry_out: PathBuf,
    pub ingress: Ingress,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            nginx_out: PathBuf::from(DEFAULT_NGINX_OUT),
            registry_out: PathBuf::from(DEFAULT_REGISTRY_OUT),
            ingress: Ingress::default(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub apps: usize,
    pub rewrite_apps: usize,
    pub debug: bool,
    pub ingress: bool,
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn staged(path: &Path, contents: &str) -> Result<StagedFile> {
    stage(path, contents).map_err(write_error(path))
}

fn commit(file: StagedFile) -> Result<()> {
    let path = file.target().to_path_buf();
    file.commit().map_err(write_error(&path))?;
    tracing::debug!(path = %path.display(), "Artifact written");
    Ok(())
}

/// Run one full, stateless regeneration.
pub fn run(options: &GenerateOptions) -> Result<GenerateReport> {
    if options.nginx_out.file_name().is_none() || options.registry_out.file_name().is_none() {
        return Err(Error::Unexpected("output paths must name files".to_string()));
    }

    validate_ingress(&options.ingress)?;
    tracing::debug!(
        ingress = options.ingress.is_active(),
        entry = %options.ingress.entry(),
        "Ingress mode resolved"
    );

    let _lock = OutputLock::acquire(&options.nginx_out)?;

    let config = load_config(&options.config_path)?;
    let synthesis = synthesize(&config, &options.ingress);
    let registry = synthesis.registry.to_json()?;

    let registry = staged(&options.registry_out, &registry)?;
    let nginx = staged(&options.nginx_out, &synthesis.config_text)?;

    commit(registry)?;
    commit(nginx)?;

    let report = GenerateReport {
        apps: synthesis.routes.len(),
        rewrite_apps: synthesis.rewrite_count(),
        debug: config.debug,
        ingress: options.ingress.is_active(),
    };

    tracing::info!(
        apps = report.apps,
        rewrite_apps = report.rewrite_apps,
        mode = if report.ingress { "ingress" } else { "standalone" },
        base_path = %options.ingress.entry(),
        "nginx configuration generated"
    );

    Ok(report)
}
