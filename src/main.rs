//! multiapp-proxy
//!
//! One-shot batch tool run by the add-on supervisor whenever the
//! configuration changes.
//!
//! # Architecture Overview
//!
//! ```text
//!   /data/options.json (UI store)
//!        │  convert / sync
//!        ▼
//!   /app/config.yml ──▶ config::loader ──▶ config::validation
//!                                               │
//!                                               ▼
//!                                     routing::synthesize
//!                                    ┌──────────┴──────────┐
//!                                    ▼                     ▼
//!                        /etc/nginx/nginx.conf      /app/apps.json
//!                          (proxy runtime)          (landing page)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use multiapp_proxy::config::Ingress;
use multiapp_proxy::lifecycle::generate::{
    self, GenerateOptions, DEFAULT_CONFIG_PATH, DEFAULT_NGINX_OUT, DEFAULT_REGISTRY_OUT,
};
use multiapp_proxy::observability::logging;
use multiapp_proxy::stores::{self, SyncOutcome, DEFAULT_FILE_STORE, DEFAULT_UI_STORE};

#[derive(Parser)]
#[command(name = "multiapp-proxy", version)]
#[command(about = "Generate an nginx front door for many backend apps", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the nginx configuration and the app registry
    Generate(GenerateArgs),
    /// Convert the UI-managed JSON store into the generator input
    Convert {
        #[arg(long, default_value = DEFAULT_UI_STORE)]
        from: PathBuf,
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        to: PathBuf,
    },
    /// Reconcile the UI store with the user-editable YAML store
    Sync {
        #[arg(long, default_value = DEFAULT_UI_STORE)]
        ui: PathBuf,
        #[arg(long, default_value = DEFAULT_FILE_STORE)]
        file: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Input document (YAML, or JSON/TOML by extension)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long, default_value = DEFAULT_NGINX_OUT)]
    nginx_out: PathBuf,

    #[arg(long, default_value = DEFAULT_REGISTRY_OUT)]
    registry_out: PathBuf,

    /// Base path an upstream gateway strips before forwarding
    #[arg(long, env = "INGRESS_ENTRY", default_value = "/")]
    ingress_entry: String,
}

fn run(command: Commands) -> multiapp_proxy::Result<()> {
    match command {
        Commands::Generate(args) => {
            let options = GenerateOptions {
                config_path: args.config,
                nginx_out: args.nginx_out,
                registry_out: args.registry_out,
                ingress: Ingress::new(args.ingress_entry),
            };
            let report = generate::run(&options)?;
            println!(
                "nginx configuration generated: {} app(s), mode {}",
                report.apps,
                if report.ingress { "ingress" } else { "standalone" }
            );
        }
        Commands::Convert { from, to } => {
            stores::convert_ui_store(&from, &to)?;
        }
        Commands::Sync { ui, file } => match stores::reconcile(&ui, &file)? {
            SyncOutcome::FileNewer => {
                println!("YAML store is newer; copy it into the add-on configuration to use it");
            }
            outcome => tracing::debug!(?outcome, "Sync finished"),
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}
