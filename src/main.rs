//! Local Nginx Manager (v1)
//!
//! Installs and drives the nginx instance that serves a local development
//! environment.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!   valet-nginx   │                   nginx::Nginx                       │
//!   <command> ───▶│  install · rewrite · lint · restart · stop · sites   │
//!                 └──────┬──────────────┬──────────────┬────────────┬────┘
//!                        │              │              │            │
//!                        ▼              ▼              ▼            ▼
//!                 ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌─────────┐
//!                 │  service   │ │    site    │ │     fs     │ │ process │
//!                 │   (brew)   │ │ (certs dir)│ │ (owner-    │ │ (sudo)  │
//!                 │            │ │            │ │  aware)    │ │         │
//!                 └────────────┘ └────────────┘ └────────────┘ └─────────┘
//!
//!   config: nginx.toml → ManagerConfig → ProxyPaths + ConfigContext
//!           config.json → GlobalSettings (tld, loopback), read per call
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use valet_nginx::config::context::default_home;
use valet_nginx::config::loader::{load_config, load_or_default};
use valet_nginx::config::{
    ConfigContext, ConfigError, Identity, ManagerConfig, ProxyPaths, SettingsStore,
};
use valet_nginx::fs::LocalFilesystem;
use valet_nginx::nginx::{Collaborators, Nginx, NginxError};
use valet_nginx::observability::logging;
use valet_nginx::process::SystemRunner;
use valet_nginx::service::Brew;
use valet_nginx::site::CertificateSites;

#[derive(Parser)]
#[command(name = "valet-nginx")]
#[command(about = "Install, configure and control the local nginx", long_about = None)]
#[command(version)]
struct Cli {
    /// Manager config file (defaults to ~/.config/valet/nginx.toml)
    #[arg(short, long, env = "VALET_NGINX_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install nginx and write its configuration
    Install,
    /// Validate the configuration, then restart nginx
    Restart,
    /// Stop nginx
    Stop,
    /// Check the configuration syntax
    Lint,
    /// Regenerate secured sites for the current TLD and loopback
    Rewrite,
    /// List sites with an explicit server block
    Sites,
    /// Show where nginx configuration and logs live
    Paths,
    /// Stop and remove nginx with its configuration and logs
    Uninstall {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Failures that end the process.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Nginx(#[from] NginxError),

    #[error("confirmation prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Nginx(e) => e.exit_code(),
            AppError::Prompt(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_manager_config(cli.config.as_ref())?;
    logging::init(logging::effective_level(&config.logging.level, cli.verbose));

    let paths = ProxyPaths::resolve(&config.paths);
    let context = ConfigContext::from_config(&config)?;
    tracing::debug!(
        config_dir = %paths.config_dir.display(),
        home = %context.home_path.display(),
        user = %context.user.name,
        "Configuration loaded"
    );

    let settings = SettingsStore::new(context.settings_file());
    let nginx = build(paths, context, settings);

    match cli.command {
        Commands::Install => {
            nginx.initialize_settings()?;
            nginx.install()?;
            println!("Nginx installed.");
        }
        Commands::Restart => {
            nginx.restart()?;
            println!("Nginx restarted.");
        }
        Commands::Stop => {
            nginx.stop()?;
            println!("Nginx stopped.");
        }
        Commands::Lint => {
            nginx.lint()?;
            println!("Nginx configuration is valid.");
        }
        Commands::Rewrite => {
            nginx.rewrite_secure_nginx_files()?;
            println!("Secure sites regenerated.");
        }
        Commands::Sites => {
            for site in nginx.configured_sites()? {
                println!("{site}");
            }
        }
        Commands::Paths => {
            let paths = nginx.paths();
            println!("config:  {}", paths.config_dir.display());
            println!("main:    {}", paths.main_config.display());
            println!("server:  {}", paths.server_config().display());
            println!("logs:    {}", paths.log_dir.display());
            println!("sites:   {}", nginx.context().sites_dir().display());
        }
        Commands::Uninstall { force } => {
            if !force && !confirm_uninstall(nginx.paths())? {
                println!("Uninstall cancelled.");
                return Ok(());
            }
            nginx.uninstall()?;
            println!("Nginx uninstalled.");
        }
    }

    Ok(())
}

fn load_manager_config(explicit: Option<&PathBuf>) -> Result<ManagerConfig, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => match default_home(Identity::invoking().home.as_deref()) {
            Some(home) => load_or_default(&home.join("nginx.toml")),
            None => Ok(ManagerConfig::default()),
        },
    }
}

fn build(paths: ProxyPaths, context: ConfigContext, settings: SettingsStore) -> Nginx {
    let files = Arc::new(LocalFilesystem::new());
    let cli = Arc::new(SystemRunner::new());
    let installer = Arc::new(Brew::new(context.services.clone(), cli.clone()));
    let site = Arc::new(CertificateSites::new(
        context.clone(),
        settings.clone(),
        files.clone(),
    ));

    Nginx::new(
        paths,
        context,
        settings,
        Collaborators {
            installer,
            site,
            files,
            cli,
        },
    )
}

fn confirm_uninstall(paths: &ProxyPaths) -> Result<bool, dialoguer::Error> {
    Confirm::new()
        .with_prompt(format!(
            "Remove nginx along with {} and {}?",
            paths.config_dir.display(),
            paths.log_dir.display()
        ))
        .default(false)
        .interact()
}
