//! article-introduction-generator - structured paper notes to an LLM-drafted Introduction
//!
//! ## Usage
//!
//! ```bash
//! # open the editor
//! article-introduction-generator
//!
//! # install launcher entries and exit
//! article-introduction-generator --applications
//! article-introduction-generator --autostart
//! ```

use anyhow::{Context, Result};
use article_introduction_generator::config::{default_config_dir, AppConfig};
use article_introduction_generator::desktop::{install_entry, DesktopTarget, PROGRAM_NAME};
use article_introduction_generator::tui;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Fill in structured notes about a paper and let an LLM draft its Introduction
#[derive(Parser)]
#[command(name = "article-introduction-generator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write the autostart desktop entry and exit
    #[arg(long, conflicts_with = "applications")]
    autostart: bool,

    /// Write the applications-menu desktop entry and exit
    #[arg(long)]
    applications: bool,
}

impl Cli {
    fn desktop_target(&self) -> Option<DesktopTarget> {
        if self.autostart {
            Some(DesktopTarget::Autostart)
        } else if self.applications {
            Some(DesktopTarget::Applications)
        } else {
            None
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Log to `<config dir>/<program>.log`; the terminal belongs to the editor.
/// `RUST_LOG` overrides the default `info` level.
fn init_logging(config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    let log_path = config_dir.join(format!("{}.log", PROGRAM_NAME));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .init();
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = default_config_dir().context("Failed to locate the configuration directory")?;
    init_logging(&config_dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting");

    if let Some(target) = cli.desktop_target() {
        let path = install_entry(target, true)
            .with_context(|| format!("Failed to write the {:?} desktop entry", target))?;
        println!("Desktop entry written to {}", path.display());
        return Ok(());
    }

    if let Err(e) = install_entry(DesktopTarget::Applications, false) {
        warn!(error = %e, "Could not create the applications desktop entry");
    }

    let (config, startup_errors) = AppConfig::load_or_default(&config_dir);
    tui::run(config, startup_errors).await.context("Editor failed")?;
    Ok(())
}
