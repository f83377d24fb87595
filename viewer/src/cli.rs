use crate::render::{OutputFormat, RenderError, Report};
use clap::{ArgAction, Parser};
use glt_discovery::{
    config::DEFAULT_TIMEOUT, ConfigErrors, Discovery, DiscoveryConfig, SourceConfig, Url,
};
use std::{io, path::PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigErrors),
    #[error("Failed to render results")]
    Render(#[from] RenderError),
}

/// Show the results of the guillotina load tests, most recent build first
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// YAML file with the discovery configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base url serving the load tester output, i.e. the parent of `results/`
    #[arg(long, conflicts_with = "dir")]
    pub url: Option<Url>,

    /// Local directory containing `results/`
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Build numbers up to this one are probed even when they are empty
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Timeout per request in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of concurrent fetches
    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase logging verbosity, RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// config file (or defaults) with command line flags applied on top
    pub fn discovery_config(&self) -> Result<DiscoveryConfig, ConfigErrors> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = ?path, "Loading config file");
                DiscoveryConfig::from_path(path)?
            }
            None => DiscoveryConfig::default(),
        };

        if let Some(url) = &self.url {
            let timeout = match config.source {
                SourceConfig::Http { timeout, .. } => timeout,
                SourceConfig::Directory { .. } => DEFAULT_TIMEOUT,
            };

            config.source = SourceConfig::Http {
                url: url.clone(),
                timeout,
            };
        } else if let Some(dir) = &self.dir {
            config.source = SourceConfig::Directory { path: dir.clone() };
        }

        if let Some(value) = self.timeout {
            match &mut config.source {
                SourceConfig::Http { timeout, .. } => *timeout = value,
                SourceConfig::Directory { .. } => {
                    warn!("--timeout only applies to http sources, ignoring it")
                }
            }
        }

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }

        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }

        Ok(config)
    }
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// discover all builds, then render them to stdout
pub fn run(args: &Args) -> Result<(), ViewerError> {
    let mut config = args.discovery_config()?;

    if config.preflight_checks() {
        return Err(ConfigErrors::FailedPreflight.into());
    }

    let discovery = Discovery::load(&config)?;
    let results = discovery.run();

    info!(builds = results.len(), "Rendering results");

    let report = Report::from_results(&results);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    args.format.render(&report, &mut out)?;

    Ok(())
}
