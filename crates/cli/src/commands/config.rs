//! Configuration file commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use otp_signup_common::SignupConfig;

use crate::output::{print_success, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

pub fn execute(cmd: ConfigCommands, path: &Path, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            init(path, force)?;
            print_success(&format!("Wrote {}", path.display()));
        }
        ConfigCommands::Show => {
            let config = SignupConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            println!("{}", render(&config, format)?);
        }
    }
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    SignupConfig::default().save(path)?;
    Ok(())
}

fn render(config: &SignupConfig, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        _ => toml::to_string_pretty(config)?,
    })
}
