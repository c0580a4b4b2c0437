//! OTP Signup CLI - Main Entry Point
//!
//! Registers a partner account on the signup site using a disposable
//! mailbox for the emailed verification code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, mailbox, run};

/// Automated partner signup with email OTP verification
#[derive(Parser)]
#[command(name = "otp-signup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "OTP_SIGNUP_CONFIG", default_value_os_t = otp_signup_common::default_config_path(), global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full signup flow
    Run(run::RunArgs),

    /// Create a disposable mailbox
    Mailbox(mailbox::MailboxArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => {
            let config = otp_signup_common::SignupConfig::load(&cli.config)?;
            run::execute(args, config, cli.format).await?
        }
        Commands::Mailbox(args) => {
            let config = otp_signup_common::SignupConfig::load(&cli.config)?;
            mailbox::execute(args, config, cli.format).await?
        }
        Commands::Config(cmd) => config::execute(cmd, &cli.config, cli.format)?,
        Commands::Version => {
            println!("otp-signup v{}", otp_signup_common::VERSION);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    if let Err(e) = dispatch(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
