use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use contracts_tools::config::{self, Format, Network};

#[derive(Parser)]
#[command(name = "contracts-config")]
#[command(about = "Resolve the contract toolchain configuration from the environment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Environment file to read instead of searching for `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Whether to print debug info
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration record
    Show {
        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only print the profile of this network
        #[arg(short, long)]
        network: Option<Network>,
    },
    /// Print a human-readable summary
    Summary,
    /// Fail if any remote network still uses the placeholder signing key
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(log_level)?;

    let inputs = config::env::load(cli.env_file.as_deref())?;
    let config = config::resolve(&inputs);

    match cli.command {
        Commands::Show {
            format,
            output,
            network: Some(network),
        } => config::write(&config.networks[&network], format, output.as_deref())?,
        Commands::Show {
            format,
            output,
            network: None,
        } => config.write(format, output.as_deref())?,
        Commands::Summary => config.print_summary(),
        Commands::Check => {
            let sentinel = config.sentinel_networks();
            if !sentinel.is_empty() {
                let names: Vec<_> = sentinel.iter().map(Network::as_str).collect();
                bail!(
                    "placeholder signing key in use for: {}. Set DEFAULT_PRIVATE_KEY or <NETWORK>_PRIVATE_KEY",
                    names.join(", ")
                );
            }
            log::info!("all remote networks have a signing key configured");
        }
    }
    Ok(())
}
