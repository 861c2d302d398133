//! circuitz CLI - explore logic circuits built on `circuitz-core`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;

use commands::{clock, config as config_cmd, demo, kinds, table};
use config::Config;

/// circuitz - wire gates, switches and clocks and watch the lights.
///
/// Run `circuitz` or `circuitz kinds` to list the available node kinds.
#[derive(Parser, Debug)]
#[command(
    name = "circuitz",
    author,
    version,
    about = "circuitz: evaluate logic circuits from the command line",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List instantiable node kinds by category (default command).
    Kinds {
        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the truth table of a gate.
    ///
    /// Wires one switch into every input of the gate and a light onto its
    /// output, then evaluates the light for each input combination.
    Table {
        /// Gate kind (And, Or, Nand, Nor, Xor, Xnor, Not). Case-insensitive.
        gate: String,

        /// Number of inputs. Clamped to the gate's supported range.
        #[arg(short, long)]
        inputs: Option<usize>,

        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Walk through a two-switch And circuit step by step.
    Demo,

    /// Sample a clock driving a light on a simulated timebase.
    Clock {
        /// Clock period in milliseconds (defaults to the configured period).
        #[arg(short, long)]
        period: Option<u64>,

        /// Number of samples (defaults to the configured sample count).
        #[arg(short, long)]
        samples: Option<usize>,

        /// Time between samples in milliseconds (defaults to half a period).
        #[arg(long)]
        step: Option<u64>,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    let command = cli.command.unwrap_or(Commands::Kinds { json: false });

    match command {
        Commands::Kinds { json } => kinds::execute(&config, json)?,
        Commands::Table { gate, inputs, json } => table::execute(&config, &gate, inputs, json)?,
        Commands::Demo => demo::execute(&config)?,
        Commands::Clock {
            period,
            samples,
            step,
        } => clock::execute(&config, period, samples, step)?,
        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => config_cmd::show(&config)?,
                ConfigCommands::Set { key, value } => config_cmd::set(&mut config, &key, &value)?,
                ConfigCommands::Get { key } => config_cmd::get(&config, &key)?,
                ConfigCommands::Reset => config_cmd::reset()?,
                ConfigCommands::Path => match Config::config_file_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no config file path available)"),
                },
            }
        }
    }

    Ok(())
}
