//! Knit CLI - dependency-injection graph analyzer for Kotlin projects.

use anyhow::{Context, Result};
use clap::Parser;
use knit_cli::cli::analysis::{run_analysis, AnalysisRunOptions};
use knit_cli::cli::inspect::run_inspect;
use knit_cli::commands::{self, load_config};
use knit_cli::formatters::OutputFormat;
use knit_cli::server;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "knit")]
#[command(about = "Dependency-injection graph analyzer for Kotlin projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path (default: ~/.knit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (-v for debug logs, -vv for trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Analyze a zipped project or an unpacked source tree
    ///
    /// Examples:
    ///   knit analyze project.zip          # Upload-style analysis
    ///   knit analyze app/src --json       # Directory analysis, JSON output
    Analyze {
        /// A .zip archive or a directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output format
        #[arg(short, long = "output", value_enum, default_value = "human")]
        format: OutputFormat,

        /// Output JSON format (alias for --output json)
        #[arg(long)]
        json: bool,

        /// Seed for node positions, for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Mark only true cycle members instead of the whole DFS stack
        #[arg(long)]
        strict_cycles: bool,
    },

    /// Report provider and injection marker usage in one source file
    Inspect {
        /// Source file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on (overrides server.bind_address)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Manage knit configuration
    Config {
        #[command(subcommand)]
        command: commands::ConfigCommand,
    },
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "knit=info,warn",
        1 => "knit=debug,info",
        _ => "knit=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directive)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Config { command } => commands::handle_config_command(command),
        Command::Analyze {
            path,
            format,
            json,
            seed,
            strict_cycles,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_analysis(
                &config,
                &AnalysisRunOptions {
                    path,
                    format: if json { OutputFormat::Json } else { format },
                    seed,
                    strict_cycles,
                },
            )
        }
        Command::Inspect { file, format } => {
            let config = load_config(cli.config.as_deref())?;
            run_inspect(&config, &file, format)
        }
        Command::Serve { bind } => {
            let config = load_config(cli.config.as_deref())?;
            let runtime =
                tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            runtime.block_on(server::serve(&config, bind))
        }
    }
}
