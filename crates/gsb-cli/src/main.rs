//! GSB CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gsb_engine::TopLevel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod report;

use report::Format;

#[derive(Parser)]
#[command(name = "gsb")]
#[command(version)]
#[command(about = "Preview and check GSB code-generation templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expansion of a template file
    Expand {
        /// Template file (the body of a gsb_decl!/gsb_expr!/gsb_string! invocation)
        file: PathBuf,

        /// How the expansion is re-interpreted
        #[arg(short, long, value_enum, default_value_t = Mode::Decl)]
        mode: Mode,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write the expansion to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Validate a template file without printing its expansion
    Check {
        /// Template file
        file: PathBuf,

        /// How the expansion is re-interpreted
        #[arg(short, long, value_enum, default_value_t = Mode::Decl)]
        mode: Mode,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

/// Output mode, named after the macro that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// gsb_decl!: declarations or statements
    Decl,
    /// gsb_expr!: a block expression
    Expr,
    /// gsb_string!: a string literal
    Str,
}

impl From<Mode> for TopLevel {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Decl => TopLevel::Decl,
            Mode::Expr => TopLevel::Expr,
            Mode::Str => TopLevel::Str,
        }
    }
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gsb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let clean = match cli.command {
        Commands::Expand {
            file,
            mode,
            format,
            output,
        } => commands::expand::execute(commands::expand::ExpandArgs {
            file,
            mode: mode.into(),
            format,
            output,
        })?,
        Commands::Check { file, mode, format } => {
            commands::check::execute(commands::check::CheckArgs {
                file,
                mode: mode.into(),
                format,
            })?
        }
    };

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
