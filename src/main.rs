//! opcheck CLI - Command-line interface
//!
//! Commands:
//!   check     - Coverage validation plus every documented example
//!   coverage  - Compare implemented and documented operators
//!   test      - Run documented examples against the interpreter
//!   list      - Print documented operator names
//!   docs      - Generate the reference and indexes
//!   readme    - Generate README.md from README.toml
//!   schema    - Print JSON Schemas

mod cli;

use clap::{Parser, Subcommand};
use cli::schema::SchemaKind;
use cli::GlobalArgs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "opcheck", version)]
#[command(about = "Keep operator documentation and the interpreter in agreement", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate coverage, then run every documented example
    Check,

    /// Compare implemented operators with documented ones
    Coverage {
        /// Print the interpreter's operators and exit
        #[arg(long)]
        list_operators: bool,
    },

    /// Run documented examples against the interpreter
    Test {
        /// Only run examples of this operator
        #[arg(long)]
        operator: Option<String>,
    },

    /// Print documented operator names as a JSON array
    List,

    /// Generate the language reference and both indexes
    Docs {
        /// Directory with template overrides
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Check anchors and render, but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate README.md from README.toml
    Readme {
        #[arg(long)]
        source: Option<PathBuf>,

        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Directory with template overrides
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Print the JSON Schema of a file or report format
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schema { kind } => cli::cmd_schema(kind),
        command => cli.global.session().and_then(|session| match command {
            Commands::Check => cli::cmd_check(&session),
            Commands::Coverage { list_operators } => cli::cmd_coverage(&session, list_operators),
            Commands::Test { operator } => cli::cmd_test(&session, operator.as_deref()),
            Commands::List => cli::cmd_list(&session),
            Commands::Docs {
                template_dir,
                dry_run,
            } => cli::cmd_docs(&session, template_dir, dry_run),
            Commands::Readme {
                source,
                output,
                template_dir,
            } => cli::cmd_readme(&session, source, output, template_dir),
            Commands::Schema { kind } => cli::cmd_schema(kind),
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
