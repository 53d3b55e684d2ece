//! quizlens CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizlens",
    version,
    about = "Per-question statistics for quiz and exam spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List spreadsheets available for analysis
    Files {
        /// Directory to scan (default: config data_dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the teachers and classes in a spreadsheet
    Filters {
        /// Spreadsheet to inspect
        #[arg(long)]
        file: PathBuf,

        /// Only list classes taught by this teacher
        #[arg(long)]
        teacher: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute per-question statistics and render a report
    Report {
        /// Directory to scan when --file is not given
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Spreadsheet to analyse (default: first one found in --dir)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Restrict to one teacher ("全部" for all)
        #[arg(long)]
        teacher: Option<String>,

        /// Restrict to one class ("全部" for all)
        #[arg(long)]
        class: Option<String>,

        /// Output formats, comma-separated: text, json, html, markdown (or md), all
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory (default: config output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizlens=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Files { dir, config } => commands::files::execute(dir, config),
        Commands::Filters {
            file,
            teacher,
            config,
        } => commands::filters::execute(file, teacher, config),
        Commands::Report {
            dir,
            file,
            teacher,
            class,
            format,
            output,
            config,
        } => commands::report::execute(dir, file, teacher, class, format, output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
