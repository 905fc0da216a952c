use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rqual")]
#[command(about = "Structural quality metrics for R code", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a local directory, a single file, or a remote git repository
    Analyze {
        /// Local path, git URL, or owner/repo shorthand
        target: String,

        /// Treat the target as a single R file
        #[arg(long)]
        file: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Keep the temporary clone of a remote repository
        #[arg(long)]
        keep_clone: bool,

        /// Worker threads for per-file analysis (0 = all cores)
        #[arg(long, default_value = "0")]
        jobs: usize,

        /// Analyze files one at a time
        #[arg(long)]
        no_parallel: bool,

        /// Increase logging verbosity (-v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
