//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Generate Markdown documentation from Python modules
#[derive(Parser, Debug)]
#[command(name = "doc2md")]
#[command(about = "Generate Markdown documentation from Python modules")]
#[command(version)]
pub struct Args {
    /// Python files to document
    pub files: Vec<PathBuf>,

    /// Output directory [default: doc]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the Markdown to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
