// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Locate comments that have likely gone stale relative to the code that follows them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to git-committed files to analyze
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Range in days between code and comment block modification times at
    /// which the comment is considered stale
    #[arg(short, long, value_name = "DAYS")]
    pub range: u32,

    /// Dump the block structure of every file
    #[arg(short, long)]
    pub verbose: bool,

    /// Print per-file statistics
    #[arg(short, long)]
    pub stats: bool,

    /// Number of files to analyze in parallel (defaults to the number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Also print the last-modified date of both blocks of each stale pair
    #[arg(long)]
    pub dates: bool,
}
