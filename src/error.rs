// src/error.rs

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitrotError {
    #[error("could not open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("git error: {0}")]
    Repository(#[from] git2::Error),

    #[error(
        "did not find any git blame information for {}; has this file been committed to your git repository?",
        path.display()
    )]
    NotCommitted { path: PathBuf },

    #[error("failed to run git blame: {0}")]
    Spawn(#[source] io::Error),

    #[error("error reading git blame information: {0}")]
    Read(#[source] io::Error),

    #[error("git blame exited with {status} for {}: {stderr}", path.display())]
    BlameFailed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("malformed blame record at stream line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, GitrotError>;
