// src/analyzer.rs

use crate::blame::BlameReader;
use crate::error::{GitrotError, Result};
use crate::model::{AuthorshipRecord, SourceFile};
use crate::segment::segment_file;
use git2::{Repository, Status};
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A segmented file, plus the parse error that cut its blame stream short, if any
#[derive(Debug)]
pub struct FileAnalysis {
    pub file: SourceFile,
    pub truncated: Option<GitrotError>,
}

/// Where to run `git blame` for one file
#[derive(Debug)]
struct BlameTarget {
    workdir: PathBuf,
    relative: PathBuf,
}

/// Analyze every file independently; results come back in argument order
pub fn analyze(paths: &[PathBuf]) -> Vec<(PathBuf, Result<FileAnalysis>)> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_message("Analyzing files");

    let results = paths
        .par_iter()
        .progress_with(bar.clone())
        .map(|path| {
            let result = analyze_file(path);
            if let Err(e) = &result {
                tracing::debug!(path = %path.display(), "skipping file: {e}");
            }
            (path.clone(), result)
        })
        .collect();

    bar.finish_and_clear();
    results
}

pub fn analyze_file(path: &Path) -> Result<FileAnalysis> {
    File::open(path).map_err(|source| GitrotError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let target = locate(path)?;
    let (records, truncated) = run_blame(path, &target)?;

    let file = segment_file(path.display().to_string(), records);
    Ok(FileAnalysis { file, truncated })
}

/// Resolve the file's repository and its path relative to the work tree,
/// rejecting files git has no history for
fn locate(path: &Path) -> Result<BlameTarget> {
    let canonical = path.canonicalize().map_err(|source| GitrotError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = canonical.parent().unwrap_or(&canonical);

    let repo = Repository::discover(dir)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| git2::Error::from_str("repository has no working tree"))?;
    let workdir = workdir.canonicalize().map_err(|source| GitrotError::Open {
        path: workdir.to_path_buf(),
        source,
    })?;
    let relative = canonical
        .strip_prefix(&workdir)
        .map_err(|_| git2::Error::from_str("file is outside the repository working tree"))?
        .to_path_buf();

    let status = repo.status_file(&relative)?;
    if status.intersects(Status::WT_NEW | Status::INDEX_NEW | Status::IGNORED) {
        return Err(GitrotError::NotCommitted {
            path: path.to_path_buf(),
        });
    }

    Ok(BlameTarget { workdir, relative })
}

fn run_blame(path: &Path, target: &BlameTarget) -> Result<(Vec<AuthorshipRecord>, Option<GitrotError>)> {
    tracing::debug!(path = %target.relative.display(), "running git blame");
    let mut child = Command::new("git")
        .args(["blame", "--line-porcelain", "--"])
        .arg(&target.relative)
        .current_dir(&target.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(GitrotError::Spawn)?;

    let collected = match child.stdout.take() {
        Some(stdout) => collect_records(BlameReader::new(BufReader::new(stdout))),
        None => Ok((Vec::new(), None)),
    };
    let output = child.wait_with_output().map_err(GitrotError::Read)?;
    let (records, truncated) = collected?;

    let failure = (!output.status.success()).then(|| {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        (output.status, stderr)
    });
    settle_blame(path, records, truncated, failure)
}

/// Decide what a finished blame run means for the file.
///
/// A malformed first record is reported as such, even when git was cut off
/// by the closed pipe. With no records at all, a failed run reports git's
/// stderr and a clean run means the file has no history.
fn settle_blame(
    path: &Path,
    records: Vec<AuthorshipRecord>,
    truncated: Option<GitrotError>,
    failure: Option<(ExitStatus, String)>,
) -> Result<(Vec<AuthorshipRecord>, Option<GitrotError>)> {
    if records.is_empty() {
        if let Some(e) = truncated {
            return Err(e);
        }
        return Err(match failure {
            Some((status, stderr)) => GitrotError::BlameFailed {
                path: path.to_path_buf(),
                status,
                stderr,
            },
            None => GitrotError::NotCommitted {
                path: path.to_path_buf(),
            },
        });
    }

    if let Some((status, stderr)) = failure {
        tracing::warn!(path = %path.display(), %status, "git blame exited with an error: {stderr}");
    }
    Ok((records, truncated))
}

/// Drain a blame stream.
///
/// A read failure discards the whole file. A malformed record ends the
/// stream but keeps the records read before it.
pub fn collect_records<R: BufRead>(reader: BlameReader<R>) -> Result<(Vec<AuthorshipRecord>, Option<GitrotError>)> {
    let mut records = Vec::new();
    for record in reader {
        match record {
            Ok(record) => records.push(record),
            Err(e @ GitrotError::Malformed { .. }) => {
                tracing::debug!(parsed = records.len(), "blame stream truncated: {e}");
                return Ok((records, Some(e)));
            }
            Err(e) => return Err(e),
        }
    }
    Ok((records, None))
}
