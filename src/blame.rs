// src/blame.rs

//! Reader for `git blame --line-porcelain` output.
//!
//! Every source line is described by a full record:
//!
//! ```text
//! <revision> <orig-line> <final-line> [<group-size>]
//! author <name>
//! author-mail <email>
//! author-time <unix-seconds>
//! author-tz <tz>
//! committer <name>
//! committer-mail <email>
//! committer-time <unix-seconds>
//! committer-tz <tz>
//! summary <text>
//! [previous <revision> <filename> | boundary]
//! filename <path>
//! \t<line content>
//! ```

use crate::error::{GitrotError, Result};
use crate::model::{AuthorshipRecord, LineNumber};
use std::io::BufRead;

/// Streams one `AuthorshipRecord` per source line.
///
/// Sequence numbers start at 1 and are scoped to this reader, so one reader
/// per file gives per-file line numbers. Iteration stops after the first error.
pub struct BlameReader<R> {
    input: R,
    buf: Vec<u8>,
    stream_line: usize,
    next_sequence: LineNumber,
    done: bool,
}

/// Fields collected between a revision header and its content line
#[derive(Default)]
struct PendingRecord {
    commit_id: String,
    author: Option<String>,
    author_email: Option<String>,
    author_time: Option<i64>,
    author_tz: Option<String>,
    committer: Option<String>,
    committer_email: Option<String>,
    committer_time: Option<i64>,
    committer_tz: Option<String>,
    summary: Option<String>,
    previous: Option<String>,
    boundary: bool,
    filename: Option<String>,
}

impl<R: BufRead> BlameReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: Vec::new(),
            stream_line: 0,
            next_sequence: 1,
            done: false,
        }
    }

    /// Next raw line of the stream without its terminator, `None` at end of stream
    fn read_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let n = self
            .input
            .read_until(b'\n', &mut self.buf)
            .map_err(GitrotError::Read)?;
        if n == 0 {
            return Ok(None);
        }
        self.stream_line += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    fn malformed(&self, reason: impl Into<String>) -> GitrotError {
        GitrotError::Malformed {
            line: self.stream_line,
            reason: reason.into(),
        }
    }

    fn read_record(&mut self) -> Result<Option<AuthorshipRecord>> {
        let header = loop {
            match self.read_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        let mut fields = header.split_whitespace();
        let commit_id = fields.next().unwrap_or_default().to_string();
        if fields.count() < 2 {
            return Err(self.malformed(format!("expected revision header, found {header:?}")));
        }

        let mut pending = PendingRecord {
            commit_id,
            ..Default::default()
        };

        loop {
            let Some(line) = self.read_line()? else {
                return Err(self.malformed("stream ended before the line content"));
            };
            if let Some(content) = line.strip_prefix('\t') {
                let content = content.to_string();
                return self.finish(pending, content).map(Some);
            }

            let (key, value) = line.split_once(' ').unwrap_or((line.as_str(), ""));
            match key {
                "author" => pending.author = Some(value.to_string()),
                "author-mail" => pending.author_email = Some(value.to_string()),
                "author-time" => pending.author_time = Some(self.parse_time(key, value)?),
                "author-tz" => pending.author_tz = Some(value.to_string()),
                "committer" => pending.committer = Some(value.to_string()),
                "committer-mail" => pending.committer_email = Some(value.to_string()),
                "committer-time" => pending.committer_time = Some(self.parse_time(key, value)?),
                "committer-tz" => pending.committer_tz = Some(value.to_string()),
                "summary" => pending.summary = Some(value.to_string()),
                "previous" => pending.previous = Some(value.to_string()),
                "boundary" => pending.boundary = true,
                "filename" => pending.filename = Some(value.to_string()),
                _ => tracing::trace!(key, "ignoring unknown blame header"),
            }
        }
    }

    /// Timestamps may carry a trailing offset (`<seconds> <tz>`), only the first field counts
    fn parse_time(&self, key: &str, value: &str) -> Result<i64> {
        let seconds = value.split(' ').next().unwrap_or_default();
        seconds
            .parse()
            .map_err(|_| self.malformed(format!("invalid {key} value {value:?}")))
    }

    fn require<T>(&self, value: Option<T>, key: &str) -> Result<T> {
        value.ok_or_else(|| self.malformed(format!("missing `{key}` field")))
    }

    fn finish(&mut self, pending: PendingRecord, content: String) -> Result<AuthorshipRecord> {
        let record = AuthorshipRecord {
            commit_id: pending.commit_id,
            author: self.require(pending.author, "author")?,
            author_email: self.require(pending.author_email, "author-mail")?,
            author_time: self.require(pending.author_time, "author-time")?,
            author_tz: self.require(pending.author_tz, "author-tz")?,
            committer: self.require(pending.committer, "committer")?,
            committer_email: self.require(pending.committer_email, "committer-mail")?,
            committer_time: self.require(pending.committer_time, "committer-time")?,
            committer_tz: self.require(pending.committer_tz, "committer-tz")?,
            summary: self.require(pending.summary, "summary")?,
            previous: pending.previous,
            boundary: pending.boundary,
            filename: self.require(pending.filename, "filename")?,
            content,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        Ok(record)
    }
}

impl<R: BufRead> Iterator for BlameReader<R> {
    type Item = Result<AuthorshipRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
