// src/model.rs

use chrono::Duration;

/// Sequence position of a line within one blame stream (1-based)
pub type LineNumber = usize;

/// Diagnostic identifier of a block within one file (1-based)
pub type BlockId = usize;

/// Authorship of a single physical source line, as reported by `git blame`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorshipRecord {
    pub commit_id: String,
    pub author: String,
    pub author_email: String,
    /// Unix epoch seconds
    pub author_time: i64,
    pub author_tz: String,
    pub committer: String,
    pub committer_email: String,
    pub committer_time: i64,
    pub committer_tz: String,
    pub summary: String,
    /// `previous <revision> <filename>`, absent on boundary commits
    pub previous: Option<String>,
    pub boundary: bool,
    /// Filename at that revision, may differ from the queried path under renames
    pub filename: String,
    /// Raw line text without the line terminator
    pub content: String,
    pub sequence: LineNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Blank,
    Comment,
    Code,
}

impl BlockKind {
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Blank => "Blank Block",
            BlockKind::Comment => "Comment Block",
            BlockKind::Code => "Code Block",
        }
    }
}

/// A maximal run of consecutive lines sharing one classification.
///
/// Blocks are only built by the segmenter, which guarantees `lines` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    id: BlockId,
    lines: Vec<AuthorshipRecord>,
}

impl Block {
    pub(crate) fn new(kind: BlockKind, id: BlockId, lines: Vec<AuthorshipRecord>) -> Self {
        debug_assert!(!lines.is_empty(), "blocks always hold at least one line");
        Self { kind, id, lines }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn lines(&self) -> &[AuthorshipRecord] {
        &self.lines
    }

    /// Most recent author timestamp among the block's lines
    pub fn freshness(&self) -> i64 {
        self.lines.iter().map(|l| l.author_time).max().unwrap_or(0)
    }

    pub fn first_line_number(&self) -> LineNumber {
        self.lines.first().map_or(0, |l| l.sequence)
    }
}

/// Aggregate counters for one file, maintained by the segmenter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub lines: usize,
    pub blank_blocks: usize,
    pub code_blocks: usize,
    pub comment_blocks: usize,
}

impl FileStats {
    pub(crate) fn record(&mut self, block: &Block) {
        self.lines += block.lines().len();
        match block.kind() {
            BlockKind::Blank => self.blank_blocks += 1,
            BlockKind::Comment => self.comment_blocks += 1,
            BlockKind::Code => self.code_blocks += 1,
        }
    }
}

/// One tracked source file split into blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub blocks: Vec<Block>,
    pub stats: FileStats,
}

impl SourceFile {
    /// All lines of the file, in order, reassembled from its blocks
    pub fn lines(&self) -> impl Iterator<Item = &AuthorshipRecord> {
        self.blocks.iter().flat_map(|b| b.lines().iter())
    }
}

/// A comment block followed (not necessarily immediately) by a code block
#[derive(Debug, Clone, Copy)]
pub struct StalePair<'a> {
    pub comment: &'a Block,
    pub code: &'a Block,
}

impl StalePair<'_> {
    /// Whole days between the two blocks' freshness, truncated
    pub fn age_gap_days(&self) -> i64 {
        age_gap_days(self.comment, self.code)
    }
}

pub fn age_gap_days(first: &Block, second: &Block) -> i64 {
    Duration::seconds((second.freshness() - first.freshness()).abs()).num_days()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record carrying only what classification and matching look at
    pub fn record(sequence: LineNumber, content: &str, author_time: i64) -> AuthorshipRecord {
        AuthorshipRecord {
            commit_id: "0".repeat(40),
            author: "A. U. Thor".into(),
            author_email: "<author@example.com>".into(),
            author_time,
            author_tz: "+0000".into(),
            committer: "A. U. Thor".into(),
            committer_email: "<author@example.com>".into(),
            committer_time: author_time,
            committer_tz: "+0000".into(),
            summary: "initial".into(),
            previous: None,
            boundary: true,
            filename: "main.c".into(),
            content: content.into(),
            sequence,
        }
    }

    pub fn records(lines: &[&str]) -> Vec<AuthorshipRecord> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| record(i + 1, l, 0))
            .collect()
    }
}
