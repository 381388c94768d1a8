// src/matcher.rs

use crate::model::{age_gap_days, Block, BlockKind, SourceFile, StalePair};

/// Find the next comment/code pair at or after `cursor` whose freshness
/// differs by at least `range_days`.
///
/// Each comment block is paired with the first code block after it. Pairs
/// within tolerance are skipped and the search resumes after their code
/// block. Returns the indices of the comment and code blocks.
pub fn next_stale_pair(blocks: &[Block], mut cursor: usize, range_days: u32) -> Option<(usize, usize)> {
    loop {
        let comment = cursor + position_of(blocks.get(cursor..)?, BlockKind::Comment)?;
        let code = comment + position_of(&blocks[comment..], BlockKind::Code)?;

        let days = age_gap_days(&blocks[comment], &blocks[code]);
        if days >= i64::from(range_days) {
            return Some((comment, code));
        }
        tracing::trace!(
            comment = blocks[comment].id(),
            code = blocks[code].id(),
            days,
            "pair within tolerance"
        );
        cursor = code + 1;
    }
}

fn position_of(blocks: &[Block], kind: BlockKind) -> Option<usize> {
    blocks.iter().position(|b| b.kind() == kind)
}

/// Every stale pair in the file, in file order
pub fn find_stale_pairs(file: &SourceFile, range_days: u32) -> Vec<StalePair<'_>> {
    let mut pairs = Vec::new();
    let mut cursor = 0;
    while let Some((comment, code)) = next_stale_pair(&file.blocks, cursor, range_days) {
        pairs.push(StalePair {
            comment: &file.blocks[comment],
            code: &file.blocks[code],
        });
        cursor = code + 1;
    }
    pairs
}
