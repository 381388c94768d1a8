// src/segment.rs

use crate::classify::{find_comment_close, find_comment_open, has_unterminated_comment, is_blank, is_comment_only};
use crate::model::{AuthorshipRecord, Block, BlockId, BlockKind, FileStats, SourceFile};

/// Groups a file's lines into Blank, Comment and Code blocks.
///
/// Block ids come from a counter owned by the segmenter, so a fresh
/// segmenter per file numbers that file's blocks from 1.
#[derive(Debug)]
pub struct Segmenter {
    next_id: BlockId,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    fn take_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn segment(&mut self, path: impl Into<String>, records: Vec<AuthorshipRecord>) -> SourceFile {
        let mut extents = Vec::new();
        let mut pos = 0;
        while pos < records.len() {
            let (kind, len) = block_extent(&records[pos..]);
            extents.push((kind, len));
            pos += len;
        }

        let mut stats = FileStats::default();
        let mut blocks = Vec::with_capacity(extents.len());
        let mut lines = records.into_iter();
        for (kind, len) in extents {
            let block = Block::new(kind, self.take_id(), lines.by_ref().take(len).collect());
            stats.record(&block);
            blocks.push(block);
        }

        let path = path.into();
        tracing::debug!(
            path = %path,
            lines = stats.lines,
            blocks = blocks.len(),
            "segmented file"
        );
        SourceFile { path, blocks, stats }
    }
}

/// Segment one file with its own block numbering
pub fn segment_file(path: impl Into<String>, records: Vec<AuthorshipRecord>) -> SourceFile {
    Segmenter::new().segment(path, records)
}

fn count_while(lines: &[AuthorshipRecord], pred: impl Fn(&str) -> bool) -> usize {
    lines.iter().take_while(|l| pred(&l.content)).count()
}

/// Kind and length of the block starting at `rest[0]`; the length is always at least 1
fn block_extent(rest: &[AuthorshipRecord]) -> (BlockKind, usize) {
    let first = rest[0].content.as_str();

    if is_blank(first) {
        (BlockKind::Blank, count_while(rest, is_blank))
    } else if is_comment_only(first) {
        (BlockKind::Comment, count_while(rest, is_comment_only))
    } else if has_unterminated_comment(first) {
        (BlockKind::Comment, open_comment_extent(rest))
    } else {
        let tail = count_while(&rest[1..], |l| !is_blank(l) && find_comment_open(l, 0).is_none());
        (BlockKind::Code, 1 + tail)
    }
}

/// A block comment runs up to and including the line whose `*/` leaves no
/// comment open, or up to the next blank line when it is never closed
fn open_comment_extent(rest: &[AuthorshipRecord]) -> usize {
    let mut len = 1;
    for line in &rest[1..] {
        if is_blank(&line.content) {
            break;
        }
        len += 1;
        if let Some(close) = find_comment_close(&line.content, 0) {
            if !has_unterminated_comment(&line.content[close + 2..]) {
                break;
            }
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::records;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn kinds(file: &SourceFile) -> Vec<(BlockKind, usize)> {
        file.blocks.iter().map(|b| (b.kind(), b.lines().len())).collect()
    }

    fn lines_of(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    const SAMPLE: &str = indoc! {r#"
        /*
         * Copyright header
         */

        #include <stdio.h>
        #include "util.h"

        // Print a greeting
        // to stdout
        int main(void)
        {
            const char *s = "/* not a comment */";
            puts(s); // say it
            return 0;
        }
        /* trailing note */
    "#};

    #[test]
    fn segments_a_c_file() {
        let file = segment_file("hello.c", records(&lines_of(SAMPLE)));
        assert_eq!(
            kinds(&file),
            vec![
                (BlockKind::Comment, 3),
                (BlockKind::Blank, 1),
                (BlockKind::Code, 2),
                (BlockKind::Blank, 1),
                (BlockKind::Comment, 2),
                (BlockKind::Code, 3),
                (BlockKind::Code, 3),
                (BlockKind::Comment, 1),
            ]
        );
        assert_eq!(
            file.stats,
            FileStats {
                lines: 16,
                blank_blocks: 2,
                code_blocks: 3,
                comment_blocks: 3,
            }
        );
    }

    #[test]
    fn blocks_partition_the_input() {
        let input = records(&lines_of(SAMPLE));
        let file = segment_file("hello.c", input.clone());
        let rebuilt: Vec<_> = file.lines().cloned().collect();
        assert_eq!(rebuilt, input);
        assert!(file.blocks.iter().all(|b| !b.lines().is_empty()));
    }

    #[test]
    fn block_kind_agrees_with_first_line() {
        let file = segment_file("hello.c", records(&lines_of(SAMPLE)));
        for block in &file.blocks {
            let first = block.lines()[0].content.as_str();
            let expected = if is_blank(first) {
                BlockKind::Blank
            } else if is_comment_only(first) || has_unterminated_comment(first) {
                BlockKind::Comment
            } else {
                BlockKind::Code
            };
            assert_eq!(block.kind(), expected, "block starting at {first:?}");
        }
    }

    #[test]
    fn segmentation_is_repeatable() {
        let input = records(&lines_of(SAMPLE));
        assert_eq!(segment_file("a.c", input.clone()), segment_file("a.c", input));
    }

    #[test]
    fn block_ids_are_per_file() {
        let input = records(&lines_of(SAMPLE));
        let first = segment_file("a.c", input.clone());
        let second = segment_file("b.c", input);
        let ids: Vec<_> = first.blocks.iter().map(|b| b.id()).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(second.blocks[0].id(), 1);
    }

    #[test]
    fn string_literal_delimiters_are_code() {
        let file = segment_file("s.c", records(&[r#"x = "/* not a comment */";"#]));
        assert_eq!(kinds(&file), vec![(BlockKind::Code, 1)]);
    }

    #[test]
    fn multi_line_block_comment_is_one_block() {
        let file = segment_file("m.c", records(&["/* start", "still in comment", "end */", "int x;"]));
        assert_eq!(kinds(&file), vec![(BlockKind::Comment, 3), (BlockKind::Code, 1)]);
    }

    #[test]
    fn unclosed_block_comment_stops_at_blank_line() {
        let file = segment_file("u.c", records(&["/* never closed", "more", "", "int y;"]));
        assert_eq!(
            kinds(&file),
            vec![(BlockKind::Comment, 2), (BlockKind::Blank, 1), (BlockKind::Code, 1)]
        );
    }

    #[test]
    fn closing_line_that_reopens_keeps_the_comment_going() {
        let file = segment_file(
            "r.c",
            records(&["/* first", "done */ /* second", "still second", "end */", "x();"]),
        );
        assert_eq!(kinds(&file), vec![(BlockKind::Comment, 4), (BlockKind::Code, 1)]);
    }

    #[test]
    fn closing_line_with_a_closed_second_comment_ends_the_block() {
        let file = segment_file("r.c", records(&["/* first", "done */ /* aside */", "x();"]));
        assert_eq!(kinds(&file), vec![(BlockKind::Comment, 2), (BlockKind::Code, 1)]);
    }

    #[test]
    fn code_with_trailing_block_opener_starts_a_comment_block() {
        let file = segment_file("t.c", records(&["a();", "b(); /* why", "   because */", "c();"]));
        assert_eq!(
            kinds(&file),
            vec![(BlockKind::Code, 1), (BlockKind::Comment, 2), (BlockKind::Code, 1)]
        );
    }

    #[test]
    fn code_line_with_line_comment_opens_its_own_code_block() {
        let file = segment_file("l.c", records(&["a();", "b(); // note", "c();"]));
        assert_eq!(kinds(&file), vec![(BlockKind::Code, 1), (BlockKind::Code, 2)]);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let file = segment_file("e.c", Vec::new());
        assert!(file.blocks.is_empty());
        assert_eq!(file.stats, FileStats::default());
    }

    mod properties {
        use crate::classify::{has_unterminated_comment, is_blank, is_comment_only};
        use crate::model::fixtures::records;
        use crate::model::{AuthorshipRecord, BlockKind};
        use crate::segment::segment_file;
        use proptest::prelude::*;

        const ALPHABET: &[&str] = &[
            "",
            "  ",
            "// c",
            "/* a",
            "b */",
            "/* x */",
            "x();",
            "s = \"/*\";",
            "y(); // n",
            "*/ /* again",
        ];

        fn any_file() -> impl Strategy<Value = Vec<AuthorshipRecord>> {
            prop::collection::vec(prop::sample::select(ALPHABET), 0..64).prop_map(|lines| records(&lines))
        }

        proptest! {
            #[test]
            fn blocks_partition_any_file(input in any_file()) {
                let file = segment_file("p.c", input.clone());
                let rebuilt: Vec<_> = file.lines().cloned().collect();
                prop_assert_eq!(rebuilt, input);
            }

            #[test]
            fn every_block_has_lines(input in any_file()) {
                let file = segment_file("p.c", input);
                prop_assert!(file.blocks.iter().all(|b| !b.lines().is_empty()));
            }

            #[test]
            fn block_kind_matches_first_line(input in any_file()) {
                let file = segment_file("p.c", input);
                for block in &file.blocks {
                    let first = block.lines()[0].content.as_str();
                    let expected = if is_blank(first) {
                        BlockKind::Blank
                    } else if is_comment_only(first) || has_unterminated_comment(first) {
                        BlockKind::Comment
                    } else {
                        BlockKind::Code
                    };
                    prop_assert_eq!(block.kind(), expected, "block starting at {:?}", first);
                }
            }

            #[test]
            fn segmentation_is_a_pure_function(input in any_file()) {
                prop_assert_eq!(segment_file("p.c", input.clone()), segment_file("p.c", input));
            }

            #[test]
            fn stats_agree_with_blocks(input in any_file()) {
                let total = input.len();
                let file = segment_file("p.c", input);
                let count = |kind| file.blocks.iter().filter(|b| b.kind() == kind).count();
                prop_assert_eq!(file.stats.lines, total);
                prop_assert_eq!(file.stats.blank_blocks, count(BlockKind::Blank));
                prop_assert_eq!(file.stats.code_blocks, count(BlockKind::Code));
                prop_assert_eq!(file.stats.comment_blocks, count(BlockKind::Comment));
            }
        }
    }
}
