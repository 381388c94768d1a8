// src/report.rs

use crate::model::{SourceFile, StalePair};
use chrono::{TimeZone, Utc};
use std::io::{self, Write};

pub fn write_stale_pairs<W: Write>(
    out: &mut W,
    file: &SourceFile,
    pairs: &[StalePair<'_>],
    range_days: u32,
    dates: bool,
) -> io::Result<()> {
    writeln!(out, "Found {} stale block pairs exceeding {} days:", pairs.len(), range_days)?;
    for pair in pairs {
        write!(
            out,
            "==> {}: Stale Range ({} Days) (Lines {} to {}) (Blocks {}, {})",
            file.path,
            pair.age_gap_days(),
            pair.comment.first_line_number(),
            pair.code.first_line_number(),
            pair.comment.id(),
            pair.code.id(),
        )?;
        if dates {
            write!(
                out,
                " (Comment {}, Code {})",
                format_time(pair.comment.freshness()),
                format_time(pair.code.freshness())
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Every block of the file with its numbered lines
pub fn write_blocks<W: Write>(out: &mut W, file: &SourceFile) -> io::Result<()> {
    writeln!(out, "***** {} *****", file.path)?;
    for (index, block) in file.blocks.iter().enumerate() {
        writeln!(out, "==> {} {} ({} lines):", block.kind().name(), index, block.lines().len())?;
        for line in block.lines() {
            writeln!(out, "{}\t{}", line.sequence, line.content)?;
        }
    }
    writeln!(out)
}

/// `total` counts every requested file, including ones that could not be analyzed
pub fn write_stats<W: Write>(out: &mut W, total: usize, files: &[SourceFile]) -> io::Result<()> {
    writeln!(out, "Total Files: {}", total)?;
    for file in files {
        writeln!(out, "{}", file.path)?;
        writeln!(out, "\tBlankBlocks   {}", file.stats.blank_blocks)?;
        writeln!(out, "\tCodeBlocks    {}", file.stats.code_blocks)?;
        writeln!(out, "\tCommentBlocks {}", file.stats.comment_blocks)?;
        writeln!(out, "\tLines         {}", file.stats.lines)?;
    }
    Ok(())
}

fn format_time(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map_or_else(|| timestamp.to_string(), |t| t.to_rfc2822())
}
