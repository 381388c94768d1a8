// src/classify.rs

//! Single-line predicates for C-family comment syntax.
//!
//! Positions are byte offsets into the line. Double quotes toggle an
//! in-string state (no escape handling) and comment delimiters inside a
//! string are ignored.

/// A comment opener found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOpen {
    /// `//` at the given offset, the rest of the line is comment
    Line(usize),
    /// `/*` at the given offset
    Block(usize),
}

pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// First `//` or `/*` outside a string literal at or after `from`
pub fn find_comment_open(line: &str, from: usize) -> Option<CommentOpen> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'/' if !in_string => match bytes.get(i + 1) {
                Some(b'/') => return Some(CommentOpen::Line(i)),
                Some(b'*') => return Some(CommentOpen::Block(i)),
                _ => {}
            },
            _ => {}
        }
        i += 1;
    }
    None
}

/// First `*/` outside a string literal at or after `from`
pub fn find_comment_close(line: &str, from: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'*' if !in_string && bytes.get(i + 1) == Some(&b'/') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// True when the line holds nothing but comments: a `//` comment, or one or
/// more complete `/* ... */` comments optionally followed by a `//` comment.
pub fn is_comment_only(line: &str) -> bool {
    let mut pos = 0;
    loop {
        let rest = &line[pos..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            // Only reachable after at least one closed block comment
            return pos > 0;
        }
        let start = pos + (rest.len() - trimmed.len());
        match find_comment_open(line, start) {
            Some(CommentOpen::Line(at)) if at == start => return true,
            Some(CommentOpen::Block(at)) if at == start => match find_comment_close(line, at + 2) {
                Some(close) => pos = close + 2,
                None => return false,
            },
            _ => return false,
        }
    }
}

/// True when the line ends inside an open `/*` block comment
pub fn has_unterminated_comment(line: &str) -> bool {
    let mut pos = 0;
    while let Some(open) = find_comment_open(line, pos) {
        match open {
            CommentOpen::Line(_) => return false,
            CommentOpen::Block(at) => match find_comment_close(line, at + 2) {
                Some(close) => pos = close + 2,
                None => return true,
            },
        }
    }
    false
}
