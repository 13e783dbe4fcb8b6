//! Splits an input line into command segments and segments into words.
//!
//! A line is a sequence of segments separated by `;` (run sequentially) or
//! `&` (run in the background). Segment texts are borrowed subslices of the
//! line; nothing here allocates beyond the output vectors.

/// What followed a segment in the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The segment ended at a `;`. The shell waits for it before moving on.
    Sequential,
    /// The segment ended at a `&`. The shell does not wait for it.
    Background,
    /// The segment ran to the end of the line with no explicit delimiter.
    /// Dispatches exactly like [`Terminator::Sequential`].
    End,
}

impl Terminator {
    /// True when the segment should run without the shell waiting on it.
    pub fn is_background(self) -> bool {
        matches!(self, Terminator::Background)
    }
}

/// One command's raw text plus the delimiter that ended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Raw command text, without the delimiter. May be empty or all blank;
    /// such segments tokenize to nothing and are skipped by the driver.
    pub text: &'a str,
    pub terminator: Terminator,
}

/// Split one input line into segments at `;` and `&`, in source order.
///
/// A trailing newline is stripped before scanning. The remainder after the
/// last delimiter becomes a final [`Terminator::End`] segment unless it is
/// blank, so a line ending in `;` or `&` produces no extra segment. Empty
/// segments before a delimiter (as in `;;` or leading `;`) are kept; they
/// carry no words and are dropped later.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut rest = line.strip_suffix('\n').unwrap_or(line);
    let mut segments = Vec::new();
    loop {
        match rest.find([';', '&']) {
            Some(at) => {
                let terminator = if rest.as_bytes()[at] == b'&' {
                    Terminator::Background
                } else {
                    Terminator::Sequential
                };
                segments.push(Segment {
                    text: &rest[..at],
                    terminator,
                });
                rest = &rest[at + 1..];
            }
            None => {
                if !rest.trim().is_empty() {
                    segments.push(Segment {
                        text: rest,
                        terminator: Terminator::End,
                    });
                }
                return segments;
            }
        }
    }
}

/// Split a segment's text into words on runs of whitespace.
///
/// Consecutive separators collapse and empty words are never produced, so
/// the result is empty exactly when the text is blank. There is no quoting
/// or escaping: a `"` or `\` is an ordinary byte of the surrounding word.
/// The number of words is unbounded; the vector grows as needed.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
