//! Description text capture.
//!
//! A `description` directive comes in three forms:
//!
//! ```text
//! description "One line."
//! description "Starts here
//!     and ends here."
//! description
//!     Legacy indented paragraph.
//! ```
//!
//! Every captured piece is appended to a [`DescriptionBuffer`]; pieces are
//! joined with single spaces when the record is finished.

use crate::source::SourceFile;
use crate::token::QUOTES;

const DIRECTIVE: &str = "description";

/// Accumulates description pieces for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionBuffer {
    parts: Vec<String>,
}

impl DescriptionBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trimmed piece. Empty pieces are ignored.
    pub fn push(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.parts.push(text.to_string());
        }
    }

    /// Check if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Joined text, or `None` if nothing was captured.
    #[must_use]
    pub fn finish(self) -> Option<String> {
        if self.parts.is_empty() {
            None
        } else {
            Some(self.parts.join(" "))
        }
    }
}

/// How a directive line continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form<'a> {
    /// Text on the directive line with no opening delimiter.
    Inline(&'a str),
    /// Opened by `delimiter`; `opening` is the text after it.
    Quoted { delimiter: char, opening: &'a str },
    /// Nothing after the keyword; text follows on deeper lines.
    Indented,
}

impl<'a> Form<'a> {
    fn of(rest: &'a str) -> Self {
        match rest.chars().next() {
            None => Self::Indented,
            Some(delimiter) if QUOTES.contains(&delimiter) => Self::Quoted {
                delimiter,
                opening: &rest[delimiter.len_utf8()..],
            },
            Some(_) => Self::Inline(rest),
        }
    }
}

/// Check if a line is a `description` directive.
#[must_use]
pub fn is_directive(line: &str) -> bool {
    line.trim()
        .strip_prefix(DIRECTIVE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Capture the directive at `index` into `buffer`.
///
/// Returns the index of the first line after the captured text. A line that
/// ends with the closing delimiter always closes a quoted description, at
/// any depth. Otherwise capture stops before the next line at or above the
/// directive's own depth.
pub fn capture(source: &SourceFile, index: usize, buffer: &mut DescriptionBuffer) -> usize {
    let depth = source.depth(index);
    let rest = source
        .text(index)
        .strip_prefix(DIRECTIVE)
        .unwrap_or_default()
        .trim_start();

    match Form::of(rest) {
        Form::Inline(text) => {
            buffer.push(text);
            index + 1
        }
        Form::Quoted { delimiter, opening } => {
            if let Some(text) = opening.strip_suffix(delimiter) {
                buffer.push(text);
                return index + 1;
            }
            buffer.push(opening);

            let mut next = index + 1;
            while next < source.len() {
                let text = source.text(next);
                if let Some(text) = text.strip_suffix(delimiter) {
                    buffer.push(text);
                    return next + 1;
                }
                if !text.is_empty() && source.depth(next) <= depth {
                    return next;
                }
                buffer.push(text);
                next += 1;
            }
            next
        }
        Form::Indented => {
            let mut next = index + 1;
            while next < source.len() {
                if !source.is_blank(next) {
                    if source.depth(next) <= depth {
                        break;
                    }
                    buffer.push(source.text(next));
                }
                next += 1;
            }
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> (Option<String>, usize) {
        let source = SourceFile::new("test.txt", text);
        let mut buffer = DescriptionBuffer::new();
        let next = capture(&source, 0, &mut buffer);
        (buffer.finish(), next)
    }

    #[test]
    fn test_single_line() {
        let (text, next) = run("\tdescription \"A fast ship.\"\n\tmass 5");
        assert_eq!(text.as_deref(), Some("A fast ship."));
        assert_eq!(next, 1);
    }

    #[test]
    fn test_backtick_allows_inner_quotes() {
        let (text, _) = run("\tdescription `Known as the \"Swift\".`");
        assert_eq!(text.as_deref(), Some("Known as the \"Swift\"."));
    }

    #[test]
    fn test_multi_line_capture() {
        let (text, next) = run(
            "\tdescription \"First line\n\t\tsecond line\n\n\t\tthird line.\"\n\tmass 5",
        );
        assert_eq!(text.as_deref(), Some("First line second line third line."));
        assert_eq!(next, 4);
    }

    #[test]
    fn test_unterminated_stops_at_shallower_line() {
        let (text, next) = run("\tdescription \"Never closed\n\t\tstill going\n\tmass 5");
        assert_eq!(text.as_deref(), Some("Never closed still going"));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_closing_line_at_directive_depth() {
        let (text, next) = run("\tdescription \"Line one\n\tline two.\"\n\tgun 0 0");
        assert_eq!(text.as_deref(), Some("Line one line two."));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_closing_line_at_top_level() {
        let (text, next) = run("\tdescription \"Line one\nline two.\"\n\tgun 0 0");
        assert_eq!(text.as_deref(), Some("Line one line two."));
        assert_eq!(next, 2);
    }

    #[test]
    fn test_legacy_indented_block() {
        let (text, next) = run("\tdescription\n\t\tOld style\n\n\t\tparagraph.\n\tmass 5");
        assert_eq!(text.as_deref(), Some("Old style paragraph."));
        assert_eq!(next, 4);
    }

    #[test]
    fn test_empty_description() {
        let (text, next) = run("\tdescription \"\"");
        assert_eq!(text, None);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("\tdescription \"x\""));
        assert!(is_directive("\tdescription"));
        assert!(!is_directive("\tdescriptions 5"));
        assert!(!is_directive("\t\"description\" 5"));
    }

    #[test]
    fn test_buffer_joins_across_directives() {
        let mut buffer = DescriptionBuffer::new();
        buffer.push("One.");
        buffer.push("   ");
        buffer.push("Two.");
        assert_eq!(buffer.finish().as_deref(), Some("One. Two."));
    }
}
