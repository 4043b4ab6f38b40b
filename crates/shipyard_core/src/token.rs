//! Key and value extraction for single lines.
//!
//! Keys and values are separated by whitespace and may be wrapped in either
//! `"` or `` ` ``. Backticks allow the other delimiter inside the text.

use crate::value::{parse_number, Value};

/// The two accepted string delimiters.
pub const QUOTES: [char; 2] = ['"', '`'];

/// The shape of a recognised line.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A key with no value and nothing nested under it.
    Flag(String),
    /// A key followed by a value on the same line.
    Pair(String, Value),
    /// A key with nothing after it that opens an indented block.
    Block(String),
}

/// One whitespace-separated word of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    /// Word text with delimiters removed.
    pub text: &'a str,
    /// Delimiter that enclosed the word, if any.
    pub quote: Option<char>,
}

impl Word<'_> {
    /// Check if the word was enclosed in a delimiter.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }

    /// Parse the word as a finite number.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        parse_number(self.text)
    }
}

/// Split a line into words, honouring both delimiters.
///
/// An unterminated delimiter swallows the rest of the line.
#[must_use]
pub fn words(line: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut rest = line.trim_start();
    while let Some(first) = rest.chars().next() {
        if QUOTES.contains(&first) {
            let body = &rest[first.len_utf8()..];
            match body.find(first) {
                Some(end) => {
                    words.push(Word {
                        text: &body[..end],
                        quote: Some(first),
                    });
                    rest = &body[end + first.len_utf8()..];
                }
                None => {
                    words.push(Word {
                        text: body,
                        quote: Some(first),
                    });
                    rest = "";
                }
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            words.push(Word {
                text: &rest[..end],
                quote: None,
            });
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    words
}

/// Extract a key and value from one line.
///
/// `opens_block` tells whether the next non-blank line is nested deeper.
/// Returns `None` when the line is not a key/value shape; callers treat such
/// lines as free text.
#[must_use]
pub fn extract(line: &str, opens_block: bool) -> Option<Token> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some((key, rest)) = split_quoted(line) {
        if key.is_empty() {
            return None;
        }
        let rest = rest.trim();
        if rest.is_empty() {
            return Some(if opens_block {
                Token::Block(key.to_string())
            } else {
                Token::Flag(key.to_string())
            });
        }
        let value = single_quoted(rest).unwrap_or(rest);
        return Some(Token::Pair(key.to_string(), Value::coerce(value)));
    }

    if let Some(at) = line.find(&QUOTES[..]) {
        let key = line[..at].trim();
        let value = single_quoted(&line[at..])?;
        if key.is_empty() {
            return None;
        }
        return Some(Token::Pair(key.to_string(), Value::coerce(value)));
    }

    match line.split_once(char::is_whitespace) {
        Some((key, value)) => Some(Token::Pair(key.to_string(), Value::coerce(value.trim()))),
        None if opens_block => Some(Token::Block(line.to_string())),
        None => None,
    }
}

/// Recognise a `"display name" "<value>"` line in any delimiter combination.
#[must_use]
pub fn display_name(line: &str) -> Option<&str> {
    let (key, rest) = split_quoted(line.trim())?;
    if key != "display name" {
        return None;
    }
    single_quoted(rest.trim()).filter(|name| !name.is_empty())
}

/// Remove every delimiter character from `text`.
#[must_use]
pub fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| !QUOTES.contains(c)).collect()
}

/// Split a leading delimited segment from `text`, returning its inner text and the remainder.
#[must_use]
pub fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let quote = text.chars().next().filter(|c| QUOTES.contains(c))?;
    let body = &text[quote.len_utf8()..];
    let end = body.find(quote)?;
    Some((&body[..end], &body[end + quote.len_utf8()..]))
}

/// Inner text of `text` if it is exactly one delimited segment.
#[must_use]
pub fn single_quoted(text: &str) -> Option<&str> {
    let (inner, rest) = split_quoted(text)?;
    rest.trim().is_empty().then_some(inner)
}
