//! Line-oriented view of a data file.
//!
//! Nesting in data files is expressed purely by leading tab characters.
//! [`SourceFile`] owns the lines of one file and answers the depth and
//! block-boundary questions every parser asks.

/// One data file split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Split `text` into lines. `\r\n` and `\n` endings are both accepted.
    #[must_use]
    pub fn new(path: impl Into<String>, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Path the file was read from, relative to the content root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the file has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw line at `index`. Out of range reads as an empty line.
    #[must_use]
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    /// Trimmed line at `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        self.line(index).trim()
    }

    /// Nesting depth of the line at `index`.
    #[must_use]
    pub fn depth(&self, index: usize) -> usize {
        depth(self.line(index))
    }

    /// Check if the line at `index` holds only whitespace.
    #[must_use]
    pub fn is_blank(&self, index: usize) -> bool {
        self.text(index).is_empty()
    }

    /// First non-blank line at or after `index`.
    #[must_use]
    pub fn next_content(&self, index: usize) -> Option<usize> {
        (index..self.len()).find(|&i| !self.is_blank(i))
    }

    /// Check if the next non-blank line after `index` is nested deeper than it.
    #[must_use]
    pub fn opens_block(&self, index: usize) -> bool {
        self.next_content(index + 1)
            .is_some_and(|next| self.depth(next) > self.depth(index))
    }

    /// First non-blank line at or after `index` with depth at most `depth`,
    /// or the end of the file.
    #[must_use]
    pub fn block_end(&self, index: usize, depth: usize) -> usize {
        (index..self.len())
            .find(|&i| !self.is_blank(i) && self.depth(i) <= depth)
            .unwrap_or(self.len())
    }
}

/// Count of leading tab characters.
#[must_use]
pub fn depth(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b'\t').count()
}
