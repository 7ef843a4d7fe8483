//! Flat-text layout of an assembled SOP.
//!
//! ```text
//! Title one
//!
//! Body paragraph one.
//!
//! Body paragraph two.
//!
//!
//! Title two
//!
//! Body.
//! ```
//!
//! Title and body are separated by one blank line, and every section, the last
//! one included, ends with two. A body may hold several paragraphs separated by
//! single blank lines.

use serde::{Deserialize, Serialize};

/// Between a section title and its body.
pub const TITLE_SEPARATOR: &str = "\n\n";
/// After every section.
pub const SECTION_SEPARATOR: &str = "\n\n\n";
/// Between paragraphs inside one body.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub title: String,
    pub body: String,
}

impl DocumentSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Body split into its non-empty paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body
            .split(PARAGRAPH_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledDocument {
    pub sections: Vec<DocumentSection>,
}

impl AssembledDocument {
    pub fn new(sections: Vec<DocumentSection>) -> Self {
        Self { sections }
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("{}{TITLE_SEPARATOR}{}{SECTION_SEPARATOR}", s.title, s.body))
            .collect()
    }

    /// Recovers the `(title, body)` pairs of a rendered document.
    ///
    /// Text without any section separator is treated as the older layout where
    /// headings and bodies strictly alternate between single blank lines.
    pub fn parse(text: &str) -> Self {
        let text = text.replace("\r\n", "\n");
        // Layout is decided before trimming: a rendered single-section document
        // is recognised by its trailing separator.
        let sectioned = text.contains(SECTION_SEPARATOR);
        let text = text.trim_matches('\n');

        if !sectioned {
            return Self::parse_alternating(text);
        }

        let sections = text
            .split(SECTION_SEPARATOR)
            .map(|block| block.trim_matches('\n'))
            .filter(|block| !block.is_empty())
            .map(|block| match block.split_once(TITLE_SEPARATOR) {
                Some((title, body)) => DocumentSection::new(title, body),
                None => DocumentSection::new(block, ""),
            })
            .collect();

        Self { sections }
    }

    fn parse_alternating(text: &str) -> Self {
        let blocks: Vec<&str> = text
            .split(TITLE_SEPARATOR)
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .collect();

        // An unpaired trailing heading has no body and is dropped.
        let sections = blocks
            .chunks_exact(2)
            .map(|pair| DocumentSection::new(pair[0], pair[1]))
            .collect();

        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Collapses runs of blank lines so free-form text cannot break the layout.
pub fn normalize_body(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join(PARAGRAPH_SEPARATOR)
}
