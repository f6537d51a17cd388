//! In-place line editing
//!
//! Edits are expressed against byte spans of the original line so that
//! every byte outside an edited span is kept as written.

use std::ops::Range;

use gcodetexture_gcode::{CommentStyle, GcodeLine};

#[derive(Debug, Clone, PartialEq)]
struct Edit {
    span: Range<usize>,
    text: String,
}

/// Collects replacements and insertions for one line
#[derive(Debug, Clone)]
pub struct LineRewriter<'a> {
    line: &'a GcodeLine,
    edits: Vec<Edit>,
    annotation: Option<String>,
}

impl<'a> LineRewriter<'a> {
    /// Start editing a parsed line
    pub fn new(line: &'a GcodeLine) -> Self {
        Self {
            line,
            edits: Vec::new(),
            annotation: None,
        }
    }

    /// Replace the value text of the first word with `letter`
    ///
    /// Returns `false` when the line has no such word.
    pub fn replace_value(&mut self, letter: char, value: String) -> bool {
        match self.line.word(letter) {
            Some(word) => {
                self.edits.push(Edit {
                    span: word.value_span.clone(),
                    text: value,
                });
                true
            }
            None => false,
        }
    }

    /// Insert ` <letter><value>` right after the last of the given words
    ///
    /// Falls back to the end of the last word on the line.
    pub fn insert_after(&mut self, after: &[char], letter: char, value: String) {
        let at = after
            .iter()
            .filter_map(|l| self.line.word(*l))
            .map(|w| w.span.end)
            .max()
            .or_else(|| self.line.words().last().map(|w| w.span.end))
            .unwrap_or(0);
        self.edits.push(Edit {
            span: at..at,
            text: format!(" {}{}", letter, value),
        });
    }

    /// Attach a trailing note to the line
    pub fn annotate(&mut self, note: String) {
        self.annotation = Some(note);
    }

    /// Whether any edit or note was recorded
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty() || self.annotation.is_some()
    }

    /// Build the edited line text
    pub fn finish(mut self) -> String {
        let raw = self.line.raw();
        self.edits.sort_by_key(|e| (e.span.start, e.span.end));

        let mut out = String::with_capacity(raw.len() + 32);
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&raw[cursor..edit.span.start]);
            out.push_str(&edit.text);
            cursor = edit.span.end;
        }
        out.push_str(&raw[cursor..]);

        if let Some(note) = self.annotation {
            let has_semicolon = self
                .line
                .comments()
                .iter()
                .any(|c| c.style == CommentStyle::Semicolon)
                || self.line.opaque_text().is_some();
            let trimmed = out.trim_end().len();
            out.truncate(trimmed);
            if has_semicolon {
                out.push_str(&format!(" [{}]", note));
            } else {
                out.push_str(&format!(" ; {}", note));
            }
        }
        out
    }
}
