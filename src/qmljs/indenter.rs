//! Editor-facing entry points
//!
//!     [`CodeFormatter`] answers "what is the indent of this line" assuming
//!     the snapshots above it are current. [`Indenter`] adds the bookkeeping
//!     an editor or a batch tool needs around that: bring the cache up to date
//!     first, then rewrite the leading whitespace of the line.

use crate::qmljs::config::IndentConfig;
use crate::qmljs::document::{Document, TextBuffer};
use crate::qmljs::formatter::CodeFormatter;
use crate::qmljs::policy::{IndentPolicy, QtStylePolicy};
use tracing::debug;

/// Characters that should trigger re-indenting the current line when typed.
const ELECTRIC_CHARACTERS: [char; 4] = ['{', '}', ']', ':'];

#[derive(Debug, Clone)]
pub struct Indenter<P = QtStylePolicy> {
    formatter: CodeFormatter<P>,
}

impl Indenter<QtStylePolicy> {
    /// A Qt style indenter with the sizes from `config`.
    pub fn new(config: &IndentConfig) -> Self {
        let mut formatter = CodeFormatter::new(QtStylePolicy::new(config.formatting.indent_size));
        formatter.set_tab_size(config.formatting.tab_size);
        Indenter { formatter }
    }

    pub fn is_electric_character(c: char) -> bool {
        ELECTRIC_CHARACTERS.contains(&c)
    }
}

impl Default for Indenter<QtStylePolicy> {
    fn default() -> Self {
        Indenter {
            formatter: CodeFormatter::default(),
        }
    }
}

impl<P: IndentPolicy> Indenter<P> {
    pub fn with_formatter(formatter: CodeFormatter<P>) -> Self {
        Indenter { formatter }
    }

    pub fn formatter(&self) -> &CodeFormatter<P> {
        &self.formatter
    }

    pub fn formatter_mut(&mut self) -> &mut CodeFormatter<P> {
        &mut self.formatter
    }

    /// Indent column for `line`, or -1 when its indentation must be kept.
    pub fn indent_line<D: Document>(&mut self, doc: &mut D, line: D::Line) -> i32 {
        if let Some(previous) = doc.previous_line(line) {
            self.formatter.update_state_until(doc, previous);
        }
        self.formatter.indent_for(doc, line)
    }

    /// Indent column for a new line typed after `line`.
    pub fn indent_new_line_after<D: Document>(&mut self, doc: &mut D, line: D::Line) -> i32 {
        self.formatter.update_state_until(doc, line);
        self.formatter.indent_for_new_line_after(doc, line)
    }

    /// Re-indent every line of `buffer` in place, returning how many changed.
    pub fn reindent(&mut self, buffer: &mut TextBuffer) -> usize {
        let lines: Vec<_> = buffer.lines().collect();
        let mut changed = 0;
        for line in lines {
            let indent = self.indent_line(buffer, line);
            let Some(text) = reindented(buffer.line_text(line), indent) else {
                continue;
            };
            if text != buffer.line_text(line) {
                buffer.set_line_text(line, &text);
                changed += 1;
            }
        }
        debug!(lines = buffer.line_count(), changed, "reindented buffer");
        changed
    }

    /// Re-indent a whole source text.
    pub fn reindent_text(&mut self, text: &str) -> String {
        let mut buffer = TextBuffer::from_text(text);
        self.reindent(&mut buffer);
        buffer.text()
    }
}

/// `text` with its leading blanks replaced by `indent` spaces, or `None` when
/// the line keeps its indentation. Blank lines become empty.
fn reindented(text: &str, indent: i32) -> Option<String> {
    let indent = usize::try_from(indent).ok()?;
    let content = text.trim_start_matches([' ', '\t']);
    if content.is_empty() {
        return Some(String::new());
    }
    Some(format!("{}{}", " ".repeat(indent), content))
}
