//! Per-call scratch state threaded through the block parser and inline walker.
//!
//! A fresh [`ParseContext`] is created at the top of every `transform` call,
//! so nothing leaks between calls and the engine itself stays immutable.

/// Footnotes collected in encounter order.
#[derive(Debug, Clone, Default)]
pub struct FootnoteCollector {
    prefix: String,
    notes: Vec<(String, String)>,
}

impl FootnoteCollector {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            notes: Vec::new(),
        }
    }

    /// Store a rendered note body and return the in-text reference marker.
    pub fn add(&mut self, body: String) -> String {
        let number = self.notes.len() + 1;
        let id = format!("{}-{}", self.prefix, number);
        let marker = format!(
            "<sup>[<a href=\"#{id}\" id=\"rev-{id}\">{number}</a>]</sup>",
            id = id,
            number = number
        );
        self.notes.push((id, body));
        marker
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Trailing notes block, or an empty string when no note was collected.
    ///
    /// `template` for several notes and `template_single` for one; both carry
    /// a `%s` slot that receives the note paragraphs.
    pub fn render(&self, template: &str, template_single: &str) -> String {
        if self.notes.is_empty() {
            return String::new();
        }
        let entries: String = self
            .notes
            .iter()
            .enumerate()
            .map(|(i, (id, body))| {
                format!(
                    "\n<p>[<a href=\"#rev-{id}\" id=\"{id}\">{n}</a>] {body}</p>",
                    id = id,
                    n = i + 1,
                    body = body
                )
            })
            .collect();
        let template = if self.notes.len() > 1 {
            template
        } else {
            template_single
        };
        template.replacen("%s", &entries, 1)
    }
}

/// Mutable state for one transformation.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Raw macro bodies, indexed by placeholder id.
    pub macros: Vec<String>,
    pub footnotes: FootnoteCollector,
}

impl ParseContext {
    pub fn new(note_prefix: &str) -> Self {
        Self {
            macros: Vec::new(),
            footnotes: FootnoteCollector::new(note_prefix),
        }
    }
}
