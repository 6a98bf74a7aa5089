//! Placeholder templates
//!
//! A placeholder is `{{`, then one or more characters (newlines
//! included, matched lazily), then `}}`. The inner text, trimmed, is used
//! verbatim as a data key. There is no escaping, nesting or filtering.
//! Rendering is a single pass: substituted values are never rescanned.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Piece of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Trimmed placeholder key
    Placeholder(String),
}

/// Compiled template: the immutable source plus its segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Split `source` into literal text and placeholders
    pub fn compile(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut search = 0;

        while let Some(off) = source[search..].find(OPEN) {
            let open = search + off;
            let inner_start = open + OPEN.len();
            // Need at least one inner character before the closing braces
            let Some(first) = source[inner_start..].chars().next() else {
                break;
            };
            let scan_from = inner_start + first.len_utf8();
            let Some(close_off) = source[scan_from..].find(CLOSE) else {
                // No closer anywhere after this point
                break;
            };
            let close = scan_from + close_off;

            if open > literal_start {
                segments.push(Segment::Literal(source[literal_start..open].to_string()));
            }
            segments.push(Segment::Placeholder(source[inner_start..close].trim().to_string()));

            literal_start = close + CLOSE.len();
            search = literal_start;
        }

        if literal_start < source.len() {
            segments.push(Segment::Literal(source[literal_start..].to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// The original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder keys in order of appearance (duplicates included)
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(key) => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder with the looked-up string
    pub fn render<F, S>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> S,
        S: AsRef<str>,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => out.push_str(lookup(key).as_ref()),
            }
        }
        out
    }
}
