//! Response formatter
//!
//! Turns the model's free text into a [`FormattedResult`] in one pass over
//! its lines, then renders that structure back to markdown:
//!
//! - leading `*`, `#` and whitespace are stripped from every line, which
//!   also drops blank lines
//! - the first remaining line becomes the bold title
//! - the first line starting with each category label opens that section;
//!   later lines starting with an already seen label are body text
//! - `-` and `•` list items are normalized to `- item`
//! - clinical terms in body text are emphasised, keeping their casing,
//!   unless they already sit inside a bold run
//!
//! Rendered blocks are separated by exactly one blank line so the UI can
//! split on `\n\n` and show one card per block. A section header is its own
//! block, followed by a block with the section body.

use crate::types::{Category, FormattedResult, Line, Section, CLINICAL_TERMS};
use regex::Regex;
use std::sync::LazyLock;

const BULLET_GLYPHS: [char; 2] = ['-', '•'];

static TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Longest first so "karang gigi" wins over any shorter overlap
    let mut terms = CLINICAL_TERMS.to_vec();
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).unwrap()
});

/// Format raw model output into display markdown
pub fn format(raw_text: &str) -> String {
    parse(raw_text).to_markdown()
}

/// Parse raw model output into title, preamble and labelled sections
pub fn parse(raw_text: &str) -> FormattedResult {
    let mut lines = raw_text.lines().map(strip_decoration).filter(|l| !l.is_empty());
    let mut result = FormattedResult::default();

    let Some(title) = lines.next() else {
        return result;
    };
    result.title = Some(title.trim_end().to_string());

    for line in lines {
        let header = Category::match_line_start(line)
            .filter(|category| result.section(*category).is_none());

        if let Some(category) = header {
            let mut section = Section {
                category,
                lines: Vec::new(),
            };
            let rest = line[category.label().len()..]
                .trim_start_matches(|c: char| c == '*' || c.is_whitespace())
                .trim_end_matches(|c: char| c == '*' || c.is_whitespace());
            if !rest.is_empty() {
                section.lines.push(classify_line(rest));
            }
            result.sections.push(section);
            continue;
        }

        let body = match result.sections.last_mut() {
            Some(section) => &mut section.lines,
            None => &mut result.preamble,
        };
        body.push(classify_line(line));
    }

    result
}

/// Rewrite a `-` or `•` list item as `- item`; other lines are unchanged
pub fn normalize_bullet(line: &str) -> String {
    match classify_line(line) {
        Line::Bullet(text) => format!("- {text}"),
        Line::Text(_) => line.to_string(),
    }
}

/// Wrap every clinical term in `**`. Text already inside a `**` run is left alone.
pub fn emphasize_terms(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    let balanced = parts.len() % 2 == 1;
    let last = parts.len() - 1;
    let mut out = String::with_capacity(text.len() + 8);

    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push_str("**");
        }
        let strong = i % 2 == 1 && (balanced || i != last);
        if strong {
            out.push_str(part);
        } else {
            wrap_terms(part, &mut out);
        }
    }

    out
}

fn wrap_terms(text: &str, out: &mut String) {
    let mut last = 0;
    for m in TERM_RE.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        out.push_str("**");
        out.push_str(m.as_str());
        out.push_str("**");
        last = m.end();
    }
    out.push_str(&text[last..]);
}

impl FormattedResult {
    /// Render back to markdown, one blank line between blocks.
    /// A section header is a block of its own, so its body follows a blank line.
    pub fn to_markdown(&self) -> String {
        let mut blocks = Vec::new();

        if let Some(title) = &self.title {
            blocks.push(format!("**{title}**"));
        }
        if !self.preamble.is_empty() {
            blocks.push(render_lines(&self.preamble));
        }
        for section in &self.sections {
            blocks.push(format!("**{}**", section.category.label()));
            if !section.lines.is_empty() {
                blocks.push(render_lines(&section.lines));
            }
        }

        blocks.join("\n\n")
    }
}

/// Inline piece of a rendered paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Plain(&'a str),
    Strong(&'a str),
}

/// Split a rendered line on `**` markers into plain and strong spans.
/// An unclosed marker is kept as plain text.
pub fn inline_spans(text: &str) -> Vec<Span<'_>> {
    let parts: Vec<&str> = text.split("**").collect();
    let balanced = parts.len() % 2 == 1;
    let last = parts.len() - 1;
    let mut spans = Vec::new();

    for (i, part) in parts.into_iter().enumerate() {
        let opened = i % 2 == 1;
        if opened && !balanced && i == last {
            spans.push(Span::Plain("**"));
            if !part.is_empty() {
                spans.push(Span::Plain(part));
            }
            continue;
        }
        if part.is_empty() {
            continue;
        }
        spans.push(if opened { Span::Strong(part) } else { Span::Plain(part) });
    }

    spans
}

fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
}

fn classify_line(line: &str) -> Line {
    let line = line.trim_end();
    if let Some(rest) = line.strip_prefix(BULLET_GLYPHS) {
        let content = rest.trim_start();
        if !content.is_empty() {
            return Line::Bullet(content.to_string());
        }
    }
    Line::Text(line.to_string())
}

fn render_lines(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| match line {
            Line::Bullet(text) => format!("- {}", emphasize_terms(text)),
            Line::Text(text) => emphasize_terms(text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
