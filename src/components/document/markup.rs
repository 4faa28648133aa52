//! Line-oriented markup to preview blocks.
//!
//! Supported: `#`/`##`/`###` headings, `- ` bullets (consecutive lines form one
//! list), numbered lines kept as plain paragraphs, blank-line spacers and
//! `**strong**` spans. All text is HTML-escaped before inline parsing.

use std::fmt::Write as _;

/// A run of inline text. Content is already HTML-escaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
	/// Plain text.
	Text(String),
	/// `**emphasized**` text.
	Strong(String),
}

/// A preview block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
	/// `#`, `##` or `###` heading.
	Heading { level: u8, content: Vec<Inline> },
	/// Any other line; empty for spacer lines.
	Paragraph(Vec<Inline>),
	/// Consecutive `- ` lines.
	List(Vec<Vec<Inline>>),
}

enum Line<'a> {
	Heading(u8, &'a str),
	Bullet(&'a str),
	Numbered(&'a str),
	Blank,
	Paragraph(&'a str),
}

fn classify(line: &str) -> Line<'_> {
	if let Some(rest) = line.strip_prefix("### ") {
		Line::Heading(3, rest)
	} else if let Some(rest) = line.strip_prefix("## ") {
		Line::Heading(2, rest)
	} else if let Some(rest) = line.strip_prefix("# ") {
		Line::Heading(1, rest)
	} else if let Some(rest) = line.strip_prefix("- ") {
		Line::Bullet(rest)
	} else if is_numbered(line) {
		Line::Numbered(line)
	} else if line.is_empty() {
		Line::Blank
	} else {
		Line::Paragraph(line)
	}
}

/// Whether `line` starts like `12. `. Such lines are never grouped into lists.
pub fn is_numbered(line: &str) -> bool {
	let digits = line.bytes().take_while(u8::is_ascii_digit).count();
	let mut rest = line[digits..].chars();
	digits > 0 && rest.next() == Some('.') && rest.next().is_some_and(char::is_whitespace)
}

/// Parse `text` into blocks. Total and free of side effects.
pub fn render(text: &str) -> Vec<Block> {
	let mut blocks = Vec::new();
	let mut list: Vec<Vec<Inline>> = Vec::new();

	for raw in text.lines() {
		let line = raw.trim();
		let kind = classify(line);
		if !matches!(kind, Line::Bullet(_)) && !list.is_empty() {
			blocks.push(Block::List(std::mem::take(&mut list)));
		}
		match kind {
			Line::Heading(level, rest) => blocks.push(Block::Heading {
				level,
				content: inline(&escape(rest)),
			}),
			Line::Bullet(rest) => list.push(inline(&escape(rest))),
			Line::Blank => blocks.push(Block::Paragraph(Vec::new())),
			Line::Numbered(rest) | Line::Paragraph(rest) => {
				blocks.push(Block::Paragraph(inline(&escape(rest))))
			}
		}
	}
	if !list.is_empty() {
		blocks.push(Block::List(list));
	}
	blocks
}

/// Escape `&`, `<` and `>`.
pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			c => out.push(c),
		}
	}
	out
}

/// Split `text` into plain and `**strong**` runs, left to right.
///
/// A strong span needs at least one character between the markers; an
/// opener without a closer leaves the rest of the line literal.
pub fn inline(text: &str) -> Vec<Inline> {
	let mut spans = Vec::new();
	let mut rest = text;
	while let Some(open) = rest.find("**") {
		let body = &rest[open + 2..];
		let Some(first) = body.chars().next() else {
			break;
		};
		let Some(close) = body[first.len_utf8()..].find("**") else {
			break;
		};
		let close = close + first.len_utf8();
		if open > 0 {
			spans.push(Inline::Text(rest[..open].to_owned()));
		}
		spans.push(Inline::Strong(body[..close].to_owned()));
		rest = &body[close + 2..];
	}
	if !rest.is_empty() {
		spans.push(Inline::Text(rest.to_owned()));
	}
	spans
}

fn write_inline(out: &mut String, spans: &[Inline]) {
	for span in spans {
		match span {
			Inline::Text(text) => out.push_str(text),
			Inline::Strong(text) => {
				let _ = write!(out, "<strong>{text}</strong>");
			}
		}
	}
}

/// Serialize blocks to HTML for the preview pane.
pub fn to_html(blocks: &[Block]) -> String {
	let mut out = String::new();
	for block in blocks {
		match block {
			Block::Heading { level, content } => {
				let _ = write!(out, "<h{level}>");
				write_inline(&mut out, content);
				let _ = write!(out, "</h{level}>");
			}
			Block::Paragraph(content) => {
				out.push_str("<p>");
				write_inline(&mut out, content);
				out.push_str("</p>");
			}
			Block::List(items) => {
				out.push_str("<ul>");
				for item in items {
					out.push_str("<li>");
					write_inline(&mut out, item);
					out.push_str("</li>");
				}
				out.push_str("</ul>");
			}
		}
	}
	out
}
