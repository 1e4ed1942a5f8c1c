//! Canonical document type plus metadata-block rendering and parsing.
//!
//! The metadata block is a YAML frontmatter header: every string value is
//! single-line and double-quoted, tags are a flow-style list of quoted
//! strings, and the `image` key is present only when media was localized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fmt::Write as _;

use crate::constants::documents::{DOCUMENT_EXTENSION, TRUNCATE_MARKER};
use crate::types::{Slug, TagKey};

/// Engagement counters captured from the source export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Engagement {
    /// Number of views.
    pub views: u64,
    /// Number of likes.
    pub likes: u64,
    /// Number of comments.
    pub comments: u64,
    /// Number of shares.
    pub shares: u64,
}

/// The canonical unit: one post, ready to persist.
///
/// Never mutated after slug resolution; duplicate-slug renaming rewrites the
/// persisted form through [`rewrite_slug`], not this value.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Resolved URL-safe identifier, unique across the corpus.
    pub slug: Slug,
    /// Sanitized single-line title.
    pub title: String,
    /// Author id recorded in the metadata block.
    pub author_id: String,
    /// Ordered, deduplicated tag keys, capped at the configured maximum.
    pub tags: Vec<TagKey>,
    /// Sanitized single-line description.
    pub description: String,
    /// Absolute-from-site-root path of the localized image, when fetched.
    pub image_path: Option<String>,
    /// Publication time; the processing time when the source value was
    /// unparseable.
    pub published_at: DateTime<Utc>,
    /// True when `published_at` is a fallback, not a parsed value.
    pub date_defaulted: bool,
    /// Original post text, unmodified.
    pub text: String,
    /// URL of the source post.
    pub source_url: String,
    /// Engagement counters appended to the body.
    pub engagement: Engagement,
}

impl Document {
    /// Publication date used for filenames and chronological filing.
    pub fn date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }

    /// Flat filename: `{YYYY-MM-DD}-{slug}.md`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.date().format("%Y-%m-%d"),
            self.slug,
            DOCUMENT_EXTENSION
        )
    }

    /// Render the metadata block, delimiters included.
    pub fn frontmatter(&self) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        let _ = writeln!(out, "slug: \"{}\"", yaml_escape(&self.slug));
        let _ = writeln!(out, "title: \"{}\"", yaml_escape(&self.title));
        let _ = writeln!(out, "authors: [\"{}\"]", yaml_escape(&self.author_id));
        let tags = self
            .tags
            .iter()
            .map(|tag| format!("\"{}\"", yaml_escape(tag)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "tags: [{tags}]");
        let _ = writeln!(out, "description: \"{}\"", yaml_escape(&self.description));
        if let Some(image) = &self.image_path {
            let _ = writeln!(out, "image: \"{}\"", yaml_escape(image));
        }
        out.push_str("---\n");
        out
    }

    /// Render the body: original text, summary-cut marker, separator,
    /// attribution line, and the engagement block.
    pub fn body(&self) -> String {
        format!(
            "\n{text}\n\n{marker}\n\n---\n\n\
             *This post was originally published on [LinkedIn]({url})*\n\n\
             **Engagement Stats:**\n\
             - 👁️ Views: {views}\n\
             - ❤️ Likes: {likes}\n\
             - 💬 Comments: {comments}\n\
             - 🔄 Shares: {shares}\n",
            text = self.text,
            marker = TRUNCATE_MARKER,
            url = self.source_url,
            views = group_thousands(self.engagement.views),
            likes = group_thousands(self.engagement.likes),
            comments = group_thousands(self.engagement.comments),
            shares = group_thousands(self.engagement.shares),
        )
    }

    /// Full persisted form: metadata block followed by the body.
    pub fn render(&self) -> String {
        format!("{}{}", self.frontmatter(), self.body())
    }
}

/// Metadata block parsed back from a persisted document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted title.
    pub title: String,
    /// Persisted author ids.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Persisted tag keys.
    #[serde(default)]
    pub tags: Vec<TagKey>,
    /// Persisted description.
    #[serde(default)]
    pub description: String,
    /// Persisted image path, when present.
    #[serde(default)]
    pub image: Option<String>,
}

/// Extract and parse the metadata block of a persisted document.
///
/// The content must open with a `---` line; lines up to the closing `---`
/// (or `...`) are parsed as YAML. Returns `None` when no valid block is
/// found.
pub fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    let block = frontmatter_block(content)?;
    serde_yaml::from_str(block).ok()
}

/// Borrow the raw YAML lines between the frontmatter delimiters.
fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content
        .trim_start_matches('\u{feff}')
        .strip_prefix("---")?
        .strip_prefix('\n')?;
    for (offset, line) in line_offsets(rest) {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(&rest[..offset]);
        }
    }
    None
}

fn line_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().scan(0usize, |offset, line| {
        let start = *offset;
        *offset = start + line.len() + 1;
        Some((start, line))
    })
}

/// Rewrite the `slug` value inside a persisted document's metadata block.
///
/// Returns `None` when the content has no parseable block or no slug line.
/// Everything outside that single line is preserved byte for byte.
pub fn rewrite_slug(content: &str, new_slug: &str) -> Option<String> {
    let block = frontmatter_block(content)?;
    let line = block
        .lines()
        .find(|line| line.trim_start().starts_with("slug:"))?;
    let replacement = format!("slug: \"{}\"", yaml_escape(new_slug));
    Some(content.replacen(line, &replacement, 1))
}

/// Escape a value for a double-quoted single-line YAML scalar.
fn yaml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' | '\t' => out.push(' '),
            ch => out.push(ch),
        }
    }
    out
}

/// Format a count with thousands separators, e.g. `1500` -> `1,500`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
