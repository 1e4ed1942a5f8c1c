//! Row-to-document assembly: titles, tags, dates, engagement, media.
//!
//! `assemble` is total: every row yields a document. Faults degrade field
//! by field (an unparseable date becomes the processing time, a failed
//! fetch becomes an absent image) and each degradation is logged so the
//! batch never blocks on one bad row.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::constants::{fields, tags, titles};
use crate::document::{Document, Engagement};
use crate::media::{self, MediaFetcher};
use crate::row::Row;
use crate::slugs::{slugify, SlugRegistry};
use crate::store::DocumentStore;
use crate::taxonomy::TaxonomyStore;
use crate::types::{Location, TagKey};

/// Outcome of parsing a published date.
///
/// The fallback is deliberately visible: callers substitute the processing
/// time themselves and must warn, so "parsed" and "defaulted" never blur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateOutcome {
    /// The raw value matched one of the two accepted export formats.
    Parsed(DateTime<Utc>),
    /// The raw value matched neither format.
    Unparseable,
}

/// Parse a published date in the two accepted export formats: with a
/// timezone offset suffix, or as a bare UTC timestamp.
pub fn parse_published_date(raw: &str) -> DateOutcome {
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%z") {
        return DateOutcome::Parsed(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return DateOutcome::Parsed(Utc.from_utc_datetime(&naive));
    }
    DateOutcome::Unparseable
}

/// Extract a title from post text: the first sentence, truncated with an
/// ellipsis when it exceeds `max_len` characters.
pub fn extract_title(text: &str, max_len: usize) -> String {
    let sentence = first_sentence(text.trim());
    if sentence.chars().count() <= max_len {
        return sentence.to_string();
    }
    let cut: String = sentence
        .chars()
        .take(max_len.saturating_sub(titles::ELLIPSIS.len()))
        .collect();
    format!("{cut}{}", titles::ELLIPSIS)
}

/// First sentence of `text`: everything before the first `.`, `!`, or `?`
/// that is followed by whitespace, terminator excluded. Text without such a
/// boundary is one sentence.
fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some((_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return &text[..index];
                }
            }
        }
    }
    text
}

/// Strip quoting characters, drop everything outside the allow-list
/// (alphanumerics, `_`, whitespace, and `- . , ; : ! ? ( )`), and collapse
/// whitespace runs into single spaces. The result is safe to embed in a
/// single-line quoted metadata value.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_space = false;
    for ch in text.chars() {
        let kept = match ch {
            '"' | '\'' | '`' => continue,
            ch if ch.is_whitespace() => {
                if !seen_space {
                    out.push(' ');
                    seen_space = true;
                }
                continue;
            }
            ch if ch.is_alphanumeric() || ch == '_' => ch,
            '-' | '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' => ch,
            _ => continue,
        };
        out.push(kept);
        seen_space = false;
    }
    out.trim().to_string()
}

/// Split a raw tag field into lowercase keys: whitespace-separated tokens
/// with `#` markers stripped. The absent sentinel yields no tags.
pub fn clean_tags(raw: &str) -> Vec<TagKey> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == fields::ABSENT_SENTINEL {
        return Vec::new();
    }
    trimmed
        .split_whitespace()
        .map(|token| token.to_lowercase().replace('#', ""))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parse an engagement count; absent, sentinel, or unparseable values
/// coerce to zero.
fn parse_count(row: &Row, field: &str) -> u64 {
    match row.value(field) {
        None => 0,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(field = field, raw = raw, "unparseable engagement count, using 0");
            0
        }),
    }
}

/// Turns one source row into a canonical document.
///
/// Shared batch state (taxonomy, slug registry) is passed by reference into
/// each call; the assembler itself holds only configuration and the two
/// external seams.
pub struct DocumentAssembler<'a> {
    config: &'a PipelineConfig,
    fetcher: &'a dyn MediaFetcher,
    store: &'a dyn DocumentStore,
}

impl<'a> DocumentAssembler<'a> {
    /// Create an assembler over the given seams.
    pub fn new(
        config: &'a PipelineConfig,
        fetcher: &'a dyn MediaFetcher,
        store: &'a dyn DocumentStore,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// Assemble a document from one row. Total and non-failing: every
    /// degradation is logged and replaced by a safe default.
    pub fn assemble(
        &self,
        row: &Row,
        location: &Location,
        taxonomy: &mut TaxonomyStore,
        registry: &mut SlugRegistry,
    ) -> Document {
        let text = row.get(fields::TEXT);

        let raw_date = row.get(fields::PUBLISHED_DATE);
        let (published_at, date_defaulted) = match parse_published_date(raw_date) {
            DateOutcome::Parsed(parsed) => (parsed, false),
            DateOutcome::Unparseable => {
                warn!(
                    location = location.as_str(),
                    raw = raw_date,
                    "unparseable published date, falling back to processing time"
                );
                (Utc::now(), true)
            }
        };

        let title_raw = extract_title(text, self.config.max_title_len);
        let title = sanitize(&title_raw);
        let slug = slugify(&title_raw, self.config.max_slug_len);
        registry.record(slug.clone(), title_raw, location.clone());

        let derived = self.derive_tags(clean_tags(row.get(fields::TAGS)), text);
        for tag in &derived {
            taxonomy.register(tag);
        }

        let mut description = sanitize(text);
        truncate_chars(&mut description, self.config.max_description_len);

        let image_path = row
            .value(fields::IMAGE_SHARED)
            .and_then(|url| self.localize_media(url, &slug, location));

        let engagement = Engagement {
            views: parse_count(row, fields::VIEWS),
            likes: parse_count(row, fields::LIKES),
            comments: parse_count(row, fields::COMMENTS),
            shares: parse_count(row, fields::SHARES),
        };

        debug!(location = location.as_str(), slug = slug.as_str(), "assembled document");
        Document {
            slug,
            title,
            author_id: self.config.author_id.clone(),
            tags: derived,
            description,
            image_path,
            published_at,
            date_defaulted,
            text: text.to_string(),
            source_url: row.get(fields::URL).to_string(),
            engagement,
        }
    }

    /// User tags plus the provenance tag plus keyword-derived tags, in that
    /// order, deduplicated first-seen and capped. Later-appended tags are
    /// dropped first when over the cap.
    fn derive_tags(&self, user_tags: Vec<TagKey>, text: &str) -> Vec<TagKey> {
        let lowered = text.to_lowercase();
        let mut ordered: IndexSet<TagKey> = user_tags.into_iter().collect();
        ordered.insert(self.config.provenance_tag.clone());
        for (needles, tag) in tags::KEYWORD_RULES {
            if needles.iter().any(|needle| lowered.contains(needle)) {
                ordered.insert((*tag).to_string());
            }
        }
        ordered.into_iter().take(self.config.max_tags).collect()
    }

    /// Fetch a shared image and record its localized site path.
    ///
    /// Any failure along the way (malformed URL, fetch, write) degrades to
    /// `None` with a warning; it never aborts assembly.
    fn localize_media(&self, url: &str, slug: &str, location: &Location) -> Option<String> {
        if !url.contains("http") {
            warn!(
                location = location.as_str(),
                url = url,
                "skipping malformed image URL"
            );
            return None;
        }
        let extension = match media::extension_for(url) {
            Some(extension) => extension,
            None => {
                warn!(
                    location = location.as_str(),
                    url = url,
                    "no usable image extension, defaulting"
                );
                media::extension_or_default(url)
            }
        };
        let file_name = media::local_file_name(&self.config.provenance_tag, slug, &extension);
        let bytes = match self.fetcher.fetch(url) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(location = location.as_str(), %err, "image fetch failed, continuing without image");
                return None;
            }
        };
        let target = self.config.images_dir.join(&file_name);
        if let Err(err) = self.store.write(&target, &bytes) {
            warn!(location = location.as_str(), %err, "image write failed, continuing without image");
            return None;
        }
        Some(format!("{}/{}", self.config.site_image_root, file_name))
    }
}

/// Truncate a string to at most `max` characters on a char boundary.
fn truncate_chars(text: &mut String, max: usize) {
    if let Some((index, _)) = text.char_indices().nth(max) {
        text.truncate(index);
        while text.ends_with(' ') {
            text.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn dates_parse_with_and_without_offset() {
        let with_offset = parse_published_date("2024-05-04 09:30:00+0200");
        match with_offset {
            DateOutcome::Parsed(parsed) => {
                assert_eq!(parsed.to_rfc3339(), "2024-05-04T07:30:00+00:00");
            }
            DateOutcome::Unparseable => panic!("offset form should parse"),
        }

        let bare = parse_published_date("2024-05-04 09:30:00");
        assert!(matches!(bare, DateOutcome::Parsed(parsed) if parsed.year() == 2024));
        assert_eq!(parse_published_date("not-a-date"), DateOutcome::Unparseable);
    }

    #[test]
    fn title_is_the_first_sentence_without_terminator() {
        assert_eq!(extract_title("Hello world. More text.", 70), "Hello world");
        assert_eq!(extract_title("Shipping!? Now.", 70), "Shipping!");
        assert_eq!(extract_title("No boundary here", 70), "No boundary here");
        // a terminator at end-of-text is not a boundary
        assert_eq!(extract_title("Just one sentence.", 70), "Just one sentence.");
    }

    #[test]
    fn long_first_sentences_truncate_to_exactly_max_len() {
        let sentence = "x".repeat(90);
        let title = extract_title(&sentence, 70);
        assert_eq!(title.chars().count(), 70);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn tiny_title_caps_do_not_panic() {
        let sentence = "x".repeat(10);
        assert_eq!(extract_title(&sentence, 2), "...");
        assert_eq!(extract_title(&sentence, 0), "...");
    }

    #[test]
    fn sanitize_enforces_the_allow_list() {
        assert_eq!(
            sanitize("He said \"hi\" — `really`?\nYes."),
            "He said hi really? Yes."
        );
        assert_eq!(sanitize("keep (this), drop <that>"), "keep (this), drop that");
    }

    #[test]
    fn clean_tags_strips_markers_and_honors_the_sentinel() {
        assert_eq!(clean_tags("#AI #Growth"), vec!["ai", "growth"]);
        assert_eq!(clean_tags("NA"), Vec::<TagKey>::new());
        assert_eq!(clean_tags("   "), Vec::<TagKey>::new());
        assert_eq!(clean_tags("# #solo"), vec!["solo"]);
    }

    #[test]
    fn counts_degrade_to_zero() {
        let mut row = Row::new();
        row.set(fields::VIEWS, "NA");
        row.set(fields::LIKES, "oops");
        row.set(fields::COMMENTS, "12");
        assert_eq!(parse_count(&row, fields::VIEWS), 0);
        assert_eq!(parse_count(&row, fields::LIKES), 0);
        assert_eq!(parse_count(&row, fields::COMMENTS), 12);
        assert_eq!(parse_count(&row, fields::SHARES), 0);
    }

    #[test]
    fn truncate_chars_cuts_on_char_boundaries() {
        let mut text = "héllo wörld".to_string();
        truncate_chars(&mut text, 7);
        assert_eq!(text, "héllo w");
        let mut short = "abc".to_string();
        truncate_chars(&mut short, 10);
        assert_eq!(short, "abc");
    }
}
