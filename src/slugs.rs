//! Slug generation and the corpus-wide slug registry.
//!
//! Collisions are expected: long titles truncate to short common prefixes.
//! The registry therefore appends and reports, never overwrites; renaming is
//! a separate, explicit operation so published identifiers never change
//! silently.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::constants::slugs::MAX_SLUG_LEN;
use crate::types::{Location, Slug};

/// Derive a URL-safe slug from free text.
///
/// Lowercases, folds common accented Latin characters to ASCII, collapses
/// everything else into single hyphens, and hard-truncates at `max_len`
/// characters. Truncation may cut mid-word; a trailing hyphen left by the
/// cut is trimmed.
pub fn slugify(title: &str, max_len: usize) -> Slug {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen {
                out.push('-');
                pending_hyphen = false;
            }
            out.push(ch);
            continue;
        }
        let folded = fold_ascii(ch);
        if folded.is_empty() {
            pending_hyphen = !out.is_empty();
        } else {
            if pending_hyphen {
                out.push('-');
                pending_hyphen = false;
            }
            out.push_str(folded);
        }
    }
    truncate_slug(out, max_len)
}

/// `slugify` with the default 50-character cap.
pub fn slugify_default(title: &str) -> Slug {
    slugify(title, MAX_SLUG_LEN)
}

fn truncate_slug(mut slug: Slug, max_len: usize) -> Slug {
    if slug.len() > max_len {
        // slug is ASCII by construction, so byte truncation is safe
        slug.truncate(max_len);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// ASCII fold for the common accented Latin range; everything unknown maps
/// to the empty string and acts as a word separator.
fn fold_ascii(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => "",
    }
}

/// One recorded use of a slug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlugUse {
    /// Title the slug was derived from, before sanitization.
    pub title: String,
    /// Where the use came from (row position or relative path).
    pub location: Location,
}

/// Tracks every slug handed out, in first-seen order.
///
/// Grows monotonically during a run; entries are never removed or
/// overwritten, so the duplicate query is a pure read over accumulated
/// state.
#[derive(Clone, Debug, Default)]
pub struct SlugRegistry {
    entries: IndexMap<Slug, Vec<SlugUse>>,
}

impl SlugRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a use of `slug`; never overwrites prior entries.
    pub fn record(
        &mut self,
        slug: impl Into<Slug>,
        title: impl Into<String>,
        location: impl Into<Location>,
    ) {
        self.entries.entry(slug.into()).or_default().push(SlugUse {
            title: title.into(),
            location: location.into(),
        });
    }

    /// Number of distinct slugs recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slugs recorded more than once, in first-seen order.
    pub fn duplicates(&self) -> impl Iterator<Item = (&Slug, &[SlugUse])> {
        self.entries
            .iter()
            .filter(|(_, uses)| uses.len() >= 2)
            .map(|(slug, uses)| (slug, uses.as_slice()))
    }

    /// Deterministic rename for the `occurrence`-th member of a duplicate
    /// group (0-based over the group's recorded order).
    ///
    /// The first-seen document keeps the bare slug; each subsequent one gets
    /// `{slug}-{occurrence}`, so the second occurrence becomes `{slug}-1`.
    pub fn resolve_conflict(slug: &str, occurrence: usize) -> Slug {
        if occurrence == 0 {
            slug.to_string()
        } else {
            format!("{slug}-{occurrence}")
        }
    }

    /// Operator-facing summary of every slug used by more than one title,
    /// or `None` when all slugs are unique.
    pub fn render_duplicate_report(&self) -> Option<String> {
        let mut report = String::new();
        for (slug, uses) in self.duplicates() {
            let _ = writeln!(report, "slug '{slug}' is used by {} posts:", uses.len());
            for (rank, used) in uses.iter().enumerate() {
                let _ = writeln!(
                    report,
                    "  {}. '{}' ({})",
                    rank + 1,
                    used.title,
                    used.location
                );
            }
        }
        if report.is_empty() {
            None
        } else {
            Some(format!(
                "found duplicate slugs that may cause routing conflicts:\n{report}"
            ))
        }
    }
}
