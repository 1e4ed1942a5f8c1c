//! Centralized constants used across assembly, slugging, filing, and
//! taxonomy persistence.

/// Constants naming the input record fields and the absent-value sentinel.
pub mod fields {
    /// Post body text column.
    pub const TEXT: &str = "TEXT";
    /// Publication timestamp column.
    pub const PUBLISHED_DATE: &str = "PUBLISHED_DATE";
    /// Whitespace-separated hashtag column.
    pub const TAGS: &str = "TAGS";
    /// Shared image URL column.
    pub const IMAGE_SHARED: &str = "IMAGE_SHARED";
    /// View count column.
    pub const VIEWS: &str = "VIEWS";
    /// Like count column.
    pub const LIKES: &str = "LIKES";
    /// Comment count column.
    pub const COMMENTS: &str = "COMMENTS";
    /// Share count column.
    pub const SHARES: &str = "SHARES";
    /// Source post URL column.
    pub const URL: &str = "URL";
    /// Literal token meaning "field intentionally absent".
    pub const ABSENT_SENTINEL: &str = "NA";
}

/// Constants bounding slug generation.
pub mod slugs {
    /// Maximum slug length in characters; truncation may cut mid-word.
    pub const MAX_SLUG_LEN: usize = 50;
}

/// Constants bounding title extraction.
pub mod titles {
    /// Maximum extracted title length in characters, ellipsis included.
    pub const MAX_TITLE_LEN: usize = 70;
    /// Marker appended when a first sentence is truncated.
    pub const ELLIPSIS: &str = "...";
}

/// Constants bounding description extraction.
pub mod descriptions {
    /// Maximum description length in characters after sanitization.
    pub const MAX_DESCRIPTION_LEN: usize = 140;
}

/// Constants governing tag derivation and taxonomy labels.
pub mod tags {
    /// Maximum tags per document after dedup; later-appended tags are dropped.
    pub const MAX_TAGS: usize = 5;
    /// Provenance tag appended to every assembled document.
    pub const PROVENANCE_TAG: &str = "linkedin";
    /// Ordered keyword-family rules evaluated against the lowercased post
    /// text. When any needle occurs as a substring, the tag is appended.
    pub const KEYWORD_RULES: &[(&[&str], &str)] = &[
        (&["ai", "artificial intelligence"], "ai"),
        (&["ontology", "ontologies"], "ontology"),
    ];
}

/// Constants governing fetched-media naming.
pub mod media {
    /// Extension used when a URL carries none or an implausible one.
    pub const DEFAULT_EXTENSION: &str = "jpg";
    /// Longest accepted extension, in characters after the dot.
    pub const MAX_EXTENSION_LEN: usize = 4;
}

/// Constants governing document layout and body rendering.
pub mod documents {
    /// Author id recorded in every metadata block.
    pub const DEFAULT_AUTHOR_ID: &str = "jravenel";
    /// Summary-cut marker inserted after the post text.
    pub const TRUNCATE_MARKER: &str = "<!-- truncate -->";
    /// Extension for persisted documents.
    pub const DOCUMENT_EXTENSION: &str = "md";
}

/// Default relative layout of the persisted site.
pub mod layout {
    /// Directory holding flat and organized documents.
    pub const BLOG_DIR: &str = "blog";
    /// Persisted taxonomy file, relative to the site root.
    pub const TAXONOMY_PATH: &str = "blog/tags.yml";
    /// Directory where fetched media lands, relative to the site root.
    pub const IMAGES_DIR: &str = "static/img/blog/linkedin";
    /// Absolute-from-site-root prefix used when referencing fetched media.
    pub const SITE_IMAGE_ROOT: &str = "/img/blog/linkedin";
}
