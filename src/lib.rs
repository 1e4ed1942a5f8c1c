#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Row-to-document assembly: titles, tags, dates, engagement, media.
pub mod assembler;
/// Batch orchestration: convert, organize, and duplicate-slug fixing.
pub mod batch;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants used across assembly, slugging, and filing.
pub mod constants;
/// Canonical document type plus metadata-block rendering and parsing.
pub mod document;
/// Chronological year/month filing.
pub mod filer;
/// Media fetcher seam and local naming policy for fetched images.
pub mod media;
/// Source row records and the tabular reader seam.
pub mod row;
/// Slug generation and the corpus-wide slug registry.
pub mod slugs;
/// Document writer seam and the filesystem-backed store.
pub mod store;
/// Controlled tag vocabulary with YAML persistence.
pub mod taxonomy;
/// Shared type aliases.
pub mod types;

mod errors;

pub use assembler::{parse_published_date, DateOutcome, DocumentAssembler};
pub use batch::{BatchOutcome, BatchRunner, SlugFix};
pub use config::PipelineConfig;
pub use document::{parse_frontmatter, rewrite_slug, Document, Engagement, Frontmatter};
pub use errors::PipelineError;
pub use filer::{ChronologicalBucket, ChronologicalFiler};
pub use media::{InMemoryFetcher, MediaFetchError, MediaFetcher};
pub use row::{InMemoryRowSource, Row, RowSource};
pub use slugs::{slugify, SlugRegistry, SlugUse};
pub use store::{DocumentStore, FsDocumentStore};
pub use taxonomy::{TagEntry, TaxonomyStore};
pub use types::{Location, Slug, TagKey};
