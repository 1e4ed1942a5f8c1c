//! Batch orchestration: convert, organize, and duplicate-slug fixing.
//!
//! A batch is single-threaded and sequential: rows are processed in source
//! order, slug registration and taxonomy mutation happen through state
//! threaded into each assembly call, and the taxonomy is persisted exactly
//! once after the last row. Duplicate slugs are reported by `convert` but
//! only renamed by the explicit `fix_duplicates` operation, so published
//! identifiers never change silently.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::assembler::DocumentAssembler;
use crate::config::PipelineConfig;
use crate::document::{parse_frontmatter, rewrite_slug};
use crate::errors::PipelineError;
use crate::media::MediaFetcher;
use crate::row::RowSource;
use crate::slugs::SlugRegistry;
use crate::store::DocumentStore;
use crate::taxonomy::TaxonomyStore;
use crate::types::Slug;

/// Summary of one conversion batch.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Documents written to the store.
    pub documents_written: usize,
    /// Rows whose published date fell back to the processing time.
    pub defaulted_dates: usize,
    /// Operator-facing duplicate-slug summary, when any slug collided.
    pub duplicate_report: Option<String>,
}

/// One rename applied by `fix_duplicates`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlugFix {
    /// Rewritten document, relative to the store root.
    pub path: PathBuf,
    /// Slug the document previously carried.
    pub old_slug: Slug,
    /// Unique slug it carries now.
    pub new_slug: Slug,
}

/// Drives full pipeline runs over the external seams.
pub struct BatchRunner<'a> {
    config: PipelineConfig,
    store: &'a dyn DocumentStore,
    fetcher: &'a dyn MediaFetcher,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner over the given seams.
    pub fn new(
        config: PipelineConfig,
        store: &'a dyn DocumentStore,
        fetcher: &'a dyn MediaFetcher,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convert every row of `source` into a flat document.
    ///
    /// Taxonomy state is loaded once up front and persisted once after the
    /// last row; the duplicate report covers every slug this batch handed
    /// out. Store failures abort the batch before taxonomy persistence or
    /// reporting claim success.
    pub fn convert(&self, source: &mut dyn RowSource) -> Result<BatchOutcome, PipelineError> {
        let mut taxonomy = TaxonomyStore::load(self.store, &self.config.taxonomy_path);
        let mut registry = SlugRegistry::new();
        let assembler = DocumentAssembler::new(&self.config, self.fetcher, self.store);

        let mut outcome = BatchOutcome::default();
        let mut row_number = 0usize;
        while let Some(row) = source.next_row()? {
            row_number += 1;
            let location = format!("row {row_number}");
            let document = assembler.assemble(&row, &location, &mut taxonomy, &mut registry);
            if document.date_defaulted {
                outcome.defaulted_dates += 1;
            }
            let target = self.config.blog_dir.join(document.file_name());
            self.store.write(&target, document.render().as_bytes())?;
            outcome.documents_written += 1;
        }

        taxonomy.persist(self.store, &self.config.taxonomy_path)?;
        outcome.duplicate_report = registry.render_duplicate_report();
        if let Some(report) = &outcome.duplicate_report {
            warn!("{report}");
        }
        info!(
            source = source.id(),
            documents = outcome.documents_written,
            tags = taxonomy.len(),
            defaulted_dates = outcome.defaulted_dates,
            "conversion complete"
        );
        Ok(outcome)
    }

    /// File every eligible flat document into its year/month bucket.
    pub fn organize(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let filer = crate::filer::ChronologicalFiler::new(self.store, self.config.blog_dir.clone());
        let placed = filer.organize()?;
        info!(placed = placed.len(), "organize complete");
        Ok(placed)
    }

    /// Build a slug registry from the whole persisted corpus, in pinned
    /// (lexicographic path) order.
    ///
    /// This is the cross-corpus view: it sees documents written by earlier
    /// batches, not just the current one.
    pub fn scan_registry(&self) -> Result<SlugRegistry, PipelineError> {
        let mut registry = SlugRegistry::new();
        for path in self.store.list_markdown(&self.config.blog_dir)? {
            let raw = self.store.read(&path)?;
            match parse_frontmatter(&String::from_utf8_lossy(&raw)) {
                Some(frontmatter) => {
                    registry.record(
                        frontmatter.slug,
                        frontmatter.title,
                        path.to_string_lossy().into_owned(),
                    );
                }
                None => {
                    warn!(path = %path.display(), "no parseable metadata block, skipping");
                }
            }
        }
        Ok(registry)
    }

    /// Rename every duplicate slug across the corpus, deterministically.
    ///
    /// Groups are scanned in pinned path order; the first document keeps
    /// the bare slug, each subsequent one is rewritten in place with a
    /// `-1`, `-2`, … suffix. Re-running on the renamed corpus is a no-op.
    pub fn fix_duplicates(&self) -> Result<Vec<SlugFix>, PipelineError> {
        let registry = self.scan_registry()?;
        let groups: Vec<(Slug, Vec<String>)> = registry
            .duplicates()
            .map(|(slug, uses)| {
                let locations = uses.iter().map(|used| used.location.clone()).collect();
                (slug.clone(), locations)
            })
            .collect();

        let mut fixes = Vec::new();
        for (slug, locations) in groups {
            for (occurrence, location) in locations.iter().enumerate().skip(1) {
                let new_slug = SlugRegistry::resolve_conflict(&slug, occurrence);
                let path = PathBuf::from(location);
                let raw = self.store.read(&path)?;
                let content = String::from_utf8_lossy(&raw).into_owned();
                match rewrite_slug(&content, &new_slug) {
                    Some(rewritten) => {
                        self.store.write(&path, rewritten.as_bytes())?;
                        info!(
                            path = %path.display(),
                            old = slug.as_str(),
                            new = new_slug.as_str(),
                            "rewrote duplicate slug"
                        );
                        fixes.push(SlugFix {
                            path,
                            old_slug: slug.clone(),
                            new_slug,
                        });
                    }
                    None => {
                        warn!(path = %path.display(), "slug line not found, leaving file unchanged");
                    }
                }
            }
        }
        Ok(fixes)
    }
}
