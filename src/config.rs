use std::path::PathBuf;

use crate::constants::{descriptions, documents, layout, slugs, tags, titles};

/// Top-level pipeline configuration.
///
/// Defaults mirror the site layout the pipeline was built for; every knob can
/// be overridden for tests or alternative deployments.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Author id recorded in every document's metadata block.
    pub author_id: String,
    /// Provenance tag appended to every document, and prefix for localized
    /// media filenames.
    pub provenance_tag: String,
    /// Directory holding persisted documents, relative to the site root.
    pub blog_dir: PathBuf,
    /// Persisted taxonomy file, relative to the site root.
    pub taxonomy_path: PathBuf,
    /// Directory where fetched media lands, relative to the site root.
    pub images_dir: PathBuf,
    /// Absolute-from-site-root prefix used when referencing fetched media.
    pub site_image_root: String,
    /// Maximum tags per document after dedup.
    pub max_tags: usize,
    /// Maximum slug length in characters.
    pub max_slug_len: usize,
    /// Maximum extracted title length in characters.
    pub max_title_len: usize,
    /// Maximum description length in characters.
    pub max_description_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            author_id: documents::DEFAULT_AUTHOR_ID.to_string(),
            provenance_tag: tags::PROVENANCE_TAG.to_string(),
            blog_dir: PathBuf::from(layout::BLOG_DIR),
            taxonomy_path: PathBuf::from(layout::TAXONOMY_PATH),
            images_dir: PathBuf::from(layout::IMAGES_DIR),
            site_image_root: layout::SITE_IMAGE_ROOT.to_string(),
            max_tags: tags::MAX_TAGS,
            max_slug_len: slugs::MAX_SLUG_LEN,
            max_title_len: titles::MAX_TITLE_LEN,
            max_description_len: descriptions::MAX_DESCRIPTION_LEN,
        }
    }
}
