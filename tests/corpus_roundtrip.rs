use std::path::Path;

use tempfile::tempdir;

use postpress::{
    parse_frontmatter, BatchRunner, DocumentStore, FsDocumentStore, InMemoryFetcher,
    InMemoryRowSource, PipelineConfig, Row, TaxonomyStore,
};

fn post_row() -> Row {
    let mut row = Row::new();
    row.set(
        "TEXT",
        "Ontology work pays off. Our knowledge graph keeps every definition in one place, \
         and the team ships faster because of it.",
    );
    row.set("PUBLISHED_DATE", "2024-05-04 09:30:00+0000");
    row.set("TAGS", "#KnowledgeGraph");
    row.set("IMAGE_SHARED", "NA");
    row.set("VIEWS", "250");
    row.set("LIKES", "12");
    row.set("COMMENTS", "3");
    row.set("SHARES", "1");
    row.set("URL", "https://example.com/posts/kg");
    row
}

#[test]
fn persisted_documents_round_trip_their_metadata() {
    let dir = tempdir().unwrap();
    let store = FsDocumentStore::new(dir.path());
    let fetcher = InMemoryFetcher::default();
    let runner = BatchRunner::new(PipelineConfig::default(), &store, &fetcher);
    let mut source = InMemoryRowSource::new("export", vec![post_row()]);

    runner.convert(&mut source).unwrap();

    let raw = store
        .read(Path::new("blog/2024-05-04-ontology-work-pays-off.md"))
        .unwrap();
    let content = std::str::from_utf8(&raw).unwrap();
    let frontmatter = parse_frontmatter(content).unwrap();

    assert_eq!(frontmatter.slug, "ontology-work-pays-off");
    assert_eq!(frontmatter.authors, vec!["jravenel".to_string()]);
    // keyword-derived tag from the ontology family, provenance always present
    assert_eq!(frontmatter.tags, vec!["knowledgegraph", "linkedin", "ontology"]);
    assert!(frontmatter.description.len() <= 140);
    assert!(frontmatter.description.starts_with("Ontology work pays off."));
    assert!(content.contains("Views: 250"));
}

#[test]
fn taxonomy_is_persisted_sorted_and_reloaded_by_the_next_batch() {
    let dir = tempdir().unwrap();
    let store = FsDocumentStore::new(dir.path());
    let fetcher = InMemoryFetcher::default();
    let runner = BatchRunner::new(PipelineConfig::default(), &store, &fetcher);

    let mut source = InMemoryRowSource::new("export", vec![post_row()]);
    runner.convert(&mut source).unwrap();

    let raw = store.read(Path::new("blog/tags.yml")).unwrap();
    let persisted = TaxonomyStore::parse(std::str::from_utf8(&raw).unwrap()).unwrap();
    assert!(persisted.contains("knowledgegraph"));
    assert!(persisted.contains("linkedin"));
    assert!(persisted.contains("ontology"));
    let entry = persisted.get("knowledgegraph").unwrap();
    assert_eq!(entry.label, "Knowledgegraph");
    assert_eq!(entry.description, "Content related to Knowledgegraph");

    // sorted deterministically by key
    let rendered = std::str::from_utf8(&raw).unwrap();
    let knowledge_at = rendered.find("knowledgegraph:").unwrap();
    let linkedin_at = rendered.find("linkedin:").unwrap();
    let ontology_at = rendered.find("ontology:").unwrap();
    assert!(knowledge_at < linkedin_at && linkedin_at < ontology_at);

    // a second batch reloads the same definitions and leaves them intact
    let mut source = InMemoryRowSource::new("export", vec![post_row()]);
    runner.convert(&mut source).unwrap();
    let raw_again = store.read(Path::new("blog/tags.yml")).unwrap();
    assert_eq!(raw, raw_again);
}

#[test]
fn missing_taxonomy_file_is_recoverable() {
    let dir = tempdir().unwrap();
    let store = FsDocumentStore::new(dir.path());
    let loaded = TaxonomyStore::load(&store, Path::new("blog/tags.yml"));
    assert!(loaded.is_empty());
}

#[test]
fn malformed_taxonomy_file_is_recoverable() {
    let dir = tempdir().unwrap();
    let store = FsDocumentStore::new(dir.path());
    store
        .write(Path::new("blog/tags.yml"), b"not: [valid yaml")
        .unwrap();
    let loaded = TaxonomyStore::load(&store, Path::new("blog/tags.yml"));
    assert!(loaded.is_empty());
}

#[test]
fn convert_then_organize_files_documents_into_buckets() {
    let dir = tempdir().unwrap();
    let store = FsDocumentStore::new(dir.path());
    let fetcher = InMemoryFetcher::default();
    let runner = BatchRunner::new(PipelineConfig::default(), &store, &fetcher);
    let mut source = InMemoryRowSource::new("export", vec![post_row()]);
    runner.convert(&mut source).unwrap();

    let placed = runner.organize().unwrap();
    assert_eq!(
        placed,
        vec![Path::new("blog/2024/05/2024-05-04-ontology-work-pays-off/index.md").to_path_buf()]
    );

    // the bucketed copy is byte-identical to the flat original
    let flat = store
        .read(Path::new("blog/2024-05-04-ontology-work-pays-off.md"))
        .unwrap();
    let bucketed = store.read(&placed[0]).unwrap();
    assert_eq!(flat, bucketed);

    // organizing again changes nothing
    let placed_again = runner.organize().unwrap();
    assert_eq!(placed, placed_again);
    assert_eq!(store.read(&placed[0]).unwrap(), bucketed);
}
