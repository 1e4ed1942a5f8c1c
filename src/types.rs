/// Canonical lowercase tag key, unique within the taxonomy.
/// Examples: `ai`, `data-products`
pub type TagKey = String;
/// Display label for a tag.
/// Example: `Data Products`
pub type TagLabel = String;
/// URL-safe document identifier derived from a title.
/// Example: `announcing-our-new-product`
pub type Slug = String;
/// Human-readable origin of a slug use (a row position or a relative path).
/// Examples: `row 12`, `blog/2024-05-04-hello-world.md`
pub type Location = String;
