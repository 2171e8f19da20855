/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  local .csv  /  https:// CSV export
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read CSV, trim headers, resolve columns → VerseDataset
///   └──────────┘   (CachedLoader: once per process)
///        │
///        ▼
///   ┌──────────────┐
///   │ VerseDataset │  Vec<Verse>, category index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category + topics → matching indices, cascading topic list
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
