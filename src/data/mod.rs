/// Data layer: core types, loading, and queries.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, sites, payload bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  (site, payload range) → breakdown / correlation
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod query;
