/// Data layer: core types, CSV loading, and cached access.
///
/// Architecture:
/// ```text
///  Data/processed/*.csv, Data/raw/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + cleaning passes → Dataset / MissingReport
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  one cache slot per input path, explicit invalidation
///   └──────────┘
/// ```
/// Column filtering to the permitted allow-list is NOT done here; that is
/// the configuration model's job so the loaders stay format-agnostic.
pub mod error;
pub mod loader;
pub mod model;
pub mod store;
