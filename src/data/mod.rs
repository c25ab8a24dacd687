/// Data layer: core types, loading, statistics and chart models.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text, infer dtypes → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  typed columns, numeric / categorical partition
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  charts   │  (Dataset, selection) → Panel<chart>
///   └──────────┘   └──────────┘
/// ```

pub mod charts;
pub mod loader;
pub mod model;
pub mod stats;
