/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  Results.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse header + body, expand vector fields
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ResultsTable  │  rows of rounded scalars, naming metadata
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  intersect per-parameter ranges → selected rows
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
