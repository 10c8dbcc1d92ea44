/// Data layer: core types, loading, and per-series transforms.
///
/// Architecture:
/// ```text
///   *.xy (angle  intensity)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Series>, selection order
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  normalize → smooth (per render)
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod transform;
