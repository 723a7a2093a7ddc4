/// Data layer: core types, loading, and slicing.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of CellValue, row-aligned
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  group column == value → slice, distinct values, bounds
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
