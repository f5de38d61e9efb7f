/// Data layer: table model, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → CustomerTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ CustomerTable │  named columns of CellValue
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │ pipeline │ ───▶ │  filter   │  predicates → TableView (row indices)
///   └──────────┘      └───────────┘
///        │            ┌───────────┐
///        └──────────▶ │ aggregate │  counts / means / histograms per panel
///                     └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
