/// Data layer: core types, loading, selection and lookup.
///
/// Architecture:
/// ```text
///  roster (.csv/.json/.parquet)      summary_stats*.csv      regions.geojson
///        │                                  │                      │
///        ▼                                  ▼                      ▼
///   ┌──────────┐                      ┌──────────┐           ┌──────────┐
///   │  loader   │ → Vec<Team>         │  loader   │ → Stats  │  loader   │ → shapes
///   └──────────┘                      └──────────┘   Table    └──────────┘
///        │                                  │
///        ▼                                  │
///   ┌───────────┐  labels, regions,         │
///   │ selection  │  decorations             │
///   └───────────┘                           │
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐  selected labels    ┌──────────┐
///   │  filter   │ ─────────────────▶ │  stats    │ → Projection + missing
///   └──────────┘                     └──────────┘
/// ```

pub mod distribution;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod selection;
pub mod stats;
