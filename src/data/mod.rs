//! Data layer: seed table types, loading, and prescale views.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet      (fetched once if missing)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SeedTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ SeedTable │  Vec<SeedRow>, headers
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  prescale ≥ 1 / prescale > 1 views
//!   └──────────┘
//! ```

pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
