//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse rows → Record, drop teams without a seed
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  eligible records, years, metric domains
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  FilterEvent → FilterReducer → FilterState → filtered records
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
