//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv      built-in sample
//!            │                        │
//!            ▼                        │
//!       ┌──────────┐                  │
//!       │  loader   │  parse file ────┤
//!       └──────────┘                  ▼
//!                              ┌───────────┐
//!                              │  Dataset   │  Vec<LaunchRecord>, site index
//!                              └───────────┘
//!                                    │
//!                                    ▼
//!                              ┌──────────┐
//!                              │  filter   │  payload range + site → records
//!                              └──────────┘
//! ```
pub mod filter;
pub mod loader;
pub mod model;
