//! # SkyCity Dataset Crate
//!
//! This crate owns the only I/O of the system: reading the restaurant CSV
//! once, enriching it, and keeping it in memory for every later interaction.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** Encapsulates the file format. The rest of the
//!   application sees `Record`s and `EnrichedRecord`s, never CSV.
//! - **Fail Loudly at Load:** A missing file or missing column is an error with
//!   a descriptive message, never a silently empty dashboard.
//! - **Explicit Memoization:** `DatasetCache` reuses the enriched dataset until
//!   the file's fingerprint changes or the cache is invalidated.
//!
//! ## Public API
//!
//! - `load_records` / `load_records_file`: parse a CSV into `Record`s.
//! - `DatasetCache`: memoized load + enrich, keyed by path, mtime and length.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod error;
pub mod loader;

// Re-export the key components to create a clean, public-facing API.
pub use cache::{DatasetCache, LoadedDataset, SourceFingerprint};
pub use error::DatasetError;
pub use loader::{load_records, load_records_file, REQUIRED_COLUMNS};
