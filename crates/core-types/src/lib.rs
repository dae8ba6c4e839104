pub mod enums;
pub mod error;
pub mod filter;
pub mod record;

// Re-export the core types to provide a clean public API.
pub use enums::{GroupKey, RiskLevel, ViewMode, HIGH_RISK_THRESHOLD};
pub use error::CoreError;
pub use filter::{Facets, FilterState};
pub use record::{EnrichedRecord, Record};
