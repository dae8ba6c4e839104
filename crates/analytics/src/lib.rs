//! # SkyCity Metrics Engine
//!
//! This crate turns loaded restaurant rows into the numbers the dashboard shows:
//! derived risk columns, headline KPIs, grouped channel means, the high-risk
//! panel and the profit gap.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   HTTP or terminals. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` keeps no state between calls.
//!   Every filter change is a full recomputation over the in-memory rows.
//! - **Degenerate, not failing:** Empty selections and missing cells produce
//!   zeros, empty maps or NaN. No operation in this crate returns an error.
//!
//! ## Public API
//!
//! - `MetricsEngine`: enrich, filter, summarize, group and rank rows.
//! - `DashboardReport` and its parts: the serializable output of a full pass.
//! - `display`: boundary formatting for KPI values.

// Declare the modules that constitute this crate.
pub mod display;
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use report::{
    ChannelShares, ChannelView, DashboardReport, DeliverySplit, KpiSummary, RiskEntry,
};
