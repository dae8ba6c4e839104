use core_types::{RiskLevel, ViewMode};
use serde::Serialize;
use std::collections::BTreeMap;

/// The four headline numbers of the dashboard.
///
/// `avg_order_value` is NaN when no row carries a value; it is left that way
/// rather than replaced by a made-up default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub restaurant_count: usize,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub high_risk_count: usize,
    pub avg_order_value: f64,
}

/// Mean share of order volume per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelShares {
    pub in_store: f64,
    pub uber_eats: f64,
    pub door_dash: f64,
    pub self_delivery: f64,
}

impl ChannelShares {
    pub const LABELS: [&'static str; 4] = ["In-Store", "Uber Eats", "DoorDash", "Self-Delivery"];

    pub fn from_array([in_store, uber_eats, door_dash, self_delivery]: [f64; 4]) -> Self {
        Self {
            in_store,
            uber_eats,
            door_dash,
            self_delivery,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.in_store, self.uber_eats, self.door_dash, self.self_delivery]
    }
}

/// In-store share against the combined share of every delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeliverySplit {
    pub in_store_share: f64,
    pub total_delivery_share: f64,
}

/// The channel panel, whose content depends on the selected `ViewMode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "data")]
pub enum ChannelView {
    /// Mean channel shares across every filtered restaurant.
    OverallMix(ChannelShares),
    /// In-store vs. delivery split, keyed by segment.
    DeliveryComparison(BTreeMap<String, DeliverySplit>),
}

/// One row of the strategic risk panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    pub name: String,
    pub subregion: String,
    pub segment: String,
    pub aggregator_dependence: f64,
    pub risk_level: RiskLevel,
}

/// Everything a front end needs to draw the dashboard for one filter selection.
///
/// Serialized as JSON by the web server; NaN values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub view_mode: ViewMode,
    pub kpis: KpiSummary,
    pub channel_view: ChannelView,
    pub cuisine_mix: BTreeMap<String, ChannelShares>,
    pub subregion_heatmap: BTreeMap<String, ChannelShares>,
    pub top_risk: Vec<RiskEntry>,
    /// Mean per-order profit gap between in-store and Uber Eats.
    pub profit_gap: f64,
    /// Mean growth factor per subregion.
    pub growth_index: BTreeMap<String, f64>,
}
