use crate::error::CoreError;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregator dependence above this fraction flags a restaurant as high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Binary classification of a restaurant's reliance on aggregator channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    HighRisk,
    Healthy,
}

impl RiskLevel {
    /// Classifies an aggregator dependence ratio. The comparison is strict,
    /// so exactly 0.70 is `Healthy`, and NaN is never high risk.
    pub fn from_dependence(aggregator_dependence: f64) -> Self {
        if aggregator_dependence > HIGH_RISK_THRESHOLD {
            RiskLevel::HighRisk
        } else {
            RiskLevel::Healthy
        }
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(self, RiskLevel::HighRisk)
    }

    /// Human-facing label used by the terminal and chart surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::HighRisk => "High Risk 🔴",
            RiskLevel::Healthy => "Healthy 🟢",
        }
    }
}

/// Which comparison the channel panel of the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    OverallChannelMix,
    InStoreVsDeliveryComparison,
}

impl FromStr for ViewMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overall" | "mix" | "overall-channel-mix" => Ok(ViewMode::OverallChannelMix),
            "comparison" | "delivery" | "in-store-vs-delivery" => {
                Ok(ViewMode::InStoreVsDeliveryComparison)
            }
            other => Err(CoreError::InvalidInput(
                "view mode".to_string(),
                format!("'{other}' (expected 'overall' or 'comparison')"),
            )),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::OverallChannelMix => write!(f, "Overall Channel Mix"),
            ViewMode::InStoreVsDeliveryComparison => write!(f, "In-Store vs. Delivery Comparison"),
        }
    }
}

/// The categorical columns a dataset can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    Subregion,
    CuisineType,
    Segment,
}

impl GroupKey {
    /// Extracts this key's value from a record.
    pub fn of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            GroupKey::Subregion => &record.subregion,
            GroupKey::CuisineType => &record.cuisine_type,
            GroupKey::Segment => &record.segment,
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            GroupKey::Subregion => "Subregion",
            GroupKey::CuisineType => "CuisineType",
            GroupKey::Segment => "Segment",
        }
    }
}
