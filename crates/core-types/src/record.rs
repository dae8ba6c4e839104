use crate::enums::RiskLevel;
use serde::{Deserialize, Serialize};

/// One restaurant or bar from the source dataset.
///
/// Numeric fields are `f64` so that missing cells can be carried as NaN
/// instead of aborting a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub subregion: String,
    pub cuisine_type: String,
    pub segment: String,

    pub monthly_orders: f64,
    pub average_order_value: f64,

    // Channel shares of order volume, each nominally in [0, 1].
    pub in_store_share: f64,
    pub uber_eats_share: f64,
    pub door_dash_share: f64,
    pub self_delivery_share: f64,

    pub in_store_revenue: f64,
    pub uber_eats_revenue: f64,
    pub door_dash_revenue: f64,
    pub self_delivery_revenue: f64,

    pub in_store_net_profit: f64,
    pub uber_eats_net_profit: f64,

    pub growth_factor: f64,
}

impl Record {
    /// Fraction of order volume routed through the two aggregators.
    pub fn aggregator_dependence(&self) -> f64 {
        self.uber_eats_share + self.door_dash_share
    }

    /// Fraction of order volume fulfilled by any delivery channel.
    pub fn total_delivery_share(&self) -> f64 {
        self.uber_eats_share + self.door_dash_share + self.self_delivery_share
    }

    /// Net profit forgone per order by taking it through Uber Eats instead of in store.
    pub fn profit_gap(&self) -> f64 {
        self.in_store_net_profit - self.uber_eats_net_profit
    }

    pub fn total_revenue(&self) -> f64 {
        self.in_store_revenue
            + self.uber_eats_revenue
            + self.door_dash_revenue
            + self.self_delivery_revenue
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

/// A `Record` plus the columns derived from it at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub aggregator_dependence: f64,
    pub risk_level: RiskLevel,
}

impl EnrichedRecord {
    pub fn from_record(record: Record) -> Self {
        let aggregator_dependence = record.aggregator_dependence();
        Self {
            risk_level: RiskLevel::from_dependence(aggregator_dependence),
            aggregator_dependence,
            record,
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }
}

impl AsRef<Record> for EnrichedRecord {
    fn as_ref(&self) -> &Record {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_shares(ue: f64, dd: f64) -> Record {
        Record {
            name: "Test Kitchen".into(),
            subregion: "CBD".into(),
            cuisine_type: "Asian".into(),
            segment: "QSR".into(),
            monthly_orders: 1000.0,
            average_order_value: 30.0,
            in_store_share: 1.0 - ue - dd,
            uber_eats_share: ue,
            door_dash_share: dd,
            self_delivery_share: 0.0,
            in_store_revenue: 10_000.0,
            uber_eats_revenue: 5_000.0,
            door_dash_revenue: 2_500.0,
            self_delivery_revenue: 0.0,
            in_store_net_profit: 8.5,
            uber_eats_net_profit: 3.0,
            growth_factor: 1.1,
        }
    }

    #[test]
    fn dependence_above_threshold_is_high_risk() {
        let enriched = EnrichedRecord::from_record(record_with_shares(0.40, 0.35));
        assert!((enriched.aggregator_dependence - 0.75).abs() < 1e-12);
        assert_eq!(enriched.risk_level, RiskLevel::HighRisk);
    }

    #[test]
    fn threshold_itself_is_healthy() {
        assert_eq!(RiskLevel::from_dependence(0.70), RiskLevel::Healthy);
        assert_eq!(RiskLevel::from_dependence(0.7000001), RiskLevel::HighRisk);
    }

    #[test]
    fn nan_dependence_is_healthy_and_propagates() {
        let enriched = EnrichedRecord::from_record(record_with_shares(f64::NAN, 0.35));
        assert!(enriched.aggregator_dependence.is_nan());
        assert_eq!(enriched.risk_level, RiskLevel::Healthy);
    }

    #[test]
    fn derived_columns_use_source_fields() {
        let record = record_with_shares(0.2, 0.1);
        assert!((record.total_delivery_share() - 0.3).abs() < 1e-12);
        assert!((record.profit_gap() - 5.5).abs() < 1e-12);
        assert!((record.total_revenue() - 17_500.0).abs() < 1e-9);
    }

    #[test]
    fn enriched_record_serializes_flat() {
        let enriched = EnrichedRecord::from_record(record_with_shares(0.5, 0.3));
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["subregion"], "CBD");
        assert_eq!(json["risk_level"], "HighRisk");
    }
}
