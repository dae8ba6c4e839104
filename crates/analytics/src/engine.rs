use crate::report::{
    ChannelShares, ChannelView, DashboardReport, DeliverySplit, KpiSummary, RiskEntry,
};
use core_types::{EnrichedRecord, FilterState, GroupKey, Record, ViewMode};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Running mean that skips NaN cells, the way a dataframe `mean()` does.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    /// NaN when nothing was pushed.
    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let mut acc = MeanAccumulator::default();
    values.for_each(|v| acc.push(v));
    acc.mean()
}

fn sum_of(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).fold(0.0, |acc, v| acc + v)
}

fn as_enriched<R: Borrow<EnrichedRecord>>(row: &R) -> &EnrichedRecord {
    row.borrow()
}

/// A stateless calculator for the channel and risk metrics of the dashboard.
///
/// Every method is a pure function of its arguments. Aggregating methods take
/// either owned rows or the borrowed rows returned by [`MetricsEngine::filter`].
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `aggregator_dependence` and `risk_level` to each row.
    ///
    /// Accepts already-enriched rows too; their derived columns are recomputed
    /// from the source fields.
    pub fn enrich<R: AsRef<Record>>(&self, rows: &[R]) -> Vec<EnrichedRecord> {
        rows.iter()
            .map(|r| EnrichedRecord::from_record(r.as_ref().clone()))
            .collect()
    }

    /// Keeps the rows whose subregion, cuisine and segment are all selected,
    /// preserving their relative order.
    pub fn filter<'a>(
        &self,
        rows: &'a [EnrichedRecord],
        state: &FilterState,
    ) -> Vec<&'a EnrichedRecord> {
        rows.iter().filter(|r| state.matches(&r.record)).collect()
    }

    pub fn summarize<R: Borrow<EnrichedRecord>>(&self, rows: &[R]) -> KpiSummary {
        let records = || rows.iter().map(|r| &as_enriched(r).record);

        // Float-to-int casts saturate, so a negative or NaN sum cannot wrap.
        let total_orders = sum_of(records().map(|r| r.monthly_orders)) as u64;

        KpiSummary {
            restaurant_count: rows.len(),
            total_orders,
            total_revenue: sum_of(records().map(Record::total_revenue)),
            high_risk_count: rows
                .iter()
                .map(as_enriched)
                .filter(|r| r.is_high_risk())
                .count(),
            avg_order_value: mean_of(records().map(|r| r.average_order_value)),
        }
    }

    /// Mean of each value column per distinct `key`, ordered by key.
    ///
    /// NaN cells are skipped column by column; a column with no values in a
    /// group comes out as NaN. Zero rows produce an empty map.
    pub fn group_aggregate<R, F, const N: usize>(
        &self,
        rows: &[R],
        key: GroupKey,
        values: F,
    ) -> BTreeMap<String, [f64; N]>
    where
        R: Borrow<EnrichedRecord>,
        F: Fn(&EnrichedRecord) -> [f64; N],
    {
        let mut groups: BTreeMap<&str, [MeanAccumulator; N]> = BTreeMap::new();
        for row in rows.iter().map(as_enriched) {
            let accumulators = groups
                .entry(key.of(&row.record))
                .or_insert([MeanAccumulator::default(); N]);
            for (acc, value) in accumulators.iter_mut().zip(values(row)) {
                acc.push(value);
            }
        }

        groups
            .into_iter()
            .map(|(group, accumulators)| (group.to_string(), accumulators.map(|a| a.mean())))
            .collect()
    }

    /// Overall mean of the four channel shares.
    pub fn channel_mix<R: Borrow<EnrichedRecord>>(&self, rows: &[R]) -> ChannelShares {
        let mut accumulators = [MeanAccumulator::default(); 4];
        for row in rows.iter().map(as_enriched) {
            for (acc, value) in accumulators.iter_mut().zip(channel_shares(row)) {
                acc.push(value);
            }
        }
        ChannelShares::from_array(accumulators.map(|a| a.mean()))
    }

    /// Mean channel shares per value of `key`.
    pub fn channel_mix_by<R: Borrow<EnrichedRecord>>(
        &self,
        rows: &[R],
        key: GroupKey,
    ) -> BTreeMap<String, ChannelShares> {
        self.group_aggregate(rows, key, channel_shares)
            .into_iter()
            .map(|(group, means)| (group, ChannelShares::from_array(means)))
            .collect()
    }

    /// Mean in-store share against mean total delivery share, per segment.
    pub fn delivery_split_by_segment<R: Borrow<EnrichedRecord>>(
        &self,
        rows: &[R],
    ) -> BTreeMap<String, DeliverySplit> {
        self.group_aggregate(rows, GroupKey::Segment, |r| {
            [r.record.in_store_share, r.record.total_delivery_share()]
        })
        .into_iter()
        .map(|(segment, [in_store_share, total_delivery_share])| {
            (
                segment,
                DeliverySplit {
                    in_store_share,
                    total_delivery_share,
                },
            )
        })
        .collect()
    }

    /// Mean growth factor per subregion.
    pub fn growth_index<R: Borrow<EnrichedRecord>>(&self, rows: &[R]) -> BTreeMap<String, f64> {
        self.group_aggregate(rows, GroupKey::Subregion, |r| [r.record.growth_factor])
            .into_iter()
            .map(|(subregion, [growth])| (subregion, growth))
            .collect()
    }

    /// The `limit` most aggregator-dependent high-risk rows, most dependent first.
    /// Ties keep their input order.
    pub fn top_risk_list<R: Borrow<EnrichedRecord>>(
        &self,
        rows: &[R],
        limit: usize,
    ) -> Vec<RiskEntry> {
        let mut high_risk: Vec<&EnrichedRecord> = rows
            .iter()
            .map(as_enriched)
            .filter(|r| r.is_high_risk())
            .collect();

        // `sort_by` is stable.
        high_risk.sort_by(|a, b| b.aggregator_dependence.total_cmp(&a.aggregator_dependence));

        high_risk
            .into_iter()
            .take(limit)
            .map(|r| RiskEntry {
                name: r.record.name.clone(),
                subregion: r.record.subregion.clone(),
                segment: r.record.segment.clone(),
                aggregator_dependence: r.aggregator_dependence,
                risk_level: r.risk_level,
            })
            .collect()
    }

    /// Mean of `in_store_net_profit - uber_eats_net_profit`; NaN on empty input.
    pub fn profitability_gap<R: Borrow<EnrichedRecord>>(&self, rows: &[R]) -> f64 {
        mean_of(rows.iter().map(|r| as_enriched(r).record.profit_gap()))
    }

    /// Filters `rows` by `state` and computes every panel of the dashboard.
    pub fn build_report(
        &self,
        rows: &[EnrichedRecord],
        state: &FilterState,
        top_risk_limit: usize,
    ) -> DashboardReport {
        let filtered = self.filter(rows, state);
        tracing::debug!(
            total = rows.len(),
            matched = filtered.len(),
            view_mode = ?state.view_mode,
            "Building dashboard report."
        );

        let channel_view = match state.view_mode {
            ViewMode::OverallChannelMix => ChannelView::OverallMix(self.channel_mix(&filtered)),
            ViewMode::InStoreVsDeliveryComparison => {
                ChannelView::DeliveryComparison(self.delivery_split_by_segment(&filtered))
            }
        };

        DashboardReport {
            view_mode: state.view_mode,
            kpis: self.summarize(&filtered),
            channel_view,
            cuisine_mix: self.channel_mix_by(&filtered, GroupKey::CuisineType),
            subregion_heatmap: self.channel_mix_by(&filtered, GroupKey::Subregion),
            top_risk: self.top_risk_list(&filtered, top_risk_limit),
            profit_gap: self.profitability_gap(&filtered),
            growth_index: self.growth_index(&filtered),
        }
    }
}

fn channel_shares(row: &EnrichedRecord) -> [f64; 4] {
    let r = &row.record;
    [
        r.in_store_share,
        r.uber_eats_share,
        r.door_dash_share,
        r.self_delivery_share,
    ]
}
