use analytics::display::{format_count, format_currency, format_millions, format_ratio};
use analytics::{ChannelShares, ChannelView, DashboardReport};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use core_types::Facets;
use std::collections::BTreeMap;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn shares_table(first_column: &str, groups: &BTreeMap<String, ChannelShares>) -> Table {
    let mut header = vec![first_column];
    header.extend(ChannelShares::LABELS);
    let mut table = new_table(header);
    for (group, shares) in groups {
        let mut row = vec![Cell::new(group)];
        row.extend(shares.to_array().map(|share| Cell::new(format_ratio(share))));
        table.add_row(row);
    }
    table
}

/// Renders every dashboard panel as terminal tables.
pub fn print_report(report: &DashboardReport) {
    println!("\n--- SkyCity Channel Dashboard ({}) ---", report.view_mode);

    let kpis = &report.kpis;
    let mut table = new_table(vec![
        "Restaurants",
        "Monthly Orders",
        "Revenue",
        "High Risk",
        "Avg Order Value",
    ]);
    table.add_row(vec![
        Cell::new(kpis.restaurant_count),
        Cell::new(format_count(kpis.total_orders)),
        Cell::new(format_millions(kpis.total_revenue)),
        Cell::new(kpis.high_risk_count),
        Cell::new(format_currency(kpis.avg_order_value)),
    ]);
    println!("{table}");

    match &report.channel_view {
        ChannelView::OverallMix(shares) => {
            println!("\nChannel mix (mean share of orders)");
            let mut table = new_table(ChannelShares::LABELS.to_vec());
            table.add_row(shares.to_array().map(|share| Cell::new(format_ratio(share))).to_vec());
            println!("{table}");
        }
        ChannelView::DeliveryComparison(by_segment) => {
            println!("\nIn-store vs. delivery by segment");
            let mut table = new_table(vec!["Segment", "In-Store", "Delivery"]);
            for (segment, split) in by_segment {
                table.add_row(vec![
                    Cell::new(segment),
                    Cell::new(format_ratio(split.in_store_share)),
                    Cell::new(format_ratio(split.total_delivery_share)),
                ]);
            }
            println!("{table}");
        }
    }

    println!("\nChannel mix by cuisine");
    println!("{}", shares_table("Cuisine", &report.cuisine_mix));

    println!("\nChannel mix by subregion");
    println!("{}", shares_table("Subregion", &report.subregion_heatmap));

    println!("\nStrategic risk (aggregator dependence)");
    let mut table = new_table(vec!["Restaurant", "Subregion", "Segment", "Dependence", "Risk"]);
    for entry in &report.top_risk {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(&entry.subregion),
            Cell::new(&entry.segment),
            Cell::new(format_ratio(entry.aggregator_dependence)),
            Cell::new(entry.risk_level.label()),
        ]);
    }
    println!("{table}");

    println!(
        "\nMean profit gap per order (in-store minus Uber Eats): {}",
        format_currency(report.profit_gap)
    );

    let mut table = new_table(vec!["Subregion", "Growth Index"]);
    for (subregion, growth) in &report.growth_index {
        table.add_row(vec![Cell::new(subregion), Cell::new(format_ratio(*growth))]);
    }
    println!("{table}");
}

pub fn print_facets(facets: &Facets, row_count: usize) {
    println!("\n{row_count} restaurants loaded.");
    let columns = [
        ("Subregion", &facets.subregions),
        ("Cuisine", &facets.cuisine_types),
        ("Segment", &facets.segments),
    ];
    let mut table = new_table(vec!["Filter", "Values"]);
    for (name, values) in columns {
        table.add_row(vec![Cell::new(name), Cell::new(values.join(", "))]);
    }
    println!("{table}");
}
