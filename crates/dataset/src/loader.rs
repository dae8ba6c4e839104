//! CSV loader for the restaurant dataset.
//!
//! Header names are trimmed before use. Every column in [`REQUIRED_COLUMNS`]
//! must be present; extra columns are ignored. Numeric cells that are blank or
//! do not parse load as NaN instead of failing the load.

use crate::error::DatasetError;
use core_types::Record;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Source column names, after whitespace trimming.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "RestaurantName",
    "Subregion",
    "CuisineType",
    "Segment",
    "MonthlyOrders",
    "AOV",
    "InStoreShare",
    "UE_share",
    "DD_share",
    "SD_share",
    "InStoreRevenue",
    "UberEatsRevenue",
    "DoorDashRevenue",
    "SelfDeliveryRevenue",
    "InStoreNetProfit",
    "UberEatsNetProfit",
    "GrowthFactor",
];

type Cell = Option<String>;

/// One CSV row exactly as it appears in the file.
///
/// Cells missing from a short row load as blank text or NaN.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "RestaurantName", default)]
    name: String,
    #[serde(rename = "Subregion", default)]
    subregion: String,
    #[serde(rename = "CuisineType", default)]
    cuisine_type: String,
    #[serde(rename = "Segment", default)]
    segment: String,
    #[serde(rename = "MonthlyOrders")]
    monthly_orders: Cell,
    #[serde(rename = "AOV")]
    average_order_value: Cell,
    #[serde(rename = "InStoreShare")]
    in_store_share: Cell,
    #[serde(rename = "UE_share")]
    uber_eats_share: Cell,
    #[serde(rename = "DD_share")]
    door_dash_share: Cell,
    #[serde(rename = "SD_share")]
    self_delivery_share: Cell,
    #[serde(rename = "InStoreRevenue")]
    in_store_revenue: Cell,
    #[serde(rename = "UberEatsRevenue")]
    uber_eats_revenue: Cell,
    #[serde(rename = "DoorDashRevenue")]
    door_dash_revenue: Cell,
    #[serde(rename = "SelfDeliveryRevenue")]
    self_delivery_revenue: Cell,
    #[serde(rename = "InStoreNetProfit")]
    in_store_net_profit: Cell,
    #[serde(rename = "UberEatsNetProfit")]
    uber_eats_net_profit: Cell,
    #[serde(rename = "GrowthFactor")]
    growth_factor: Cell,
}

impl CsvRow {
    fn into_record(self) -> Record {
        Record {
            name: self.name,
            subregion: self.subregion,
            cuisine_type: self.cuisine_type,
            segment: self.segment,
            monthly_orders: parse_cell(&self.monthly_orders),
            average_order_value: parse_cell(&self.average_order_value),
            in_store_share: parse_cell(&self.in_store_share),
            uber_eats_share: parse_cell(&self.uber_eats_share),
            door_dash_share: parse_cell(&self.door_dash_share),
            self_delivery_share: parse_cell(&self.self_delivery_share),
            in_store_revenue: parse_cell(&self.in_store_revenue),
            uber_eats_revenue: parse_cell(&self.uber_eats_revenue),
            door_dash_revenue: parse_cell(&self.door_dash_revenue),
            self_delivery_revenue: parse_cell(&self.self_delivery_revenue),
            in_store_net_profit: parse_cell(&self.in_store_net_profit),
            uber_eats_net_profit: parse_cell(&self.uber_eats_net_profit),
            growth_factor: parse_cell(&self.growth_factor),
        }
    }
}

/// Lenient numeric parse: blanks and markers such as `NA` become NaN.
fn parse_cell(cell: &Cell) -> f64 {
    cell.as_deref()
        .map(str::trim)
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Load restaurant records from any CSV reader.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<Record>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(|source| DatasetError::Parse {
            // Counting records undercounts when a quoted cell spans lines.
            line: source
                .position()
                .map_or(index as u64 + 2, |position| position.line()),
            source,
        })?;
        records.push(row.into_record());
    }

    Ok(records)
}

/// Load restaurant records from a CSV file path.
pub fn load_records_file(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_records(file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "Loaded restaurant dataset.");
    Ok(records)
}
