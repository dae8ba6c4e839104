use crate::enums::{GroupKey, ViewMode};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The distinct values of each selectable column, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub subregions: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub segments: Vec<String>,
}

impl Facets {
    /// Collects the facet values observed in `rows`.
    pub fn observe<R: AsRef<Record>>(rows: &[R]) -> Self {
        Self {
            subregions: distinct(rows, GroupKey::Subregion),
            cuisine_types: distinct(rows, GroupKey::CuisineType),
            segments: distinct(rows, GroupKey::Segment),
        }
    }
}

fn distinct<R: AsRef<Record>>(rows: &[R], key: GroupKey) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| key.of(r.as_ref()))
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// The user's current selection. Rebuilt from scratch on every interaction.
///
/// An empty set selects nothing. It is not a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub subregions: HashSet<String>,
    pub cuisine_types: HashSet<String>,
    pub segments: HashSet<String>,
    pub view_mode: ViewMode,
}

impl FilterState {
    /// Every observed value selected, which is how the dashboard starts.
    pub fn select_all(facets: &Facets, view_mode: ViewMode) -> Self {
        Self {
            subregions: facets.subregions.iter().cloned().collect(),
            cuisine_types: facets.cuisine_types.iter().cloned().collect(),
            segments: facets.segments.iter().cloned().collect(),
            view_mode,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.subregions.contains(&record.subregion)
            && self.cuisine_types.contains(&record.cuisine_type)
            && self.segments.contains(&record.segment)
    }
}
