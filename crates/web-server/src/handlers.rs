use crate::{error::AppError, AppState};
use analytics::DashboardReport;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use core_types::{Facets, FilterState, ViewMode};
use dataset::LoadedDataset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Query string of `/api/dashboard`.
///
/// Facet parameters are comma-separated. An absent parameter selects every
/// observed value; a present but empty one selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub subregion: Option<String>,
    pub cuisine: Option<String>,
    pub segment: Option<String>,
    pub view: Option<String>,
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    #[serde(flatten)]
    pub facets: Facets,
    pub row_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&LoadedDataset> for FacetsResponse {
    fn from(dataset: &LoadedDataset) -> Self {
        Self {
            facets: dataset.facets.clone(),
            row_count: dataset.records.len(),
            loaded_at: dataset.loaded_at,
        }
    }
}

fn selection(param: Option<&str>, observed: &[String]) -> HashSet<String> {
    match param {
        None => observed.iter().cloned().collect(),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

impl DashboardQuery {
    fn filter_state(&self, facets: &Facets) -> Result<FilterState, AppError> {
        let view_mode = self
            .view
            .as_deref()
            .map(str::parse::<ViewMode>)
            .transpose()?
            .unwrap_or_default();

        Ok(FilterState {
            subregions: selection(self.subregion.as_deref(), &facets.subregions),
            cuisine_types: selection(self.cuisine.as_deref(), &facets.cuisine_types),
            segments: selection(self.segment.as_deref(), &facets.segments),
            view_mode,
        })
    }
}

/// # GET /api/facets
/// The values each dashboard filter can take.
pub async fn get_facets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FacetsResponse>, AppError> {
    let dataset = state.dataset().await?;
    Ok(Json(FacetsResponse::from(dataset.as_ref())))
}

/// # GET /api/dashboard
/// Recomputes every dashboard panel for the requested filter selection.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardReport>, AppError> {
    let Query(query) = query?;
    let dataset = state.dataset().await?;
    let filter = query.filter_state(&dataset.facets)?;
    let top = query.top.unwrap_or(state.top_risk_limit);

    let report = state.engine.build_report(&dataset.records, &filter, top);
    tracing::debug!(
        matched = report.kpis.restaurant_count,
        high_risk = report.kpis.high_risk_count,
        "Dashboard computed."
    );
    Ok(Json(report))
}

/// # POST /api/reload
/// Drops the cached dataset and reads the source file again.
pub async fn reload_dataset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FacetsResponse>, AppError> {
    let dataset = state.reload().await?;
    tracing::info!(rows = dataset.records.len(), "Dataset reloaded on request.");
    Ok(Json(FacetsResponse::from(dataset.as_ref())))
}
