//! Filter resolution endpoint
//!
//! The endpoint the grid engine calls on every filter change. It answers
//! with the ordered post id list matching the selection, which the engine
//! then lays out as the active subset.

use axum::{
    extract::{Query, State},
    Json,
};
use pgrid_common::types::parse_terms_csv;
use pgrid_common::{FilterCond, ItemId};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::db::catalog;
use crate::AppState;

/// Query parameters for the dynamic grid endpoint
///
/// All parameters are optional. Unusable values fall back to defaults
/// instead of failing the request: a grid with a half-formed selection
/// still deserves an answer.
#[derive(Debug, Deserialize)]
pub struct DynamicGridQuery {
    /// Post type to resolve against
    #[serde(default = "default_post_type")]
    pub post_type: String,
    /// Taxonomy the term ids belong to
    #[serde(default = "default_taxonomy")]
    pub taxonomy: String,
    /// Comma-separated numeric term ids
    #[serde(default)]
    pub terms: String,
    /// "AND" or "OR", any case
    #[serde(default)]
    pub filter_cond: Option<String>,
}

fn default_post_type() -> String {
    "post".to_string()
}

fn default_taxonomy() -> String {
    "category".to_string()
}

/// GET /v1/dynamic-grid
///
/// Resolves a filter selection to the ordered post id list. Term ids that
/// are not purely numeric (or are zero) are dropped during parsing; when
/// no terms survive, the full post list of the type comes back, matching
/// an unfiltered grid.
pub async fn resolve_dynamic_grid(
    State(state): State<AppState>,
    Query(query): Query<DynamicGridQuery>,
) -> Result<Json<Vec<ItemId>>, ApiError> {
    let terms = parse_terms_csv(&query.terms);
    let cond = match query.filter_cond.as_deref() {
        None | Some("") => FilterCond::default(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Unknown filter condition {:?}, using AND", raw);
            FilterCond::default()
        }),
    };

    debug!(
        post_type = %query.post_type,
        taxonomy = %query.taxonomy,
        terms = terms.len(),
        cond = %cond,
        "Resolving dynamic grid query"
    );

    let ids = catalog::find_post_ids(&state.db, &query.post_type, &query.taxonomy, &terms, cond)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(Json(ids))
}
