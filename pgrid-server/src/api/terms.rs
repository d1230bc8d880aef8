//! Taxonomy term listing
//!
//! Supplies the terms a filter panel is built from.

use axum::{
    extract::{Query, State},
    Json,
};
use pgrid_common::api::TermSummary;
use serde::Deserialize;

use crate::api::ApiError;
use crate::db::catalog;
use crate::AppState;

/// Query parameters for the term listing
#[derive(Debug, Deserialize)]
pub struct TermsQuery {
    /// Taxonomy to list terms of
    #[serde(default = "default_taxonomy")]
    pub taxonomy: String,
}

fn default_taxonomy() -> String {
    "category".to_string()
}

/// GET /v1/terms
///
/// Lists the terms of a taxonomy in name order. Terms with no posts
/// attached are hidden, so every control built from this list can match
/// something.
pub async fn list_terms(
    State(state): State<AppState>,
    Query(query): Query<TermsQuery>,
) -> Result<Json<Vec<TermSummary>>, ApiError> {
    let terms = catalog::list_terms(&state.db, &query.taxonomy)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(Json(terms))
}
