//! Post listing
//!
//! Supplies the ordered post list a grid mounts with.

use axum::{
    extract::{Query, State},
    Json,
};
use pgrid_common::api::PostSummary;
use serde::Deserialize;

use crate::api::ApiError;
use crate::db::catalog;
use crate::AppState;

/// Query parameters for the post listing
#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    /// Post type to list
    #[serde(default = "default_post_type")]
    pub post_type: String,
}

fn default_post_type() -> String {
    "post".to_string()
}

/// GET /v1/posts
///
/// Lists posts of a type in catalog order: newest publication date first,
/// id descending as tiebreak. The dynamic grid endpoint returns subsets
/// of this same ordering.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = catalog::list_posts(&state.db, &query.post_type)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(Json(posts))
}
