//! Catalog queries
//!
//! All listings share one ordering: publication date descending with id
//! descending as tiebreak. The filter resolution endpoint returns subsets
//! of the same ordering, so a grid can rank a filtered response against
//! the list it mounted with.

use pgrid_common::api::{PostSummary, TermSummary};
use pgrid_common::{FilterCond, ItemId, Result, TermId};
use sqlx::{Pool, Sqlite};

/// Resolve the ordered post ids matching a term filter
///
/// With no terms, every post of the type matches. `And` requires all
/// listed terms on a post, `Or` any of them. Duplicate term ids collapse
/// to a single requirement, and term ids from other taxonomies match
/// nothing.
pub async fn find_post_ids(
    pool: &Pool<Sqlite>,
    post_type: &str,
    taxonomy: &str,
    terms: &[TermId],
    cond: FilterCond,
) -> Result<Vec<ItemId>> {
    if terms.is_empty() {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM posts
             WHERE post_type = ?
             ORDER BY published_at DESC, id DESC",
        )
        .bind(post_type)
        .fetch_all(pool)
        .await?;
        return Ok(ids);
    }

    // Repeated ids would skew the AND count, so collapse them first
    let mut unique: Vec<TermId> = Vec::with_capacity(terms.len());
    for &t in terms {
        if !unique.contains(&t) {
            unique.push(t);
        }
    }

    let placeholders = vec!["?"; unique.len()].join(", ");
    let sql = match cond {
        FilterCond::Or => format!(
            "SELECT id FROM posts
             WHERE post_type = ?
               AND id IN (
                 SELECT pt.post_id FROM post_terms pt
                 JOIN terms t ON t.id = pt.term_id
                 WHERE t.taxonomy = ? AND pt.term_id IN ({}))
             ORDER BY published_at DESC, id DESC",
            placeholders
        ),
        FilterCond::And => format!(
            "SELECT id FROM posts
             WHERE post_type = ?
               AND id IN (
                 SELECT pt.post_id FROM post_terms pt
                 JOIN terms t ON t.id = pt.term_id
                 WHERE t.taxonomy = ? AND pt.term_id IN ({})
                 GROUP BY pt.post_id
                 HAVING COUNT(DISTINCT pt.term_id) = ?)
             ORDER BY published_at DESC, id DESC",
            placeholders
        ),
    };

    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(post_type).bind(taxonomy);
    for t in &unique {
        query = query.bind(t);
    }
    if cond == FilterCond::And {
        query = query.bind(unique.len() as i64);
    }

    let ids = query.fetch_all(pool).await?;
    Ok(ids)
}

/// List the terms of a taxonomy that have at least one post attached
///
/// Name order, matching how a filter panel presents them.
pub async fn list_terms(pool: &Pool<Sqlite>, taxonomy: &str) -> Result<Vec<TermSummary>> {
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT t.id, t.name FROM terms t
         WHERE t.taxonomy = ?
           AND EXISTS (SELECT 1 FROM post_terms pt WHERE pt.term_id = t.id)
         ORDER BY t.name ASC",
    )
    .bind(taxonomy)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| TermSummary { id, name })
        .collect())
}

/// List posts of a type in catalog order
pub async fn list_posts(pool: &Pool<Sqlite>, post_type: &str) -> Result<Vec<PostSummary>> {
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT id, title FROM posts
         WHERE post_type = ?
         ORDER BY published_at DESC, id DESC",
    )
    .bind(post_type)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, title)| PostSummary { id, title })
        .collect())
}
