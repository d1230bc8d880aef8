//! Shared API request/response types
//!
//! Types exchanged between the grid engine and the catalog service. The
//! filter endpoint itself speaks plain query parameters and returns a bare
//! id array; these types are the structured form both sides work with.

use crate::types::{FilterCond, ItemId, TermId};
use serde::{Deserialize, Serialize};

// ========================================
// Filter Resolution
// ========================================

/// One filter-resolution request against the catalog.
///
/// An empty `terms` list means "no filter": the catalog returns every item
/// of the post type in its natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridQuery {
    /// Catalog post type the grid shows
    pub post_type: String,

    /// Taxonomy the term ids belong to
    pub taxonomy: String,

    /// Active term ids, in control order (may repeat)
    pub terms: Vec<TermId>,

    /// Condition combining the terms
    pub cond: FilterCond,
}

impl GridQuery {
    /// Create an unfiltered query for a post type / taxonomy pair
    pub fn unfiltered(post_type: impl Into<String>, taxonomy: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            taxonomy: taxonomy.into(),
            terms: Vec::new(),
            cond: FilterCond::default(),
        }
    }

    /// Replace the active terms and condition
    pub fn with_terms(mut self, terms: Vec<TermId>, cond: FilterCond) -> Self {
        self.terms = terms;
        self.cond = cond;
        self
    }

    /// True when the query carries at least one term
    pub fn is_filtered(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Query parameters for the filter endpoint.
    ///
    /// `terms` and `filter_cond` are only sent when at least one term is
    /// active; the endpoint treats their absence as "no filter".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("post_type", self.post_type.clone()),
            ("taxonomy", self.taxonomy.clone()),
        ];
        if self.is_filtered() {
            let csv = self
                .terms
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("terms", csv));
            pairs.push(("filter_cond", self.cond.to_string()));
        }
        pairs
    }
}

// ========================================
// Catalog Listings
// ========================================

/// One taxonomy term, as listed by the terms endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSummary {
    /// Term id
    pub id: TermId,
    /// Display name
    pub name: String,
}

/// One post, as listed by the posts endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post id
    pub id: ItemId,
    /// Display title
    pub title: String,
}

// ========================================
// Tests
// ========================================
