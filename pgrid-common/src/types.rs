//! Identifier and filter condition types shared by the grid engine and the
//! catalog service.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog post identifier. Grid items carry these.
pub type ItemId = i64;

/// Taxonomy term identifier. Filter controls carry these.
pub type TermId = i64;

/// Boolean condition applied uniformly across all active filter terms.
///
/// `And` keeps items carrying every active term; `Or` keeps items carrying
/// at least one. The wire form is upper-case (`"AND"` / `"OR"`); parsing
/// accepts any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterCond {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl FilterCond {
    /// Wire form of the condition
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCond::And => "AND",
            FilterCond::Or => "OR",
        }
    }
}

impl fmt::Display for FilterCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCond {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(FilterCond::And),
            "OR" => Ok(FilterCond::Or),
            other => Err(Error::InvalidInput(format!(
                "filter condition must be AND or OR, got '{}'",
                other
            ))),
        }
    }
}

/// Returns true when `raw` is a well-formed term id token: non-empty and
/// ASCII digits only.
///
/// Placeholder control values (`""`, `"all"`) and anything else carrying
/// non-digit characters fail the check and are dropped by callers.
///
/// # Examples
///
/// ```
/// use pgrid_common::types::is_term_token;
///
/// assert!(is_term_token("12"));
/// assert!(!is_term_token("12a"));
/// assert!(!is_term_token(""));
/// ```
pub fn is_term_token(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Parses one raw control value into a term id.
///
/// Accepts exactly the tokens [`is_term_token`] accepts; anything else
/// (including values too large for the id type) yields `None`.
pub fn parse_term_token(raw: &str) -> Option<TermId> {
    if !is_term_token(raw) {
        return None;
    }
    raw.parse::<TermId>().ok()
}

/// Parses a comma-separated `terms` request parameter into term ids.
///
/// Malformed and empty segments are dropped, as is the id zero (the catalog
/// assigns term ids from 1). Order and duplicates of the remaining segments
/// are preserved.
pub fn parse_terms_csv(raw: &str) -> Vec<TermId> {
    raw.split(',')
        .filter_map(parse_term_token)
        .filter(|&id| id != 0)
        .collect()
}
