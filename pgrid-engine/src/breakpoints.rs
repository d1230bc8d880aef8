//! Responsive column selection
//!
//! Maps a viewport width to a column count through an ordered breakpoint
//! table. Matching is first-match with inclusive lower and exclusive upper
//! bounds, so a well-formed table behaves like an if / else-if chain over
//! width ranges.

use pgrid_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Column count used when no table entry matches the width
pub const FALLBACK_COLS: u32 = 2;

/// One width range and the column count it selects
///
/// `min` is inclusive and defaults to zero; `max` is exclusive and defaults
/// to unbounded. An entry with neither bound matches every width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Inclusive lower width bound
    #[serde(default)]
    pub min: Option<u32>,
    /// Exclusive upper width bound
    #[serde(default)]
    pub max: Option<u32>,
    /// Column count for widths in range
    pub cols: u32,
}

impl Breakpoint {
    /// True when `width` falls inside this entry's range
    pub fn matches(&self, width: u32) -> bool {
        width >= self.min.unwrap_or(0) && self.max.map_or(true, |max| width < max)
    }
}

/// Built-in breakpoint table
///
/// Six columns on wide desktop viewports stepping down to two on narrow
/// ones. The final entry has no lower bound, so together the entries cover
/// every width.
pub const DEFAULT_BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint {
        min: Some(1600),
        max: None,
        cols: 6,
    },
    Breakpoint {
        min: Some(1366),
        max: Some(1600),
        cols: 5,
    },
    Breakpoint {
        min: Some(991),
        max: Some(1366),
        cols: 4,
    },
    Breakpoint {
        min: Some(768),
        max: Some(991),
        cols: 3,
    },
    Breakpoint {
        min: None,
        max: Some(991),
        cols: 2,
    },
];

/// Select the column count for a viewport width
///
/// Returns the column count of the first matching table entry. When no
/// entry matches, or the matching entry declares zero columns, the result
/// is [`FALLBACK_COLS`]. The result is therefore always at least 1.
///
/// # Examples
/// ```
/// use pgrid_engine::breakpoints::{resolve_columns, DEFAULT_BREAKPOINTS};
///
/// assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1920), 6);
/// assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1366), 5);
/// assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 800), 3);
/// assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 320), 2);
/// ```
pub fn resolve_columns(table: &[Breakpoint], width: u32) -> u32 {
    match table.iter().find(|b| b.matches(width)) {
        Some(b) if b.cols > 0 => b.cols,
        _ => FALLBACK_COLS,
    }
}

/// Check a breakpoint table for entries that can never work
///
/// Rejects empty tables, entries with zero columns, and entries whose
/// bounds describe an empty range. Gaps and overlaps between entries are
/// allowed; first-match ordering and the fallback column count keep them
/// harmless.
pub fn validate_table(table: &[Breakpoint]) -> Result<()> {
    if table.is_empty() {
        return Err(Error::Config("breakpoint table is empty".to_string()));
    }
    for (i, b) in table.iter().enumerate() {
        if b.cols == 0 {
            return Err(Error::Config(format!(
                "breakpoint {} declares zero columns",
                i
            )));
        }
        if let (Some(min), Some(max)) = (b.min, b.max) {
            if min >= max {
                return Err(Error::Config(format!(
                    "breakpoint {} has empty range {}..{}",
                    i, min, max
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_columns_each_tier() {
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 2560), 6);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1500), 5);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1024), 4);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 800), 3);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 320), 2);
    }

    #[test]
    fn test_resolve_columns_boundaries() {
        // Lower bounds are inclusive, upper bounds exclusive
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1600), 6);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1599), 5);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1366), 5);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 1365), 4);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 991), 4);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 990), 3);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 768), 3);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 767), 2);
        assert_eq!(resolve_columns(&DEFAULT_BREAKPOINTS, 0), 2);
    }

    #[test]
    fn test_disjoint_table_matches_exactly_once() {
        // A sorted table with touching bounds partitions the width axis
        let table = [
            Breakpoint {
                min: Some(1200),
                max: None,
                cols: 4,
            },
            Breakpoint {
                min: Some(600),
                max: Some(1200),
                cols: 3,
            },
            Breakpoint {
                min: None,
                max: Some(600),
                cols: 2,
            },
        ];
        for width in [0, 1, 599, 600, 1199, 1200, 5000] {
            let matching = table.iter().filter(|b| b.matches(width)).count();
            assert_eq!(matching, 1, "width {} matched {} entries", width, matching);
        }
    }

    #[test]
    fn test_default_table_covers_every_width() {
        // The built-in fallback entry overlaps the three-column tier;
        // first-match ordering decides, and no width is left uncovered
        for width in [0, 100, 767, 768, 990, 991, 1365, 1366, 1599, 1600, 4096] {
            assert!(DEFAULT_BREAKPOINTS.iter().any(|b| b.matches(width)));
            assert!(resolve_columns(&DEFAULT_BREAKPOINTS, width) >= 1);
        }
    }

    #[test]
    fn test_resolve_columns_empty_table_falls_back() {
        assert_eq!(resolve_columns(&[], 1024), FALLBACK_COLS);
    }

    #[test]
    fn test_resolve_columns_no_match_falls_back() {
        let table = [Breakpoint {
            min: Some(1000),
            max: None,
            cols: 4,
        }];
        assert_eq!(resolve_columns(&table, 999), FALLBACK_COLS);
        assert_eq!(resolve_columns(&table, 1000), 4);
    }

    #[test]
    fn test_resolve_columns_zero_cols_entry_falls_back() {
        let table = [Breakpoint {
            min: None,
            max: None,
            cols: 0,
        }];
        assert_eq!(resolve_columns(&table, 1024), FALLBACK_COLS);
    }

    #[test]
    fn test_validate_table_accepts_default() {
        assert!(validate_table(&DEFAULT_BREAKPOINTS).is_ok());
    }

    #[test]
    fn test_validate_table_rejects_empty() {
        assert!(validate_table(&[]).is_err());
    }

    #[test]
    fn test_validate_table_rejects_zero_cols() {
        let table = [Breakpoint {
            min: None,
            max: None,
            cols: 0,
        }];
        assert!(validate_table(&table).is_err());
    }

    #[test]
    fn test_validate_table_rejects_empty_range() {
        let table = [Breakpoint {
            min: Some(800),
            max: Some(800),
            cols: 3,
        }];
        assert!(validate_table(&table).is_err());
    }
}
