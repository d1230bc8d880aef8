//! Filter panel state
//!
//! Filter controls come in two group kinds: a single-select carrying one
//! raw value, and a set of independently toggleable tags. Controls hold raw
//! strings; the numeric gate sits in one place, at collection time, so a
//! placeholder value ("", "all") is simply a value that never collects.

use pgrid_common::api::TermSummary;
use pgrid_common::types::parse_term_token;
use pgrid_common::{Error, Result, TermId};
use serde::Serialize;

/// One toggleable tag control
#[derive(Debug, Clone, Serialize)]
pub struct TagItem {
    /// Raw control value, normally a term id
    pub id: String,
    /// Display label
    pub label: String,
    /// Toggle state
    pub on: bool,
}

/// One filter control group
#[derive(Debug, Clone, Serialize)]
pub enum FilterGroup {
    /// Single-select control holding the raw selected value
    Select { value: String },
    /// Independently toggleable tag controls
    Tags { items: Vec<TagItem> },
}

impl FilterGroup {
    /// Create a select group with an initial raw value
    ///
    /// An empty initial value is the usual "all" placeholder.
    pub fn select(initial: impl Into<String>) -> Self {
        FilterGroup::Select {
            value: initial.into(),
        }
    }

    /// Create a tag group from catalog terms, all toggled off
    pub fn tags(terms: &[TermSummary]) -> Self {
        FilterGroup::Tags {
            items: terms
                .iter()
                .map(|t| TagItem {
                    id: t.id.to_string(),
                    label: t.name.clone(),
                    on: false,
                })
                .collect(),
        }
    }
}

/// Ordered collection of filter groups
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterPanel {
    groups: Vec<FilterGroup>,
}

impl FilterPanel {
    /// Empty panel; the grid stays unfiltered without groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel over a fixed group list
    pub fn with_groups(groups: Vec<FilterGroup>) -> Self {
        Self { groups }
    }

    /// Append a group
    pub fn push_group(&mut self, group: FilterGroup) {
        self.groups.push(group);
    }

    /// Groups in panel order
    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// Set the raw value of a select group
    pub fn set_select(&mut self, group: usize, value: impl Into<String>) -> Result<()> {
        match self.groups.get_mut(group) {
            Some(FilterGroup::Select { value: current }) => {
                *current = value.into();
                Ok(())
            }
            Some(FilterGroup::Tags { .. }) => Err(Error::InvalidInput(format!(
                "filter group {} is a tag group",
                group
            ))),
            None => Err(Error::InvalidInput(format!("no filter group {}", group))),
        }
    }

    /// Toggle one tag control, returning its new state
    pub fn toggle_tag(&mut self, group: usize, item: usize) -> Result<bool> {
        match self.groups.get_mut(group) {
            Some(FilterGroup::Tags { items }) => match items.get_mut(item) {
                Some(tag) => {
                    tag.on = !tag.on;
                    Ok(tag.on)
                }
                None => Err(Error::InvalidInput(format!(
                    "no tag {} in filter group {}",
                    item, group
                ))),
            },
            Some(FilterGroup::Select { .. }) => Err(Error::InvalidInput(format!(
                "filter group {} is a select group",
                group
            ))),
            None => Err(Error::InvalidInput(format!("no filter group {}", group))),
        }
    }

    /// Locate the first tag control with a raw id
    pub fn find_tag(&self, raw_id: &str) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(g, group)| {
            if let FilterGroup::Tags { items } = group {
                items
                    .iter()
                    .position(|item| item.id == raw_id)
                    .map(|i| (g, i))
            } else {
                None
            }
        })
    }

    /// Collect the active term ids, in group order then control order
    ///
    /// Only raw values that are pure ASCII digits collect; everything else
    /// is dropped silently.
    pub fn selection(&self) -> Vec<TermId> {
        let mut terms = Vec::new();
        for group in &self.groups {
            match group {
                FilterGroup::Select { value } => {
                    if let Some(id) = parse_term_token(value) {
                        terms.push(id);
                    }
                }
                FilterGroup::Tags { items } => {
                    for item in items.iter().filter(|i| i.on) {
                        if let Some(id) = parse_term_token(&item.id) {
                            terms.push(id);
                        }
                    }
                }
            }
        }
        terms
    }
}
