use serde::{Deserialize, Serialize};

use crate::record::ScanRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewestFirst => "latest",
            Self::OldestFirst => "oldest",
        }
    }
}

/// Stable sort on `timestamp`; equal timestamps keep their input order in
/// both directions.
pub fn sort_by_timestamp(mut records: Vec<ScanRecord>, direction: SortDirection) -> Vec<ScanRecord> {
    match direction {
        SortDirection::NewestFirst => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortDirection::OldestFirst => records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
    records
}

/// Narrowing applied to an already-decoded record list. Every criterion left
/// unset matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub body_part_name: Option<String>,
    pub risk: Option<String>,
    pub selected_only: bool,
    /// Inclusive lower bound on `timestamp`.
    pub since: Option<i64>,
    /// Inclusive upper bound on `timestamp`.
    pub until: Option<i64>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_part(mut self, name: impl Into<String>) -> Self {
        self.body_part_name = Some(name.into());
        self
    }

    pub fn risk(mut self, risk: impl Into<String>) -> Self {
        self.risk = Some(risk.into());
        self
    }

    pub fn selected_only(mut self) -> Self {
        self.selected_only = true;
        self
    }

    pub fn between(mut self, since: i64, until: i64) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    pub fn matches(&self, record: &ScanRecord) -> bool {
        if let Some(name) = &self.body_part_name {
            if !record.body_part_name.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        if let Some(risk) = &self.risk {
            if !record.risk.eq_ignore_ascii_case(risk) {
                return false;
            }
        }
        if self.selected_only && !record.is_selected {
            return false;
        }
        if self.since.is_some_and(|since| record.timestamp < since) {
            return false;
        }
        if self.until.is_some_and(|until| record.timestamp > until) {
            return false;
        }
        true
    }
}

pub fn filter_records(records: Vec<ScanRecord>, filter: &RecordFilter) -> Vec<ScanRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
