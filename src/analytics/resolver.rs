use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{ColumnRole, TradeRecord};

/// Find the column that plays `role` in a dataset, judged from one sample row.
///
/// An exact header from the role's candidate list wins first, in list order.
/// Otherwise the first header (in file order) containing any candidate as a
/// case-insensitive substring is taken.
pub fn resolve_column<'a>(sample: &'a TradeRecord, role: ColumnRole) -> Option<&'a str> {
    let candidates = role.candidates();

    let exact = candidates
        .iter()
        .find_map(|name| sample.columns().find(|c| c == name && role.accepts(c)));
    if exact.is_some() {
        return exact;
    }

    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
    sample.columns().find(|column| {
        let header = column.to_lowercase();
        role.accepts(column) && lowered.iter().any(|c| header.contains(c.as_str()))
    })
}

/// Role to column bindings for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: BTreeMap<ColumnRole, String>,
}

impl ColumnMapping {
    /// Resolve every role against `sample`. Roles with no match stay unbound.
    pub fn resolve(sample: &TradeRecord) -> Self {
        let mut columns = BTreeMap::new();
        for role in ColumnRole::ALL {
            match resolve_column(sample, role) {
                Some(column) => {
                    debug!("Resolved {} -> {:?}", role, column);
                    columns.insert(role, column.to_string());
                }
                None => debug!("No column for {}", role),
            }
        }
        Self { columns }
    }

    /// Mapping for a record sequence; empty when there are no records.
    pub fn for_records(records: &[TradeRecord]) -> Self {
        records.first().map(Self::resolve).unwrap_or_default()
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    pub fn has(&self, role: ColumnRole) -> bool {
        self.columns.contains_key(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.columns.iter().map(|(r, c)| (*r, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
