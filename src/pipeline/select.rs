use crate::types::{ColumnSubset, Table};
use tracing::debug;

/// Outcome of matching one table against the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `priority` is the index of the winning candidate; `table` holds only
    /// its columns, in candidate order.
    Matched { priority: usize, table: Table },
    Skipped,
}

impl Selection {
    pub fn into_table(self) -> Option<Table> {
        match self {
            Selection::Matched { table, .. } => Some(table),
            Selection::Skipped => None,
        }
    }
}

/// Picks the first candidate whose columns are all present in `table`.
///
/// Candidates are tried strictly left to right; a table matching none of
/// them is skipped, which is not an error.
pub fn select_columns(table: &Table, candidates: &[ColumnSubset]) -> Selection {
    for (priority, candidate) in candidates.iter().enumerate() {
        if !table.has_columns(candidate.columns()) {
            continue;
        }
        if let Some(projected) = table.project(candidate.columns()) {
            debug!(%candidate, rows = projected.len(), "table matched");
            return Selection::Matched {
                priority,
                table: projected,
            };
        }
    }
    debug!(columns = ?table.columns(), "no candidate matched, skipping table");
    Selection::Skipped
}
