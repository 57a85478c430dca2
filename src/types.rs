use crate::error::{ChemtabError, Result};
use std::fmt;

/// A single table cell. `None` marks a missing value, written as an empty field.
pub type Cell = Option<String>;

/// Rectangular block of named columns and rows.
///
/// Every row holds exactly one cell per column; `push_row` pads short rows
/// with missing cells and rejects rows that are too wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from string rows, treating empty strings as missing.
    pub fn from_rows<C, R, S>(columns: C, rows: R) -> Result<Self>
    where
        C: IntoIterator<Item = S>,
        R: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        let mut table = Self::new(columns.into_iter().map(Into::into).collect());
        for row in rows {
            table.push_row(row.into_iter().map(|s| to_cell(s.into())).collect())?;
        }
        Ok(table)
    }

    /// Squares every row off to the column count, padding with missing cells.
    pub(crate) fn with_rows(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), None);
        }
        Self { columns, rows }
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) -> Result<()> {
        if row.len() > self.columns.len() {
            return Err(ChemtabError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        row.resize(self.columns.len(), None);
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// True when every named column exists in this table.
    pub fn has_columns<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.column_index(n.as_ref()).is_some())
    }

    /// Copies the named columns, in the given order, into a new table.
    /// Returns `None` if any of them is absent.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Option<Table> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect::<Option<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Some(Table {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows,
        })
    }

    /// Cell value by row position and column name; missing cells yield `None`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Empty text is a missing value.
pub fn to_cell(text: String) -> Cell {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// An ordered set of column names a table must fully contain to be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSubset(Vec<String>);

impl ColumnSubset {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ColumnSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            ["Chemical formula", "Synonyms", "CAS number"],
            vec![
                vec!["H2O", "water", "7732-18-5"],
                vec!["NaCl", "salt", ""],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push_row(vec![Some("x".into())]).unwrap();
        assert_eq!(table.rows()[0], vec![Some("x".to_string()), None]);
    }

    #[test]
    fn test_push_row_rejects_wide_rows() {
        let mut table = Table::new(vec!["a".into()]);
        let err = table.push_row(vec![None, None]).unwrap_err();
        assert!(matches!(
            err,
            ChemtabError::RowWidth {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty_strings_become_missing() {
        let table = sample();
        assert_eq!(table.cell(1, "CAS number"), None);
        assert_eq!(table.cell(0, "CAS number"), Some("7732-18-5"));
    }

    #[test]
    fn test_has_columns() {
        let table = sample();
        assert!(table.has_columns(&["Synonyms", "Chemical formula"]));
        assert!(!table.has_columns(&["Synonyms", "Formula"]));
        assert!(table.has_columns::<&str>(&[]));
    }

    #[test]
    fn test_project_reorders_and_drops_columns() {
        let table = sample();
        let projected = table.project(&["Synonyms", "Chemical formula"]).unwrap();
        assert_eq!(projected.columns(), &["Synonyms", "Chemical formula"]);
        assert_eq!(projected.cell(1, "Synonyms"), Some("salt"));
        assert_eq!(projected.cell(1, "Chemical formula"), Some("NaCl"));
        assert!(table.project(&["Name"]).is_none());
    }

    #[test]
    fn test_column_subset_display() {
        let subset = ColumnSubset::new(["Chemical formula", "Synonyms"]);
        assert_eq!(subset.to_string(), "[Chemical formula, Synonyms]");
    }
}
