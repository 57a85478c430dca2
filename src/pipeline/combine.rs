use crate::types::{Cell, Table};

/// Stacks tables row-wise, aligning cells by column name.
///
/// The result's columns are the union of the inputs' columns in order of
/// first appearance. Cells for columns a table lacks are missing. Row order
/// is input table order, then in-table row order.
pub fn combine(tables: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for table in &tables {
        for column in table.columns() {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(tables.iter().map(Table::len).sum());
    for table in &tables {
        let positions: Vec<Option<usize>> =
            columns.iter().map(|c| table.column_index(c)).collect();
        for row in table.rows() {
            rows.push(
                positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row[i].clone()))
                    .collect(),
            );
        }
    }

    Table::with_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_are_filled() {
        let a = Table::from_rows(
            ["Chemical formula", "Synonyms", "CAS number"],
            vec![
                vec!["H2O", "water", "7732-18-5"],
                vec!["CO2", "carbon dioxide", "124-38-9"],
            ],
        )
        .unwrap();
        let b = Table::from_rows(
            ["Chemical formula", "Synonyms"],
            vec![vec!["NaCl", "table salt"]],
        )
        .unwrap();

        let combined = combine(vec![a, b]);
        assert_eq!(
            combined.columns(),
            &["Chemical formula", "Synonyms", "CAS number"]
        );
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.cell(0, "CAS number"), Some("7732-18-5"));
        assert_eq!(combined.cell(1, "CAS number"), Some("124-38-9"));
        assert_eq!(combined.cell(2, "Synonyms"), Some("table salt"));
        assert_eq!(combined.cell(2, "CAS number"), None);
    }

    #[test]
    fn test_column_order_follows_first_appearance() {
        let a = Table::from_rows(["Chemical formula", "Synonyms"], vec![vec!["C", "carbon"]])
            .unwrap();
        let b = Table::from_rows(
            ["Chemical formula", "Synonyms", "CAS number"],
            vec![vec!["Fe", "iron", "7439-89-6"]],
        )
        .unwrap();

        let combined = combine(vec![a, b]);
        assert_eq!(
            combined.columns(),
            &["Chemical formula", "Synonyms", "CAS number"]
        );
        assert_eq!(combined.cell(0, "CAS number"), None);
        assert_eq!(combined.cell(1, "Chemical formula"), Some("Fe"));
    }

    #[test]
    fn test_empty_input() {
        let combined = combine(Vec::new());
        assert!(combined.columns().is_empty());
        assert!(combined.is_empty());
    }
}
