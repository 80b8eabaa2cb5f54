use super::mapping::{category_for_column, ColumnCategory};
use super::normalizer::{normalize_column, normalize_identifier};
use super::value::CellValue;
use std::collections::HashMap;
use tracing::warn;

/// Header of a dataset column with its category resolved at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub category: ColumnCategory,
}

#[derive(Debug, Clone)]
struct Row {
    identifier: String,
    cells: Vec<CellValue>,
}

/// Immutable, row-indexed table keyed by student identifier.
#[derive(Debug, Clone, Default)]
pub struct TabularDataset {
    id_column: String,
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    rows: Vec<Row>,
    row_index: HashMap<String, usize>,
}

impl TabularDataset {
    /// A dataset with no rows; every lookup reports not found.
    pub fn empty(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            ..Self::default()
        }
    }

    /// Build a dataset from parsed rows. Rows whose identifier cell is missing
    /// are skipped; for duplicate identifiers the first row wins.
    pub fn from_rows(
        id_column: impl Into<String>,
        headers: Vec<String>,
        rows: impl IntoIterator<Item = Vec<CellValue>>,
    ) -> Result<Self, DatasetError> {
        let id_column = id_column.into();
        let mut column_index = HashMap::new();
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                let name = normalize_identifier(&name).to_string();
                column_index
                    .entry(normalize_column(&name))
                    .or_insert(position);
                Column {
                    category: category_for_column(&name),
                    name,
                }
            })
            .collect::<Vec<_>>();

        let id_position = *column_index
            .get(&normalize_column(&id_column))
            .ok_or_else(|| DatasetError::MissingIdentifierColumn(id_column.clone()))?;

        let mut table_rows = Vec::new();
        let mut row_index = HashMap::new();
        let mut duplicates = 0usize;

        for mut cells in rows {
            cells.resize(columns.len(), CellValue::Missing);
            let Some(identifier) = cells[id_position]
                .to_display_string()
                .map(|raw| normalize_identifier(&raw).to_string())
                .filter(|id| !id.is_empty())
            else {
                continue;
            };

            if row_index.contains_key(&identifier) {
                duplicates += 1;
                warn!(%identifier, "duplicate identifier ignored; first row wins");
                continue;
            }

            row_index.insert(identifier.clone(), table_rows.len());
            table_rows.push(Row { identifier, cells });
        }

        if duplicates > 0 {
            warn!(duplicates, id_column = %id_column, "dataset contained duplicate identifiers");
        }

        Ok(Self {
            id_column,
            columns,
            column_index,
            rows: table_rows,
            row_index,
        })
    }

    pub fn lookup(&self, identifier: &str) -> Option<RowRef<'_>> {
        let key = normalize_identifier(identifier);
        self.row_index.get(key).map(|&position| RowRef {
            dataset: self,
            row: &self.rows[position],
        })
    }

    /// Numeric values of a column in row order, missing and text cells
    /// excluded. Unknown columns yield an empty sequence.
    pub fn column(&self, name: &str) -> Vec<f64> {
        match self.column_position(name) {
            Some(position) => self
                .rows
                .iter()
                .filter_map(|row| row.cells.get(position).and_then(CellValue::as_f64))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.column_index.get(&normalize_column(name)).copied()
    }
}

/// Borrowed view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    dataset: &'a TabularDataset,
    row: &'a Row,
}

impl<'a> RowRef<'a> {
    pub fn identifier(&self) -> &'a str {
        &self.row.identifier
    }

    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.dataset
            .column_position(column)
            .and_then(|position| self.row.cells.get(position))
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_f64)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(CellValue::to_display_string)
    }

    /// Cells paired with their column headers, in header order.
    pub fn cells(&self) -> impl Iterator<Item = (&'a Column, &'a CellValue)> + 'a {
        self.dataset.columns.iter().zip(self.row.cells.iter())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("identifier column '{0}' not present in headers")]
    MissingIdentifierColumn(String),
}
