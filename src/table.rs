//! Plain text tables, laid out the same way the Atlas CLI prints them.
use std::fmt::Display;

/// Table with a header row and data rows.
///
/// Every column is as wide as its widest cell plus padding.
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column definition: a name and a function producing the cell of an item.
pub type TableColumn<S, T> = (S, fn(&T) -> String);

const COLUMN_PADDING: usize = 4;

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Build a table with one row per item.
    pub fn from_iter<'a, S, Iter, Item>(iter: Iter, columns: &[TableColumn<S, Item>]) -> Self
    where
        S: Display,
        Iter: IntoIterator<Item = &'a Item>,
        Item: 'a,
    {
        let header = columns.iter().map(|(name, _)| name.to_string()).collect();

        let rows = iter
            .into_iter()
            .map(|item| columns.iter().map(|(_, f)| f(item)).collect())
            .collect();

        Self::new(header, rows)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.header.len()];

        for row in std::iter::once(&self.header).chain(self.rows.iter()) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len() + COLUMN_PADDING);
            }
        }

        widths
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widths = self.column_widths();

        for row in std::iter::once(&self.header).chain(self.rows.iter()) {
            let line = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<String>();

            writeln!(f, "{}", line.trim_end())?;
        }

        Ok(())
    }
}
