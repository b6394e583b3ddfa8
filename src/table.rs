use std::fmt;

/// A single decoded value. Numbers keep their native representation until display time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            Cell::Empty | Cell::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Text(value) => f.write_str(value),
        }
    }
}

/// Column-named rows. Every row holds exactly `columns.len()` cells and column names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Repeated names get a `.1`, `.2`, ... suffix so no column shadows another.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: unique_column_names(columns),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding it with empty cells up to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
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
        self.columns.iter().position(|column| column == name)
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Keep only the rows accepted by `keep`, preserving order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Replace every cell of `name` with the result of `map`. Returns false when the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut map: F) -> bool
    where
        F: FnMut(&Cell) -> Cell,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = map(&row[idx]);
        }
        true
    }

    /// Row-wise concatenation in iteration order.
    ///
    /// Columns are the union of all inputs in first-seen order; cells for columns a table
    /// does not carry are left empty. Duplicate rows are preserved.
    pub fn concat<'a, I>(tables: I) -> Table
    where
        I: IntoIterator<Item = &'a Table>,
    {
        let tables: Vec<&Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut combined = Table::new(columns);
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|column| combined.column_index(column))
                .collect();

            for row in &table.rows {
                let mut out = vec![Cell::Empty; combined.columns.len()];
                for (src, dst) in mapping.iter().enumerate() {
                    out[*dst] = row[src].clone();
                }
                combined.rows.push(out);
            }
        }

        combined
    }
}

fn unique_column_names(columns: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(columns.len());
    for name in columns {
        if !unique.contains(&name) {
            unique.push(name);
            continue;
        }
        let mut suffix = 1;
        let renamed = loop {
            let candidate = format!("{name}.{suffix}");
            if !unique.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        unique.push(renamed);
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn concat_preserves_order_and_duplicates() {
        let first = table(&["a"], vec![vec![Cell::Int(1)], vec![Cell::Int(2)]]);
        let second = table(&["a"], vec![vec![Cell::Int(2)]]);

        let combined = Table::concat([&first, &second]);

        let values: Vec<Option<f64>> = combined.column("a").unwrap().map(Cell::as_f64).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(2.0)]);
    }

    #[test]
    fn concat_unions_columns_and_fills_gaps() {
        let first = table(&["a", "b"], vec![vec![Cell::Int(1), Cell::Text("x".into())]]);
        let second = table(&["b", "c"], vec![vec![Cell::Text("y".into()), Cell::Float(2.5)]]);

        let combined = Table::concat([&first, &second]);

        assert_eq!(combined.columns(), ["a", "b", "c"]);
        assert_eq!(
            combined.rows()[1],
            vec![Cell::Empty, Cell::Text("y".into()), Cell::Float(2.5)]
        );
        assert_eq!(combined.rows()[0][2], Cell::Empty);
    }

    #[test]
    fn repeated_column_names_are_suffixed() {
        let t = table(&["mes", "a", "a", "a.1", "a"], vec![]);
        assert_eq!(t.columns(), ["mes", "a", "a.1", "a.1.1", "a.2"]);
    }

    #[test]
    fn concat_keeps_cells_of_repeated_columns() {
        let first = table(
            &["mes", "a", "a"],
            vec![vec![Cell::Int(3), Cell::Int(1), Cell::Int(2)]],
        );

        let combined = Table::concat([&first]);

        assert_eq!(combined.columns(), ["mes", "a", "a.1"]);
        assert_eq!(combined.rows()[0], vec![Cell::Int(3), Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn push_row_pads_short_rows() {
        let t = table(&["a", "b", "c"], vec![vec![Cell::Int(1)]]);
        assert_eq!(t.rows()[0].len(), 3);
        assert!(t.rows()[0][2].is_empty());
    }

    #[test]
    fn map_column_reports_missing_column() {
        let mut t = table(&["a"], vec![vec![Cell::Int(1)]]);
        assert!(!t.map_column("missing", |cell| cell.clone()));
        assert!(t.map_column("a", |_| Cell::Text("z".into())));
        assert_eq!(t.rows()[0][0], Cell::Text("z".into()));
    }
}
