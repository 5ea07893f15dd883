//! Flat tabular view of pipeline rows.
//!
//! Every row type that can be materialized implements [`Record`]: a static
//! schema plus one [`Cell`] per column. The warehouse uses this to write CSV
//! and to build Polars frames for Parquet output, so nested in-memory types
//! (a stat line joined to a contract) still land as one flat table.

use std::io;

use polars::prelude::*;

use super::DataError;

/// Column storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Int,
    Float,
    Text,
    Bool,
}

/// One column of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: CellKind,
}

impl Field {
    pub const fn int(name: &'static str) -> Self {
        Self { name, kind: CellKind::Int }
    }

    pub const fn float(name: &'static str) -> Self {
        Self { name, kind: CellKind::Float }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: CellKind::Text }
    }

    pub const fn bool(name: &'static str) -> Self {
        Self { name, kind: CellKind::Bool }
    }
}

/// A single nullable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Bool(Option<bool>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(Some(value.into()))
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        Cell::Text(value.map(str::to_string))
    }

    /// CSV rendering. Null is the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Int(Some(v)) => v.to_string(),
            Cell::Float(Some(v)) => v.to_string(),
            Cell::Text(Some(v)) => v.clone(),
            Cell::Bool(Some(v)) => v.to_string(),
            Cell::Int(None) | Cell::Float(None) | Cell::Text(None) | Cell::Bool(None) => {
                String::new()
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Cell::Int(None) | Cell::Float(None) | Cell::Text(None) | Cell::Bool(None)
        )
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => *v,
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => *v,
            Cell::Int(v) => v.map(|i| i as f64),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(v) => v.clone(),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(v) => *v,
            _ => None,
        }
    }
}

/// A row type with a fixed flat schema.
pub trait Record {
    const SCHEMA: &'static [Field];

    /// Cells in `SCHEMA` order.
    fn cells(&self) -> Vec<Cell>;
}

/// Column names of a record type.
pub fn column_names<R: Record>() -> Vec<&'static str> {
    R::SCHEMA.iter().map(|f| f.name).collect()
}

/// Write rows as CSV (header + one line per row).
pub fn write_csv<R: Record, W: io::Write>(rows: &[R], writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(R::SCHEMA.iter().map(|f| f.name))?;
    for row in rows {
        let cells = row.cells();
        debug_assert_eq!(cells.len(), R::SCHEMA.len());
        wtr.write_record(cells.iter().map(Cell::render))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render rows to an in-memory CSV string.
pub fn to_csv_string<R: Record>(rows: &[R]) -> Result<String, DataError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| DataError::Validation(format!("csv is not utf-8: {e}")))
}

/// Build a typed Polars frame from rows. Empty inputs still carry the schema.
pub fn to_dataframe<R: Record>(rows: &[R]) -> Result<DataFrame, DataError> {
    let cells: Vec<Vec<Cell>> = rows.iter().map(Record::cells).collect();

    let columns: Vec<Column> = R::SCHEMA
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let name: PlSmallStr = field.name.into();
            match field.kind {
                CellKind::Int => {
                    let values: Vec<Option<i64>> = cells.iter().map(|r| r[i].as_i64()).collect();
                    Column::new(name, values)
                }
                CellKind::Float => {
                    let values: Vec<Option<f64>> = cells.iter().map(|r| r[i].as_f64()).collect();
                    Column::new(name, values)
                }
                CellKind::Text => {
                    let values: Vec<Option<String>> =
                        cells.iter().map(|r| r[i].as_text()).collect();
                    Column::new(name, values)
                }
                CellKind::Bool => {
                    let values: Vec<Option<bool>> = cells.iter().map(|r| r[i].as_bool()).collect();
                    Column::new(name, values)
                }
            }
        })
        .collect();

    DataFrame::new(columns).map_err(|e| DataError::Parquet(format!("dataframe creation: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        games: Option<i64>,
        ppg: Option<f64>,
        traded: bool,
    }

    impl Record for Row {
        const SCHEMA: &'static [Field] = &[
            Field::text("name"),
            Field::int("games"),
            Field::float("ppg"),
            Field::bool("traded"),
        ];

        fn cells(&self) -> Vec<Cell> {
            vec![
                Cell::text(self.name),
                Cell::Int(self.games),
                Cell::Float(self.ppg),
                Cell::Bool(Some(self.traded)),
            ]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "A", games: Some(10), ppg: Some(12.5), traded: false },
            Row { name: "B", games: None, ppg: None, traded: true },
        ]
    }

    #[test]
    fn csv_renders_nulls_as_empty() {
        let csv = to_csv_string(&rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,games,ppg,traded");
        assert_eq!(lines[1], "A,10,12.5,false");
        assert_eq!(lines[2], "B,,,true");
    }

    #[test]
    fn dataframe_keeps_schema_and_nulls() {
        let df = to_dataframe(&rows()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
        assert_eq!(df.column("ppg").unwrap().null_count(), 1);
    }

    #[test]
    fn empty_dataframe_still_has_columns() {
        let df = to_dataframe::<Row>(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn column_names_follow_schema() {
        assert_eq!(column_names::<Row>(), vec!["name", "games", "ppg", "traded"]);
    }
}
