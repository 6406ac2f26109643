//! Tabular data shapes: delimited-text tables and keyed value series.

use std::fmt::Write as _;

use crate::error::Error;

/// A two-dimensional table parsed from a delimited text payload.
///
/// Rows are time steps or flow categories, columns are named series. Cells
/// are kept as raw strings; numeric views are produced on demand with
/// [`Table::numeric_column`]. A table is replaced wholesale on refresh and
/// callers only ever observe shared references, so the cached value cannot
/// be mutated from outside the owning client.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses a table from comma-delimited text with a header row.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the payload is not well-formed CSV, for
    /// example on rows with a differing field count.
    pub fn from_delimited_text(text: &str) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Decode(format!("table header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::Decode(format!("table row: {e}")))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Column names in payload order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the row at `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// All cells of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx).map(String::as_str))
                .collect(),
        )
    }

    /// The named column parsed as `f64` values.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the column is absent or any cell fails to
    /// parse as a number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, Error> {
        let cells = self
            .column(name)
            .ok_or_else(|| Error::Decode(format!("no column named \"{name}\"")))?;
        cells
            .iter()
            .map(|cell| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::Decode(format!("column \"{name}\": \"{cell}\" is not numeric")))
            })
            .collect()
    }
}

/// A keyed one-dimensional sequence of values, e.g. an hourly input profile.
///
/// Serialized to one value per line for file-form uploads; the series key
/// doubles as the default upload name.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    key: String,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series with the given key and values.
    pub fn new(key: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// The series key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The series values in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the values as delimited text, one value per line.
    ///
    /// Uses the shortest round-trippable representation of each value, so
    /// parsing the text back yields the exact same numbers.
    pub fn to_delimited_text(&self) -> String {
        let mut out = String::new();
        for value in &self.values {
            let _ = writeln!(out, "{value}");
        }
        out
    }

    /// Parses a series from delimited text, one value per line.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if any non-blank line fails to parse as a
    /// number.
    pub fn from_delimited_text(key: impl Into<String>, text: &str) -> Result<Self, Error> {
        let key = key.into();
        let mut values = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value = line
                .parse::<f64>()
                .map_err(|_| Error::Decode(format!("series \"{key}\": \"{line}\" is not numeric")))?;
            values.push(value);
        }
        Ok(Self { key, values })
    }
}

#[cfg(test)]
mod tests {
    use super::{Series, Table};

    const PRICE_CSV: &str = "Time,Price (Euros)\n2050-01-01 00:00,23.45\n2050-01-01 01:00,21.10\n2050-01-01 02:00,19.87\n";

    #[test]
    fn parses_header_and_rows() {
        let table = Table::from_delimited_text(PRICE_CSV).expect("csv should parse");
        assert_eq!(table.columns(), ["Time", "Price (Euros)"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn column_by_name_preserves_row_order() {
        let table = Table::from_delimited_text(PRICE_CSV).expect("csv should parse");
        let times = table.column("Time").expect("column should exist");
        assert_eq!(times[0], "2050-01-01 00:00");
        assert_eq!(times[2], "2050-01-01 02:00");
        assert!(table.column("Volume").is_none());
    }

    #[test]
    fn numeric_column_parses_values() {
        let table = Table::from_delimited_text(PRICE_CSV).expect("csv should parse");
        let prices = table
            .numeric_column("Price (Euros)")
            .expect("prices should be numeric");
        assert_eq!(prices, vec![23.45, 21.10, 19.87]);
    }

    #[test]
    fn numeric_column_rejects_non_numeric_cells() {
        let table = Table::from_delimited_text(PRICE_CSV).expect("csv should parse");
        assert!(table.numeric_column("Time").is_err());
    }

    #[test]
    fn uneven_row_is_a_decode_error() {
        let result = Table::from_delimited_text("a,b\n1,2\n3\n");
        assert!(result.is_err());
    }

    #[test]
    fn header_only_payload_is_an_empty_table() {
        let table = Table::from_delimited_text("key,value\n").expect("csv should parse");
        assert_eq!(table.columns(), ["key", "value"]);
        assert!(table.is_empty());
        assert_eq!(table.row(0), None);
    }

    #[test]
    fn series_text_round_trip_is_exact() {
        let series = Series::new("interconnector_1_price", vec![0.0, 12.34, 56.789, 1e-3]);
        let text = series.to_delimited_text();
        let parsed =
            Series::from_delimited_text("interconnector_1_price", &text).expect("should parse");
        assert_eq!(parsed, series);
    }

    #[test]
    fn series_rejects_non_numeric_lines() {
        assert!(Series::from_delimited_text("p", "1.0\nnot-a-number\n").is_err());
    }

    #[test]
    fn series_skips_blank_lines() {
        let parsed = Series::from_delimited_text("p", "1.0\n\n2.0\n").expect("should parse");
        assert_eq!(parsed.values(), [1.0, 2.0]);
    }
}
