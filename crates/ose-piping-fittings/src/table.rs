//! Catalog tables of fitting dimensions.
//!
//! A table is a CSV file whose first record is the header. One column holds a
//! unique part number; the remaining columns hold dimensions such as `POD`,
//! `PThk` or `BendAngle`, either as bare numbers or with a unit (`"2 cm"`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ose_piping_base::{parse_angle, parse_length};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_KEY_COLUMN: &str = "PartNumber";

#[derive(Clone, Debug)]
pub struct DimensionTable {
    mandatory_columns: Vec<String>,
    key_column: String,
    key_index: Option<usize>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    has_valid_data: bool,
}

impl DimensionTable {
    pub fn new(mandatory_columns: &[&str]) -> Self {
        Self::with_key_column(mandatory_columns, DEFAULT_KEY_COLUMN)
    }

    pub fn with_key_column(mandatory_columns: &[&str], key_column: &str) -> Self {
        Self {
            mandatory_columns: mandatory_columns.iter().map(|c| c.to_string()).collect(),
            key_column: key_column.to_string(),
            key_index: None,
            headers: Vec::new(),
            rows: Vec::new(),
            has_valid_data: false,
        }
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.load(file)?;
        debug!(path = %path.as_ref().display(), rows = self.rows.len(), "catalog loaded");
        Ok(())
    }

    /// Replaces the content of the table with the CSV records of `reader`.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        self.has_valid_data = false;
        self.key_index = None;
        self.headers.clear();
        self.rows.clear();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let key_index = headers
            .iter()
            .position(|h| *h == self.key_column)
            .ok_or_else(|| Error::MissingKeyColumn(self.key_column.clone()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            let key = row.get(key_index).cloned().unwrap_or_default();
            if rows.iter().any(|existing| existing.get(key_index) == Some(&key)) {
                return Err(Error::DuplicateKey {
                    key,
                    column: self.key_column.clone(),
                });
            }
            rows.push(row);
        }

        self.headers = headers;
        self.rows = rows;
        self.key_index = Some(key_index);
        self.has_valid_data = self.has_necessary_columns();
        Ok(())
    }

    /// True once a table with the key column and every mandatory column is loaded.
    pub fn has_valid_data(&self) -> bool {
        self.has_valid_data
    }

    pub fn has_necessary_columns(&self) -> bool {
        self.missing_columns().is_empty()
    }

    pub fn missing_columns(&self) -> Vec<String> {
        self.mandatory_columns
            .iter()
            .chain(std::iter::once(&self.key_column))
            .filter(|column| !self.headers.contains(column))
            .cloned()
            .collect()
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose key equals `key`.
    pub fn find_part(&self, key: &str) -> Option<Row<'_>> {
        let key_index = self.key_index?;
        self.rows
            .iter()
            .find(|row| row.get(key_index).map(String::as_str) == Some(key))
            .map(|values| Row {
                headers: &self.headers,
                values,
            })
    }

    pub fn part_key(&self, index: usize) -> Option<&str> {
        let key_index = self.key_index?;
        self.rows.get(index)?.get(key_index).map(String::as_str)
    }

    pub fn part_keys(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).filter_map(|index| self.part_key(index))
    }
}

/// One catalog row viewed through the table header.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.values.get(index).map(String::as_str)
    }

    pub fn has(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Non-empty text of `column`.
    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.get(column).filter(|value| !value.is_empty())
    }

    pub fn length(&self, column: &str) -> Result<f64> {
        let text = self.require(column)?;
        parse_length(text).map_err(|source| Error::InvalidValue {
            column: column.to_string(),
            source,
        })
    }

    pub fn angle(&self, column: &str) -> Result<f64> {
        let text = self.require(column)?;
        parse_angle(text).map_err(|source| Error::InvalidValue {
            column: column.to_string(),
            source,
        })
    }

    fn require(&self, column: &str) -> Result<&'a str> {
        self.text(column)
            .ok_or_else(|| Error::MissingValue(column.to_string()))
    }
}

/// Pressure rating such as `SCH-40`, from the `Schedule` or `SCH` column.
pub fn pressure_rating(row: &Row<'_>) -> String {
    row.text("Schedule")
        .or_else(|| row.text("SCH"))
        .map(|schedule| format!("SCH-{schedule}"))
        .unwrap_or_default()
}

/// Nominal diameter such as `DN25`.
pub fn dn_string(row: &Row<'_>) -> String {
    row.text("DN")
        .map(|dn| format!("DN{dn}"))
        .unwrap_or_default()
}

pub fn psize(row: &Row<'_>) -> String {
    row.text("PSize").unwrap_or_default().to_string()
}

/// Pipe wall thickness `PThk<suffix>`, or `(POD - PID) / 2` for tables listing the inner diameter.
pub fn pipe_thickness(row: &Row<'_>, suffix: &str) -> Result<f64> {
    let thickness = format!("PThk{suffix}");
    if row.has(&thickness) {
        return row.length(&thickness);
    }
    let outer = row.length(&format!("POD{suffix}"))?;
    let inner = row.length(&format!("PID{suffix}"))?;
    Ok((outer - inner) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELBOWS: &str = "\
PartNumber,BendAngle,H,J,M,POD,PID,Schedule,DN
E-20,90,30,20,30,20,14,40,20
E-25,45 deg,3.5 cm,2.5 cm,35,25.4,19,,25
";

    fn elbow_table() -> Result<DimensionTable> {
        let mut table = DimensionTable::new(&["BendAngle", "H", "J", "M", "POD"]);
        table.load(ELBOWS.as_bytes())?;
        Ok(table)
    }

    #[test]
    fn loads_rows_and_finds_parts() -> Result<()> {
        let table = elbow_table()?;
        assert!(table.has_valid_data());
        assert_eq!(table.len(), 2);
        assert_eq!(table.part_key(1), Some("E-25"));
        assert_eq!(table.part_keys().collect::<Vec<_>>(), ["E-20", "E-25"]);

        let row = table.find_part("E-25").ok_or_else(|| Error::PartNotFound("E-25".into()))?;
        assert_eq!(row.angle("BendAngle")?, 45.0);
        assert_eq!(row.length("H")?, 35.0);
        assert!(table.find_part("E-99").is_none());
        Ok(())
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut table = DimensionTable::new(&[]);
        let csv = "PartNumber,POD\nA,10\nA,12\n";
        match table.load(csv.as_bytes()) {
            Err(Error::DuplicateKey { key, column }) => {
                assert_eq!(key, "A");
                assert_eq!(column, "PartNumber");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!table.has_valid_data());
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let mut table = DimensionTable::new(&["POD"]);
        let result = table.load("Name,POD\nA,10\n".as_bytes());
        assert!(matches!(result, Err(Error::MissingKeyColumn(_))));
    }

    #[test]
    fn missing_mandatory_columns_leave_the_table_invalid() -> Result<()> {
        let mut table = DimensionTable::new(&["POD", "PThk"]);
        table.load("PartNumber,POD\nA,10\n".as_bytes())?;
        assert!(!table.has_valid_data());
        assert_eq!(table.missing_columns(), ["PThk"]);
        Ok(())
    }

    #[test]
    fn catalog_helpers() -> Result<()> {
        let table = elbow_table()?;
        let first = table.find_part("E-20").ok_or_else(|| Error::PartNotFound("E-20".into()))?;
        let second = table.find_part("E-25").ok_or_else(|| Error::PartNotFound("E-25".into()))?;

        assert_eq!(pressure_rating(&first), "SCH-40");
        assert_eq!(pressure_rating(&second), "");
        assert_eq!(dn_string(&second), "DN25");
        assert_eq!(psize(&first), "");
        assert_eq!(pipe_thickness(&first, "")?, 3.0);
        Ok(())
    }

    #[test]
    fn unparsable_values_name_their_column() -> Result<()> {
        let mut table = DimensionTable::new(&["POD"]);
        table.load("PartNumber,POD\nA,wide\n".as_bytes())?;
        let row = table.find_part("A").ok_or_else(|| Error::PartNotFound("A".into()))?;
        match row.length("POD") {
            Err(Error::InvalidValue { column, .. }) => assert_eq!(column, "POD"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(row.length("PThk"), Err(Error::MissingValue(_))));
        Ok(())
    }
}
