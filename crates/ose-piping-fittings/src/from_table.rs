//! Fittings built from catalog rows.

use tracing::info;

use crate::any_fitting::AnyFitting;
use crate::element::{FittingElement, FittingKind, OutputType};
use crate::error::{Error, Result};
use crate::table::{DimensionTable, dn_string, pressure_rating, psize};

#[derive(Clone, Debug)]
pub struct FittingFromTable {
    table: DimensionTable,
}

impl FittingFromTable {
    pub fn new(table: DimensionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DimensionTable {
        &self.table
    }

    /// Dimensions of `part_number` read as a fitting of `kind`.
    pub fn fitting(&self, kind: FittingKind, part_number: &str) -> Result<AnyFitting> {
        let key = self.table.key_column();
        let missing: Vec<String> = AnyFitting::columns(kind)
            .iter()
            .copied()
            .chain(std::iter::once(key))
            .filter(|column| !self.table.has_column(column))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                kind: kind.to_string(),
                columns: missing,
            });
        }
        let row = self
            .table
            .find_part(part_number)
            .ok_or_else(|| Error::PartNotFound(part_number.to_string()))?;
        AnyFitting::from_row(kind, &row)
    }

    /// Creates the part `part_number`. Pipes get [`crate::Pipe::DEFAULT_LENGTH`].
    pub fn create(
        &self,
        kind: FittingKind,
        part_number: &str,
        output: OutputType,
        tol: f64,
    ) -> Result<FittingElement> {
        let fitting = self.fitting(kind, part_number)?;
        self.finish(fitting, part_number, output, tol)
    }

    pub fn create_pipe(
        &self,
        part_number: &str,
        length: f64,
        output: OutputType,
        tol: f64,
    ) -> Result<FittingElement> {
        let pipe = self
            .fitting(FittingKind::Pipe, part_number)?
            .with_length(length);
        self.finish(pipe, part_number, output, tol)
    }

    fn finish(
        &self,
        fitting: AnyFitting,
        part_number: &str,
        output: OutputType,
        tol: f64,
    ) -> Result<FittingElement> {
        let mut element = fitting.element(output, tol)?.with_part_number(part_number);
        if let Some(row) = self.table.find_part(part_number) {
            element.insert_text("PSize", &psize(&row));
            element.insert_text("PRating", &pressure_rating(&row));
            element.insert_text("DN", &dn_string(&row));
        }
        info!(
            kind = %element.kind,
            part = part_number,
            guid = %element.guid,
            "fitting created from table"
        );
        Ok(element)
    }
}

impl From<DimensionTable> for FittingFromTable {
    fn from(table: DimensionTable) -> Self {
        Self::new(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ParameterValue;
    use crate::fitting::Fitting;
    use crate::pipe::Pipe;

    const PIPES: &str = "\
PartNumber,PSize,OD,Thk,Schedule
P-1,1/2in,21.3,2.77,40
P-2,3/4in,26.7,2.87,
";

    fn pipes() -> Result<FittingFromTable> {
        let mut table = DimensionTable::new(Pipe::COLUMNS);
        table.load(PIPES.as_bytes())?;
        Ok(FittingFromTable::new(table))
    }

    #[test]
    fn pipe_rows_become_elements() -> Result<()> {
        let builder = pipes()?;
        let element = builder.create_pipe("P-1", 600.0, OutputType::Parts, 0.05)?;
        assert_eq!(element.name, "OSE-Pipe");
        assert_eq!(element.part_number.as_deref(), Some("P-1"));
        assert_eq!(element.number("H"), Some(600.0));
        assert_eq!(element.number("OD"), Some(21.3));
        assert_eq!(
            element.parameters.get("PRating"),
            Some(&ParameterValue::Text("SCH-40".into()))
        );
        assert_eq!(
            element.parameters.get("PSize"),
            Some(&ParameterValue::Text("1/2in".into()))
        );
        assert!(!element.parameters.contains_key("DN"));
        Ok(())
    }

    #[test]
    fn default_pipe_length() -> Result<()> {
        let element = pipes()?.create(FittingKind::Pipe, "P-2", OutputType::Parts, 0.05)?;
        assert_eq!(element.number("H"), Some(Pipe::DEFAULT_LENGTH));
        assert!(!element.parameters.contains_key("PRating"));
        Ok(())
    }

    #[test]
    fn unknown_parts_and_kinds_are_reported() -> Result<()> {
        let builder = pipes()?;
        assert!(matches!(
            builder.create(FittingKind::Pipe, "P-9", OutputType::Parts, 0.05),
            Err(Error::PartNotFound(part)) if part == "P-9"
        ));
        match builder.create(FittingKind::Corner, "P-1", OutputType::Parts, 0.05) {
            Err(Error::MissingColumns { kind, columns }) => {
                assert_eq!(kind, "Corner");
                assert_eq!(columns, ["G", "H", "M", "POD"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
