use anyhow::{Context, Result};
use ose_piping_fittings::{
    DEFAULT_SHAPEOPS_TOLERANCE, DimensionTable, Fitting, FittingFromTable, FittingKind, OutputType,
    Tee,
};
use ose_piping_io::{DEFAULT_TESSELLATION_TOLERANCE, export_obj};

fn main() -> Result<()> {
    let mut table = DimensionTable::new(Tee::COLUMNS);
    table.load_path("tables/tee.csv")?;
    let builder = FittingFromTable::new(table);
    let element = builder.create(
        FittingKind::Tee,
        "T-075-050",
        OutputType::Solid,
        DEFAULT_SHAPEOPS_TOLERANCE,
    )?;
    let solid = element.geometry().solid().context("tee has no solid")?;
    export_obj(solid, "out/tee.obj", DEFAULT_TESSELLATION_TOLERANCE)?;
    Ok(())
}
