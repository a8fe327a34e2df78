use anyhow::{Context, Result};
use ose_piping_fittings::{DEFAULT_SHAPEOPS_TOLERANCE, Elbow, Fitting, OutputType};
use ose_piping_io::export_step;

fn main() -> Result<()> {
    let elbow = Elbow {
        bend_angle: 90.0,
        ..Elbow::default()
    };
    let element = elbow.element(OutputType::Solid, DEFAULT_SHAPEOPS_TOLERANCE)?;
    let solid = element.geometry().solid().context("elbow has no solid")?;
    export_step(solid, "out/elbow.step")?;
    Ok(())
}
