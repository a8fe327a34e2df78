use anyhow::{Context, Result};
use ose_piping_fittings::{
    DEFAULT_SHAPEOPS_TOLERANCE, Fitting, OutputType, Pipe, Tee, dock_solid, nearest_port,
};
use ose_piping_geometry::{Placement, Point3, Rotation, Vector3};
use ose_piping_io::export_step;

fn main() -> Result<()> {
    let tee = Tee::default();
    let tee_placement = Placement::new(
        Vector3::new(0.0, 0.0, 100.0),
        Rotation::from_ypr(30.0, 0.0, 0.0),
    );
    let tee_ports = tee.ports();
    // The branch socket sits on top of the tee.
    let target = tee_placement.apply_point(Point3::new(0.0, 0.0, tee.g2));
    let branch = nearest_port(&tee_placement, &tee_ports, target).context("tee has no ports")?;

    let pipe = Pipe {
        od: tee.pod2,
        thk: tee.pthk2,
        h: 300.0,
    };
    let pipe_solid = pipe.element(OutputType::Solid, DEFAULT_SHAPEOPS_TOLERANCE)?;
    let pipe_solid = pipe_solid.geometry().solid().context("pipe has no solid")?;
    let docked = dock_solid(pipe_solid, &pipe.ports()[0], &tee_placement, branch);
    export_step(&docked, "out/branch_pipe.step")?;
    Ok(())
}
