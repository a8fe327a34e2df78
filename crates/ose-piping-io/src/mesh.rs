use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ose_piping_topology::Solid;
use tracing::debug;
use truck_meshalgo::prelude::*;
use truck_polymesh::{PolygonMesh, obj};

use crate::ensure_parent_dir;

/// Chord tolerance in millimeters.
pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 0.1;

pub fn triangulate_solid(solid: &Solid, tol: f64) -> PolygonMesh {
    let mut mesh = solid.triangulation(tol).to_polygon();
    mesh.add_naive_normals(true);
    mesh.put_together_same_attrs(truck_base::tolerance::TOLERANCE);
    mesh.remove_unused_attrs();
    mesh
}

pub fn export_obj(solid: &Solid, path: impl AsRef<Path>, tol: f64) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mesh = triangulate_solid(solid, tol);
    if mesh.positions().is_empty() {
        bail!("triangulation of {} produced an empty mesh", path.display());
    }
    debug!(
        path = %path.display(),
        vertices = mesh.positions().len(),
        faces = mesh.faces().len(),
        "mesh ready"
    );

    let file = File::create(path).with_context(|| format!("create OBJ file {}", path.display()))?;
    obj::write(&mesh, file).with_context(|| format!("write OBJ file {}", path.display()))?;
    Ok(())
}
