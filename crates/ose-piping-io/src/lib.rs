//! Export of fitting solids to STEP and Wavefront OBJ files.

pub mod mesh;
pub mod step;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ose_piping_topology::Solid;

pub use mesh::{DEFAULT_TESSELLATION_TOLERANCE, export_obj, triangulate_solid};
pub use step::export_step;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Step,
    Obj,
}

impl ExportFormat {
    /// Format implied by the extension of `path` (`.step`, `.stp` or `.obj`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("step" | "stp") => Ok(Self::Step),
            Some("obj") => Ok(Self::Obj),
            _ => bail!(
                "cannot tell the export format of {}: expected .step, .stp or .obj",
                path.display()
            ),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step => f.write_str("STEP"),
            Self::Obj => f.write_str("OBJ"),
        }
    }
}

/// Writes `solid` in the format given by the extension of `path`.
///
/// `tol` is the tessellation tolerance and only matters for meshes.
pub fn export_solid(solid: &Solid, path: impl AsRef<Path>, tol: f64) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    match format {
        ExportFormat::Step => export_step(solid, path)?,
        ExportFormat::Obj => export_obj(solid, path, tol)?,
    }
    Ok(format)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_the_extension() -> Result<()> {
        assert_eq!(ExportFormat::from_path("out/elbow.step")?, ExportFormat::Step);
        assert_eq!(ExportFormat::from_path("tee.STP")?, ExportFormat::Step);
        assert_eq!(ExportFormat::from_path("corner.obj")?, ExportFormat::Obj);
        assert!(ExportFormat::from_path("corner.stl").is_err());
        assert!(ExportFormat::from_path("corner").is_err());
        Ok(())
    }
}
