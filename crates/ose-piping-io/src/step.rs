use std::path::Path;

use anyhow::{Context, Result};
use ose_piping_topology::Solid;
use tracing::debug;
use truck_stepio::out;

use crate::ensure_parent_dir;

pub fn export_step(solid: &Solid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let compressed = solid.compress();
    let header = out::StepHeaderDescriptor {
        file_name: path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("fitting.step")
            .to_string(),
        organization_system: "ose-piping".to_string(),
        ..Default::default()
    };

    let step_string =
        out::CompleteStepDisplay::new(out::StepModel::from(&compressed), header).to_string();
    debug!(path = %path.display(), bytes = step_string.len(), "STEP model ready");

    std::fs::write(path, step_string)
        .with_context(|| format!("write STEP file {}", path.display()))?;
    Ok(())
}
