use std::panic::{self, AssertUnwindSafe};

use ose_piping_topology::{Solid, is_closed};
use thiserror::Error;

mod csg;

pub use csg::{Feature, Node};

pub const DEFAULT_SHAPEOPS_TOLERANCE: f64 = 0.05;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("boolean operation failed: {0}")]
    BooleanFailed(&'static str),
    #[error("feature '{name}' failed: {source}")]
    Feature {
        name: String,
        #[source]
        source: Box<Error>,
    },
    #[error(transparent)]
    Topology(#[from] ose_piping_topology::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn difference(base: &Solid, tool: &Solid, tol: f64) -> Result<Solid> {
    ensure_tolerance(tol)?;

    let mut inverted_tool = tool.clone();
    inverted_tool.not();

    guarded(base, tool, || truck_shapeops::and(base, &inverted_tool, tol))
}

pub fn union(base: &Solid, tool: &Solid, tol: f64) -> Result<Solid> {
    ensure_tolerance(tol)?;

    guarded(base, tool, || truck_shapeops::or(base, tool, tol))
}

pub fn intersection(base: &Solid, tool: &Solid, tol: f64) -> Result<Solid> {
    ensure_tolerance(tol)?;

    guarded(base, tool, || truck_shapeops::and(base, tool, tol))
}

// The kernel asserts that its operands and its result are closed shells.
// Those assertions panic, so they are checked here and reported as errors.
fn guarded<F>(base: &Solid, tool: &Solid, operation: F) -> Result<Solid>
where
    F: FnOnce() -> Option<Solid>,
{
    if !is_closed(base) || !is_closed(tool) {
        return Err(Error::BooleanFailed("operand is not a closed shell"));
    }
    let solid = panic::catch_unwind(AssertUnwindSafe(operation))
        .map_err(|_| Error::BooleanFailed("kernel could not close the result"))?
        .ok_or(Error::BooleanFailed("kernel returned no solid"))?;
    if !is_closed(&solid) {
        return Err(Error::BooleanFailed("result is not a closed shell"));
    }
    Ok(solid)
}

fn ensure_tolerance(tol: f64) -> Result<()> {
    if !tol.is_finite() || tol <= 0.0 {
        return Err(Error::InvalidParameter("tolerance must be > 0".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ose_piping_topology::{Face, Shell, SolidBuilder};

    fn open_box() -> Result<Solid> {
        let closed = SolidBuilder::box_solid(1.0, 1.0, 1.0)?;
        let faces: Vec<Face> = closed.face_iter().skip(1).cloned().collect();
        Ok(Solid::new_unchecked(vec![Shell::from(faces)]))
    }

    #[test]
    fn non_positive_tolerance_is_rejected() -> Result<()> {
        let a = SolidBuilder::box_solid(1.0, 1.0, 1.0)?;
        let b = SolidBuilder::box_solid(2.0, 2.0, 2.0)?;
        assert!(matches!(union(&a, &b, 0.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(difference(&a, &b, -1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(intersection(&a, &b, f64::NAN), Err(Error::InvalidParameter(_))));
        Ok(())
    }

    #[test]
    fn open_operands_fail_without_panicking() -> Result<()> {
        let open = open_box()?;
        let closed = SolidBuilder::box_solid(2.0, 2.0, 2.0)?;
        for result in [
            union(&open, &closed, DEFAULT_SHAPEOPS_TOLERANCE),
            union(&closed, &open, DEFAULT_SHAPEOPS_TOLERANCE),
            difference(&closed, &open, DEFAULT_SHAPEOPS_TOLERANCE),
            intersection(&open, &closed, DEFAULT_SHAPEOPS_TOLERANCE),
        ] {
            assert!(matches!(result, Err(Error::BooleanFailed(_))));
        }
        Ok(())
    }
}
