use std::collections::BTreeMap;

use ose_piping_geometry::{Placement, Point3, Rotation, Vector3, directions};
use ose_piping_shapeops::Feature;
use ose_piping_topology::Profile;
use serde::Serialize;
use tracing::{debug, info};
use truck_base::cgmath64::EuclideanSpace;

use crate::element::{FittingElement, FittingGeometry, FittingKind, OutputType, ParameterSet, ParameterValue};
use crate::error::{Error, Result};
use crate::port::{AdvancedPort, PortSummary};
use crate::table::Row;

/// Factor applied to outer bend radii so that the inner part never touches them.
pub const RELATIVE_EPSILON: f64 = 1.0e-6;

/// Relative gap kept between surfaces that would otherwise touch tangentially
/// in a solid tree. The boolean kernel cannot intersect tangent surfaces.
pub const TANGENCY_CLEARANCE: f64 = 0.02;

/// Length by which bores run past the end faces of a solid tree, relative to
/// the outer diameter, so that no bore cap is coplanar with an end face.
pub const BORE_OVERSHOOT: f64 = 0.1;

/// Named construction points of a fitting, in a fixed order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuxiliaryPoints(Vec<(&'static str, Point3)>);

impl AuxiliaryPoints {
    pub fn new(points: Vec<(&'static str, Point3)>) -> Self {
        Self(points)
    }

    pub fn get(&self, name: &str) -> Option<Point3> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, Point3)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parametric fitting: dimensions that can be checked, built and docked.
pub trait Fitting: Sized {
    const KIND: FittingKind;

    /// Catalog columns needed by [`Fitting::from_row`], apart from the key column.
    const COLUMNS: &'static [&'static str];

    /// First violated feasibility constraint, as `ImplausibleDimensions`.
    fn validate(&self) -> Result<()>;

    fn auxiliary_points(&self) -> AuxiliaryPoints;

    /// The unchecked construction tree.
    fn feature_tree(&self) -> Feature;

    /// The unchecked tree evaluated for [`OutputType::Solid`].
    ///
    /// Fittings whose parts meet tangentially or share faces override this
    /// with a tree that the boolean kernel can close.
    fn solid_tree(&self) -> Feature {
        self.feature_tree()
    }

    fn ports(&self) -> Vec<AdvancedPort>;

    /// Dimensions by catalog column name.
    fn parameters(&self) -> ParameterSet;

    fn from_row(row: &Row<'_>) -> Result<Self>;

    fn build(&self) -> Result<Feature> {
        self.validate()?;
        let tree = self.feature_tree();
        debug!(
            kind = %Self::KIND,
            primitives = tree.primitive_count(),
            "feature tree built"
        );
        Ok(tree)
    }

    fn create(&self, output: OutputType, tol: f64) -> Result<FittingGeometry> {
        match output {
            OutputType::Parts => Ok(FittingGeometry::Parts(self.build()?)),
            OutputType::Solid => {
                self.validate()?;
                let tree = self.solid_tree();
                debug!(
                    kind = %Self::KIND,
                    primitives = tree.primitive_count(),
                    "solid tree built"
                );
                let solid = tree.evaluate(tol)?;
                info!(kind = %Self::KIND, faces = solid.face_iter().count(), "solid evaluated");
                Ok(FittingGeometry::Solid(solid))
            }
        }
    }

    /// Geometry wrapped with the fitting's kind, parameters and ports.
    fn element(&self, output: OutputType, tol: f64) -> Result<FittingElement> {
        let geometry = self.create(output, tol)?;
        Ok(FittingElement::new(
            Self::KIND,
            self.parameters(),
            self.ports(),
            geometry,
        ))
    }

    fn report(&self) -> Result<FittingReport> {
        let tree = self.build()?;
        Ok(FittingReport {
            kind: Self::KIND,
            label: Self::KIND.label(),
            part_number: None,
            parameters: self.parameters(),
            auxiliary_points: self
                .auxiliary_points()
                .iter()
                .map(|(name, p)| (name.to_string(), [p.x, p.y, p.z]))
                .collect(),
            ports: self.ports().iter().map(AdvancedPort::summary).collect(),
            features: tree.nested().iter().map(|f| f.name().to_string()).collect(),
        })
    }
}

/// Everything `inspect` prints about a fitting.
#[derive(Clone, Debug, Serialize)]
pub struct FittingReport {
    pub kind: FittingKind,
    pub label: String,
    pub part_number: Option<String>,
    pub parameters: ParameterSet,
    pub auxiliary_points: BTreeMap<String, [f64; 3]>,
    pub ports: Vec<PortSummary>,
    pub features: Vec<String>,
}

pub(crate) fn implausible(message: impl Into<String>) -> Error {
    Error::ImplausibleDimensions(message.into())
}

pub(crate) fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(implausible(message()))
    }
}

pub(crate) fn numbers(values: &[(&str, f64)]) -> ParameterSet {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), ParameterValue::Number(*value)))
        .collect()
}

pub(crate) fn mm(value: f64) -> String {
    format!("{value} mm")
}

/// Cylinder standing on `base` and extending along `direction`.
pub(crate) fn cylinder_along(
    name: &str,
    radius: f64,
    height: f64,
    base: Point3,
    direction: Vector3,
) -> Feature {
    Feature::cylinder(name, radius, height).placed(&frame_along(base, direction))
}

pub(crate) fn cone_along(
    name: &str,
    radius1: f64,
    radius2: f64,
    height: f64,
    base: Point3,
    direction: Vector3,
) -> Feature {
    Feature::cone(name, radius1, radius2, height).placed(&frame_along(base, direction))
}

/// Local frame at `base` whose z axis points along `direction`.
pub(crate) fn frame_along(base: Point3, direction: Vector3) -> Placement {
    Placement::new(base.to_vec(), Rotation::between(directions::z(), direction))
}

pub(crate) fn at(point: Point3) -> Placement {
    Placement::from_point(point)
}

/// `radius`, unless it is within [`TANGENCY_CLEARANCE`] of `other`, in which
/// case it is pulled inside `other` by that margin.
pub(crate) fn clear_of(radius: f64, other: f64) -> f64 {
    if (radius - other).abs() < other * TANGENCY_CLEARANCE {
        other * (1.0 - TANGENCY_CLEARANCE)
    } else {
        radius
    }
}

/// Linear interpolation of the radius at `at` between two stations, clamped to them.
pub(crate) fn radius_between(
    at: f64,
    (at0, radius0): (f64, f64),
    (at1, radius1): (f64, f64),
) -> f64 {
    if at1 == at0 {
        return radius0;
    }
    let t = ((at - at0) / (at1 - at0)).clamp(0.0, 1.0);
    radius0 + (radius1 - radius0) * t
}

/// Outline of a body of revolution as `[radius, distance along the axis]`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Outline(Vec<[f64; 2]>);

impl Outline {
    /// Appends a point, skipping it when it repeats the last one.
    pub(crate) fn to(mut self, radius: f64, at: f64) -> Self {
        if self.0.last() != Some(&[radius, at]) {
            self.0.push([radius, at]);
        }
        self
    }

    pub(crate) fn profile(self) -> Profile {
        Profile::new(self.0)
    }
}

/// Body of revolution whose axis starts at `base` and runs along `direction`.
pub(crate) fn revolved_along(
    name: &str,
    outline: Outline,
    base: Point3,
    direction: Vector3,
) -> Feature {
    Feature::revolved(name, outline.profile()).placed(&frame_along(base, direction))
}

/// Extra length `a1` of the larger outer socket of a reducer.
///
/// Chosen so that the conical wall between the sockets is not thinner than the
/// socket walls. Positive when `pod > pod1`, negative when `pod < pod1`.
pub(crate) fn reducer_shift(pod: f64, pod1: f64, cone_length: f64, m: f64, m1: f64) -> f64 {
    let wall = (m - pod).max(m1 - pod1) / 2.0;
    let x = pod - pod1;
    x / (4.0 * cone_length * cone_length + x * x).sqrt() * wall
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_tangent_radii_are_pulled_inside() {
        assert!((clear_of(10.0, 10.0) - 9.8).abs() < 1.0e-12);
        assert!((clear_of(10.1, 10.0) - 9.8).abs() < 1.0e-12);
        assert_eq!(clear_of(7.0, 10.0), 7.0);
        assert_eq!(clear_of(12.0, 10.0), 12.0);
    }

    #[test]
    fn radius_is_clamped_to_the_stations() {
        assert_eq!(radius_between(5.0, (0.0, 10.0), (10.0, 20.0)), 15.0);
        assert_eq!(radius_between(-5.0, (0.0, 10.0), (10.0, 20.0)), 10.0);
        assert_eq!(radius_between(50.0, (0.0, 10.0), (10.0, 20.0)), 20.0);
        assert_eq!(radius_between(3.0, (2.0, 4.0), (2.0, 8.0)), 4.0);
    }

    #[test]
    fn outline_skips_repeated_points() {
        let profile = Outline::default()
            .to(0.0, 0.0)
            .to(5.0, 0.0)
            .to(5.0, 0.0)
            .to(5.0, 3.0)
            .to(0.0, 3.0)
            .profile();
        assert_eq!(profile.points(), [[0.0, 0.0], [5.0, 0.0], [5.0, 3.0], [0.0, 3.0]]);
    }
}
