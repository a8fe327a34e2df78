use ose_piping_geometry::{Placement, Point3, Vector3};
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{AuxiliaryPoints, Fitting, check, mm, numbers};
use crate::port::AdvancedPort;
use crate::table::Row;

/// The inner cylinder overshoots both pipe ends by this fraction of the length.
const INNER_OVERSHOOT: f64 = 0.1;

/// Straight pipe along +z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    #[serde(rename = "OD")]
    pub od: f64,
    #[serde(rename = "Thk")]
    pub thk: f64,
    #[serde(rename = "H")]
    pub h: f64,
}

impl Default for Pipe {
    fn default() -> Self {
        Self {
            od: 30.0,
            thk: 5.0,
            h: Self::DEFAULT_LENGTH,
        }
    }
}

impl Pipe {
    pub const DEFAULT_LENGTH: f64 = 1000.0;

    pub fn id(&self) -> f64 {
        self.od - 2.0 * self.thk
    }
}

impl Fitting for Pipe {
    const KIND: FittingKind = FittingKind::Pipe;
    const COLUMNS: &'static [&'static str] = &["OD", "Thk"];

    fn validate(&self) -> Result<()> {
        check(self.od > 0.0, || {
            format!("OD (outer diameter) of the pipe must be positive. It is {} instead", mm(self.od))
        })?;
        check(self.thk <= self.od / 2.0, || {
            format!(
                "Pipe thickness Thk {} is too large: larger than OD/2 {}.",
                mm(self.thk),
                mm(self.od / 2.0)
            )
        })?;
        check(self.h > 0.0, || format!("Height H={} must be positive", mm(self.h)))
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        AuxiliaryPoints::new(vec![
            ("p1", Point3::new(0.0, 0.0, 0.0)),
            ("p2", Point3::new(0.0, 0.0, self.h)),
        ])
    }

    fn feature_tree(&self) -> Feature {
        let outer = Feature::cylinder("OuterCylinder", self.od / 2.0, self.h);
        let inner = Feature::cylinder(
            "InnerCylinder",
            self.od / 2.0 - self.thk,
            self.h * (1.0 + 2.0 * INNER_OVERSHOOT),
        )
        .placed(&Placement::from_translation(Vector3::new(
            0.0,
            0.0,
            -self.h * INNER_OVERSHOOT,
        )));
        Feature::cut("Pipe", outer, inner)
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        vec![
            AdvancedPort::from_ypr(Point3::new(0.0, 0.0, 0.0), 0.0, 90.0, 0.0),
            AdvancedPort::from_ypr(Point3::new(0.0, 0.0, self.h), 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[("OD", self.od), ("Thk", self.thk), ("H", self.h), ("ID", self.id())])
    }

    /// Reads `OD` and `Thk`; the length keeps its default.
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            od: row.length("OD")?,
            thk: row.length("Thk")?,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ose_piping_shapeops::Node;

    #[test]
    fn default_pipe_is_valid() -> Result<()> {
        Pipe::default().validate()
    }

    #[test]
    fn first_violation_is_reported() {
        let pipe = Pipe {
            od: 10.0,
            thk: 6.0,
            h: -1.0,
        };
        match pipe.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert!(message.starts_with("Pipe thickness Thk 6 mm"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let flat = Pipe { h: 0.0, ..Pipe::default() };
        assert!(matches!(flat.validate(), Err(Error::ImplausibleDimensions(_))));
    }

    #[test]
    fn inner_cylinder_overshoots_both_ends() -> Result<()> {
        let pipe = Pipe {
            od: 20.0,
            thk: 2.0,
            h: 100.0,
        };
        let tree = pipe.build()?;
        let inner = tree
            .find("InnerCylinder")
            .ok_or_else(|| crate::fitting::implausible("missing inner cylinder"))?;
        assert_eq!(inner.placement().base.z, -10.0);
        match inner.node() {
            Node::Primitive(ose_piping_topology::Primitive::Cylinder { radius, height }) => {
                assert_eq!(*radius, 8.0);
                assert!((height - 120.0).abs() < 1.0e-9);
            }
            other => panic!("unexpected node: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn ports_face_away_from_the_pipe() {
        let pipe = Pipe::default();
        let ports = pipe.ports();
        assert_eq!(ports.len(), 2);
        assert!((ports[0].normal().z + 1.0).abs() < 1.0e-9);
        assert!((ports[1].normal().z - 1.0).abs() < 1.0e-9);
        assert_eq!(ports[1].base().z, pipe.h);
    }
}
