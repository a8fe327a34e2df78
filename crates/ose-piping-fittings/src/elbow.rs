//! Elbow with the sockets on the x-y plane, symmetric about the x-y bisectrix.
//!
//! The bend is a circular profile swept around `p3`. `p2` and `p4` are where
//! the bend meets the straight outer sockets, `p5` and `p6` the socket bottoms.

use ose_piping_geometry::{Point3, Rotation, directions};
use ose_piping_shapeops::Feature;
use ose_piping_topology::{CircleSweep, TubePath};
use serde::{Deserialize, Serialize};
use truck_base::cgmath64::{EuclideanSpace, InnerSpace};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, Fitting, RELATIVE_EPSILON, TANGENCY_CLEARANCE, check, cylinder_along, mm,
    numbers,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Elbow {
    #[serde(rename = "BendAngle")]
    pub bend_angle: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "J")]
    pub j: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "PThk")]
    pub pthk: f64,
}

impl Default for Elbow {
    fn default() -> Self {
        Self {
            bend_angle: 60.0,
            h: 30.0,
            j: 20.0,
            m: 30.0,
            pod: 20.0,
            pthk: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElbowPoints {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
    pub p4: Point3,
    pub p5: Point3,
    pub p6: Point3,
}

impl ElbowPoints {
    pub(crate) fn named(&self) -> AuxiliaryPoints {
        AuxiliaryPoints::new(vec![
            ("p1", self.p1),
            ("p2", self.p2),
            ("p3", self.p3),
            ("p4", self.p4),
            ("p5", self.p5),
            ("p6", self.p6),
        ])
    }
}

impl Elbow {
    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    pub fn points(&self) -> ElbowPoints {
        let half_beta = (180.0 - self.bend_angle).to_radians() / 2.0;
        let radius = self.m / 2.0;
        let l = radius / half_beta.tan();
        ElbowPoints {
            p1: leg_point(self.bend_angle, self.h, Leg::First),
            p2: leg_point(self.bend_angle, l, Leg::First),
            p3: Point3::from_vec(directions::bisectrix_xy() * (radius / half_beta.sin())),
            p4: leg_point(self.bend_angle, l, Leg::Second),
            p5: leg_point(self.bend_angle, self.j, Leg::First),
            p6: leg_point(self.bend_angle, self.j, Leg::Second),
        }
    }

    fn bend(&self, name: &str, radius: f64) -> Feature {
        let aux = self.points();
        Feature::sweep(name, bend_sweep(radius, aux.p2, aux.p3, self.bend_angle))
    }

    /// The elbow wall as one section carried from `p1` through the bend to
    /// the end of the second leg.
    ///
    /// The bend radius equals `M/2`, so the wall is narrowed by
    /// [`TANGENCY_CLEARANCE`] around the bend to keep it off the bend axis.
    pub fn tube(&self) -> TubePath {
        let aux = self.points();
        let leg = aux.p1.to_vec().normalize();
        let bend_start = aux.p2.to_vec().magnitude();
        let socket_bottom = self.j.max(bend_start);
        let (socket, channel, rim) = (self.pod / 2.0, self.pid() / 2.0, self.m / 2.0);
        let bend_rim = rim * (1.0 - TANGENCY_CLEARANCE);

        let mut path = TubePath::new(aux.p1, -leg, socket, rim)
            .straight(self.h - socket_bottom)
            .step(channel, rim);
        if socket_bottom > bend_start {
            path = path.straight(socket_bottom - bend_start);
        }
        path = path
            .step(channel, bend_rim)
            .bend(aux.p3, -directions::z(), self.bend_angle)
            .step(channel, rim);
        if socket_bottom > bend_start {
            path = path.straight(socket_bottom - bend_start);
        }
        path.step(socket, rim).straight(self.h - socket_bottom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Leg {
    First,
    Second,
}

/// Point at `distance` from the origin along one leg of a bend of `bend_angle` degrees.
///
/// The legs are the bisectrix rotated about z by `-(180 - bend_angle) / 2` and
/// `+(180 - bend_angle) / 2`.
pub(crate) fn leg_point(bend_angle: f64, distance: f64, leg: Leg) -> Point3 {
    let half_beta = (180.0 - bend_angle) / 2.0;
    let angle = match leg {
        Leg::First => -half_beta,
        Leg::Second => half_beta,
    };
    let rotation = Rotation::from_axis_angle(directions::z(), angle);
    Point3::from_vec(rotation.apply(directions::bisectrix_xy() * distance))
}

/// Circle of `radius` centred on `start`, swept clockwise about `center` by `bend_angle`.
pub(crate) fn bend_sweep(radius: f64, start: Point3, center: Point3, bend_angle: f64) -> CircleSweep {
    CircleSweep {
        radius,
        center: start,
        normal: -start.to_vec().normalize(),
        axis_origin: center,
        axis: -directions::z(),
        angle: bend_angle,
    }
}

/// Ports on `p5` and `p6` with normals along the legs.
pub(crate) fn bend_ports(bend_angle: f64, p5: Point3, p6: Point3) -> Vec<AdvancedPort> {
    vec![
        AdvancedPort::from_ypr(p5, -45.0 + bend_angle / 2.0, 0.0, 0.0),
        AdvancedPort::from_ypr(p6, 135.0 - bend_angle / 2.0, 0.0, 0.0),
    ]
}

impl Fitting for Elbow {
    const KIND: FittingKind = FittingKind::Elbow;
    const COLUMNS: &'static [&'static str] = &["BendAngle", "POD", "H", "J", "M"];

    fn validate(&self) -> Result<()> {
        check(self.pod > 0.0, || {
            format!("Pipe outer diameter {} must be positive", mm(self.pod))
        })?;
        check(self.bend_angle > 0.0, || {
            format!("Bend Angle {} deg must be positive.", self.bend_angle)
        })?;
        check(self.bend_angle < 180.0, || {
            format!("Bend Angle {} deg must be less than 180 deg.", self.bend_angle)
        })?;
        check(self.pthk <= self.pod / 2.0, || {
            format!(
                "Pipe thickness {} is too large: larger than POD/2 {}.",
                mm(self.pthk),
                mm(self.pod / 2.0)
            )
        })?;
        check(self.m > self.pod, || {
            format!(
                "Socket outer diameter {} must be greater than pipe outer diameter ={}.",
                mm(self.m),
                mm(self.pod)
            )
        })?;
        check(self.j > 0.0, || format!("Length J={} must be positive.", mm(self.j)))?;
        check(self.h > self.j, || {
            format!("Length H={} must be larger than J={}", mm(self.h), mm(self.j))
        })
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        self.points().named()
    }

    fn feature_tree(&self) -> Feature {
        let aux = self.points();
        let socket_height = self.h - aux.p2.to_vec().magnitude();
        let outer = Feature::fuse(
            "Outer",
            vec![
                self.bend("OuterSweep", self.m / 2.0 * (1.0 + RELATIVE_EPSILON)),
                cylinder_along("OuterSocket1", self.m / 2.0, socket_height, aux.p2, aux.p2.to_vec()),
                cylinder_along("OuterSocket2", self.m / 2.0, socket_height, aux.p4, aux.p4.to_vec()),
            ],
        );

        let pid = self.pid();
        let inner = Feature::fuse(
            "Inner",
            vec![
                self.bend("InnerSweep", pid / 2.0),
                cylinder_along("InnerChannel1", pid / 2.0, self.h, aux.p2, aux.p2.to_vec()),
                cylinder_along("InnerChannel2", pid / 2.0, self.h, aux.p4, aux.p4.to_vec()),
                cylinder_along("Socket1", self.pod / 2.0, self.h, aux.p5, aux.p5.to_vec()),
                cylinder_along("Socket2", self.pod / 2.0, self.h, aux.p6, aux.p6.to_vec()),
            ],
        );
        Feature::cut("Elbow", outer, inner)
    }

    fn solid_tree(&self) -> Feature {
        Feature::tube("Elbow", self.tube())
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        let aux = self.points();
        bend_ports(self.bend_angle, aux.p5, aux.p6)
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("BendAngle", self.bend_angle),
            ("H", self.h),
            ("J", self.j),
            ("M", self.m),
            ("POD", self.pod),
            ("PThk", self.pthk),
            ("PID", self.pid()),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            bend_angle: row.angle("BendAngle")?,
            h: row.length("H")?,
            j: row.length("J")?,
            m: row.length("M")?,
            pod: row.length("POD")?,
            pthk: pipe_thickness(row, "")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ose_piping_topology::TubeSegment;

    const EPS: f64 = 1.0e-9;

    fn close(a: Point3, b: Point3) -> bool {
        (a - b).magnitude() <= EPS
    }

    fn right_angle() -> Elbow {
        Elbow {
            bend_angle: 90.0,
            h: 30.0,
            j: 20.0,
            m: 30.0,
            pod: 20.0,
            pthk: 2.0,
        }
    }

    #[test]
    fn right_angle_points() {
        let aux = right_angle().points();
        assert!(close(aux.p1, Point3::new(30.0, 0.0, 0.0)));
        assert!(close(aux.p2, Point3::new(15.0, 0.0, 0.0)));
        assert!(close(aux.p3, Point3::new(15.0, 15.0, 0.0)));
        assert!(close(aux.p4, Point3::new(0.0, 15.0, 0.0)));
        assert!(close(aux.p5, Point3::new(20.0, 0.0, 0.0)));
        assert!(close(aux.p6, Point3::new(0.0, 20.0, 0.0)));
    }

    #[test]
    fn validation_follows_the_listed_order() {
        let elbow = Elbow {
            bend_angle: 0.0,
            pthk: 50.0,
            ..right_angle()
        };
        match elbow.validate() {
            Err(Error::ImplausibleDimensions(message)) => assert!(message.starts_with("Bend Angle")),
            other => panic!("unexpected result: {other:?}"),
        }

        let short = Elbow {
            h: 20.0,
            ..right_angle()
        };
        match short.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert_eq!(message, "Length H=20 mm must be larger than J=20 mm")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bend_angle_must_stay_below_a_half_turn() {
        for bend_angle in [180.0, 200.0] {
            let elbow = Elbow {
                bend_angle,
                ..right_angle()
            };
            match elbow.validate() {
                Err(Error::ImplausibleDimensions(message)) => assert_eq!(
                    message,
                    format!("Bend Angle {bend_angle} deg must be less than 180 deg.")
                ),
                other => panic!("unexpected result: {other:?}"),
            }
        }
        let almost = Elbow {
            bend_angle: 179.0,
            ..right_angle()
        };
        assert!(almost.validate().is_ok());
    }

    #[test]
    fn tube_narrows_only_around_the_bend() {
        let elbow = right_angle();
        let path = elbow.tube();
        assert!(close(path.start, Point3::new(30.0, 0.0, 0.0)));
        assert!((path.direction + directions::x()).magnitude() < EPS);
        assert_eq!((path.inner, path.outer), (10.0, 15.0));
        let lengths: Vec<f64> = path
            .segments
            .iter()
            .filter_map(|segment| match segment {
                TubeSegment::Straight(length) => Some(*length),
                _ => None,
            })
            .collect();
        assert_eq!(lengths.len(), 4);
        for (length, expected) in lengths.iter().zip([10.0, 5.0, 5.0, 10.0]) {
            assert!((length - expected).abs() < EPS);
        }
        let bend = path
            .segments
            .iter()
            .position(|segment| matches!(segment, TubeSegment::Bend { .. }));
        assert_eq!(bend, Some(4));
        match path.segments[3] {
            TubeSegment::Step { inner, outer } => {
                assert_eq!(inner, 8.0);
                assert!(outer < 15.0);
            }
            other => panic!("unexpected segment: {other:?}"),
        }
    }

    #[test]
    fn tree_is_outer_minus_inner() -> Result<()> {
        let tree = right_angle().build()?;
        assert_eq!(tree.name(), "Elbow");
        assert_eq!(tree.primitive_count(), 8);
        let names: Vec<&str> = tree.nested().iter().map(|f| f.name()).collect();
        assert_eq!(names.last(), Some(&"Elbow"));
        assert_eq!(names.iter().position(|n| *n == "Outer"), Some(3));

        let socket = tree
            .find("OuterSocket1")
            .ok_or_else(|| crate::fitting::implausible("missing socket"))?;
        assert!(close(Point3::from_vec(socket.placement().base), Point3::new(15.0, 0.0, 0.0)));
        let axis = socket.placement().apply_direction(directions::z());
        assert!((axis - directions::x()).magnitude() < EPS);
        Ok(())
    }

    #[test]
    fn ports_point_out_of_the_sockets() {
        let elbow = Elbow::default();
        let aux = elbow.points();
        let ports = elbow.ports();
        assert!(close(ports[0].base(), aux.p5));
        assert!(close(ports[1].base(), aux.p6));
        for port in &ports {
            let along = port.base().to_vec().normalize();
            assert!((port.normal() - along).magnitude() < EPS);
        }
    }
}
