//! Elbow whose bend radius follows from `J` instead of the socket diameter.
//!
//! Unlike [`crate::Elbow`], the inner sockets start right where the inner bend
//! ends, and the outer sockets overlap the bend by the fitting wall thickness.

use ose_piping_geometry::{Point3, directions};
use ose_piping_shapeops::Feature;
use ose_piping_topology::TubePath;
use serde::{Deserialize, Serialize};
use truck_base::cgmath64::{EuclideanSpace, InnerSpace};

use crate::elbow::{ElbowPoints, Leg, bend_ports, bend_sweep, leg_point};
use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, Fitting, RELATIVE_EPSILON, TANGENCY_CLEARANCE, check, cylinder_along, mm,
    numbers,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

/// Bend angle used for catalog rows without a `BendAngle` column.
pub const DEFAULT_BEND_ANGLE: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepElbow {
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

impl Default for SweepElbow {
    fn default() -> Self {
        Self {
            bend_angle: DEFAULT_BEND_ANGLE,
            h: 60.0,
            j: 50.0,
            m: 30.0,
            pod: 20.0,
            pthk: 5.0,
        }
    }
}

impl SweepElbow {
    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    /// Wall thickness of the fitting around the pipe.
    pub fn fit_thk(&self) -> f64 {
        (self.m - self.pod) / 2.0
    }

    /// Inner socket depth `a1` and outer socket height `a2`.
    pub fn socket_lengths(&self) -> (f64, f64) {
        let a1 = self.h - self.j;
        (a1, a1 + self.fit_thk())
    }

    pub fn points(&self) -> ElbowPoints {
        let half_beta = (180.0 - self.bend_angle).to_radians() / 2.0;
        let (_, a2) = self.socket_lengths();
        let l = self.h - a2;
        ElbowPoints {
            p1: leg_point(self.bend_angle, self.h, Leg::First),
            p2: leg_point(self.bend_angle, l, Leg::First),
            p3: Point3::from_vec(directions::bisectrix_xy() * (self.j / half_beta.cos())),
            p4: leg_point(self.bend_angle, l, Leg::Second),
            p5: leg_point(self.bend_angle, self.j, Leg::First),
            p6: leg_point(self.bend_angle, self.j, Leg::Second),
        }
    }

    /// Distance from the bend centre `p3` to the bend start `p5`.
    pub fn bend_radius(&self) -> f64 {
        let aux = self.points();
        (aux.p3 - aux.p5).magnitude()
    }

    fn bend(&self, name: &str, radius: f64) -> Feature {
        let aux = self.points();
        Feature::sweep(name, bend_sweep(radius, aux.p5, aux.p3, self.bend_angle))
    }

    /// The wall as one section carried from `p1` through the bend.
    ///
    /// The outer sockets reach into the bend by the fitting wall thickness,
    /// measured here as an arc along the bend. Between them the wall follows
    /// the thinner outer sweep.
    pub fn tube(&self) -> TubePath {
        let aux = self.points();
        let leg = aux.p1.to_vec().normalize();
        let bend_radius = self.bend_radius();
        let widest = bend_radius * (1.0 - TANGENCY_CLEARANCE);
        let rim = (self.m / 2.0).min(widest);
        let wall = (self.pid() / 2.0 + self.fit_thk()).min(widest);
        let (socket, channel) = (self.pod / 2.0, self.pid() / 2.0);
        let overlap = (self.fit_thk() / bend_radius)
            .to_degrees()
            .min(self.bend_angle / 4.0);
        let axis = -directions::z();
        let (socket_depth, _) = self.socket_lengths();

        TubePath::new(aux.p1, -leg, socket, rim)
            .straight(socket_depth)
            .step(channel, rim)
            .bend(aux.p3, axis, overlap)
            .step(channel, wall)
            .bend(aux.p3, axis, self.bend_angle - 2.0 * overlap)
            .step(channel, rim)
            .bend(aux.p3, axis, overlap)
            .step(socket, rim)
            .straight(socket_depth)
    }
}

impl Fitting for SweepElbow {
    const KIND: FittingKind = FittingKind::SweepElbow;
    const COLUMNS: &'static [&'static str] = &["POD", "H", "J", "M"];

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
        let least_j = self.m / 2.0 + self.fit_thk();
        check(self.j > least_j, || {
            format!(
                "Length J={} must be larger than M/2 + fitting thickness (M-POD)/2 ={}.",
                mm(self.j),
                mm(least_j)
            )
        })?;
        check(self.h > self.j, || {
            format!("Length H={} must be larger than J={}", mm(self.h), mm(self.j))
        })
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        self.points().named()
    }

    fn feature_tree(&self) -> Feature {
        let aux = self.points();
        let outer_radius = (self.pid() / 2.0 + self.fit_thk()) * (1.0 + RELATIVE_EPSILON);
        let socket_height = self.h - aux.p2.to_vec().magnitude();
        let outer = Feature::fuse(
            "Outer",
            vec![
                self.bend("OuterSweep", outer_radius),
                cylinder_along("OuterSocket1", self.m / 2.0, socket_height, aux.p2, aux.p2.to_vec()),
                cylinder_along("OuterSocket2", self.m / 2.0, socket_height, aux.p4, aux.p4.to_vec()),
            ],
        );
        let inner = Feature::fuse(
            "Inner",
            vec![
                self.bend("InnerSweep", self.pid() / 2.0),
                cylinder_along("Socket1", self.pod / 2.0, self.h, aux.p5, aux.p5.to_vec()),
                cylinder_along("Socket2", self.pod / 2.0, self.h, aux.p6, aux.p6.to_vec()),
            ],
        );
        Feature::cut("SweepElbow", outer, inner)
    }

    fn solid_tree(&self) -> Feature {
        Feature::tube("SweepElbow", self.tube())
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
        let bend_angle = if row.text("BendAngle").is_some() {
            row.angle("BendAngle")?
        } else {
            DEFAULT_BEND_ANGLE
        };
        Ok(Self {
            bend_angle,
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
    use crate::table::DimensionTable;
    use ose_piping_topology::TubeSegment;

    const EPS: f64 = 1.0e-9;

    fn close(a: Point3, b: Point3) -> bool {
        (a - b).magnitude() <= EPS
    }

    #[test]
    fn right_angle_points() {
        // fitThk = 5, a2 = 15, so the outer sockets start 45 from the origin.
        let aux = SweepElbow::default().points();
        assert!(close(aux.p1, Point3::new(60.0, 0.0, 0.0)));
        assert!(close(aux.p2, Point3::new(45.0, 0.0, 0.0)));
        assert!(close(aux.p3, Point3::new(50.0, 50.0, 0.0)));
        assert!(close(aux.p4, Point3::new(0.0, 45.0, 0.0)));
        assert!(close(aux.p5, Point3::new(50.0, 0.0, 0.0)));
        assert!(close(aux.p6, Point3::new(0.0, 50.0, 0.0)));
        assert!((SweepElbow::default().bend_radius() - 50.0).abs() < EPS);
    }

    #[test]
    fn j_must_clear_the_socket() {
        let elbow = SweepElbow {
            j: 20.0,
            ..SweepElbow::default()
        };
        match elbow.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert_eq!(
                    message,
                    "Length J=20 mm must be larger than M/2 + fitting thickness (M-POD)/2 =20 mm."
                )
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bend_starts_on_the_socket_bottom() -> Result<()> {
        let elbow = SweepElbow::default();
        let tree = elbow.build()?;
        assert_eq!(tree.name(), "SweepElbow");
        assert_eq!(tree.primitive_count(), 6);

        let bend = tree
            .find("InnerSweep")
            .ok_or_else(|| crate::fitting::implausible("missing bend"))?;
        match bend.node() {
            ose_piping_shapeops::Node::Primitive(ose_piping_topology::Primitive::SweptCircle(sweep)) => {
                assert!(close(sweep.center, elbow.points().p5));
                assert!((sweep.radius - 5.0).abs() < EPS);
                assert_eq!(sweep.angle, 90.0);
            }
            other => panic!("unexpected node: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn bend_angle_must_stay_below_a_half_turn() {
        for bend_angle in [180.0, 200.0] {
            let elbow = SweepElbow {
                bend_angle,
                ..SweepElbow::default()
            };
            match elbow.validate() {
                Err(Error::ImplausibleDimensions(message)) => assert_eq!(
                    message,
                    format!("Bend Angle {bend_angle} deg must be less than 180 deg.")
                ),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn tube_turns_through_the_whole_bend() {
        let elbow = SweepElbow::default();
        let path = elbow.tube();
        let mut turned = 0.0;
        let mut outers = Vec::new();
        for segment in &path.segments {
            match segment {
                TubeSegment::Bend { origin, angle, .. } => {
                    assert!(close(*origin, elbow.points().p3));
                    turned += angle;
                }
                TubeSegment::Step { outer, .. } => outers.push(*outer),
                TubeSegment::Straight(length) => assert!((length - 10.0).abs() < EPS),
            }
        }
        assert!((turned - 90.0).abs() < EPS);
        // Socket rim, thinner sweep wall, socket rim again.
        assert_eq!(outers, [15.0, 10.0, 15.0, 15.0]);
    }

    #[test]
    fn rows_without_bend_angle_default_to_a_right_angle() -> Result<()> {
        let mut table = DimensionTable::new(SweepElbow::COLUMNS);
        table.load("PartNumber,POD,PID,H,J,M\nSE-1,20,10,60,50,30\n".as_bytes())?;
        let row = table
            .find_part("SE-1")
            .ok_or_else(|| Error::PartNotFound("SE-1".into()))?;
        let elbow = SweepElbow::from_row(&row)?;
        assert_eq!(elbow, SweepElbow::default());
        Ok(())
    }
}
