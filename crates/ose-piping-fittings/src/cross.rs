//! Cross: a run along x of diameter `POD` crossed by a run along z of diameter `POD1`.

use ose_piping_geometry::{Point3, directions};
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, BORE_OVERSHOOT, Fitting, Outline, check, clear_of, cylinder_along, mm,
    numbers, revolved_along,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cross {
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "G1")]
    pub g1: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "H1")]
    pub h1: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "M1")]
    pub m1: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "POD1")]
    pub pod1: f64,
    #[serde(rename = "PThk")]
    pub pthk: f64,
    #[serde(rename = "PThk1")]
    pub pthk1: f64,
}

impl Default for Cross {
    fn default() -> Self {
        Self {
            g: 30.0,
            g1: 30.0,
            h: 40.0,
            h1: 50.0,
            m: 50.0,
            m1: 40.0,
            pod: 30.0,
            pod1: 20.0,
            pthk: 5.0,
            pthk1: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossPoints {
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
    pub p4: Point3,
    pub p5: Point3,
    pub p6: Point3,
}

impl Cross {
    /// Length of the horizontal run.
    pub fn l(&self) -> f64 {
        2.0 * self.h
    }

    /// Length of the vertical run.
    pub fn l1(&self) -> f64 {
        2.0 * self.h1
    }

    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    pub fn pid1(&self) -> f64 {
        self.pod1 - 2.0 * self.pthk1
    }

    pub fn socket_depth_left(&self) -> f64 {
        self.l() - self.h - self.g
    }

    pub fn socket_depth_right(&self) -> f64 {
        self.h - self.g
    }

    pub fn socket_depth_bottom(&self) -> f64 {
        self.h1 - self.g1
    }

    pub fn socket_depth_top(&self) -> f64 {
        self.l1() - self.h1 - self.g1
    }

    pub fn points(&self) -> CrossPoints {
        CrossPoints {
            p1: Point3::new(-self.h, 0.0, 0.0),
            p2: Point3::new(-self.g, 0.0, 0.0),
            p3: Point3::new(self.g, 0.0, 0.0),
            p4: Point3::new(0.0, 0.0, -self.h1),
            p5: Point3::new(0.0, 0.0, -self.g1),
            p6: Point3::new(0.0, 0.0, self.g1),
        }
    }

    /// Bore of one run: a channel of `channel` radius between sockets of
    /// `socket` radius, from `-half_length` to `half_length`.
    fn bore(channel: f64, socket: f64, g: f64, half_length: f64) -> Outline {
        Outline::default()
            .to(0.0, -half_length)
            .to(socket, -half_length)
            .to(socket, -g)
            .to(channel, -g)
            .to(channel, g)
            .to(socket, g)
            .to(socket, half_length)
            .to(0.0, half_length)
    }
}

impl Fitting for Cross {
    const KIND: FittingKind = FittingKind::Cross;
    const COLUMNS: &'static [&'static str] = &["POD", "POD1", "G", "G1", "H", "H1", "M", "M1"];

    fn validate(&self) -> Result<()> {
        check(self.pod > 0.0, || {
            format!("Pipe outer diameter {} must be positive.", mm(self.pod))
        })?;
        check(self.pthk <= self.pod / 2.0, || {
            format!(
                "Pipe thickness PThk {} is too large: larger than POD/2 {}.",
                mm(self.pthk),
                mm(self.pod / 2.0)
            )
        })?;
        check(self.pod1 > 0.0, || {
            format!("Other pipe outer diameter {} must be positive.", mm(self.pod1))
        })?;
        check(self.pthk1 <= self.pod1 / 2.0, || {
            format!(
                "Pipe thickness PThk1 {} is too large: larger than POD1/2 {}.",
                mm(self.pthk1),
                mm(self.pod1 / 2.0)
            )
        })?;
        check(self.m > self.pod, || {
            format!(
                "Outer diameter M {} must be larger than outer pipe diameter POD {}",
                mm(self.m),
                mm(self.pod)
            )
        })?;
        check(self.m1 > self.pod1, || {
            format!(
                "Outer diameter M1 {} must be larger than outer pipe diameter POD1 {}",
                mm(self.m1),
                mm(self.pod1)
            )
        })?;
        check(self.h > self.g, || {
            format!("Length H={} must be larger than length G={}", mm(self.h), mm(self.g))
        })?;
        check(self.h1 > self.g1, || {
            format!("Length H1={} must be larger than length G1={}", mm(self.h1), mm(self.g1))
        })
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        let aux = self.points();
        AuxiliaryPoints::new(vec![
            ("p1", aux.p1),
            ("p2", aux.p2),
            ("p3", aux.p3),
            ("p4", aux.p4),
            ("p5", aux.p5),
            ("p6", aux.p6),
        ])
    }

    fn feature_tree(&self) -> Feature {
        let aux = self.points();
        let x = directions::x();
        let z = directions::z();
        let outer = Feature::fuse(
            "Outer",
            vec![
                cylinder_along("HorizontalOuterCylinder", self.m / 2.0, self.l(), aux.p1, x),
                cylinder_along("VerticalOuterCylinder", self.m1 / 2.0, self.l1(), aux.p4, z),
            ],
        );
        let inner = Feature::fuse(
            "Inner",
            vec![
                cylinder_along("HorizontalInnerCylinder", self.pid() / 2.0, self.l(), aux.p1, x),
                cylinder_along("VerticalInnerCylinder", self.pid1() / 2.0, self.l1(), aux.p4, z),
                cylinder_along("SocketLeft", self.pod / 2.0, self.socket_depth_left(), aux.p1, x),
                cylinder_along("SocketRight", self.pod / 2.0, self.socket_depth_right(), aux.p3, x),
                cylinder_along("SocketBottom", self.pod1 / 2.0, self.socket_depth_bottom(), aux.p4, z),
                cylinder_along("SocketTop", self.pod1 / 2.0, self.socket_depth_top(), aux.p6, z),
            ],
        );
        Feature::cut("Cross", outer, inner)
    }

    fn solid_tree(&self) -> Feature {
        let aux = self.points();
        let x = directions::x();
        let z = directions::z();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let overshoot = BORE_OVERSHOOT * self.m.min(self.m1);
        let outer = Feature::fuse(
            "Outer",
            vec![
                cylinder_along("HorizontalOuterCylinder", self.m / 2.0, self.l(), aux.p1, x),
                cylinder_along(
                    "VerticalOuterCylinder",
                    clear_of(self.m1 / 2.0, self.m / 2.0),
                    self.l1(),
                    aux.p4,
                    z,
                ),
            ],
        );
        let horizontal = Self::bore(self.pid() / 2.0, self.pod / 2.0, self.g, self.h + overshoot);
        let vertical = Self::bore(
            clear_of(self.pid1() / 2.0, self.pid() / 2.0),
            self.pod1 / 2.0,
            self.g1,
            self.h1 + overshoot,
        );
        let inner = Feature::fuse(
            "Inner",
            vec![
                revolved_along("HorizontalBore", horizontal, origin, x),
                revolved_along("VerticalBore", vertical, origin, z),
            ],
        );
        Feature::cut("Cross", outer, inner)
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        let aux = self.points();
        vec![
            AdvancedPort::from_ypr(aux.p2, 180.0, 0.0, 180.0),
            AdvancedPort::from_ypr(aux.p3, 0.0, 0.0, 0.0),
            AdvancedPort::from_ypr(aux.p5, 0.0, 90.0, 0.0),
            AdvancedPort::from_ypr(aux.p6, 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("G", self.g),
            ("G1", self.g1),
            ("H", self.h),
            ("H1", self.h1),
            ("L", self.l()),
            ("L1", self.l1()),
            ("M", self.m),
            ("M1", self.m1),
            ("POD", self.pod),
            ("POD1", self.pod1),
            ("PThk", self.pthk),
            ("PThk1", self.pthk1),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            g: row.length("G")?,
            g1: row.length("G1")?,
            h: row.length("H")?,
            h1: row.length("H1")?,
            m: row.length("M")?,
            m1: row.length("M1")?,
            pod: row.length("POD")?,
            pod1: row.length("POD1")?,
            pthk: pipe_thickness(row, "")?,
            pthk1: pipe_thickness(row, "1")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ose_piping_shapeops::Node;
    use ose_piping_topology::Primitive;
    use truck_base::cgmath64::InnerSpace;

    #[test]
    fn sockets_take_the_rest_of_each_run() -> Result<()> {
        let cross = Cross::default();
        assert_eq!(cross.socket_depth_left(), 10.0);
        assert_eq!(cross.socket_depth_right(), 10.0);
        assert_eq!(cross.socket_depth_bottom(), 20.0);
        assert_eq!(cross.socket_depth_top(), 20.0);

        let tree = cross.build()?;
        assert_eq!(tree.primitive_count(), 8);
        let top = tree
            .find("SocketTop")
            .ok_or_else(|| crate::fitting::implausible("missing socket"))?;
        assert_eq!(top.placement().base.z, 30.0);
        Ok(())
    }

    #[test]
    fn equal_runs_are_kept_apart_in_the_solid() -> Result<()> {
        let cross = Cross {
            m1: 50.0,
            pod1: 30.0,
            ..Cross::default()
        };
        let tree = cross.solid_tree();
        match tree.find("VerticalOuterCylinder").map(Feature::node) {
            Some(Node::Primitive(Primitive::Cylinder { radius, .. })) => {
                assert!(*radius < 25.0 && *radius > 24.0)
            }
            other => panic!("unexpected node: {other:?}"),
        }
        match tree.find("VerticalBore").map(Feature::node) {
            Some(Node::Primitive(Primitive::Revolved(profile))) => {
                let points = profile.points();
                assert_eq!(points.first(), Some(&[0.0, -55.0]));
                assert!(points[3][0] < cross.pid() / 2.0);
                assert_eq!(points[3][1], -30.0);
            }
            other => panic!("unexpected node: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn vertical_run_is_checked_after_the_horizontal_one() {
        let cross = Cross {
            h1: 10.0,
            ..Cross::default()
        };
        match cross.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert!(message.starts_with("Length H1=10 mm"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn four_ports_in_order() {
        let ports = Cross::default().ports();
        let normals = [
            -directions::x(),
            directions::x(),
            -directions::z(),
            directions::z(),
        ];
        assert_eq!(ports.len(), 4);
        for (port, normal) in ports.iter().zip(normals) {
            assert!((port.normal() - normal).magnitude() < 1.0e-9);
        }
    }
}
