//! Three-way corner with sockets along +x, +y and +z.

use ose_piping_geometry::{Point3, Vector3, directions};
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, BORE_OVERSHOOT, Fitting, Outline, TANGENCY_CLEARANCE, check, cylinder_along,
    mm, numbers, revolved_along,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "PThk")]
    pub pthk: f64,
}

impl Default for Corner {
    fn default() -> Self {
        Self {
            g: 20.0,
            h: 30.0,
            m: 30.0,
            pod: 20.0,
            pthk: 5.0,
        }
    }
}

const AXES: [(&str, fn() -> Vector3); 3] = [
    ("X", directions::x),
    ("Y", directions::y),
    ("Z", directions::z),
];

impl Corner {
    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    /// Cylinders of `diameter` and `length` along the three axes joined by a ball.
    fn primitive_corner(name: &str, length: f64, diameter: f64) -> Feature {
        let mut parts: Vec<Feature> = AXES
            .iter()
            .map(|(axis, direction)| {
                cylinder_along(
                    &format!("{axis}Cylinder"),
                    diameter / 2.0,
                    length,
                    Point3::new(0.0, 0.0, 0.0),
                    direction(),
                )
            })
            .collect();
        parts.push(Feature::sphere("Sphere", diameter / 2.0));
        Feature::fuse(name, parts)
    }

    /// Arms along the three axes around a ball slightly wider than them, so
    /// that the ball never touches the arms tangentially.
    fn solid_corner(name: &str, ball: f64, arms: impl Fn(&str, Vector3) -> Feature) -> Feature {
        let mut parts = vec![Feature::sphere("Sphere", ball * (1.0 + TANGENCY_CLEARANCE))];
        parts.extend(AXES.iter().map(|(axis, direction)| arms(axis, direction())));
        Feature::fuse(name, parts)
    }

    fn sockets(&self) -> impl Iterator<Item = Feature> + '_ {
        AXES.iter().map(|(axis, direction)| {
            cylinder_along(
                &format!("{axis}Socket"),
                self.pod / 2.0,
                self.h - self.g,
                Point3::new(0.0, 0.0, 0.0) + direction() * self.g,
                direction(),
            )
        })
    }
}

impl Fitting for Corner {
    const KIND: FittingKind = FittingKind::Corner;
    const COLUMNS: &'static [&'static str] = &["G", "H", "M", "POD"];

    fn validate(&self) -> Result<()> {
        check(self.pod > 0.0, || {
            format!("Pipe outer diameter POD {} must be positive.", mm(self.pod))
        })?;
        check(self.pthk <= self.pod / 2.0, || {
            format!(
                "Pipe thickness PThk {} is too large: larger than POD/2 {}.",
                mm(self.pthk),
                mm(self.pod / 2.0)
            )
        })?;
        check(self.m > self.pod, || {
            format!(
                "Outer diameter M {} must be larger than outer pipe diameter POD {}",
                mm(self.m),
                mm(self.pod)
            )
        })?;
        check(self.g > 0.0, || format!("Length G {} must be positive", mm(self.g)))?;
        check(self.h > self.g, || {
            format!("Length H {} must be larger than length G {}", mm(self.h), mm(self.g))
        })?;
        check(self.g > self.pid() / 2.0, || {
            format!(
                "Length G {} must be larger than inner pipe radius PID/2={}.",
                mm(self.g),
                mm(self.pid() / 2.0)
            )
        })
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        AuxiliaryPoints::new(vec![
            ("p1", Point3::new(self.g, 0.0, 0.0)),
            ("p2", Point3::new(0.0, self.g, 0.0)),
            ("p3", Point3::new(0.0, 0.0, self.g)),
        ])
    }

    fn feature_tree(&self) -> Feature {
        let outer = Self::primitive_corner("Outer", self.h, self.m);
        let mut inner = vec![Self::primitive_corner("InnerCorner", self.h, self.pid())];
        inner.extend(self.sockets());
        Feature::cut("Corner", outer, Feature::fuse("Inner", inner))
    }

    fn solid_tree(&self) -> Feature {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let outer = Self::solid_corner("Outer", self.m / 2.0, |axis, direction| {
            cylinder_along(&format!("{axis}Cylinder"), self.m / 2.0, self.h, origin, direction)
        });
        let end = self.h + BORE_OVERSHOOT * self.m;
        let inner = Self::solid_corner("Inner", self.pid() / 2.0, |axis, direction| {
            let bore = Outline::default()
                .to(0.0, 0.0)
                .to(self.pid() / 2.0, 0.0)
                .to(self.pid() / 2.0, self.g)
                .to(self.pod / 2.0, self.g)
                .to(self.pod / 2.0, end)
                .to(0.0, end);
            revolved_along(&format!("{axis}Bore"), bore, origin, direction)
        });
        Feature::cut("Corner", outer, inner)
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        vec![
            AdvancedPort::from_ypr(Point3::new(self.g, 0.0, 0.0), 0.0, 0.0, 0.0),
            AdvancedPort::from_ypr(Point3::new(0.0, self.g, 0.0), 90.0, 0.0, 0.0),
            AdvancedPort::from_ypr(Point3::new(0.0, 0.0, self.g), 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("G", self.g),
            ("H", self.h),
            ("M", self.m),
            ("POD", self.pod),
            ("PThk", self.pthk),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            g: row.length("G")?,
            h: row.length("H")?,
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
    use ose_piping_shapeops::Node;
    use ose_piping_topology::Primitive;
    use truck_base::cgmath64::InnerSpace;

    #[test]
    fn corner_is_three_cylinders_and_a_ball() -> Result<()> {
        let tree = Corner::default().build()?;
        let outer = tree
            .find("Outer")
            .ok_or_else(|| crate::fitting::implausible("missing outer"))?;
        let names: Vec<&str> = outer.children().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["XCylinder", "YCylinder", "ZCylinder", "Sphere"]);
        assert_eq!(tree.primitive_count(), 11);

        let socket = tree
            .find("YSocket")
            .ok_or_else(|| crate::fitting::implausible("missing socket"))?;
        assert_eq!(socket.placement().base, Vector3::new(0.0, 20.0, 0.0));
        let axis = socket.placement().apply_direction(directions::z());
        assert!((axis - directions::y()).magnitude() < 1.0e-9);
        Ok(())
    }

    #[test]
    fn solid_ball_is_wider_than_the_arms() -> Result<()> {
        let corner = Corner::default();
        let tree = corner.solid_tree();
        let outer = tree
            .find("Outer")
            .ok_or_else(|| crate::fitting::implausible("missing outer"))?;
        let names: Vec<&str> = outer.children().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["Sphere", "XCylinder", "YCylinder", "ZCylinder"]);
        match outer.children()[0].node() {
            Node::Primitive(Primitive::Sphere { radius }) => assert!(*radius > corner.m / 2.0),
            other => panic!("unexpected node: {other:?}"),
        }
        assert!(tree.find("ZBore").is_some());
        assert_eq!(tree.primitive_count(), 8);
        Ok(())
    }

    #[test]
    fn g_must_clear_the_bore() {
        let corner = Corner {
            g: 4.0,
            pthk: 0.5,
            ..Corner::default()
        };
        match corner.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert_eq!(message, "Length G 4 mm must be larger than inner pipe radius PID/2=9.5 mm.")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn ports_follow_the_axes() {
        let ports = Corner::default().ports();
        let normals = [directions::x(), directions::y(), directions::z()];
        for (port, normal) in ports.iter().zip(normals) {
            assert!((port.normal() - normal).magnitude() < 1.0e-9);
        }
    }
}
