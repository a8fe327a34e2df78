//! Coupling along z joining a pipe of diameter `POD` at the bottom to one of
//! diameter `POD1` at the top. Different diameters make it a reducer.

use ose_piping_geometry::Point3;
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{AuxiliaryPoints, Fitting, Outline, at, check, mm, numbers, reducer_shift};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    #[serde(rename = "L")]
    pub l: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "M1")]
    pub m1: f64,
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "POD1")]
    pub pod1: f64,
    #[serde(rename = "PThk")]
    pub pthk: f64,
    #[serde(rename = "PThk1")]
    pub pthk1: f64,
}

impl Default for Coupling {
    fn default() -> Self {
        Self {
            l: 90.0,
            m: 50.0,
            m1: 30.0,
            n: 10.0,
            pod: 40.0,
            pod1: 20.0,
            pthk: 5.0,
            pthk1: 5.0,
        }
    }
}

impl Coupling {
    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    pub fn pid1(&self) -> f64 {
        self.pod1 - 2.0 * self.pthk1
    }

    pub fn shift_a1(&self) -> f64 {
        reducer_shift(self.pod, self.pod1, self.n, self.m, self.m1)
    }

    /// Depth `a5` of both sockets.
    pub fn socket_depth(&self) -> f64 {
        (self.l - self.n) / 2.0
    }

    pub fn bottom_socket_outer_length(&self) -> f64 {
        self.socket_depth() + self.shift_a1()
    }

    pub fn top_socket_outer_length(&self) -> f64 {
        self.socket_depth() - self.shift_a1()
    }

    fn on_axis(z: f64) -> Point3 {
        Point3::new(0.0, 0.0, z)
    }

    fn outer(&self) -> Feature {
        if self.m == self.m1 {
            return Feature::cylinder("Cylinder", self.m / 2.0, self.l);
        }
        let a5 = self.socket_depth();
        let a1 = self.shift_a1();
        Feature::fuse(
            "OuterParts",
            vec![
                Feature::cylinder("Cylinder1", self.m / 2.0, self.bottom_socket_outer_length()),
                Feature::cone("Cone", self.m / 2.0, self.m1 / 2.0, self.n)
                    .placed(&at(Self::on_axis(a5 + a1))),
                Feature::cylinder("Cylinder2", self.m1 / 2.0, self.top_socket_outer_length())
                    .placed(&at(Self::on_axis(self.l - a5 + a1))),
            ],
        )
    }

    fn inner(&self) -> Feature {
        let a5 = self.socket_depth();
        let bottom = Feature::cylinder("Cylinder1i", self.pod / 2.0, a5);
        let top = Feature::cylinder("Cylinder2i", self.pod1 / 2.0, a5)
            .placed(&at(Self::on_axis(self.l - a5)));
        let middle = if self.pid() == self.pid1() {
            Feature::cylinder("Cylinder3i", self.pid() / 2.0, self.l)
        } else {
            Feature::cone("InnerCone", self.pid() / 2.0, self.pid1() / 2.0, self.n)
                .placed(&at(Self::on_axis(a5)))
        };
        Feature::fuse("InnerParts", vec![bottom, middle, top])
    }

    /// Wall section in the xz half plane: up the outside, down the bore.
    fn wall(&self) -> Outline {
        let a5 = self.socket_depth();
        let a1 = self.shift_a1();
        let mut wall = Outline::default().to(self.m / 2.0, 0.0);
        if self.m != self.m1 {
            wall = wall
                .to(self.m / 2.0, a5 + a1)
                .to(self.m1 / 2.0, self.l - a5 + a1);
        }
        wall.to(self.m1 / 2.0, self.l)
            .to(self.pod1 / 2.0, self.l)
            .to(self.pod1 / 2.0, self.l - a5)
            .to(self.pid1() / 2.0, self.l - a5)
            .to(self.pid() / 2.0, a5)
            .to(self.pod / 2.0, a5)
            .to(self.pod / 2.0, 0.0)
    }
}

impl Fitting for Coupling {
    const KIND: FittingKind = FittingKind::Coupling;
    const COLUMNS: &'static [&'static str] = &["L", "M", "M1", "N", "POD", "POD1"];

    fn validate(&self) -> Result<()> {
        check(self.pod > 0.0, || {
            format!("Pipe outer diameter POD {} must be positive.", mm(self.pod))
        })?;
        check(self.pod1 > 0.0, || {
            format!("Pipe outer diameter POD1 {} must be positive.", mm(self.pod1))
        })?;
        check(self.pthk <= self.pod / 2.0, || {
            format!(
                "Pipe thickness PThk {} is too large: larger than POD/2 {}.",
                mm(self.pthk),
                mm(self.pod / 2.0)
            )
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
        check(self.l > self.n, || {
            format!(
                "The total length L={} must be larger than the length N={}",
                mm(self.l),
                mm(self.n)
            )
        })?;
        check(self.n > 0.0, || format!("Length N={} must be positive", mm(self.n)))
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        let a5 = self.socket_depth();
        let a1 = self.shift_a1();
        AuxiliaryPoints::new(vec![
            ("p1", Self::on_axis(0.0)),
            ("p2", Self::on_axis(a5)),
            ("p3", Self::on_axis(self.l - a5)),
            ("p4", Self::on_axis(a5 + a1)),
            ("p5", Self::on_axis(self.l - a5 + a1)),
        ])
    }

    fn feature_tree(&self) -> Feature {
        Feature::cut("Coupling", self.outer(), self.inner())
    }

    fn solid_tree(&self) -> Feature {
        Feature::revolved("Coupling", self.wall().profile())
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        let a5 = self.socket_depth();
        vec![
            AdvancedPort::from_ypr(Self::on_axis(a5), 0.0, 90.0, 0.0),
            AdvancedPort::from_ypr(Self::on_axis(self.l - a5), 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("L", self.l),
            ("M", self.m),
            ("M1", self.m1),
            ("N", self.n),
            ("POD", self.pod),
            ("POD1", self.pod1),
            ("PThk", self.pthk),
            ("PThk1", self.pthk1),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            l: row.length("L")?,
            m: row.length("M")?,
            m1: row.length("M1")?,
            n: row.length("N")?,
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
    use crate::element::ParameterValue;
    use crate::error::Error;
    use crate::table::DimensionTable;
    use ose_piping_shapeops::Node;
    use ose_piping_topology::Primitive;

    fn straight() -> Coupling {
        Coupling {
            m: 40.0,
            m1: 40.0,
            pod: 30.0,
            pod1: 30.0,
            ..Coupling::default()
        }
    }

    #[test]
    fn reducer_shifts_toward_the_smaller_pipe() {
        let reducer = Coupling::default();
        // (40 - 20) / sqrt(4 * 100 + 400) * max(10, 10) / 2
        let expected = 20.0 / 800.0_f64.sqrt() * 5.0;
        assert!((reducer.shift_a1() - expected).abs() < 1.0e-12);
        assert_eq!(reducer.socket_depth(), 40.0);
        assert!(reducer.bottom_socket_outer_length() > reducer.top_socket_outer_length());
        assert_eq!(straight().shift_a1(), 0.0);
    }

    #[test]
    fn equal_outer_diameters_give_a_single_cylinder() -> Result<()> {
        let tree = straight().build()?;
        let outer = tree
            .find("Cylinder")
            .ok_or_else(|| crate::fitting::implausible("missing outer cylinder"))?;
        assert!(matches!(outer.node(), Node::Primitive(_)));
        assert!(tree.find("Cylinder3i").is_some());
        assert!(tree.find("InnerCone").is_none());
        Ok(())
    }

    #[test]
    fn reducer_tree() -> Result<()> {
        let tree = Coupling::default().build()?;
        let names: Vec<&str> = tree.nested().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "Cylinder1",
                "Cone",
                "Cylinder2",
                "OuterParts",
                "Cylinder1i",
                "InnerCone",
                "Cylinder2i",
                "InnerParts",
                "Coupling"
            ]
        );
        Ok(())
    }

    #[test]
    fn solid_is_one_revolved_wall() {
        let tree = Coupling::default().solid_tree();
        assert_eq!(tree.primitive_count(), 1);
        match tree.node() {
            Node::Primitive(Primitive::Revolved(profile)) => {
                assert!(!profile.touches_axis());
                assert_eq!(profile.points().len(), 10);
                assert_eq!(profile.points()[6], [5.0, 50.0]);
                assert_eq!(profile.points()[7], [15.0, 40.0]);
            }
            other => panic!("unexpected node: {other:?}"),
        }
        let straight = straight().wall().profile();
        assert_eq!(straight.points().len(), 8);
    }

    #[test]
    fn n_is_checked_after_l() {
        let coupling = Coupling {
            l: 5.0,
            ..Coupling::default()
        };
        match coupling.validate() {
            Err(Error::ImplausibleDimensions(message)) => assert!(message.starts_with("The total length")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn inner_diameters_fall_back_to_pid_columns() -> Result<()> {
        let mut table = DimensionTable::new(Coupling::COLUMNS);
        table.load("PartNumber,L,M,M1,N,POD,POD1,PID,PID1\nC-1,90,50,30,10,40,20,30,10\n".as_bytes())?;
        let row = table
            .find_part("C-1")
            .ok_or_else(|| Error::PartNotFound("C-1".into()))?;
        let coupling = Coupling::from_row(&row)?;
        assert_eq!(coupling, Coupling::default());
        assert_eq!(coupling.parameters().get("PThk1"), Some(&ParameterValue::Number(5.0)));
        Ok(())
    }
}
