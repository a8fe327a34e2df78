//! Tee with a horizontal run along x and a branch along z.
//!
//! The left socket (`POD`) ends at `p2`, the right socket (`POD1`) at `p3` and
//! the top socket (`POD2`) at `p4`. A run with different left and right outer
//! diameters gets a conical middle section.

use ose_piping_geometry::{Point3, directions};
use truck_base::cgmath64::EuclideanSpace;
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, BORE_OVERSHOOT, Fitting, Outline, TANGENCY_CLEARANCE, check, clear_of,
    cone_along, cylinder_along, mm, numbers, radius_between, reducer_shift, revolved_along,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tee {
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "G1")]
    pub g1: f64,
    #[serde(rename = "G2")]
    pub g2: f64,
    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "H1")]
    pub h1: f64,
    #[serde(rename = "H2")]
    pub h2: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "M1")]
    pub m1: f64,
    #[serde(rename = "M2")]
    pub m2: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "POD1")]
    pub pod1: f64,
    #[serde(rename = "POD2")]
    pub pod2: f64,
    #[serde(rename = "PThk")]
    pub pthk: f64,
    #[serde(rename = "PThk1")]
    pub pthk1: f64,
    #[serde(rename = "PThk2")]
    pub pthk2: f64,
}

impl Default for Tee {
    fn default() -> Self {
        Self {
            g: 30.0,
            g1: 20.0,
            g2: 30.0,
            h: 40.0,
            h1: 30.0,
            h2: 50.0,
            m: 50.0,
            m1: 40.0,
            m2: 30.0,
            pod: 40.0,
            pod1: 30.0,
            pod2: 20.0,
            pthk: 5.0,
            pthk1: 5.0,
            pthk2: 5.0,
        }
    }
}

impl Tee {
    pub fn pid(&self) -> f64 {
        self.pod - 2.0 * self.pthk
    }

    pub fn pid1(&self) -> f64 {
        self.pod1 - 2.0 * self.pthk1
    }

    pub fn pid2(&self) -> f64 {
        self.pod2 - 2.0 * self.pthk2
    }

    pub fn shift_a1(&self) -> f64 {
        reducer_shift(self.pod, self.pod1, self.g + self.g1, self.m, self.m1)
    }

    pub fn left_socket_outer_length(&self) -> f64 {
        self.h - self.g + self.shift_a1()
    }

    pub fn right_socket_outer_length(&self) -> f64 {
        self.h1 - self.g1 - self.shift_a1()
    }

    fn point(&self, name: &str) -> Point3 {
        let a1 = self.shift_a1();
        match name {
            "p1" => Point3::new(-self.h, 0.0, 0.0),
            "p2" => Point3::new(-self.g, 0.0, 0.0),
            "p3" => Point3::new(self.g1, 0.0, 0.0),
            "p4" => Point3::new(0.0, 0.0, self.g2),
            "p5" => Point3::new(-self.g + a1, 0.0, 0.0),
            _ => Point3::new(self.g1 + a1, 0.0, 0.0),
        }
    }

    /// Wall enhancement for a branch wider than the run.
    fn enhancement(&self) -> Option<Feature> {
        (self.m2 > self.m || self.m2 > self.m1).then(|| {
            cylinder_along(
                "HorizontalEnhancement",
                self.m2 / 2.0,
                self.m2,
                Point3::new(-self.m2 / 2.0, 0.0, 0.0),
                directions::x(),
            )
        })
    }

    fn outer(&self) -> Feature {
        let vertical = Feature::cylinder("VerticalOuterCylinder", self.m2 / 2.0, self.h2);
        let mut parts = if self.m == self.m1 {
            vec![cylinder_along(
                "HorizontalOuterCylinder",
                self.m / 2.0,
                self.h + self.h1,
                self.point("p1"),
                directions::x(),
            )]
        } else {
            vec![
                cylinder_along(
                    "Cylinder1",
                    self.m / 2.0,
                    self.left_socket_outer_length(),
                    self.point("p1"),
                    directions::x(),
                ),
                cone_along(
                    "Cone",
                    self.m / 2.0,
                    self.m1 / 2.0,
                    self.g + self.g1,
                    self.point("p5"),
                    directions::x(),
                ),
                cylinder_along(
                    "Cylinder2",
                    self.m1 / 2.0,
                    self.right_socket_outer_length(),
                    self.point("p6"),
                    directions::x(),
                ),
            ]
        };
        parts.push(vertical);
        match self.enhancement() {
            Some(enhancement) => Feature::fuse(
                "Outer",
                vec![enhancement, Feature::fuse("OuterParts", parts)],
            ),
            None => Feature::fuse("Outer", parts),
        }
    }

    fn inner(&self) -> Feature {
        let vertical = Feature::cylinder("VerticalInnerCylinder", self.pid2() / 2.0, self.h2);
        let mut parts = if self.pid() == self.pid1() {
            vec![cylinder_along(
                "HorizontalInnerCylinder",
                self.pid() / 2.0,
                self.h + self.h1,
                self.point("p1"),
                directions::x(),
            )]
        } else {
            vec![
                cylinder_along(
                    "InnerCylinder1",
                    self.pid() / 2.0,
                    self.h - self.g,
                    self.point("p1"),
                    directions::x(),
                ),
                cone_along(
                    "InnerCone",
                    self.pid() / 2.0,
                    self.pid1() / 2.0,
                    self.g + self.g1,
                    self.point("p2"),
                    directions::x(),
                ),
                cylinder_along(
                    "InnerCylinder2",
                    self.pid1() / 2.0,
                    self.h1 - self.g1,
                    self.point("p3"),
                    directions::x(),
                ),
            ]
        };
        parts.push(vertical);
        parts.extend(self.sockets());
        Feature::fuse("Inner", parts)
    }

    fn outer_radius_at(&self, x: f64) -> f64 {
        let left = (self.point("p5").x, self.m / 2.0);
        let right = (self.point("p6").x, self.m1 / 2.0);
        radius_between(x, left, right)
    }

    fn bore_radius_at(&self, x: f64) -> f64 {
        radius_between(x, (-self.g, self.pid() / 2.0), (self.g1, self.pid1() / 2.0))
    }

    /// Run, enhancement and branch bodies with no tangent contact.
    fn solid_outer(&self) -> Feature {
        let (p5, p6) = (self.point("p5"), self.point("p6"));
        let run = Outline::default()
            .to(0.0, -self.h)
            .to(self.m / 2.0, -self.h)
            .to(self.m / 2.0, p5.x)
            .to(self.m1 / 2.0, p6.x)
            .to(self.m1 / 2.0, self.h1)
            .to(0.0, self.h1);
        let mut parts = vec![revolved_along(
            "HorizontalOuter",
            run,
            Point3::origin(),
            directions::x(),
        )];
        let mut centre = self.outer_radius_at(0.0);
        if self.enhancement().is_some() {
            centre = self.m2 / 2.0 * (1.0 + TANGENCY_CLEARANCE);
            parts.push(cylinder_along(
                "HorizontalEnhancement",
                centre,
                2.0 * centre,
                Point3::new(-centre, 0.0, 0.0),
                directions::x(),
            ));
        }
        parts.push(Feature::cylinder(
            "VerticalOuterCylinder",
            clear_of(self.m2 / 2.0, centre),
            self.h2,
        ));
        Feature::fuse("Outer", parts)
    }

    /// Run and branch bores, sockets included, running past the end faces.
    fn solid_inner(&self) -> Feature {
        let overshoot = BORE_OVERSHOOT * self.m.min(self.m1).min(self.m2);
        let run = Outline::default()
            .to(0.0, -self.h - overshoot)
            .to(self.pod / 2.0, -self.h - overshoot)
            .to(self.pod / 2.0, -self.g)
            .to(self.pid() / 2.0, -self.g)
            .to(self.pid1() / 2.0, self.g1)
            .to(self.pod1 / 2.0, self.g1)
            .to(self.pod1 / 2.0, self.h1 + overshoot)
            .to(0.0, self.h1 + overshoot);
        let channel = clear_of(self.pid2() / 2.0, self.bore_radius_at(0.0));
        let branch = Outline::default()
            .to(0.0, 0.0)
            .to(channel, 0.0)
            .to(channel, self.g2)
            .to(self.pod2 / 2.0, self.g2)
            .to(self.pod2 / 2.0, self.h2 + overshoot)
            .to(0.0, self.h2 + overshoot);
        Feature::fuse(
            "Inner",
            vec![
                revolved_along("HorizontalBore", run, Point3::origin(), directions::x()),
                Feature::revolved("VerticalBore", branch.profile()),
            ],
        )
    }

    fn sockets(&self) -> [Feature; 3] {
        [
            cylinder_along(
                "SocketLeft",
                self.pod / 2.0,
                self.h - self.g,
                self.point("p1"),
                directions::x(),
            ),
            cylinder_along(
                "SocketTop",
                self.pod2 / 2.0,
                self.h2 - self.g2,
                self.point("p4"),
                directions::z(),
            ),
            cylinder_along(
                "SocketRight",
                self.pod1 / 2.0,
                self.h1 - self.g1,
                self.point("p3"),
                directions::x(),
            ),
        ]
    }
}

impl Fitting for Tee {
    const KIND: FittingKind = FittingKind::Tee;
    const COLUMNS: &'static [&'static str] = &[
        "G", "G1", "G2", "H", "H1", "H2", "M", "M1", "M2", "POD", "POD1", "POD2",
    ];

    fn validate(&self) -> Result<()> {
        for (name, pod) in [("POD", self.pod), ("POD1", self.pod1), ("POD2", self.pod2)] {
            check(pod > 0.0, || {
                format!("Pipe outer diameter {name} {} must be positive.", mm(pod))
            })?;
        }
        for (suffix, pthk, pod) in [
            ("", self.pthk, self.pod),
            ("1", self.pthk1, self.pod1),
            ("2", self.pthk2, self.pod2),
        ] {
            check(pthk <= pod / 2.0, || {
                format!(
                    "Pipe thickness PThk{suffix} {} is too large: larger than POD{suffix}/2 {}.",
                    mm(pthk),
                    mm(pod / 2.0)
                )
            })?;
        }
        for (suffix, m, pod) in [
            ("", self.m, self.pod),
            ("1", self.m1, self.pod1),
            ("2", self.m2, self.pod2),
        ] {
            check(m > pod, || {
                format!(
                    "Outer diameter M{suffix} {} must be larger than outer pipe diameter POD{suffix} {}",
                    mm(m),
                    mm(pod)
                )
            })?;
        }
        for (name, g) in [("G", self.g), ("G1", self.g1), ("G2", self.g2)] {
            check(g > 0.0, || format!("{name}={} must be positive.", mm(g)))?;
        }
        for (suffix, h, g) in [
            ("", self.h, self.g),
            ("1", self.h1, self.g1),
            ("2", self.h2, self.g2),
        ] {
            check(h > g, || {
                format!("H{suffix}={} must be larger than G{suffix}={}.", mm(h), mm(g))
            })?;
        }
        Ok(())
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        AuxiliaryPoints::new(
            ["p1", "p2", "p3", "p4", "p5", "p6"]
                .into_iter()
                .map(|name| (name, self.point(name)))
                .collect(),
        )
    }

    fn feature_tree(&self) -> Feature {
        Feature::cut("Tee", self.outer(), self.inner())
    }

    fn solid_tree(&self) -> Feature {
        Feature::cut("Tee", self.solid_outer(), self.solid_inner())
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        vec![
            AdvancedPort::from_ypr(self.point("p2"), 180.0, 0.0, 180.0),
            AdvancedPort::from_ypr(self.point("p3"), 0.0, 0.0, 0.0),
            AdvancedPort::from_ypr(self.point("p4"), 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("G", self.g),
            ("G1", self.g1),
            ("G2", self.g2),
            ("H", self.h),
            ("H1", self.h1),
            ("H2", self.h2),
            ("M", self.m),
            ("M1", self.m1),
            ("M2", self.m2),
            ("POD", self.pod),
            ("POD1", self.pod1),
            ("POD2", self.pod2),
            ("PThk", self.pthk),
            ("PThk1", self.pthk1),
            ("PThk2", self.pthk2),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            g: row.length("G")?,
            g1: row.length("G1")?,
            g2: row.length("G2")?,
            h: row.length("H")?,
            h1: row.length("H1")?,
            h2: row.length("H2")?,
            m: row.length("M")?,
            m1: row.length("M1")?,
            m2: row.length("M2")?,
            pod: row.length("POD")?,
            pod1: row.length("POD1")?,
            pod2: row.length("POD2")?,
            pthk: pipe_thickness(row, "")?,
            pthk1: pipe_thickness(row, "1")?,
            pthk2: pipe_thickness(row, "2")?,
        })
    }
}
