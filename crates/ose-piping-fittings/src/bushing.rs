//! Bushing: a plug of diameter `POD` holding a pipe of diameter `POD1`.
//!
//! The nut on top and the inner cone have no catalog dimensions; they are
//! derived from `L`, `N`, `POD` and `PThk1`.

use ose_piping_geometry::{Placement, Point3, Rotation, Vector3, directions};
use ose_piping_shapeops::Feature;
use serde::{Deserialize, Serialize};

use crate::element::{FittingKind, ParameterSet};
use crate::error::Result;
use crate::fitting::{
    AuxiliaryPoints, BORE_OVERSHOOT, Fitting, Outline, at, check, mm, numbers,
};
use crate::port::AdvancedPort;
use crate::table::{Row, pipe_thickness};

/// Cross section of the nut on top of the bushing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutShape {
    #[default]
    Octagonal,
    Hexagonal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bushing {
    #[serde(rename = "L")]
    pub l: f64,
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "POD")]
    pub pod: f64,
    #[serde(rename = "POD1")]
    pub pod1: f64,
    #[serde(rename = "PThk1")]
    pub pthk1: f64,
    #[serde(default, skip_serializing)]
    pub nut: NutShape,
}

impl Default for Bushing {
    fn default() -> Self {
        Self {
            l: 30.0,
            n: 20.0,
            pod: 40.0,
            pod1: 20.0,
            pthk1: 5.0,
            nut: NutShape::Octagonal,
        }
    }
}

impl Bushing {
    pub fn with_nut(self, nut: NutShape) -> Self {
        Self { nut, ..self }
    }

    pub fn pid1(&self) -> f64 {
        self.pod1 - 2.0 * self.pthk1
    }

    /// Nut thickness `A1`.
    pub fn nut_thickness(&self) -> f64 {
        (self.l - self.n) / 2.0
    }

    /// Distance `A2` between parallel sides of the nut.
    pub fn nut_width(&self) -> f64 {
        self.pod * 1.1
    }

    /// Wall `A3` left around the inner cone.
    pub fn cone_wall(&self) -> f64 {
        self.pthk1
    }

    /// Cone length `A4`.
    pub fn cone_length(&self) -> f64 {
        self.n / 2.0
    }

    fn on_axis(z: f64) -> Point3 {
        Point3::new(0.0, 0.0, z)
    }

    fn nut(&self) -> Feature {
        let thickness = self.nut_thickness();
        let width = self.nut_width();
        let (depth, angles): (f64, &[f64]) = match self.nut {
            NutShape::Octagonal => (width, &[0.0, 45.0]),
            NutShape::Hexagonal => (2.0 * width, &[0.0, 60.0, 120.0]),
        };
        let corner = Vector3::new(-width / 2.0, -depth / 2.0, 0.0);
        let boxes = angles
            .iter()
            .enumerate()
            .map(|(index, angle)| {
                let rotation = Rotation::from_axis_angle(directions::z(), *angle);
                Feature::cuboid(format!("Box{}", index + 1), width, depth, thickness)
                    .placed(&Placement::new(rotation.apply(corner), rotation))
            })
            .collect();
        Feature::common("Common", boxes).placed(&at(Self::on_axis(self.l - thickness)))
    }

    /// Corners of the nut cross section, counter-clockwise from +z.
    pub fn nut_outline(&self) -> Vec<[f64; 2]> {
        let sides: u32 = match self.nut {
            NutShape::Octagonal => 8,
            NutShape::Hexagonal => 6,
        };
        let step = 360.0 / f64::from(sides);
        let corner_radius = self.nut_width() / 2.0 / (step / 2.0).to_radians().cos();
        (0..sides)
            .map(|k| {
                let angle = (step / 2.0 + step * f64::from(k)).to_radians();
                [corner_radius * angle.cos(), corner_radius * angle.sin()]
            })
            .collect()
    }

    /// Bore through the whole bushing, running past both end faces.
    fn bore(&self) -> Outline {
        let overshoot = BORE_OVERSHOOT * self.pod;
        let channel = self.pid1() / 2.0;
        let cone_start = self.pod / 2.0 - self.cone_wall();
        let mut bore = Outline::default().to(0.0, -overshoot);
        if cone_start > channel {
            // The cone is extended below the bottom face along its own slope.
            let mouth = cone_start + (cone_start - channel) * overshoot / self.cone_length();
            bore = bore.to(mouth, -overshoot).to(channel, self.cone_length());
        } else {
            bore = bore.to(channel, -overshoot);
        }
        bore.to(channel, self.n)
            .to(self.pod1 / 2.0, self.n)
            .to(self.pod1 / 2.0, self.l + overshoot)
            .to(0.0, self.l + overshoot)
    }
}

impl Fitting for Bushing {
    const KIND: FittingKind = FittingKind::Bushing;
    const COLUMNS: &'static [&'static str] = &["POD", "POD1", "L", "N"];

    fn validate(&self) -> Result<()> {
        check(self.pod > 0.0, || {
            format!("Pipe outer diameter {} must be positive.", mm(self.pod))
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
        check(self.n > 0.0, || format!("Length N={} must be positive", mm(self.n)))?;
        check(self.l > self.n, || {
            format!(
                "The length L {} must be larger than the length N {}",
                mm(self.l),
                mm(self.n)
            )
        })
    }

    fn auxiliary_points(&self) -> AuxiliaryPoints {
        AuxiliaryPoints::new(vec![
            ("p1", Self::on_axis(0.0)),
            ("p2", Self::on_axis(self.cone_length())),
            ("p3", Self::on_axis(self.n)),
            ("p4", Self::on_axis(self.l - self.nut_thickness())),
        ])
    }

    fn feature_tree(&self) -> Feature {
        let outer = Feature::fuse(
            "Outer",
            vec![Feature::cylinder("OuterCylinder", self.pod / 2.0, self.l), self.nut()],
        );
        let inner = Feature::fuse(
            "Inner",
            vec![
                Feature::cylinder("InnerCylinder", self.pid1() / 2.0, self.l),
                Feature::cylinder("InnerSocket", self.pod1 / 2.0, self.l - self.n)
                    .placed(&at(Self::on_axis(self.n))),
                Feature::cone(
                    "Cone",
                    self.pod / 2.0 - self.cone_wall(),
                    self.pid1() / 2.0,
                    self.cone_length(),
                ),
            ],
        );
        Feature::cut("Bushing", outer, inner)
    }

    fn solid_tree(&self) -> Feature {
        let thickness = self.nut_thickness();
        let outer = Feature::fuse(
            "Outer",
            vec![
                Feature::cylinder("OuterCylinder", self.pod / 2.0, self.l - thickness / 2.0),
                Feature::prism("Nut", self.nut_outline(), thickness)
                    .placed(&at(Self::on_axis(self.l - thickness))),
            ],
        );
        Feature::cut("Bushing", outer, Feature::revolved("Inner", self.bore().profile()))
    }

    fn ports(&self) -> Vec<AdvancedPort> {
        let p3 = Self::on_axis(self.n);
        vec![
            AdvancedPort::from_ypr(p3, 0.0, 90.0, 0.0),
            AdvancedPort::from_ypr(p3, 0.0, -90.0, 0.0),
        ]
    }

    fn parameters(&self) -> ParameterSet {
        numbers(&[
            ("L", self.l),
            ("N", self.n),
            ("POD", self.pod),
            ("POD1", self.pod1),
            ("PThk1", self.pthk1),
        ])
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            l: row.length("L")?,
            n: row.length("N")?,
            pod: row.length("POD")?,
            pod1: row.length("POD1")?,
            pthk1: pipe_thickness(row, "1")?,
            nut: NutShape::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use truck_base::cgmath64::{EuclideanSpace, InnerSpace};

    const EPS: f64 = 1.0e-9;

    #[test]
    fn derived_dimensions() {
        let bushing = Bushing::default();
        assert_eq!(bushing.pid1(), 10.0);
        assert_eq!(bushing.nut_thickness(), 5.0);
        assert!((bushing.nut_width() - 44.0).abs() < EPS);
        assert_eq!(bushing.cone_length(), 10.0);
        let aux = bushing.auxiliary_points();
        assert_eq!(aux.get("p4"), Some(Point3::new(0.0, 0.0, 25.0)));
    }

    #[test]
    fn nut_boxes_are_centred_on_the_axis() -> Result<()> {
        for (nut, count) in [(NutShape::Octagonal, 2), (NutShape::Hexagonal, 3)] {
            let bushing = Bushing::default().with_nut(nut);
            let tree = bushing.build()?;
            let common = tree
                .find("Common")
                .ok_or_else(|| crate::fitting::implausible("missing nut"))?;
            assert_eq!(common.children().len(), count);
            for part in common.children() {
                // The local box centre lands on the axis at the bottom of the nut.
                let depth = match nut {
                    NutShape::Octagonal => bushing.nut_width(),
                    NutShape::Hexagonal => 2.0 * bushing.nut_width(),
                };
                let local_centre = Point3::new(bushing.nut_width() / 2.0, depth / 2.0, 0.0);
                let placement = common.placement().multiply(part.placement());
                let centre = placement.apply_point(local_centre);
                assert!((centre.to_vec() - Vector3::new(0.0, 0.0, 25.0)).magnitude() < EPS);
            }
        }
        Ok(())
    }

    #[test]
    fn nut_outline_keeps_the_width_across_flats() {
        for (nut, sides) in [(NutShape::Octagonal, 8), (NutShape::Hexagonal, 6)] {
            let bushing = Bushing::default().with_nut(nut);
            let outline = bushing.nut_outline();
            assert_eq!(outline.len(), sides);
            for (a, b) in outline.iter().zip(outline.iter().cycle().skip(1)) {
                let middle = ((a[0] + b[0]) / 2.0).hypot((a[1] + b[1]) / 2.0);
                assert!((middle - bushing.nut_width() / 2.0).abs() < EPS);
                assert!(a[0] * b[1] - b[0] * a[1] > 0.0);
            }
        }
    }

    #[test]
    fn bore_runs_past_both_faces() {
        let bushing = Bushing::default();
        let profile = bushing.bore().profile();
        let points = profile.points();
        assert!(profile.touches_axis());
        assert_eq!(points.first(), Some(&[0.0, -4.0]));
        assert_eq!(points.last(), Some(&[0.0, 34.0]));
        // The cone keeps its slope below the bottom face.
        assert_eq!(points[1], [19.0, -4.0]);
        assert_eq!(points[2], [5.0, 10.0]);

        let tree = bushing.solid_tree();
        assert_eq!(tree.primitive_count(), 3);
        assert!(tree.find("Common").is_none());
    }

    #[test]
    fn l_must_exceed_n() {
        let bushing = Bushing {
            l: 20.0,
            ..Bushing::default()
        };
        match bushing.validate() {
            Err(Error::ImplausibleDimensions(message)) => {
                assert_eq!(message, "The length L 20 mm must be larger than the length N 20 mm")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn both_ports_sit_on_the_socket_bottom() {
        let ports = Bushing::default().ports();
        assert_eq!(ports[0].base(), ports[1].base());
        assert!((ports[0].normal() + ports[1].normal()).magnitude() < EPS);
    }
}
