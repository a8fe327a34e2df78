use crate::{Error, Point3, Result, Vector3};

/// A circular profile revolved about an axis: the bent part of an elbow.
///
/// The circle lies in the plane through `center` normal to `normal`; it is
/// swept about the line through `axis_origin` along `axis` by `angle` degrees.
/// `normal` points along the motion of `center` at the start of the sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleSweep {
    pub radius: f64,
    pub center: Point3,
    pub normal: Vector3,
    pub axis_origin: Point3,
    pub axis: Vector3,
    pub angle: f64,
}

/// An outline in the xz half plane `x >= 0`, turned a full revolution about z.
///
/// Points are `[r, z]`. An outline whose first and last points lie on the axis
/// bounds a solid of revolution. One that stays off the axis is closed back to
/// its first point and bounds a ring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    points: Vec<[f64; 2]>,
}

impl Profile {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn touches_axis(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first[0] == 0.0 && last[0] == 0.0,
            _ => false,
        }
    }

    /// The outline checked and ordered clockwise in the (r, z) plane.
    ///
    /// Clockwise outlines revolve about +z into outward facing shells.
    pub(crate) fn clockwise(&self) -> Result<Vec<[f64; 2]>> {
        let points = &self.points;
        if points.len() < 3 {
            return Err(invalid("a profile needs at least three points"));
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(invalid("profile points must be finite"));
        }
        let on_axis = self.touches_axis();
        let last = points.len() - 1;
        for (index, [r, _]) in points.iter().enumerate() {
            let end = index == 0 || index == last;
            if *r < 0.0 || (*r == 0.0 && !(on_axis && end)) {
                return Err(invalid("only the ends of a profile may lie on the axis"));
            }
        }
        let closing = if on_axis { None } else { Some((&points[last], &points[0])) };
        let degenerate = points
            .windows(2)
            .map(|pair| (&pair[0], &pair[1]))
            .chain(closing)
            .any(|(a, b)| a == b);
        if degenerate {
            return Err(invalid("profile has a zero length edge"));
        }

        let area: f64 = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
            .sum();
        if area.abs() <= f64::EPSILON {
            return Err(invalid("profile encloses no area"));
        }
        let mut ordered = points.clone();
        if area > 0.0 {
            ordered.reverse();
        }
        Ok(ordered)
    }
}

/// One stretch of a [`TubePath`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TubeSegment {
    /// Straight run of `length` along the current direction.
    Straight(f64),
    /// Turn of `angle` degrees about the line through `origin` along `axis`.
    Bend {
        origin: Point3,
        axis: Vector3,
        angle: f64,
    },
    /// New radii from here on. The change is closed by flat shoulders.
    Step { inner: f64, outer: f64 },
}

/// An annular cross section carried along straight and bent stretches.
///
/// The section starts at `start`, normal to `direction`, and every segment
/// continues from where the previous one ended.
#[derive(Clone, Debug, PartialEq)]
pub struct TubePath {
    pub start: Point3,
    pub direction: Vector3,
    pub inner: f64,
    pub outer: f64,
    pub segments: Vec<TubeSegment>,
}

impl TubePath {
    pub fn new(start: Point3, direction: Vector3, inner: f64, outer: f64) -> Self {
        Self {
            start,
            direction,
            inner,
            outer,
            segments: Vec::new(),
        }
    }

    pub fn straight(mut self, length: f64) -> Self {
        self.segments.push(TubeSegment::Straight(length));
        self
    }

    pub fn bend(mut self, origin: Point3, axis: Vector3, angle: f64) -> Self {
        self.segments.push(TubeSegment::Bend {
            origin,
            axis,
            angle,
        });
        self
    }

    pub fn step(mut self, inner: f64, outer: f64) -> Self {
        self.segments.push(TubeSegment::Step { inner, outer });
        self
    }
}

/// Solids in their local frame.
///
/// Boxes start at the origin and extend along +x, +y and +z. Cylinders and
/// cones stand on the xy plane around the z axis. Spheres are centred on the
/// origin. Prisms extrude an xy outline along +z. Revolved profiles turn
/// about z. Swept circles and tubes are given in absolute coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Box { length: f64, width: f64, height: f64 },
    Cylinder { radius: f64, height: f64 },
    Cone { radius1: f64, radius2: f64, height: f64 },
    Sphere { radius: f64 },
    SweptCircle(CircleSweep),
    Prism { outline: Vec<[f64; 2]>, height: f64 },
    Revolved(Profile),
    Tube(TubePath),
}

impl Primitive {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "Box",
            Self::Cylinder { .. } => "Cylinder",
            Self::Cone { .. } => "Cone",
            Self::Sphere { .. } => "Sphere",
            Self::SweptCircle(_) => "Sweep",
            Self::Prism { .. } => "Prism",
            Self::Revolved(_) => "Revolution",
            Self::Tube(_) => "Tube",
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidParameter(message.to_string())
}
