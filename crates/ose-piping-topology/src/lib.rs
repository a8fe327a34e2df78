use ose_piping_geometry::{Placement, Rotation};
use thiserror::Error;
use truck_base::cgmath64::{EuclideanSpace, InnerSpace};
use truck_modeling::{Plane, Rad, builder};

pub use truck_modeling::{
    Curve, Edge, Face, Point3, Shell, ShellCondition, Solid, Surface, Vector3, Vertex, Wire,
};

mod primitive;

pub use primitive::{CircleSweep, Primitive, Profile, TubePath, TubeSegment};

const FULL_TURN: f64 = std::f64::consts::PI * 2.0;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Modeling(#[from] truck_modeling::errors::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Whether `solid` has boundary shells and each is closed and consistently oriented.
pub fn is_closed(solid: &Solid) -> bool {
    let shells = solid.boundaries();
    !shells.is_empty()
        && shells
            .iter()
            .all(|shell| !shell.is_empty() && shell.shell_condition() == ShellCondition::Closed)
}

pub struct SolidBuilder;

impl SolidBuilder {
    pub fn box_solid(length: f64, width: f64, height: f64) -> Result<Solid> {
        ensure_positive("length", length)?;
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;

        let v = builder::vertex(Point3::new(0.0, 0.0, 0.0));
        let e = builder::tsweep(&v, Vector3::unit_x() * length);
        let f = builder::tsweep(&e, Vector3::unit_y() * width);
        Ok(builder::tsweep(&f, Vector3::unit_z() * height))
    }

    pub fn cylinder_z(center: Point3, radius: f64, height: f64) -> Result<Solid> {
        ensure_positive("radius", radius)?;
        ensure_positive("height", height)?;

        let face = circle_face(center, radius)?;
        Ok(builder::tsweep(&face, Vector3::unit_z() * height))
    }

    /// Frustum around the z axis from `radius1` at z = 0 to `radius2` at z = `height`.
    pub fn cone_z(radius1: f64, radius2: f64, height: f64) -> Result<Solid> {
        ensure_non_negative("radius1", radius1)?;
        ensure_non_negative("radius2", radius2)?;
        ensure_positive("height", height)?;
        if radius1 <= 0.0 && radius2 <= 0.0 {
            return Err(Error::InvalidParameter(
                "radius1 or radius2 must be > 0".to_string(),
            ));
        }
        if radius1 == radius2 {
            return Self::cylinder_z(Point3::origin(), radius1, height);
        }

        let mut outline = vec![[0.0, height]];
        if radius2 > 0.0 {
            outline.push([radius2, height]);
        }
        if radius1 > 0.0 {
            outline.push([radius1, 0.0]);
        }
        outline.push([0.0, 0.0]);
        Self::revolved(&Profile::new(outline))
    }

    pub fn sphere(radius: f64) -> Result<Solid> {
        ensure_positive("radius", radius)?;

        let top = builder::vertex(Point3::new(0.0, 0.0, radius));
        let bottom = builder::vertex(Point3::new(0.0, 0.0, -radius));
        let arc = builder::circle_arc(&top, &bottom, Point3::new(radius, 0.0, 0.0));
        let wire: Wire = vec![arc].into();
        closed_solid(builder::cone(&wire, Vector3::unit_z(), Rad(FULL_TURN)))
    }

    /// Turns `profile` a full revolution about the z axis.
    ///
    /// The axis itself is never part of the swept outline, so the poles of
    /// an axis touching profile collapse into single vertices.
    pub fn revolved(profile: &Profile) -> Result<Solid> {
        let outline = profile.clockwise()?;
        let vertices: Vec<Vertex> = outline
            .iter()
            .map(|[r, z]| builder::vertex(Point3::new(*r, 0.0, *z)))
            .collect();
        if profile.touches_axis() {
            let edges: Vec<Edge> = vertices
                .windows(2)
                .map(|pair| builder::line(&pair[0], &pair[1]))
                .collect();
            let wire: Wire = edges.into();
            closed_solid(builder::cone(&wire, Vector3::unit_z(), Rad(FULL_TURN)))
        } else {
            let wire = closed_polyline(&vertices);
            closed_solid(builder::rsweep(
                &wire,
                Point3::origin(),
                Vector3::unit_z(),
                Rad(FULL_TURN),
            ))
        }
    }

    /// Extrudes a polygon in the xy plane along +z.
    pub fn prism(outline: &[[f64; 2]], height: f64) -> Result<Solid> {
        ensure_positive("height", height)?;
        if outline.len() < 3 || outline.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter(
                "a prism needs at least three finite outline points".to_string(),
            ));
        }
        let area: f64 = outline
            .iter()
            .zip(outline.iter().cycle().skip(1))
            .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
            .sum();
        if area.abs() <= f64::EPSILON {
            return Err(Error::InvalidParameter(
                "prism outline encloses no area".to_string(),
            ));
        }
        let mut outline = outline.to_vec();
        if area < 0.0 {
            outline.reverse();
        }
        let vertices: Vec<Vertex> = outline
            .iter()
            .map(|[x, y]| builder::vertex(Point3::new(*x, *y, 0.0)))
            .collect();
        let face = builder::try_attach_plane(&[closed_polyline(&vertices)])?;
        Ok(builder::tsweep(&face, Vector3::unit_z() * height))
    }

    pub fn swept_circle(sweep: &CircleSweep) -> Result<Solid> {
        ensure_positive("radius", sweep.radius)?;
        ensure_positive("angle", sweep.angle)?;
        ensure_direction("normal", sweep.normal)?;
        ensure_direction("axis", sweep.axis)?;

        let profile = circle_face(Point3::origin(), sweep.radius)?;
        let to_normal = Rotation::between(Vector3::unit_z(), sweep.normal);
        let profile = placed_face(&profile, &Placement::new(sweep.center.to_vec(), to_normal));
        Ok(builder::rsweep(
            &profile,
            sweep.axis_origin,
            sweep.axis.normalize(),
            Rad(sweep.angle.to_radians()),
        ))
    }

    /// Carries an annular section along `path` as one shell.
    ///
    /// Each sweep starts from the end face of the previous one, so the pieces
    /// share their edges and no boolean operation is needed to join them.
    pub fn tube(path: &TubePath) -> Result<Solid> {
        ensure_direction("direction", path.direction)?;
        ensure_annulus(path.inner, path.outer)?;

        let mut center = path.start;
        let mut direction = path.direction.normalize();
        let (mut inner, mut outer) = (path.inner, path.outer);
        let mut cap = annulus_face(center, direction, inner, outer)?;
        let mut faces = vec![cap.inverse()];
        let mut swept = false;

        for segment in &path.segments {
            match *segment {
                TubeSegment::Straight(length) => {
                    ensure_positive("length", length)?;
                    let solid = builder::tsweep(&cap, direction * length);
                    cap = side_faces(&solid, &mut faces)?;
                    center += direction * length;
                    swept = true;
                }
                TubeSegment::Bend {
                    origin,
                    axis,
                    angle,
                } => {
                    ensure_positive("angle", angle)?;
                    ensure_direction("axis", axis)?;
                    if angle >= 360.0 {
                        return Err(Error::InvalidParameter(
                            "bend angle must be < 360".to_string(),
                        ));
                    }
                    let axis = axis.normalize();
                    let arm = center - origin;
                    let radial = arm - axis * arm.dot(axis);
                    if radial.magnitude() <= outer || axis.cross(radial).dot(direction) <= 0.0 {
                        return Err(Error::InvalidParameter(
                            "bend must turn the section forward around an axis outside it"
                                .to_string(),
                        ));
                    }
                    let solid = builder::rsweep(&cap, origin, axis, Rad(angle.to_radians()));
                    cap = side_faces(&solid, &mut faces)?;
                    let turn = Rotation::from_axis_angle(axis, angle);
                    center = origin + turn.apply(arm);
                    direction = turn.apply(direction);
                    swept = true;
                }
                TubeSegment::Step {
                    inner: new_inner,
                    outer: new_outer,
                } => {
                    ensure_annulus(new_inner, new_outer)?;
                    if new_inner >= outer || inner >= new_outer {
                        return Err(Error::InvalidParameter(
                            "step must overlap the previous section".to_string(),
                        ));
                    }
                    if swept {
                        cap = shouldered(
                            &cap,
                            center,
                            direction,
                            [inner, outer],
                            [new_inner, new_outer],
                            &mut faces,
                        )?;
                    } else {
                        cap = annulus_face(center, direction, new_inner, new_outer)?;
                        faces = vec![cap.inverse()];
                    }
                    inner = new_inner;
                    outer = new_outer;
                }
            }
        }

        faces.push(cap);
        closed_solid(Shell::from(faces))
    }

    pub fn primitive(primitive: &Primitive) -> Result<Solid> {
        match primitive {
            Primitive::Box {
                length,
                width,
                height,
            } => Self::box_solid(*length, *width, *height),
            Primitive::Cylinder { radius, height } => {
                Self::cylinder_z(Point3::origin(), *radius, *height)
            }
            Primitive::Cone {
                radius1,
                radius2,
                height,
            } => Self::cone_z(*radius1, *radius2, *height),
            Primitive::Sphere { radius } => Self::sphere(*radius),
            Primitive::SweptCircle(sweep) => Self::swept_circle(sweep),
            Primitive::Prism { outline, height } => Self::prism(outline, *height),
            Primitive::Revolved(profile) => Self::revolved(profile),
            Primitive::Tube(path) => Self::tube(path),
        }
    }

    /// Moves a solid from its local frame into the frame given by `placement`.
    pub fn placed(solid: &Solid, placement: &Placement) -> Solid {
        let (axis, degrees) = placement.rotation.to_axis_angle();
        let mut solid = solid.clone();
        if degrees > 0.0 {
            solid = builder::rotated(&solid, Point3::origin(), axis, Rad(degrees.to_radians()));
        }
        if placement.base.magnitude() > 0.0 {
            solid = builder::translated(&solid, placement.base);
        }
        solid
    }
}

fn closed_solid(shell: Shell) -> Result<Solid> {
    Ok(Solid::try_new(vec![shell]).map_err(truck_modeling::errors::Error::from)?)
}

fn closed_polyline(vertices: &[Vertex]) -> Wire {
    let edges: Vec<Edge> = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(v0, v1)| builder::line(v0, v1))
        .collect();
    edges.into()
}

fn placed_face(face: &Face, placement: &Placement) -> Face {
    let (axis, degrees) = placement.rotation.to_axis_angle();
    let mut face = face.clone();
    if degrees > 0.0 {
        face = builder::rotated(&face, Point3::origin(), axis, Rad(degrees.to_radians()));
    }
    if placement.base.magnitude() > 0.0 {
        face = builder::translated(&face, placement.base);
    }
    face
}

fn circle_face(center: Point3, radius: f64) -> Result<Face> {
    let v = builder::vertex(Point3::new(center.x + radius, center.y, center.z));
    let wire = builder::rsweep(&v, center, Vector3::unit_z(), Rad(FULL_TURN));
    Ok(builder::try_attach_plane(&[wire])?)
}

fn perpendicular(direction: Vector3) -> Vector3 {
    let seed = if direction.x.abs() < 0.9 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    direction.cross(seed).normalize()
}

// Counter-clockwise about `normal`, which must be a unit vector.
fn circle_wire(center: Point3, normal: Vector3, radius: f64) -> Wire {
    let v = builder::vertex(center + perpendicular(normal) * radius);
    builder::rsweep(&v, center, normal, Rad(FULL_TURN))
}

fn plane_face(boundaries: Vec<Wire>, center: Point3, normal: Vector3) -> Result<Face> {
    let u = perpendicular(normal);
    let v = normal.cross(u);
    let plane = Plane::new(center, center + u, center + v);
    let face = Face::try_new(boundaries, Surface::Plane(plane))
        .map_err(truck_modeling::errors::Error::from)?;
    Ok(face)
}

fn annulus_face(center: Point3, normal: Vector3, inner: f64, outer: f64) -> Result<Face> {
    let rim = circle_wire(center, normal, outer);
    let bore = circle_wire(center, normal, inner).inverse();
    plane_face(vec![rim, bore], center, normal)
}

// Keeps the side faces of a swept section and returns its end face.
fn side_faces(solid: &Solid, faces: &mut Vec<Face>) -> Result<Face> {
    let mut swept: Vec<Face> = solid
        .boundaries()
        .iter()
        .flat_map(|shell| shell.face_iter())
        .cloned()
        .collect();
    if swept.len() < 3 {
        return Err(Error::InvalidParameter(
            "sweep produced no side faces".to_string(),
        ));
    }
    let end = swept.pop().ok_or_else(|| {
        Error::InvalidParameter("sweep produced no end face".to_string())
    })?;
    faces.extend(swept.into_iter().skip(1));
    Ok(end)
}

fn wire_radius(wire: &Wire, center: Point3) -> f64 {
    wire.front_vertex()
        .map(|vertex| (vertex.point() - center).magnitude())
        .unwrap_or_default()
}

// Replaces the rims of `cap` that change radius by flat shoulders and
// returns the new end face.
fn shouldered(
    cap: &Face,
    center: Point3,
    direction: Vector3,
    from: [f64; 2],
    to: [f64; 2],
    faces: &mut Vec<Face>,
) -> Result<Face> {
    let mut wires = cap.boundaries();
    wires.sort_by(|a, b| wire_radius(a, center).total_cmp(&wire_radius(b, center)));
    let [bore, rim]: [Wire; 2] = wires.try_into().map_err(|_| {
        Error::InvalidParameter("tube section must have two rims".to_string())
    })?;

    let rim = if to[1] == from[1] {
        rim
    } else {
        let circle = circle_wire(center, direction, to[1]);
        let normal = if to[1] > from[1] { -direction } else { direction };
        faces.push(plane_face(vec![rim, circle.inverse()], center, normal)?);
        circle
    };
    let bore = if to[0] == from[0] {
        bore
    } else {
        let circle = circle_wire(center, direction, to[0]).inverse();
        let normal = if to[0] > from[0] { direction } else { -direction };
        faces.push(plane_face(vec![bore, circle.inverse()], center, normal)?);
        circle
    };
    plane_face(vec![rim, bore], center, direction)
}

fn ensure_annulus(inner: f64, outer: f64) -> Result<()> {
    ensure_positive("inner radius", inner)?;
    ensure_positive("outer radius", outer)?;
    if inner >= outer {
        return Err(Error::InvalidParameter(
            "inner radius must be < outer radius".to_string(),
        ));
    }
    Ok(())
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}

fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidParameter(format!("{name} must be >= 0")));
    }
    Ok(())
}

fn ensure_direction(name: &str, value: Vector3) -> Result<()> {
    if value.magnitude() <= ose_piping_geometry::DIRECTION_EPSILON {
        return Err(Error::InvalidParameter(format!("{name} must be a non-zero vector")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_points(solid: &Solid) -> Vec<Point3> {
        solid
            .face_iter()
            .flat_map(|face| face.boundaries())
            .flat_map(|wire| wire.vertex_iter().map(|v| v.point()).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn box_solid_has_six_faces() -> Result<()> {
        let solid = SolidBuilder::box_solid(100.0, 200.0, 300.0)?;
        assert_eq!(solid.face_iter().count(), 6);
        let points = corner_points(&solid);
        assert!(points.iter().any(|p| (p - Point3::new(100.0, 200.0, 300.0)).magnitude() < 1.0e-9));
        Ok(())
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(SolidBuilder::box_solid(0.0, 1.0, 1.0).is_err());
        assert!(SolidBuilder::cylinder_z(Point3::origin(), -1.0, 1.0).is_err());
        assert!(SolidBuilder::cone_z(0.0, 0.0, 1.0).is_err());
        assert!(SolidBuilder::cone_z(1.0, 2.0, f64::NAN).is_err());
        assert!(SolidBuilder::sphere(0.0).is_err());
    }

    #[test]
    fn cylinder_vertices_lie_on_its_rims() -> Result<()> {
        let solid = SolidBuilder::cylinder_z(Point3::new(1.0, 2.0, 0.0), 5.0, 10.0)?;
        for p in corner_points(&solid) {
            let radial = ((p.x - 1.0).powi(2) + (p.y - 2.0).powi(2)).sqrt();
            assert!((radial - 5.0).abs() < 1.0e-9);
            assert!(p.z.abs() < 1.0e-9 || (p.z - 10.0).abs() < 1.0e-9);
        }
        Ok(())
    }

    #[test]
    fn sphere_and_cone_shells_are_closed() -> Result<()> {
        let sphere = SolidBuilder::sphere(4.0)?;
        assert!(is_closed(&sphere));
        for p in corner_points(&sphere) {
            assert!(((p - Point3::origin()).magnitude() - 4.0).abs() < 1.0e-9);
        }
        assert!(is_closed(&SolidBuilder::cone_z(5.0, 2.0, 3.0)?));
        assert!(is_closed(&SolidBuilder::cone_z(0.0, 2.0, 3.0)?));
        Ok(())
    }

    #[test]
    fn ring_profile_revolves_into_a_closed_solid() -> Result<()> {
        let ring = Profile::new(vec![[2.0, 0.0], [2.0, 5.0], [3.0, 5.0], [4.0, 0.0]]);
        let solid = SolidBuilder::revolved(&ring)?;
        assert!(is_closed(&solid));
        for p in corner_points(&solid) {
            let radial = (p.x * p.x + p.y * p.y).sqrt();
            assert!(radial > 2.0 - 1.0e-9 && radial < 4.0 + 1.0e-9);
        }
        Ok(())
    }

    #[test]
    fn clockwise_prism_outline_is_accepted() -> Result<()> {
        let outline = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
        let solid = SolidBuilder::prism(&outline, 2.0)?;
        assert!(is_closed(&solid));
        assert_eq!(solid.face_iter().count(), 6);
        Ok(())
    }

    #[test]
    fn stepped_tube_is_one_closed_shell() -> Result<()> {
        let path = TubePath::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x(), 2.0, 3.0)
            .straight(4.0)
            .step(1.5, 3.0)
            .step(1.5, 2.5)
            .bend(Point3::new(4.0, 5.0, 0.0), Vector3::unit_z(), 90.0)
            .step(1.5, 3.0)
            .straight(2.0);
        let solid = SolidBuilder::tube(&path)?;
        assert!(is_closed(&solid));
        assert_eq!(solid.boundaries().len(), 1);
        Ok(())
    }

    #[test]
    fn tube_rejects_backward_bends_and_gaps() {
        let start = || TubePath::new(Point3::origin(), Vector3::unit_x(), 1.0, 2.0).straight(1.0);
        let backward = start().bend(Point3::new(1.0, 5.0, 0.0), -Vector3::unit_z(), 45.0);
        assert!(SolidBuilder::tube(&backward).is_err());
        let through_axis = start().bend(Point3::new(1.0, 1.0, 0.0), Vector3::unit_z(), 45.0);
        assert!(SolidBuilder::tube(&through_axis).is_err());
        let gap = start().step(2.5, 3.0);
        assert!(SolidBuilder::tube(&gap).is_err());
    }

    #[test]
    fn placement_moves_box_corners() -> Result<()> {
        let solid = SolidBuilder::box_solid(2.0, 2.0, 2.0)?;
        let placement = Placement::new(
            Vector3::new(10.0, 0.0, 0.0),
            Rotation::from_axis_angle(Vector3::unit_z(), 90.0),
        );
        let moved = SolidBuilder::placed(&solid, &placement);
        for p in corner_points(&moved) {
            assert!(p.x >= 8.0 - 1.0e-9 && p.x <= 10.0 + 1.0e-9);
            assert!(p.y >= -1.0e-9 && p.y <= 2.0 + 1.0e-9);
        }
        Ok(())
    }
}
