//! Sockets with a local frame and the algebra to dock one fitting onto another.
//!
//! A port's rotation maps the x axis onto the socket normal and the y axis onto
//! the angle reference. Docking rotates the moving part so that its normal
//! points against the other normal while both angle references agree.

use ose_piping_geometry::{Placement, Point3, Rotation, Vector3, directions};
use ose_piping_topology::Solid;
use serde::{Deserialize, Serialize};
use truck_base::cgmath64::{EuclideanSpace, MetricSpace};

use crate::element::FittingElement;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvancedPort {
    pub placement: Placement,
}

impl Default for AdvancedPort {
    fn default() -> Self {
        Self {
            placement: Placement::identity(),
        }
    }
}

impl AdvancedPort {
    pub fn new(base: Point3, rotation: Rotation) -> Self {
        Self {
            placement: Placement::new(base.to_vec(), rotation),
        }
    }

    /// Port at `base` whose rotation is given as yaw, pitch and roll in degrees.
    pub fn from_ypr(base: Point3, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::new(base, Rotation::from_ypr(yaw, pitch, roll))
    }

    pub fn base(&self) -> Point3 {
        Point3::from_vec(self.placement.base)
    }

    pub fn normal(&self) -> Vector3 {
        self.placement.rotation.apply(directions::x())
    }

    pub fn angle_reference(&self) -> Vector3 {
        self.placement.rotation.apply(directions::y())
    }

    /// Rotation of a part carrying this port so that the port faces `other_port`
    /// of a part placed at `other_placement`.
    pub fn part_rotation(&self, other_placement: &Placement, other_port: &AdvancedPort) -> Rotation {
        let flip = Rotation::from_ypr(0.0, 180.0, 0.0);
        other_placement.rotation.multiply(
            &other_port
                .placement
                .rotation
                .multiply(&flip.multiply(&self.placement.rotation.inverted())),
        )
    }

    pub fn part_base(&self, other_placement: &Placement, other_port: &AdvancedPort) -> Vector3 {
        let other_global = other_port.global_position(other_placement).to_vec();
        let rotation = self.part_rotation(other_placement, other_port);
        other_global - rotation.apply(self.placement.base)
    }

    pub fn part_placement(&self, other_placement: &Placement, other_port: &AdvancedPort) -> Placement {
        Placement::new(
            self.part_base(other_placement, other_port),
            self.part_rotation(other_placement, other_port),
        )
    }

    pub fn global_position(&self, part_placement: &Placement) -> Point3 {
        part_placement.apply_point(self.base())
    }

    pub fn summary(&self) -> PortSummary {
        let (yaw, pitch, roll) = self.placement.rotation.to_ypr();
        let base = self.base();
        let normal = self.normal();
        PortSummary {
            base: [base.x, base.y, base.z],
            rotation: [yaw, pitch, roll],
            normal: [normal.x, normal.y, normal.z],
        }
    }
}

/// Plain view of a port for reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortSummary {
    pub base: [f64; 3],
    pub rotation: [f64; 3],
    pub normal: [f64; 3],
}

/// Port whose global position is closest to `point`.
pub fn nearest_port<'a>(
    part_placement: &Placement,
    ports: &'a [AdvancedPort],
    point: Point3,
) -> Option<&'a AdvancedPort> {
    ports
        .iter()
        .map(|port| (port, port.global_position(part_placement).distance(point)))
        .fold(None, |best: Option<(&AdvancedPort, f64)>, (port, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((port, distance)),
        })
        .map(|(port, _)| port)
}

pub fn supports_advanced_ports(element: Option<&FittingElement>) -> bool {
    element.is_some_and(|element| !element.ports.is_empty())
}

/// Moves a solid so that `moving_port` docks onto `fixed_port` of a part at `fixed_placement`.
pub fn dock_solid(
    solid: &Solid,
    moving_port: &AdvancedPort,
    fixed_placement: &Placement,
    fixed_port: &AdvancedPort,
) -> Solid {
    let placement = moving_port.part_placement(fixed_placement, fixed_port);
    ose_piping_topology::SolidBuilder::placed(solid, &placement)
}
