//! Parametric pipe fittings built from primitive solids.
//!
//! Each fitting kind is a plain dimension record implementing [`Fitting`]. It
//! checks its dimensions, derives construction points, and assembles a named
//! tree of cylinders, cones, spheres, boxes and swept circles combined with
//! fuse, common and cut. The tree is either handed out as is or evaluated into
//! a single solid. Catalog tables in CSV form map part numbers to dimensions.

mod any_fitting;
mod bushing;
mod corner;
mod coupling;
mod cross;
mod elbow;
mod element;
mod error;
mod fitting;
mod from_table;
mod pipe;
mod port;
mod sweep_elbow;
mod table;
mod tee;

pub use any_fitting::AnyFitting;
pub use bushing::{Bushing, NutShape};
pub use corner::Corner;
pub use coupling::Coupling;
pub use cross::{Cross, CrossPoints};
pub use elbow::{Elbow, ElbowPoints};
pub use element::{
    FittingElement, FittingGeometry, FittingKind, OutputType, ParameterSet, ParameterValue,
};
pub use error::{Error, Result};
pub use fitting::{AuxiliaryPoints, Fitting, FittingReport, RELATIVE_EPSILON};
pub use from_table::FittingFromTable;
pub use pipe::Pipe;
pub use port::{AdvancedPort, PortSummary, dock_solid, nearest_port, supports_advanced_ports};
pub use sweep_elbow::{DEFAULT_BEND_ANGLE, SweepElbow};
pub use table::{
    DEFAULT_KEY_COLUMN, DimensionTable, Row, dn_string, pipe_thickness, pressure_rating, psize,
};
pub use tee::Tee;

pub use ose_piping_shapeops::{DEFAULT_SHAPEOPS_TOLERANCE, Feature, Node};
