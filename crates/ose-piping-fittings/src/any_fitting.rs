//! Runtime choice of a fitting kind.

use ose_piping_shapeops::Feature;

use crate::bushing::Bushing;
use crate::coupling::Coupling;
use crate::corner::Corner;
use crate::cross::Cross;
use crate::elbow::Elbow;
use crate::element::{FittingElement, FittingGeometry, FittingKind, OutputType, ParameterSet};
use crate::error::Result;
use crate::fitting::{AuxiliaryPoints, Fitting, FittingReport};
use crate::pipe::Pipe;
use crate::port::AdvancedPort;
use crate::sweep_elbow::SweepElbow;
use crate::table::Row;
use crate::tee::Tee;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyFitting {
    Pipe(Pipe),
    Elbow(Elbow),
    SweepElbow(SweepElbow),
    Tee(Tee),
    Cross(Cross),
    Coupling(Coupling),
    Bushing(Bushing),
    Corner(Corner),
}

macro_rules! dispatch {
    ($self:expr, $fitting:ident => $body:expr) => {
        match $self {
            AnyFitting::Pipe($fitting) => $body,
            AnyFitting::Elbow($fitting) => $body,
            AnyFitting::SweepElbow($fitting) => $body,
            AnyFitting::Tee($fitting) => $body,
            AnyFitting::Cross($fitting) => $body,
            AnyFitting::Coupling($fitting) => $body,
            AnyFitting::Bushing($fitting) => $body,
            AnyFitting::Corner($fitting) => $body,
        }
    };
}

impl AnyFitting {
    /// Built-in dimensions of `kind`.
    pub fn default_for(kind: FittingKind) -> Self {
        match kind {
            FittingKind::Pipe => Self::Pipe(Pipe::default()),
            FittingKind::Elbow => Self::Elbow(Elbow::default()),
            FittingKind::SweepElbow => Self::SweepElbow(SweepElbow::default()),
            FittingKind::Tee => Self::Tee(Tee::default()),
            FittingKind::Cross => Self::Cross(Cross::default()),
            FittingKind::Coupling => Self::Coupling(Coupling::default()),
            FittingKind::Bushing => Self::Bushing(Bushing::default()),
            FittingKind::Corner => Self::Corner(Corner::default()),
        }
    }

    pub fn from_row(kind: FittingKind, row: &Row<'_>) -> Result<Self> {
        Ok(match kind {
            FittingKind::Pipe => Self::Pipe(Pipe::from_row(row)?),
            FittingKind::Elbow => Self::Elbow(Elbow::from_row(row)?),
            FittingKind::SweepElbow => Self::SweepElbow(SweepElbow::from_row(row)?),
            FittingKind::Tee => Self::Tee(Tee::from_row(row)?),
            FittingKind::Cross => Self::Cross(Cross::from_row(row)?),
            FittingKind::Coupling => Self::Coupling(Coupling::from_row(row)?),
            FittingKind::Bushing => Self::Bushing(Bushing::from_row(row)?),
            FittingKind::Corner => Self::Corner(Corner::from_row(row)?),
        })
    }

    /// Catalog columns a table needs to describe `kind`.
    pub fn columns(kind: FittingKind) -> &'static [&'static str] {
        match kind {
            FittingKind::Pipe => Pipe::COLUMNS,
            FittingKind::Elbow => Elbow::COLUMNS,
            FittingKind::SweepElbow => SweepElbow::COLUMNS,
            FittingKind::Tee => Tee::COLUMNS,
            FittingKind::Cross => Cross::COLUMNS,
            FittingKind::Coupling => Coupling::COLUMNS,
            FittingKind::Bushing => Bushing::COLUMNS,
            FittingKind::Corner => Corner::COLUMNS,
        }
    }

    pub fn kind(&self) -> FittingKind {
        match self {
            Self::Pipe(_) => FittingKind::Pipe,
            Self::Elbow(_) => FittingKind::Elbow,
            Self::SweepElbow(_) => FittingKind::SweepElbow,
            Self::Tee(_) => FittingKind::Tee,
            Self::Cross(_) => FittingKind::Cross,
            Self::Coupling(_) => FittingKind::Coupling,
            Self::Bushing(_) => FittingKind::Bushing,
            Self::Corner(_) => FittingKind::Corner,
        }
    }

    /// Sets the length of a pipe. Other kinds are returned unchanged.
    pub fn with_length(self, length: f64) -> Self {
        match self {
            Self::Pipe(pipe) => Self::Pipe(Pipe { h: length, ..pipe }),
            other => other,
        }
    }

    pub fn validate(&self) -> Result<()> {
        dispatch!(self, f => f.validate())
    }

    pub fn build(&self) -> Result<Feature> {
        dispatch!(self, f => f.build())
    }

    pub fn create(&self, output: OutputType, tol: f64) -> Result<FittingGeometry> {
        dispatch!(self, f => f.create(output, tol))
    }

    pub fn element(&self, output: OutputType, tol: f64) -> Result<FittingElement> {
        dispatch!(self, f => f.element(output, tol))
    }

    pub fn report(&self) -> Result<FittingReport> {
        dispatch!(self, f => f.report())
    }

    pub fn auxiliary_points(&self) -> AuxiliaryPoints {
        dispatch!(self, f => f.auxiliary_points())
    }

    pub fn ports(&self) -> Vec<AdvancedPort> {
        dispatch!(self, f => f.ports())
    }

    pub fn parameters(&self) -> ParameterSet {
        dispatch!(self, f => f.parameters())
    }
}
