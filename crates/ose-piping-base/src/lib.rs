//! Identifiers, units and quantity parsing shared by the piping crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod quantity;

pub use quantity::{parse_angle, parse_length};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Decimeter,
    Meter,
    Inch,
    Foot,
}

impl LengthUnit {
    pub const fn millimeters(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Decimeter => 100.0,
            Self::Meter => 1000.0,
            Self::Inch => 25.4,
            Self::Foot => 304.8,
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "dm" => Some(Self::Decimeter),
            "m" => Some(Self::Meter),
            "in" | "\"" => Some(Self::Inch),
            "ft" | "'" => Some(Self::Foot),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degree,
    Radian,
}

impl AngleUnit {
    pub fn degrees(self) -> f64 {
        match self {
            Self::Degree => 1.0,
            Self::Radian => 180.0 / std::f64::consts::PI,
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "deg" | "°" => Some(Self::Degree),
            "rad" => Some(Self::Radian),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid quantity '{text}': {reason}")]
    InvalidQuantity { text: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
