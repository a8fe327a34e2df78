use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ose_piping_base::Guid;
use ose_piping_shapeops::Feature;
use ose_piping_topology::Solid;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::port::AdvancedPort;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FittingKind {
    Pipe,
    Elbow,
    SweepElbow,
    Tee,
    Cross,
    Coupling,
    Bushing,
    Corner,
}

impl FittingKind {
    pub const ALL: [FittingKind; 8] = [
        Self::Pipe,
        Self::Elbow,
        Self::SweepElbow,
        Self::Tee,
        Self::Cross,
        Self::Coupling,
        Self::Bushing,
        Self::Corner,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pipe => "Pipe",
            Self::Elbow => "Elbow",
            Self::SweepElbow => "SweepElbow",
            Self::Tee => "Tee",
            Self::Cross => "Cross",
            Self::Coupling => "Coupling",
            Self::Bushing => "Bushing",
            Self::Corner => "Corner",
        }
    }

    /// Label given to generated elements, e.g. `OSE-Tee`.
    pub fn label(self) -> String {
        format!("OSE-{}", self.name())
    }
}

impl fmt::Display for FittingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FittingKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let normalized: String = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_lowercase() == normalized)
            .ok_or_else(|| Error::UnknownKind(text.to_string()))
    }
}

/// What a builder hands back: the tree of named parts or the flattened solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputType {
    #[default]
    Parts,
    Solid,
}

#[derive(Clone, Debug)]
pub enum FittingGeometry {
    Parts(Feature),
    Solid(Solid),
}

impl FittingGeometry {
    pub fn parts(&self) -> Option<&Feature> {
        match self {
            Self::Parts(feature) => Some(feature),
            Self::Solid(_) => None,
        }
    }

    pub fn solid(&self) -> Option<&Solid> {
        match self {
            Self::Parts(_) => None,
            Self::Solid(solid) => Some(solid),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

pub type ParameterSet = BTreeMap<String, ParameterValue>;

#[derive(Clone, Debug)]
pub struct FittingElement {
    pub guid: Guid,
    pub name: String,
    pub kind: FittingKind,
    pub part_number: Option<String>,
    pub parameters: ParameterSet,
    pub ports: Vec<AdvancedPort>,
    pub geometry: FittingGeometry,
}

impl FittingElement {
    pub fn new(
        kind: FittingKind,
        parameters: ParameterSet,
        ports: Vec<AdvancedPort>,
        geometry: FittingGeometry,
    ) -> Self {
        Self {
            guid: Guid::new(),
            name: kind.label(),
            kind,
            part_number: None,
            parameters,
            ports,
            geometry,
        }
    }

    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    pub fn insert_parameter(&mut self, key: impl Into<String>, value: ParameterValue) {
        self.parameters.insert(key.into(), value);
    }

    /// Adds a text parameter unless `value` is empty.
    pub fn insert_text(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.insert_parameter(key, ParameterValue::Text(value.to_string()));
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.parameters.get(key) {
            Some(ParameterValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn geometry(&self) -> &FittingGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_loose_names() -> Result<(), Error> {
        assert_eq!("sweep-elbow".parse::<FittingKind>()?, FittingKind::SweepElbow);
        assert_eq!("SweepElbow".parse::<FittingKind>()?, FittingKind::SweepElbow);
        assert_eq!(" tee ".parse::<FittingKind>()?, FittingKind::Tee);
        assert!(matches!("valve".parse::<FittingKind>(), Err(Error::UnknownKind(_))));
        Ok(())
    }

    #[test]
    fn labels_carry_the_prefix() {
        assert_eq!(FittingKind::Corner.label(), "OSE-Corner");
        assert_eq!(FittingKind::SweepElbow.to_string(), "SweepElbow");
    }
}
