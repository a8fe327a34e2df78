//! Named constructive solid geometry trees.
//!
//! A [`Feature`] keeps the construction of a fitting as data: the primitives,
//! the boolean nodes combining them and the placement of every node. The tree
//! can be inspected by name and flattened into one B-rep solid on demand.

use ose_piping_geometry::Placement;
use ose_piping_topology::{CircleSweep, Primitive, Profile, Solid, SolidBuilder, TubePath};

use crate::{Error, Result, difference, intersection, union};

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Primitive(Primitive),
    Fuse(Vec<Feature>),
    Common(Vec<Feature>),
    Cut { base: Box<Feature>, tool: Box<Feature> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    name: String,
    placement: Placement,
    node: Node,
}

impl Feature {
    pub fn new(name: impl Into<String>, node: Node) -> Self {
        Self {
            name: name.into(),
            placement: Placement::identity(),
            node,
        }
    }

    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::new(name, Node::Primitive(primitive))
    }

    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64) -> Self {
        Self::primitive(name, Primitive::Cylinder { radius, height })
    }

    pub fn cone(name: impl Into<String>, radius1: f64, radius2: f64, height: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Cone {
                radius1,
                radius2,
                height,
            },
        )
    }

    pub fn sphere(name: impl Into<String>, radius: f64) -> Self {
        Self::primitive(name, Primitive::Sphere { radius })
    }

    pub fn cuboid(name: impl Into<String>, length: f64, width: f64, height: f64) -> Self {
        Self::primitive(
            name,
            Primitive::Box {
                length,
                width,
                height,
            },
        )
    }

    pub fn sweep(name: impl Into<String>, sweep: CircleSweep) -> Self {
        Self::primitive(name, Primitive::SweptCircle(sweep))
    }

    pub fn prism(name: impl Into<String>, outline: Vec<[f64; 2]>, height: f64) -> Self {
        Self::primitive(name, Primitive::Prism { outline, height })
    }

    pub fn revolved(name: impl Into<String>, profile: Profile) -> Self {
        Self::primitive(name, Primitive::Revolved(profile))
    }

    pub fn tube(name: impl Into<String>, path: TubePath) -> Self {
        Self::primitive(name, Primitive::Tube(path))
    }

    pub fn fuse(name: impl Into<String>, children: Vec<Feature>) -> Self {
        Self::new(name, Node::Fuse(children))
    }

    pub fn common(name: impl Into<String>, children: Vec<Feature>) -> Self {
        Self::new(name, Node::Common(children))
    }

    pub fn cut(name: impl Into<String>, base: Feature, tool: Feature) -> Self {
        Self::new(
            name,
            Node::Cut {
                base: Box::new(base),
                tool: Box::new(tool),
            },
        )
    }

    /// Moves the feature by `placement`, on top of any placement it already has.
    pub fn placed(mut self, placement: &Placement) -> Self {
        self.placement = placement.multiply(&self.placement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn children(&self) -> Vec<&Feature> {
        match &self.node {
            Node::Primitive(_) => Vec::new(),
            Node::Fuse(children) | Node::Common(children) => children.iter().collect(),
            Node::Cut { base, tool } => vec![base.as_ref(), tool.as_ref()],
        }
    }

    /// Every node of the tree, children before their parent. The root comes last.
    pub fn nested(&self) -> Vec<&Feature> {
        let mut result = Vec::new();
        self.collect_nested(&mut result);
        result
    }

    fn collect_nested<'a>(&'a self, result: &mut Vec<&'a Feature>) {
        for child in self.children() {
            child.collect_nested(result);
        }
        result.push(self);
    }

    /// First node named `name` in depth-first order.
    pub fn find(&self, name: &str) -> Option<&Feature> {
        if self.name == name {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.find(name))
    }

    pub fn primitive_count(&self) -> usize {
        match &self.node {
            Node::Primitive(_) => 1,
            _ => self.children().iter().map(|child| child.primitive_count()).sum(),
        }
    }

    /// Flattens the tree into a single solid.
    pub fn evaluate(&self, tol: f64) -> Result<Solid> {
        let solid = self.evaluate_local(tol).map_err(|err| match err {
            Error::Feature { .. } => err,
            other => Error::Feature {
                name: self.name.clone(),
                source: Box::new(other),
            },
        })?;
        if self.placement.is_identity() {
            Ok(solid)
        } else {
            Ok(SolidBuilder::placed(&solid, &self.placement))
        }
    }

    fn evaluate_local(&self, tol: f64) -> Result<Solid> {
        match &self.node {
            Node::Primitive(primitive) => Ok(SolidBuilder::primitive(primitive)?),
            Node::Fuse(children) => fold(children, tol, union),
            Node::Common(children) => fold(children, tol, intersection),
            Node::Cut { base, tool } => {
                let base = base.evaluate(tol)?;
                let tool = tool.evaluate(tol)?;
                difference(&base, &tool, tol)
            }
        }
    }
}

fn fold(
    children: &[Feature],
    tol: f64,
    op: fn(&Solid, &Solid, f64) -> Result<Solid>,
) -> Result<Solid> {
    let (first, rest) = children
        .split_first()
        .ok_or_else(|| Error::InvalidParameter("boolean node without children".to_string()))?;
    let mut acc = first.evaluate(tol)?;
    for child in rest {
        let next = child.evaluate(tol)?;
        acc = op(&acc, &next, tol)?;
    }
    Ok(acc)
}
