//! 解析阶段的原始实体：库所、迁移与弧的纯值记录.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::net::structure::Tokens;

/// Kind of node an id belongs to, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Place,
    Transition,
    Arc,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Place => "place",
            EntityKind::Transition => "transition",
            EntityKind::Arc => "arc",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub initial_marking: Tokens,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>, initial_marking: Tokens) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            initial_marking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

impl Transition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An arc as written in the document. Direction is resolved later by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arc {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Arc {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Raw contents of a `net` element.
///
/// Places and transitions are keyed by id and keep document order; arcs are a
/// plain list because their ids are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetriDocument {
    pub places: IndexMap<String, Place>,
    pub transitions: IndexMap<String, Transition>,
    pub arcs: Vec<Arc>,
}

impl PetriDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_place(&self, id: &str) -> bool {
        self.places.contains_key(id)
    }

    pub fn is_transition(&self, id: &str) -> bool {
        self.transitions.contains_key(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.is_place(id) || self.is_transition(id)
    }
}

impl fmt::Display for PetriDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Places:")?;
        for place in self.places.values() {
            writeln!(
                f,
                "  {} ({}) - initial tokens: {}",
                place.id, place.name, place.initial_marking
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Transitions:")?;
        for transition in self.transitions.values() {
            writeln!(f, "  {} ({})", transition.id, transition.name)?;
        }
        writeln!(f)?;
        writeln!(f, "Arcs:")?;
        for arc in &self.arcs {
            writeln!(f, "  {}: {} -> {}", arc.id, arc.source, arc.target)?;
        }
        Ok(())
    }
}
