//! Literal rendering of a shape's full nested type.

use super::{CycleGuard, ShapeVisitor};
use crate::model::{Member, Shape, ShapeGraph, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language-agnostic rendering of a shape's type
///
/// Serializes as plain JSON: a string for scalars, a one-element array for
/// lists, an object for structures and maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRepr {
    Scalar(String),
    Sequence(Vec<TypeRepr>),
    Mapping(BTreeMap<String, TypeRepr>),
}

impl TypeRepr {
    /// The value a cycle is cut off with
    pub fn cut() -> Self {
        TypeRepr::Sequence(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TypeRepr::Scalar(s) => s.is_empty(),
            TypeRepr::Sequence(items) => items.is_empty(),
            TypeRepr::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Text usable as a mapping key
    fn key_text(&self) -> String {
        match self {
            TypeRepr::Scalar(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

/// Render `id` with a fresh cycle guard
pub fn render(graph: &ShapeGraph, id: ShapeId) -> TypeRepr {
    TypeReprVisitor::new(graph).process(id, ())
}

pub struct TypeReprVisitor<'g> {
    graph: &'g ShapeGraph,
    guard: CycleGuard,
}

impl<'g> TypeReprVisitor<'g> {
    pub fn new(graph: &'g ShapeGraph) -> Self {
        Self {
            graph,
            guard: CycleGuard::new(),
        }
    }
}

impl<'g> ShapeVisitor<'g> for TypeReprVisitor<'g> {
    type Arg = ();
    type Output = TypeRepr;

    fn graph(&self) -> &'g ShapeGraph {
        self.graph
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    fn on_cycle(&self) -> TypeRepr {
        TypeRepr::cut()
    }

    fn visit_structure(&mut self, _shape: &'g Shape, members: &'g [Member], _: ()) -> TypeRepr {
        TypeRepr::Mapping(
            members
                .iter()
                .map(|m| (m.name.clone(), self.process(m.shape, ())))
                .collect(),
        )
    }

    fn visit_list(&mut self, _shape: &'g Shape, member: ShapeId, _: ()) -> TypeRepr {
        TypeRepr::Sequence(vec![self.process(member, ())])
    }

    fn visit_map(&mut self, _shape: &'g Shape, key: ShapeId, value: ShapeId, _: ()) -> TypeRepr {
        let key = self.process(key, ()).key_text();
        let value = self.process(value, ());
        TypeRepr::Mapping(BTreeMap::from([(key, value)]))
    }

    fn visit_string(&mut self, _shape: &'g Shape, enumeration: &'g [String], _: ()) -> TypeRepr {
        if enumeration.is_empty() {
            TypeRepr::Scalar("string".to_string())
        } else {
            TypeRepr::Scalar(enumeration.join(" | "))
        }
    }

    fn visit_leaf(&mut self, shape: &'g Shape, _: ()) -> TypeRepr {
        TypeRepr::Scalar(shape.kind.tag().to_string())
    }
}
