//! Reachability of a named shape.

use super::{CycleGuard, ShapeVisitor};
use crate::model::{Member, Shape, ShapeGraph, ShapeId};

/// Whether a shape named `target` is reachable from `id`
///
/// The starting shape itself does not count; only shapes reached through a
/// member, list member, map key or map value do.
pub fn references(graph: &ShapeGraph, id: ShapeId, target: &str) -> bool {
    ReferenceVisitor::new(graph, target).process(id, ())
}

pub struct ReferenceVisitor<'g, 't> {
    graph: &'g ShapeGraph,
    target: &'t str,
    guard: CycleGuard,
}

impl<'g, 't> ReferenceVisitor<'g, 't> {
    pub fn new(graph: &'g ShapeGraph, target: &'t str) -> Self {
        Self {
            graph,
            target,
            guard: CycleGuard::new(),
        }
    }

    fn reaches(&mut self, id: ShapeId) -> bool {
        self.graph.shape(id).name == self.target || self.process(id, ())
    }
}

impl<'g, 't> ShapeVisitor<'g> for ReferenceVisitor<'g, 't> {
    type Arg = ();
    type Output = bool;

    fn graph(&self) -> &'g ShapeGraph {
        self.graph
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    fn on_cycle(&self) -> bool {
        false
    }

    fn visit_structure(&mut self, _shape: &'g Shape, members: &'g [Member], _: ()) -> bool {
        members.iter().any(|m| self.reaches(m.shape))
    }

    fn visit_list(&mut self, _shape: &'g Shape, member: ShapeId, _: ()) -> bool {
        self.reaches(member)
    }

    fn visit_map(&mut self, _shape: &'g Shape, key: ShapeId, value: ShapeId, _: ()) -> bool {
        self.reaches(key) || self.reaches(value)
    }

    fn visit_string(&mut self, _shape: &'g Shape, _enumeration: &'g [String], _: ()) -> bool {
        false
    }

    fn visit_leaf(&mut self, _shape: &'g Shape, _: ()) -> bool {
        false
    }
}
