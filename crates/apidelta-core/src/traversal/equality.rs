//! Structural equality between same-named shapes of two graphs.

use super::{CycleGuard, ShapeVisitor};
use crate::model::{Member, Shape, ShapeGraph, ShapeId, ShapeKind};
use std::collections::BTreeSet;

/// Whether `new_id` (in `new`) is structurally identical to `old_id` (in `old`)
///
/// Members removed from the new side do not make shapes unequal; members
/// added to it do.
pub fn shapes_equal(new: &ShapeGraph, new_id: ShapeId, old: &ShapeGraph, old_id: ShapeId) -> bool {
    EqualityVisitor::new(new, old).process(new_id, old_id)
}

pub struct EqualityVisitor<'g> {
    new: &'g ShapeGraph,
    old: &'g ShapeGraph,
    guard: CycleGuard,
}

impl<'g> EqualityVisitor<'g> {
    pub fn new(new: &'g ShapeGraph, old: &'g ShapeGraph) -> Self {
        Self {
            new,
            old,
            guard: CycleGuard::new(),
        }
    }
}

impl<'g> ShapeVisitor<'g> for EqualityVisitor<'g> {
    type Arg = ShapeId;
    type Output = bool;

    fn graph(&self) -> &'g ShapeGraph {
        self.new
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    // A comparison already in progress is assumed consistent.
    fn on_cycle(&self) -> bool {
        true
    }

    fn visit_structure(
        &mut self,
        _shape: &'g Shape,
        members: &'g [Member],
        other: ShapeId,
    ) -> bool {
        let other = self.old.shape(other);
        let ShapeKind::Structure { .. } = &other.kind else {
            return false;
        };

        let mut pairs = Vec::with_capacity(members.len());
        for member in members {
            match other.member(&member.name) {
                Some(old_member) => pairs.push((member.shape, old_member)),
                None => return false,
            }
        }
        pairs
            .into_iter()
            .all(|(new_member, old_member)| self.process(new_member, old_member))
    }

    fn visit_list(&mut self, _shape: &'g Shape, member: ShapeId, other: ShapeId) -> bool {
        match self.old.shape(other).kind {
            ShapeKind::List { member: old_member } => self.process(member, old_member),
            _ => false,
        }
    }

    fn visit_map(
        &mut self,
        _shape: &'g Shape,
        key: ShapeId,
        value: ShapeId,
        other: ShapeId,
    ) -> bool {
        match self.old.shape(other).kind {
            ShapeKind::Map {
                key: old_key,
                value: old_value,
            } => self.process(key, old_key) && self.process(value, old_value),
            _ => false,
        }
    }

    fn visit_string(
        &mut self,
        _shape: &'g Shape,
        enumeration: &'g [String],
        other: ShapeId,
    ) -> bool {
        match &self.old.shape(other).kind {
            ShapeKind::String {
                enumeration: old_enumeration,
            } => {
                let new_set: BTreeSet<&str> = enumeration.iter().map(String::as_str).collect();
                let old_set: BTreeSet<&str> = old_enumeration.iter().map(String::as_str).collect();
                new_set == old_set
            }
            _ => false,
        }
    }

    fn visit_leaf(&mut self, shape: &'g Shape, other: ShapeId) -> bool {
        shape.canonical == self.old.shape(other).canonical
    }
}
