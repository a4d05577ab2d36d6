//! Structural delta between two versions of a same-named shape.
//!
//! Additions only: added members are rendered in full, added enum values are
//! listed, removals are never reported. Map deltas look at the value side
//! only, and leaf shapes never produce a delta even when they are unequal.

use super::repr::{render, TypeRepr};
use super::{CycleGuard, ShapeVisitor};
use crate::model::{Member, Shape, ShapeGraph, ShapeId, ShapeKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Nested description of what a shape gained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Delta {
    /// Per-member changes of a structure (added members and changed shared ones)
    Members(BTreeMap<String, Delta>),
    /// Enum literals present in the new version only
    Enum(BTreeSet<String>),
    /// Wholesale description of something with no usable counterpart
    Replaced(TypeRepr),
    Unchanged,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        match self {
            Delta::Members(members) => members.is_empty(),
            Delta::Enum(values) => values.is_empty(),
            Delta::Replaced(repr) => repr.is_empty(),
            Delta::Unchanged => true,
        }
    }
}

/// Delta of `new_id` (in `new`) against `old_id` (in `old`), fresh cycle guard
pub fn shape_delta(new: &ShapeGraph, new_id: ShapeId, old: &ShapeGraph, old_id: ShapeId) -> Delta {
    DeltaVisitor::new(new, old).process(new_id, old_id)
}

pub struct DeltaVisitor<'g> {
    new: &'g ShapeGraph,
    old: &'g ShapeGraph,
    guard: CycleGuard,
}

impl<'g> DeltaVisitor<'g> {
    pub fn new(new: &'g ShapeGraph, old: &'g ShapeGraph) -> Self {
        Self {
            new,
            old,
            guard: CycleGuard::new(),
        }
    }
}

impl<'g> ShapeVisitor<'g> for DeltaVisitor<'g> {
    type Arg = ShapeId;
    type Output = Delta;

    fn graph(&self) -> &'g ShapeGraph {
        self.new
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    fn on_cycle(&self) -> Delta {
        Delta::Unchanged
    }

    fn visit_structure(
        &mut self,
        shape: &'g Shape,
        members: &'g [Member],
        other: ShapeId,
    ) -> Delta {
        let other = self.old.shape(other);
        if !matches!(other.kind, ShapeKind::Structure { .. }) {
            return Delta::Replaced(render(self.new, shape.id));
        }

        let mut changed = BTreeMap::new();
        for member in members {
            match other.member(&member.name) {
                None => {
                    changed.insert(
                        member.name.clone(),
                        Delta::Replaced(render(self.new, member.shape)),
                    );
                }
                Some(old_member) => {
                    let delta = self.process(member.shape, old_member);
                    if !delta.is_empty() {
                        changed.insert(member.name.clone(), delta);
                    }
                }
            }
        }
        Delta::Members(changed)
    }

    // A kind change at the list itself is left to the caller's equality check.
    fn visit_list(&mut self, _shape: &'g Shape, member: ShapeId, other: ShapeId) -> Delta {
        match self.old.shape(other).kind {
            ShapeKind::List { member: old_member } => self.process(member, old_member),
            _ => Delta::Unchanged,
        }
    }

    fn visit_map(
        &mut self,
        _shape: &'g Shape,
        _key: ShapeId,
        value: ShapeId,
        other: ShapeId,
    ) -> Delta {
        match self.old.shape(other).kind {
            ShapeKind::Map {
                value: old_value, ..
            } => self.process(value, old_value),
            _ => Delta::Unchanged,
        }
    }

    fn visit_string(
        &mut self,
        _shape: &'g Shape,
        enumeration: &'g [String],
        other: ShapeId,
    ) -> Delta {
        let old_values: BTreeSet<&str> = match &self.old.shape(other).kind {
            ShapeKind::String { enumeration } => enumeration.iter().map(String::as_str).collect(),
            _ => BTreeSet::new(),
        };
        Delta::Enum(
            enumeration
                .iter()
                .filter(|v| !old_values.contains(v.as_str()))
                .cloned()
                .collect(),
        )
    }

    fn visit_leaf(&mut self, _shape: &'g Shape, _other: ShapeId) -> Delta {
        Delta::Unchanged
    }
}
