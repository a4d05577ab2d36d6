//! Cycle-safe recursive traversal over a [`ShapeGraph`].
//!
//! Every analysis (equality, reachability, type rendering, structural delta)
//! is a [`ShapeVisitor`]: one handler per shape kind plus the value to yield
//! when a shape is re-entered while already on the current call stack.
//! [`ShapeVisitor::process`] owns the cycle guard discipline; handlers
//! recurse only through it.
//!
//! The guard lives in the visitor value, so each top-level call gets a fresh
//! one. Nothing is memoized across sibling branches: a subtree reached twice
//! along independent paths is walked twice.

pub mod delta;
pub mod equality;
pub mod reference;
pub mod repr;

pub use delta::Delta;
pub use repr::TypeRepr;

use crate::model::{Member, Shape, ShapeGraph, ShapeId, ShapeKind};
use std::collections::HashSet;

/// Set of shapes currently being visited by one traversal
#[derive(Debug, Default)]
pub struct CycleGuard {
    visiting: HashSet<ShapeId>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in progress; false if it already was
    pub fn enter(&mut self, id: ShapeId) -> bool {
        self.visiting.insert(id)
    }

    pub fn leave(&mut self, id: ShapeId) {
        self.visiting.remove(&id);
    }

    pub fn is_visiting(&self, id: ShapeId) -> bool {
        self.visiting.contains(&id)
    }

    pub fn depth(&self) -> usize {
        self.visiting.len()
    }
}

/// One analysis over a shape graph
///
/// `Arg` is the per-call extra argument (the counterpart shape in the old
/// graph for the two-graph strategies, `()` otherwise).
pub trait ShapeVisitor<'g> {
    type Arg: Copy;
    type Output;

    /// Graph the visited ids belong to
    fn graph(&self) -> &'g ShapeGraph;

    fn guard(&mut self) -> &mut CycleGuard;

    /// Result for a shape that is already in progress
    fn on_cycle(&self) -> Self::Output;

    fn visit_structure(
        &mut self,
        shape: &'g Shape,
        members: &'g [Member],
        arg: Self::Arg,
    ) -> Self::Output;

    fn visit_list(&mut self, shape: &'g Shape, member: ShapeId, arg: Self::Arg) -> Self::Output;

    fn visit_map(
        &mut self,
        shape: &'g Shape,
        key: ShapeId,
        value: ShapeId,
        arg: Self::Arg,
    ) -> Self::Output;

    fn visit_string(
        &mut self,
        shape: &'g Shape,
        enumeration: &'g [String],
        arg: Self::Arg,
    ) -> Self::Output;

    fn visit_leaf(&mut self, shape: &'g Shape, arg: Self::Arg) -> Self::Output;

    /// Route `id` to its kind handler under the cycle guard
    fn process(&mut self, id: ShapeId, arg: Self::Arg) -> Self::Output {
        if !self.guard().enter(id) {
            return self.on_cycle();
        }

        let shape = self.graph().shape(id);
        let output = match &shape.kind {
            ShapeKind::Structure { members } => self.visit_structure(shape, members, arg),
            ShapeKind::List { member } => self.visit_list(shape, *member, arg),
            ShapeKind::Map { key, value } => self.visit_map(shape, *key, *value, arg),
            ShapeKind::String { enumeration } => self.visit_string(shape, enumeration, arg),
            ShapeKind::Leaf { .. } => self.visit_leaf(shape, arg),
        };

        self.guard().leave(id);
        output
    }
}
