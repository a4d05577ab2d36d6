use std::fmt;

/// Stable index of a resolved shape inside one [`ShapeGraph`](super::ShapeGraph)
///
/// Ids are assigned once at build time, one per distinct canonical
/// serialization, and are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) usize);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named member of a structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub shape: ShapeId,
}

/// The five shape variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Structure {
        members: Vec<Member>,
    },
    List {
        member: ShapeId,
    },
    Map {
        key: ShapeId,
        value: ShapeId,
    },
    /// A string, optionally restricted to enumerated literals (declared order kept)
    String {
        enumeration: Vec<String>,
    },
    /// Any other primitive (`integer`, `boolean`, `blob`, `timestamp`, ...)
    Leaf {
        type_name: String,
    },
}

impl ShapeKind {
    /// The declared `type` tag this kind was built from
    pub fn tag(&self) -> &str {
        match self {
            ShapeKind::Structure { .. } => "structure",
            ShapeKind::List { .. } => "list",
            ShapeKind::Map { .. } => "map",
            ShapeKind::String { .. } => "string",
            ShapeKind::Leaf { type_name } => type_name,
        }
    }

    /// True when both kinds are the same variant (contents ignored)
    pub fn same_variant(&self, other: &ShapeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A resolved node of the shape graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub kind: ShapeKind,
    /// Name plus the merged JSON definition; the shape's identity
    pub canonical: String,
}

impl Shape {
    /// Look up a structure member by name
    pub fn member(&self, name: &str) -> Option<ShapeId> {
        match &self.kind {
            ShapeKind::Structure { members } => {
                members.iter().find(|m| m.name == name).map(|m| m.shape)
            }
            _ => None,
        }
    }
}
