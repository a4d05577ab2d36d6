//! Shape graph builder
//!
//! Resolves the raw `shapes` section of a description into an arena of
//! [`Shape`] nodes. Each distinct (name, merged definition) pair becomes one
//! node, so a reference carrying member-level traits (`required`, `location`,
//! docs, ...) gets its own node without a new named shape appearing in the
//! index. Cycles are closed by reserving a node's id before its children are
//! resolved.

use crate::errors::{DeltaError, Result};
use crate::model::shape::{Member, Shape, ShapeId, ShapeKind};
use crate::traversal::{reference, repr, TypeRepr};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Resolved shapes of one service description
#[derive(Debug, Clone, Default)]
pub struct ShapeGraph {
    nodes: Vec<Shape>,
    named: BTreeMap<String, ShapeId>,
}

impl ShapeGraph {
    /// Resolve every named shape of a `shapes` section
    ///
    /// # Errors
    ///
    /// - `MissingTypeTag` if any reachable definition has no `type` key
    /// - `UnknownShapeReference` if a member/list/key/value reference names an
    ///   undefined shape
    /// - `InvalidDocument` if a reference or `enum` has the wrong JSON layout
    pub fn build(shapes: &BTreeMap<String, Map<String, Value>>) -> Result<Self> {
        let mut builder = Builder {
            raw: shapes,
            nodes: Vec::new(),
            interned: HashMap::new(),
        };
        let mut named = BTreeMap::new();
        for name in shapes.keys() {
            let id = builder.resolve(name, None, "shapes")?;
            named.insert(name.clone(), id);
        }
        Ok(Self {
            nodes: builder.nodes,
            named,
        })
    }

    /// Id of the named (trait-free) shape
    pub fn get(&self, name: &str) -> Option<ShapeId> {
        self.named.get(name).copied()
    }

    /// Node for an id issued by this graph
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph with more nodes.
    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.nodes[id.0]
    }

    /// Named shapes in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Number of named shapes
    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }

    /// Number of resolved nodes, including trait-specialised member instances
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `target` is reachable from `id` through members, keys or values
    pub fn references(&self, id: ShapeId, target: &str) -> bool {
        reference::references(self, id, target)
    }

    /// Literal nested rendering of the shape's type
    pub fn render(&self, id: ShapeId) -> TypeRepr {
        repr::render(self, id)
    }
}

struct Builder<'a> {
    raw: &'a BTreeMap<String, Map<String, Value>>,
    nodes: Vec<Shape>,
    interned: HashMap<String, ShapeId>,
}

impl<'a> Builder<'a> {
    fn resolve(
        &mut self,
        name: &str,
        traits: Option<&Map<String, Value>>,
        referenced_by: &str,
    ) -> Result<ShapeId> {
        let base = self
            .raw
            .get(name)
            .ok_or_else(|| DeltaError::UnknownShapeReference {
                shape: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })?;

        let type_tag = match base.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(DeltaError::InvalidDocument {
                    reason: format!("shape {} has a non-string type tag: {}", name, other),
                })
            }
            None => {
                return Err(DeltaError::MissingTypeTag {
                    shape: name.to_string(),
                })
            }
        };

        // Shallow merge: reference traits override the base definition's keys.
        let definition = match traits {
            Some(traits) if !traits.is_empty() => {
                let mut merged = base.clone();
                for (k, v) in traits {
                    merged.insert(k.clone(), v.clone());
                }
                merged
            }
            _ => base.clone(),
        };

        let canonical = format!("{}:{}", name, serde_json::to_string(&definition)?);
        if let Some(id) = self.interned.get(&canonical) {
            return Ok(*id);
        }

        let id = ShapeId(self.nodes.len());
        self.interned.insert(canonical.clone(), id);
        self.nodes.push(Shape {
            id,
            name: name.to_string(),
            kind: ShapeKind::Leaf {
                type_name: type_tag.clone(),
            },
            canonical,
        });

        let kind = match type_tag.as_str() {
            "structure" => ShapeKind::Structure {
                members: self.resolve_members(name, &definition)?,
            },
            "list" => ShapeKind::List {
                member: self.resolve_field(name, &definition, "member")?,
            },
            "map" => ShapeKind::Map {
                key: self.resolve_field(name, &definition, "key")?,
                value: self.resolve_field(name, &definition, "value")?,
            },
            "string" => ShapeKind::String {
                enumeration: enumeration(name, &definition)?,
            },
            _ => ShapeKind::Leaf {
                type_name: type_tag,
            },
        };
        self.nodes[id.0].kind = kind;
        Ok(id)
    }

    fn resolve_members(
        &mut self,
        owner: &str,
        definition: &Map<String, Value>,
    ) -> Result<Vec<Member>> {
        let members = match definition.get("members") {
            None => return Ok(Vec::new()),
            Some(Value::Object(members)) => members,
            Some(_) => {
                return Err(DeltaError::InvalidDocument {
                    reason: format!("shape {} has non-object members", owner),
                })
            }
        };

        let mut resolved = Vec::with_capacity(members.len());
        for (member_name, reference) in members {
            let location = format!("{}.{}", owner, member_name);
            let shape = self.resolve_reference(&location, reference)?;
            resolved.push(Member {
                name: member_name.clone(),
                shape,
            });
        }
        Ok(resolved)
    }

    fn resolve_field(
        &mut self,
        owner: &str,
        definition: &Map<String, Value>,
        field: &str,
    ) -> Result<ShapeId> {
        let location = format!("{}.{}", owner, field);
        let reference = definition
            .get(field)
            .ok_or_else(|| DeltaError::InvalidDocument {
                reason: format!("{} is missing its shape reference", location),
            })?;
        self.resolve_reference(&location, reference)
    }

    fn resolve_reference(&mut self, location: &str, reference: &Value) -> Result<ShapeId> {
        let reference = reference
            .as_object()
            .ok_or_else(|| DeltaError::InvalidDocument {
                reason: format!("{} is not a shape reference object", location),
            })?;
        let target = reference
            .get("shape")
            .and_then(Value::as_str)
            .ok_or_else(|| DeltaError::InvalidDocument {
                reason: format!("{} has no 'shape' name", location),
            })?;

        let traits: Map<String, Value> = reference
            .iter()
            .filter(|(k, _)| k.as_str() != "shape")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.resolve(target, Some(&traits), location)
    }
}

fn enumeration(owner: &str, definition: &Map<String, Value>) -> Result<Vec<String>> {
    match definition.get("enum") {
        None => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DeltaError::InvalidDocument {
                        reason: format!("shape {} has a non-string enum value: {}", owner, v),
                    })
            })
            .collect(),
        Some(_) => Err(DeltaError::InvalidDocument {
            reason: format!("shape {} has a non-array enum", owner),
        }),
    }
}
