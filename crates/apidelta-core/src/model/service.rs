use crate::errors::{DeltaError, Result};
use crate::model::document::{SchemaDescription, ShapeReference};
use crate::model::graph::ShapeGraph;
use crate::model::metadata::ServiceMetadata;
use std::collections::BTreeMap;

/// An operation with its input/output resolved against the shape graph
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub input: Option<String>,
    pub output: Option<String>,
    pub documentation: Option<String>,
}

/// A description resolved into a shape graph plus an operation index
#[derive(Debug, Clone)]
pub struct ServiceModel {
    metadata: ServiceMetadata,
    graph: ShapeGraph,
    operations: BTreeMap<String, Operation>,
}

impl ServiceModel {
    /// Resolve a description
    ///
    /// # Errors
    ///
    /// Any shape-graph error, or `UnknownShapeReference` when an operation's
    /// input/output names an undefined shape.
    pub fn build(description: &SchemaDescription) -> Result<Self> {
        let graph = ShapeGraph::build(&description.shapes)?;

        let mut operations = BTreeMap::new();
        for (name, definition) in &description.operations {
            let input = checked_reference(&graph, name, "input", definition.input.as_ref())?;
            let output = checked_reference(&graph, name, "output", definition.output.as_ref())?;
            operations.insert(
                name.clone(),
                Operation {
                    name: name.clone(),
                    input,
                    output,
                    documentation: definition.documentation.clone(),
                },
            );
        }

        Ok(Self {
            metadata: description.metadata.clone(),
            graph,
            operations,
        })
    }

    /// Service identifier: `endpointPrefix`, then `serviceId`, then `"unknown"`
    pub fn service_name(&self) -> &str {
        self.metadata.service_name()
    }

    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    pub fn graph(&self) -> &ShapeGraph {
        &self.graph
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Operations in lexicographic name order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }
}

fn checked_reference(
    graph: &ShapeGraph,
    operation: &str,
    direction: &str,
    reference: Option<&ShapeReference>,
) -> Result<Option<String>> {
    match reference {
        None => Ok(None),
        Some(r) if graph.contains(&r.shape) => Ok(Some(r.shape.clone())),
        Some(r) => Err(DeltaError::UnknownShapeReference {
            shape: r.shape.clone(),
            referenced_by: format!("{}.{}", operation, direction),
        }),
    }
}
