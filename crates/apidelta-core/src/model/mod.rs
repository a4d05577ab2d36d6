pub mod document;
pub mod graph;
pub mod metadata;
pub mod service;
pub mod shape;

pub use document::{OperationDefinition, SchemaDescription, ShapeReference};
pub use graph::ShapeGraph;
pub use metadata::{ServiceMetadata, UNKNOWN_SERVICE};
pub use service::{Operation, ServiceModel};
pub use shape::{Member, Shape, ShapeId, ShapeKind};
