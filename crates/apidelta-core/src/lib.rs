//! apidelta core: structural diffing of service descriptions.
//!
//! A service description (metadata, named shapes, operations) is resolved
//! into a [`ShapeGraph`](model::ShapeGraph). Four traversals run over shape
//! graphs (equality, reachability, type rendering and structural delta), and
//! [`diff_service`] combines them into a per-operation change report.
//!
//! This crate performs no I/O; loading descriptions from a history and
//! batching across releases live in `apidelta-engine`.

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod traversal;

pub use diff::{
    diff_service, diff_service_values, Change, ChangeLog, CommitInfo, CommitRecord,
    OperationDelta, ReleaseDelta, ServiceChange, ServiceChangeRecord,
};
pub use errors::{DeltaError, ExError, ExErrorKind, Result};
pub use model::{SchemaDescription, ServiceMetadata, ServiceModel, ShapeGraph};
pub use traversal::{Delta, TypeRepr};
