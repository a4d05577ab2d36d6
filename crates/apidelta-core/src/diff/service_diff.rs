//! Service diff orchestration.
//!
//! Turns two versions of a service description into a [`ServiceChange`]:
//! new operations first, then operations whose input/output shapes gained
//! something. Shapes are compared by name across the two graphs; only shapes
//! that fail the equality check get a structural delta.
//!
//! ## Logging Ownership
//!
//! `diff_service` owns lifecycle logging (`log_op_start!` / `log_op_end!` /
//! `log_op_error!`). Per-shape details are `tracing::trace!` only.

use crate::diff::model::{Change, OperationDelta, ServiceChange};
use crate::diff::suppression::suppress_request;
use crate::errors::Result;
use crate::model::{SchemaDescription, ServiceModel};
use crate::traversal::delta::shape_delta;
use crate::traversal::equality::shapes_equal;
use crate::traversal::Delta;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeMap;

/// Diff a new description against its previous version
///
/// With `old` absent the service is new: one `NewMethod` per operation and no
/// shape diffing.
///
/// ## Returns
///
/// `Ok(None)` when nothing changed
///
/// ## Errors
///
/// - `MissingTypeTag`: a shape definition has no `type`
/// - `UnknownShapeReference`: a reference names an undefined shape
/// - `InvalidDocument`: a reference or enum is malformed
pub fn diff_service(
    new: &SchemaDescription,
    old: Option<&SchemaDescription>,
) -> Result<Option<ServiceChange>> {
    let service = new.metadata.service_name().to_string();
    log_op_start!("diff_service", service = %service, new_service = old.is_none());
    let start = std::time::Instant::now();

    let result = diff_service_impl(new, old).map_err(|e| {
        log_op_error!(
            "diff_service",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            service = %service
        );
        e
    })?;

    log_op_end!(
        "diff_service",
        duration_ms = start.elapsed().as_millis() as u64,
        service = %service,
        changes = result.as_ref().map_or(0, ServiceChange::len)
    );

    Ok(result)
}

/// [`diff_service`] over raw JSON values
///
/// # Errors
///
/// `InvalidDocument` or `Serialization` if either value is not a well-formed
/// description, plus every error [`diff_service`] reports.
pub fn diff_service_values(
    new: serde_json::Value,
    old: Option<serde_json::Value>,
) -> Result<Option<ServiceChange>> {
    let new = SchemaDescription::from_value(new)?;
    let old = old.map(SchemaDescription::from_value).transpose()?;
    diff_service(&new, old.as_ref())
}

fn diff_service_impl(
    new: &SchemaDescription,
    old: Option<&SchemaDescription>,
) -> Result<Option<ServiceChange>> {
    let new_model = ServiceModel::build(new)?;
    let old_model = old.map(ServiceModel::build).transpose()?;
    let service = new_model.service_name().to_string();

    let mut changes: Vec<Change> = new_model
        .operation_names()
        .filter(|name| {
            old_model
                .as_ref()
                .map_or(true, |old_model| !old_model.has_operation(name))
        })
        .map(|name| Change::NewMethod {
            operation: name.to_string(),
        })
        .collect();

    let Some(old_model) = old_model else {
        return Ok(Some(ServiceChange::new(service, new_model.metadata().clone(), changes, true)));
    };

    let modified = modified_shapes(&new_model, &old_model);

    for operation in new_model.operations() {
        let lookup = |shape: &Option<String>| {
            shape
                .as_deref()
                .and_then(|name| modified.get(name))
                .cloned()
        };
        let request = suppress_request(&service, lookup(&operation.input));
        let response = lookup(&operation.output);

        if let Some(delta) = OperationDelta::combine(request, response) {
            changes.push(Change::UpdatedMethod {
                operation: operation.name.clone(),
                delta,
            });
        }
    }

    if changes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ServiceChange::new(service, new_model.metadata().clone(), changes, false)))
}

/// Non-empty deltas of the shapes defined in both versions, keyed by name
fn modified_shapes(new: &ServiceModel, old: &ServiceModel) -> BTreeMap<String, Delta> {
    let (new_graph, old_graph) = (new.graph(), old.graph());
    let mut modified = BTreeMap::new();

    for name in new_graph.names() {
        let (Some(new_id), Some(old_id)) = (new_graph.get(name), old_graph.get(name)) else {
            continue;
        };
        if shapes_equal(new_graph, new_id, old_graph, old_id) {
            continue;
        }
        let delta = shape_delta(new_graph, new_id, old_graph, old_id);
        if delta.is_empty() {
            continue;
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            let referencing_ops = new
                .operations()
                .filter(|op| {
                    [&op.input, &op.output].into_iter().flatten().any(|root| {
                        root == name
                            || new_graph
                                .get(root)
                                .is_some_and(|id| new_graph.references(id, name))
                    })
                })
                .count();
            tracing::trace!(
                service = new.service_name(),
                shape = name,
                referencing_ops,
                "shape changed"
            );
        }
        modified.insert(name.to_string(), delta);
    }
    modified
}
