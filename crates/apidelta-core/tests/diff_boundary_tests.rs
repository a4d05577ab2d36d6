#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Diff boundaries
///
/// Known asymmetries of the structural delta (leaf changes, map keys), kind
/// changes, the EC2 request suppression rule and fatal description errors.
mod common;

use apidelta_core::diff::{diff_service_values, Change};
use apidelta_core::errors::{DeltaError, ExError, ExErrorKind};
use common::{description, string_struct};
use serde_json::json;

fn updated_delta(change: &apidelta_core::ServiceChange, op: &str) -> Option<serde_json::Value> {
    change.iter().find_map(|c| match c {
        Change::UpdatedMethod { operation, delta } if operation == op => {
            Some(serde_json::to_value(delta).unwrap())
        }
        _ => None,
    })
}

#[test]
fn test_leaf_constraint_change_is_not_reported() {
    // GIVEN an integer member whose constraint changed
    let old = description(
        "svc",
        json!({
            "Count": {"type": "integer", "max": 10},
            "In": {"type": "structure", "members": {"n": {"shape": "Count"}}}
        }),
        json!({"Run": {"input": {"shape": "In"}}}),
    );
    let new = description(
        "svc",
        json!({
            "Count": {"type": "integer", "max": 20},
            "In": {"type": "structure", "members": {"n": {"shape": "Count"}}}
        }),
        json!({"Run": {"input": {"shape": "In"}}}),
    );

    // WHEN diffing
    let result = diff_service_values(new, Some(old)).unwrap();

    // THEN equality sees the change but the delta is empty, so nothing is reported
    assert!(result.is_none());
}

#[test]
fn test_map_key_change_is_not_reported() {
    let shapes = |keys: &[&str]| {
        json!({
            "Key": {"type": "string", "enum": keys},
            "Str": {"type": "string"},
            "Tags": {"type": "map", "key": {"shape": "Key"}, "value": {"shape": "Str"}},
            "In": {"type": "structure", "members": {"tags": {"shape": "Tags"}}}
        })
    };
    let old = description("svc", shapes(&["a"]), json!({"Tag": {"input": {"shape": "In"}}}));
    let new = description("svc", shapes(&["a", "b"]), json!({"Tag": {"input": {"shape": "In"}}}));

    // The key enum is reported only where it is used directly, never through the map
    let change = diff_service_values(new, Some(old)).unwrap();
    assert!(change.is_none());
}

#[test]
fn test_map_value_change_is_reported() {
    let shapes = |values: &[&str]| {
        json!({
            "Str": {"type": "string"},
            "Val": {"type": "string", "enum": values},
            "Tags": {"type": "map", "key": {"shape": "Str"}, "value": {"shape": "Val"}},
            "In": {"type": "structure", "members": {"tags": {"shape": "Tags"}}}
        })
    };
    let old = description("svc", shapes(&["a"]), json!({"Tag": {"input": {"shape": "In"}}}));
    let new = description("svc", shapes(&["a", "b"]), json!({"Tag": {"input": {"shape": "In"}}}));

    let change = diff_service_values(new, Some(old)).unwrap().unwrap();
    assert_eq!(
        updated_delta(&change, "Tag"),
        Some(json!({"request": {"tags": ["b"]}}))
    );
}

#[test]
fn test_structure_replacing_list_is_rendered_whole() {
    let old = description(
        "svc",
        json!({"Str": {"type": "string"}, "Items": {"type": "list", "member": {"shape": "Str"}}}),
        json!({"Get": {"output": {"shape": "Items"}}}),
    );
    let new = description(
        "svc",
        json!({"Str": {"type": "string"}, "Items": string_struct(&["first"])}),
        json!({"Get": {"output": {"shape": "Items"}}}),
    );

    let change = diff_service_values(new, Some(old)).unwrap().unwrap();
    assert_eq!(
        updated_delta(&change, "Get"),
        Some(json!({"response": {"first": "string"}}))
    );
}

#[test]
fn test_added_nested_member_renders_recursive_shape_with_cut() {
    // GIVEN a new member whose shape refers back to itself
    let old = description(
        "svc",
        json!({"Str": {"type": "string"}, "In": string_struct(&["x"])}),
        json!({"Run": {"input": {"shape": "In"}}}),
    );
    let new = description(
        "svc",
        json!({
            "Str": {"type": "string"},
            "Node": {
                "type": "structure",
                "members": {"child": {"shape": "Node"}, "label": {"shape": "Str"}}
            },
            "In": {
                "type": "structure",
                "members": {"x": {"shape": "Str"}, "root": {"shape": "Node"}}
            }
        }),
        json!({"Run": {"input": {"shape": "In"}}}),
    );

    let change = diff_service_values(new, Some(old)).unwrap().unwrap();

    // THEN the cycle is cut off instead of expanded
    assert_eq!(
        updated_delta(&change, "Run"),
        Some(json!({"request": {"root": {"child": [], "label": "string"}}}))
    );
}

#[test]
fn test_ec2_tag_specifications_suppressed() {
    let old = description(
        "ec2",
        json!({"Str": {"type": "string"}, "RunRequest": string_struct(&["ImageId"])}),
        json!({"RunInstances": {"input": {"shape": "RunRequest"}}}),
    );
    let new = description(
        "ec2",
        json!({
            "Str": {"type": "string"},
            "RunRequest": string_struct(&["ImageId", "TagSpecifications"])
        }),
        json!({"RunInstances": {"input": {"shape": "RunRequest"}}}),
    );

    // WHEN the only request change is TagSpecifications
    let result = diff_service_values(new, Some(old)).unwrap();

    // THEN the operation is not reported at all
    assert!(result.is_none());
}

#[test]
fn test_ec2_suppression_keeps_other_members_and_response() {
    let shapes = |members: &[&str]| {
        json!({
            "Str": {"type": "string"},
            "Req": string_struct(members),
            "Res": string_struct(members)
        })
    };
    let ops = json!({"CreateVolume": {"input": {"shape": "Req"}, "output": {"shape": "Res"}}});
    let old = description("ec2", shapes(&["Size"]), ops.clone());
    let new = description("ec2", shapes(&["Size", "TagSpecifications", "Iops"]), ops);

    let change = diff_service_values(new, Some(old)).unwrap().unwrap();

    // The response still reports TagSpecifications, so the sides no longer collapse
    assert_eq!(
        updated_delta(&change, "CreateVolume"),
        Some(json!({
            "request": {"Iops": "string"},
            "response": {"Iops": "string", "TagSpecifications": "string"}
        }))
    );
}

#[test]
fn test_suppression_does_not_apply_to_other_services() {
    let old = description(
        "autoscaling",
        json!({"Str": {"type": "string"}, "Req": string_struct(&["Name"])}),
        json!({"CreateGroup": {"input": {"shape": "Req"}}}),
    );
    let new = description(
        "autoscaling",
        json!({"Str": {"type": "string"}, "Req": string_struct(&["Name", "TagSpecifications"])}),
        json!({"CreateGroup": {"input": {"shape": "Req"}}}),
    );

    let change = diff_service_values(new, Some(old)).unwrap().unwrap();
    assert_eq!(
        updated_delta(&change, "CreateGroup"),
        Some(json!({"request": {"TagSpecifications": "string"}}))
    );
}

#[test]
fn test_missing_type_tag_is_fatal() {
    let new = description(
        "svc",
        json!({"In": {"members": {}}}),
        json!({"Run": {"input": {"shape": "In"}}}),
    );

    let err = diff_service_values(new, None).unwrap_err();
    assert_eq!(err, DeltaError::MissingTypeTag { shape: "In".into() });

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::MissingTypeTag);
    assert_eq!(ex.shape(), Some("In"));
}

#[test]
fn test_unknown_reference_in_old_version_is_fatal() {
    let new = description("svc", json!({}), json!({"Run": {}}));
    let old = description(
        "svc",
        json!({"In": {"type": "structure", "members": {"x": {"shape": "Gone"}}}}),
        json!({}),
    );

    let err = diff_service_values(new, Some(old)).unwrap_err();
    assert_eq!(
        err,
        DeltaError::UnknownShapeReference {
            shape: "Gone".into(),
            referenced_by: "In.x".into()
        }
    );
}
