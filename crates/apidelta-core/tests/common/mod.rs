use serde_json::{json, Value};

/// Wrap shapes and operations into a description for service `service`
#[allow(dead_code)]
pub fn description(service: &str, shapes: Value, operations: Value) -> Value {
    json!({
        "metadata": {
            "endpointPrefix": service,
            "serviceId": service,
            "serviceFullName": format!("Test {}", service)
        },
        "shapes": shapes,
        "operations": operations
    })
}

/// A structure definition with string members named `members`
#[allow(dead_code)]
pub fn string_struct(members: &[&str]) -> Value {
    let members: serde_json::Map<String, Value> = members
        .iter()
        .map(|m| (m.to_string(), json!({"shape": "Str"})))
        .collect();
    json!({"type": "structure", "members": members})
}
