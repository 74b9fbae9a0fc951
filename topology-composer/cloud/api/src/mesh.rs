use meshweave_topology_core::{HealthCheckPolicy, Protocol};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;

/// The shared service mesh.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMesh {
    pub name: String,
}

/// One deployable service's identity inside the mesh: a listener plus the
/// set of backends its proxy is permitted to route to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeshNode {
    pub mesh: String,
    pub name: String,
    pub listener: MeshListener,
    /// Virtual-service names this node may call. Grows as services are
    /// linked; entries are never removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backends: Vec<String>,
    /// Discovery registration backing this node's instance set.
    pub discovery_service: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeshListener {
    pub port: NonZeroU16,
    pub protocol: Protocol,
    pub health_check: HealthCheckPolicy,
}

/// The externally addressable mesh name routing to a mesh node.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeshRoute {
    pub mesh: String,
    pub name: String,
    pub provider_node: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshweave_topology_core::HEALTH_TIMEOUT_FLOOR_MS;

    #[test]
    fn mesh_node_wire_shape() {
        let port = NonZeroU16::new(3000).unwrap();
        let node = MeshNode {
            mesh: "greeting-app-mesh".to_string(),
            name: "greeter".to_string(),
            listener: MeshListener {
                port,
                protocol: Protocol::Http,
                health_check: HealthCheckPolicy::http(port, 5000, HEALTH_TIMEOUT_FLOOR_MS),
            },
            backends: vec!["name.internal".to_string()],
            discovery_service: "greeter-service".to_string(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["listener"]["port"], 3000);
        assert_eq!(json["listener"]["protocol"], "HTTP");
        assert_eq!(json["listener"]["healthCheck"]["intervalMillis"], 5000);
        assert_eq!(json["listener"]["healthCheck"]["timeoutMillis"], 2000);
        assert_eq!(json["backends"], serde_json::json!(["name.internal"]));
    }
}
