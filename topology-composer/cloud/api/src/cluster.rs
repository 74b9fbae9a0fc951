use meshweave_topology_core::ClusterCapacity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The shared compute cluster hosting every running service.
///
/// The cluster owns the private DNS namespace that service discovery and
/// mesh endpoint names are derived from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputeCluster {
    pub name: String,
    pub namespace: String,
    pub capacity: ClusterCapacity,
}
