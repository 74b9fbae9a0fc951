use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Capacity request for the shared compute cluster.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCapacity {
    pub instance_type: String,
    pub min_instances: u32,
    pub max_instances: u32,
}

// === impl ClusterCapacity ===

impl Default for ClusterCapacity {
    fn default() -> Self {
        Self {
            instance_type: "t3.xlarge".to_string(),
            min_instances: 3,
            max_instances: 3,
        }
    }
}
