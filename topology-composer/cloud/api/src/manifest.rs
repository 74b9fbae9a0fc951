use crate::{
    ComputeCluster, LbListener, LoadBalancer, MeshNode, MeshRoute, NetworkPermission,
    RunningService, ServiceMesh, TaskTemplate,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Union of every resource kind a manifest can carry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Resource {
    ComputeCluster(ComputeCluster),
    ServiceMesh(ServiceMesh),
    TaskTemplate(TaskTemplate),
    RunningService(RunningService),
    MeshNode(MeshNode),
    MeshRoute(MeshRoute),
    NetworkPermission(NetworkPermission),
    LoadBalancer(LoadBalancer),
    LbListener(LbListener),
}

/// A named value published for downstream consumption.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackOutput {
    pub export_name: String,
    pub value: OutputValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum OutputValue {
    /// The DNS name the provisioning engine assigns to a load balancer.
    LbDnsName(String),
}

/// The synthesized resource graph, keyed by logical id.
///
/// Logical ids are derived from service names, so the map's sorted order
/// makes synthesis deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub app: String,
    pub resources: BTreeMap<String, Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, StackOutput>,
}

// === impl Manifest ===

impl Manifest {
    pub fn new(app: impl ToString) -> Self {
        Self {
            app: app.to_string(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Adds a resource under `id`, replacing any previous holder of the id.
    pub fn insert(&mut self, id: impl ToString, resource: Resource) {
        self.resources.insert(id.to_string(), resource);
    }

    pub fn insert_output(&mut self, id: impl ToString, output: StackOutput) {
        self.outputs.insert(id.to_string(), output);
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
