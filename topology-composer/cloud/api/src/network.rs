use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;

/// Grants one service's network identity leave to open TCP connections to
/// another's on a single port.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPermission {
    pub from_service: String,
    pub to_service: String,
    pub port: NonZeroU16,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub name: String,
    pub internet_facing: bool,
}

/// A load balancer listener and the targets it forwards to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LbListener {
    pub load_balancer: String,
    pub port: NonZeroU16,
    /// Whether the listener's port is opened to all sources.
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetRef>,
    /// Path-based forwarding rules, evaluated in priority order before the
    /// default targets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<PathRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub service: String,
    pub port: NonZeroU16,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    pub path_pattern: String,
    pub priority: u32,
    pub target: TargetRef,
}
