use meshweave_topology_core::proxy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::Ipv4Addr, num::NonZeroU16};

/// The immutable definition of a deployable unit's containers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub family: String,
    pub network_mode: NetworkMode,
    /// Present when a sidecar intercepts the task's traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    pub containers: Vec<ContainerSpec>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum NetworkMode {
    /// Each task gets its own network interface. Required for per-port
    /// traffic interception.
    Isolated,
    /// Tasks share the host's network namespace.
    Shared,
}

/// Sidecar traffic-interception settings for a task template.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub container_name: String,
    pub app_ports: Vec<NonZeroU16>,
    pub proxy_ingress_port: u16,
    pub proxy_egress_port: u16,
    pub ignored_uid: u32,
    pub egress_ignored_addrs: Vec<Ipv4Addr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub memory_limit_mib: u32,
    pub essential: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    /// UID the container process runs as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_mappings: Vec<PortMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<ContainerHealthCheck>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<ContainerDependency>,
    pub logging: LogConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: NonZeroU16,
    pub host_port: NonZeroU16,
}

/// Shell-command probe the orchestrator runs inside the container.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerHealthCheck {
    pub command: Vec<String>,
    pub start_period_seconds: u64,
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
    pub retries: u32,
}

/// Declarative start-ordering dependency between containers in one task.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDependency {
    pub container: String,
    pub condition: DependencyCondition,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum DependencyCondition {
    /// The dependency's health probe must pass before this container starts.
    #[serde(rename = "HEALTHY")]
    Healthy,
    #[serde(rename = "START")]
    Start,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    pub stream_prefix: String,
}

// === impl ProxyConfig ===

impl ProxyConfig {
    /// Interception settings for a single application port, using the fixed
    /// sidecar contract.
    pub fn intercept(app_port: NonZeroU16) -> Self {
        Self {
            container_name: proxy::CONTAINER_NAME.to_string(),
            app_ports: proxy::app_ports(app_port),
            proxy_ingress_port: proxy::INGRESS_PORT,
            proxy_egress_port: proxy::EGRESS_PORT,
            ignored_uid: proxy::BYPASS_UID,
            egress_ignored_addrs: proxy::EGRESS_BYPASS_ADDRS.to_vec(),
        }
    }
}
