use meshweave_topology_core::{discovery, REPLICA_COUNT};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The live deployable unit: a task template bound to a cluster.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunningService {
    pub cluster: String,
    pub task_template: String,
    pub desired_count: u32,
    pub discovery: DiscoveryRecord,
}

/// Internal DNS registration for a running service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRecord {
    pub name: String,
    pub record_type: DnsRecordType,
    pub ttl_seconds: u64,
    pub failure_threshold: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum DnsRecordType {
    A,
}

// === impl RunningService ===

impl RunningService {
    pub fn new(
        cluster: impl ToString,
        task_template: impl ToString,
        discovery: DiscoveryRecord,
    ) -> Self {
        Self {
            cluster: cluster.to_string(),
            task_template: task_template.to_string(),
            desired_count: REPLICA_COUNT,
            discovery,
        }
    }
}

// === impl DiscoveryRecord ===

impl DiscoveryRecord {
    /// An A record with the naming provider's fixed TTL and failure
    /// threshold.
    pub fn for_name(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            record_type: DnsRecordType::A,
            ttl_seconds: discovery::DNS_TTL_SECONDS,
            failure_threshold: discovery::FAILURE_THRESHOLD,
        }
    }
}
