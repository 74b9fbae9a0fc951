use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default grace period before the first application health probe.
pub const DEFAULT_START_PERIOD_SECONDS: u64 = 10;

/// Default application health probe cadence.
pub const DEFAULT_INTERVAL_SECONDS: u64 = 5;

/// Default application health probe timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 2;

/// Default number of failed probes before a container is marked unhealthy.
pub const DEFAULT_RETRIES: u32 = 3;

/// Application container inputs supplied to the service factory.
///
/// This describes only the application process; the factory supplies port
/// mappings, the sidecar, and start ordering.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppContainerSpec {
    /// Image reference, `<org>/<service-name>` by convention.
    pub image: String,

    pub memory_limit_mib: u32,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Shell command probing the application, e.g. `curl localhost:3000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_command: Option<Vec<String>>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContainerSpecError {
    #[error("container spec must name an image")]
    EmptyImage,

    #[error("container spec must set a non-zero memory limit")]
    ZeroMemory,
}

// === impl AppContainerSpec ===

impl AppContainerSpec {
    pub fn new(image: impl ToString, memory_limit_mib: u32) -> Self {
        Self {
            image: image.to_string(),
            memory_limit_mib,
            environment: BTreeMap::new(),
            health_check_command: None,
        }
    }

    pub fn with_env(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.environment.insert(key.to_string(), value.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ContainerSpecError> {
        if self.image.is_empty() {
            return Err(ContainerSpecError::EmptyImage);
        }
        if self.memory_limit_mib == 0 {
            return Err(ContainerSpecError::ZeroMemory);
        }
        Ok(())
    }
}
