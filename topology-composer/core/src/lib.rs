#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cluster;
mod container;
pub mod discovery;
mod health;
mod name;
pub mod proxy;
mod routing;

pub use self::{
    cluster::ClusterCapacity,
    container::{
        AppContainerSpec, ContainerSpecError, DEFAULT_INTERVAL_SECONDS, DEFAULT_RETRIES,
        DEFAULT_START_PERIOD_SECONDS, DEFAULT_TIMEOUT_SECONDS,
    },
    health::{HealthCheckPolicy, Protocol, HEALTH_INTERVAL_FLOOR_MS, HEALTH_TIMEOUT_FLOOR_MS},
    name::{MeshEndpoint, NameError, ServiceName},
    routing::{InvalidRoutingMode, RoutingMode},
};

/// Number of task replicas every running service is deployed with.
pub const REPLICA_COUNT: u32 = 2;
