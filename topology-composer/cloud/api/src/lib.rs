//! Declarative cloud resources.
//!
//! Everything here is a plain value describing a resource for the external
//! provisioning engine to reconcile; nothing talks to a provider. Resources
//! are assembled into a [`Manifest`] keyed by logical id.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cluster;
mod manifest;
mod mesh;
mod network;
mod service;
mod task;

pub use self::{
    cluster::ComputeCluster,
    manifest::{Manifest, OutputValue, Resource, StackOutput},
    mesh::{MeshListener, MeshNode, MeshRoute, ServiceMesh},
    network::{LbListener, LoadBalancer, NetworkPermission, PathRule, TargetRef},
    service::{DiscoveryRecord, DnsRecordType, RunningService},
    task::{
        ContainerDependency, ContainerHealthCheck, ContainerSpec, DependencyCondition, LogConfig,
        NetworkMode, PortMapping, ProxyConfig, TaskTemplate,
    },
};
