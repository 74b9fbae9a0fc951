use anyhow::{Context, Result};
use meshweave_topology_cloud_compose::{Topology, TopologyInfo};
use meshweave_topology_core::{proxy, AppContainerSpec, ClusterCapacity, RoutingMode};
use serde::Deserialize;
use std::{collections::BTreeMap, num::NonZeroU16};

/// The topology document: everything the composer needs to build one
/// application's service graph.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TopologyDoc {
    pub app: String,
    pub cluster: ClusterDoc,
    /// Mesh name; defaults to `<app>-mesh`.
    #[serde(default)]
    pub mesh: Option<String>,
    #[serde(default)]
    pub routing_mode: RoutingMode,
    /// Sidecar image override; defaults to the pinned provider image.
    #[serde(default)]
    pub proxy_image: Option<String>,
    pub services: Vec<ServiceDoc>,
    /// Caller→callee dependency edges.
    #[serde(default)]
    pub links: Vec<LinkDoc>,
    pub public: PublicDoc,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClusterDoc {
    /// Cluster name; defaults to `<app>-cluster`.
    #[serde(default)]
    pub name: Option<String>,
    /// Private DNS namespace for service discovery.
    pub namespace: String,
    #[serde(default)]
    pub capacity: ClusterCapacity,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceDoc {
    pub name: String,
    pub port: NonZeroU16,
    pub image: String,
    pub memory_limit_mib: u32,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub health_check_command: Option<Vec<String>>,
}

/// A `[caller, callee]` pair.
#[derive(Clone, Debug, Deserialize)]
pub struct LinkDoc(pub String, pub String);

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublicDoc {
    pub service: String,
    pub port: NonZeroU16,
    #[serde(default)]
    pub export_name: Option<String>,
}

// === impl TopologyDoc ===

impl TopologyDoc {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing topology document")
    }

    fn info(&self) -> TopologyInfo {
        TopologyInfo {
            app: self.app.clone(),
            cluster_name: self
                .cluster
                .name
                .clone()
                .unwrap_or_else(|| format!("{}-cluster", self.app)),
            namespace: self.cluster.namespace.clone(),
            mesh_name: self
                .mesh
                .clone()
                .unwrap_or_else(|| format!("{}-mesh", self.app)),
            routing_mode: self.routing_mode,
            proxy_image: self
                .proxy_image
                .clone()
                .unwrap_or_else(|| proxy::DEFAULT_IMAGE.to_string()),
            capacity: self.cluster.capacity.clone(),
        }
    }
}

/// Builds the full topology a document describes: every service bundle,
/// then every link, then the public entry point.
pub fn compose(doc: &TopologyDoc) -> Result<Topology> {
    let mut topology = Topology::new(doc.info());

    for service in &doc.services {
        let app = AppContainerSpec {
            image: service.image.clone(),
            memory_limit_mib: service.memory_limit_mib,
            environment: service.environment.clone(),
            health_check_command: service.health_check_command.clone(),
        };
        topology
            .add_service(&service.name, service.port, app)
            .with_context(|| format!("adding service {:?}", service.name))?;
    }

    for LinkDoc(caller, callee) in &doc.links {
        topology
            .link(caller, callee)
            .with_context(|| format!("linking {caller:?} -> {callee:?}"))?;
    }

    topology
        .expose(
            &doc.public.service,
            doc.public.port,
            doc.public.export_name.as_deref(),
        )
        .with_context(|| format!("exposing {:?}", doc.public.service))?;

    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "app": "greeting-app",
        "cluster": { "namespace": "internal" },
        "services": [
            { "name": "name", "port": 3000, "image": "nathanpeck/name", "memoryLimitMib": 128 }
        ],
        "links": [],
        "public": { "service": "name", "port": 80 }
    }"#;

    #[test]
    fn parse_minimal_doc() {
        let doc = TopologyDoc::from_json(DOC).unwrap();
        assert_eq!(doc.app, "greeting-app");
        assert_eq!(doc.routing_mode, RoutingMode::MeshSidecar);
        assert_eq!(doc.cluster.capacity, ClusterCapacity::default());
        assert_eq!(doc.services[0].port.get(), 3000);
    }

    #[test]
    fn rejects_unknown_fields() {
        let json = r#"{ "app": "x", "clusterr": {} }"#;
        assert!(TopologyDoc::from_json(json).is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let json = DOC.replace("\"port\": 3000", "\"port\": 0");
        assert!(TopologyDoc::from_json(&json).is_err());
    }

    #[test]
    fn derived_names() {
        let doc = TopologyDoc::from_json(DOC).unwrap();
        let info = doc.info();
        assert_eq!(info.cluster_name, "greeting-app-cluster");
        assert_eq!(info.mesh_name, "greeting-app-mesh");
    }

    #[test]
    fn compose_minimal_doc() {
        let doc = TopologyDoc::from_json(DOC).unwrap();
        let topology = compose(&doc).unwrap();
        let manifest = topology.synthesize();
        assert!(manifest.get("name-service").is_some());
        assert!(manifest.get("public-listener").is_some());
    }
}
