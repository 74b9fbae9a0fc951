use crate::{ServiceBundle, TopologyInfo};
use ahash::AHashMap as HashMap;
use meshweave_topology_cloud_api::{
    ComputeCluster, LbListener, LoadBalancer, Manifest, NetworkPermission, OutputValue, PathRule,
    Resource, ServiceMesh, StackOutput, TargetRef,
};
use meshweave_topology_core::{
    AppContainerSpec, ContainerSpecError, NameError, RoutingMode, ServiceName,
};
use std::num::NonZeroU16;
use thiserror::Error;
use tracing::{debug, info};

/// Errors detected while composing the topology.
///
/// All of these are fatal to the provisioning pass: there is no retry and no
/// partially applied operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("invalid service name: {0}")]
    Name(#[from] NameError),

    #[error("invalid application container: {0}")]
    Container(#[from] ContainerSpecError),

    #[error("service {0:?} is already defined")]
    DuplicateService(String),

    #[error("unknown service {0:?}")]
    UnknownService(String),

    /// Linking requires a mesh node on both ends; a bundle built without one
    /// cannot participate in mesh routing.
    #[error("service {0:?} has no mesh node")]
    MissingMeshNode(String),

    #[error("a public entry point is already attached to {0:?}")]
    AlreadyExposed(String),
}

/// The composed service graph: bundles, their connectivity, and the public
/// entry point.
///
/// Construction is one-shot and synchronous. The cluster and mesh context is
/// read-shared across every bundle; the only mutable state is each bundle's
/// backend set (written only when that bundle is the caller of a link) and
/// the accumulated permission list.
#[derive(Debug)]
pub struct Topology {
    info: TopologyInfo,
    bundles: HashMap<String, ServiceBundle>,
    /// Insertion order, for stable iteration.
    order: Vec<String>,
    permissions: Vec<NetworkPermission>,
    /// Link edges as (caller, callee), kept for path routing.
    edges: Vec<(String, String)>,
    public: Option<PublicEntry>,
}

#[derive(Debug)]
struct PublicEntry {
    service: String,
    port: NonZeroU16,
    target_port: NonZeroU16,
    export_name: String,
}

// === impl Topology ===

impl Topology {
    pub fn new(info: TopologyInfo) -> Self {
        Self {
            info,
            bundles: HashMap::new(),
            order: Vec::new(),
            permissions: Vec::new(),
            edges: Vec::new(),
            public: None,
        }
    }

    pub fn info(&self) -> &TopologyInfo {
        &self.info
    }

    pub fn bundle(&self, name: &str) -> Option<&ServiceBundle> {
        self.bundles.get(name)
    }

    /// Creates a service bundle against the shared cluster and mesh.
    ///
    /// The application port, the proxy's intercepted port, and the mesh
    /// listener port are all `port`; the bundle's backend set starts empty.
    pub fn add_service(
        &mut self,
        name: &str,
        port: NonZeroU16,
        app: AppContainerSpec,
    ) -> Result<&ServiceBundle, ComposeError> {
        let name = ServiceName::parse(name)?;
        if self.bundles.contains_key(name.as_str()) {
            return Err(ComposeError::DuplicateService(name.to_string()));
        }

        let bundle = ServiceBundle::build(&self.info, name.clone(), port, app)?;
        info!(%name, %port, "Composed service bundle");

        self.order.push(name.to_string());
        Ok(self.bundles.entry(name.to_string()).or_insert(bundle))
    }

    /// Opens a network path from `caller` to `callee` and registers the
    /// callee as a routable backend of the caller.
    ///
    /// Both effects are additive and idempotent: linking the same pair twice
    /// changes nothing. Only the caller's backend set is written; the callee
    /// is never mutated. Fails fast, recording nothing, if either bundle is
    /// unknown or (in mesh mode) missing its mesh node.
    pub fn link(&mut self, caller: &str, callee: &str) -> Result<(), ComposeError> {
        let (callee_service, callee_port, callee_endpoint) = {
            let bundle = self
                .bundles
                .get(callee)
                .ok_or_else(|| ComposeError::UnknownService(callee.to_string()))?;
            (
                bundle.service_id(),
                bundle.port(),
                bundle.endpoint().cloned(),
            )
        };

        let caller_bundle = self
            .bundles
            .get_mut(caller)
            .ok_or_else(|| ComposeError::UnknownService(caller.to_string()))?;
        let caller_service = caller_bundle.service_id();

        match self.info.routing_mode {
            RoutingMode::MeshSidecar => {
                // Validate both ends before applying either effect, so a
                // failed link records nothing.
                let endpoint = callee_endpoint
                    .ok_or_else(|| ComposeError::MissingMeshNode(callee.to_string()))?;
                let node = caller_bundle
                    .mesh_node_mut()
                    .ok_or_else(|| ComposeError::MissingMeshNode(caller.to_string()))?;

                if node.backends.iter().any(|b| b == endpoint.as_str()) {
                    debug!(%caller, %callee, "Backend already registered");
                } else {
                    node.backends.push(endpoint.to_string());
                }
            }
            RoutingMode::DirectPathRouting => {
                let edge = (caller.to_string(), callee.to_string());
                if !self.edges.contains(&edge) {
                    self.edges.push(edge);
                }
            }
        }

        // The network path is opened on the callee's listening port.
        if self.permissions.iter().any(|p| {
            p.from_service == caller_service && p.to_service == callee_service
        }) {
            debug!(%caller, %callee, "Network permission already granted");
        } else {
            self.permissions.push(NetworkPermission {
                from_service: caller_service,
                to_service: callee_service,
                port: callee_port,
                description: format!("Traffic from {caller} to {callee}"),
            });
        }

        info!(%caller, %callee, "Linked services");
        Ok(())
    }

    /// Attaches one bundle's running service to a public load balancer
    /// listener. One-way and one-time; exposing a second service is an
    /// error.
    pub fn expose(
        &mut self,
        name: &str,
        port: NonZeroU16,
        export_name: Option<&str>,
    ) -> Result<(), ComposeError> {
        if let Some(public) = &self.public {
            return Err(ComposeError::AlreadyExposed(public.service.clone()));
        }
        let bundle = self
            .bundles
            .get(name)
            .ok_or_else(|| ComposeError::UnknownService(name.to_string()))?;

        let export_name = export_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-external", self.info.app));
        info!(%name, %port, %export_name, "Attached public entry point");

        self.public = Some(PublicEntry {
            service: bundle.service_id(),
            port,
            target_port: bundle.port(),
            export_name,
        });
        Ok(())
    }

    /// Renders the composed graph into a manifest for the provisioning
    /// engine. Read-only; synthesis is deterministic for a given topology.
    pub fn synthesize(&self) -> Manifest {
        let meshed = self.info.routing_mode == RoutingMode::MeshSidecar;
        let mut manifest = Manifest::new(&self.info.app);

        manifest.insert(
            "cluster",
            Resource::ComputeCluster(ComputeCluster {
                name: self.info.cluster_name.clone(),
                namespace: self.info.namespace.clone(),
                capacity: self.info.capacity.clone(),
            }),
        );
        if meshed {
            manifest.insert(
                "mesh",
                Resource::ServiceMesh(ServiceMesh {
                    name: self.info.mesh_name.clone(),
                }),
            );
        }

        for name in &self.order {
            let bundle = self
                .bundles
                .get(name)
                .expect("every ordered name has a bundle");
            manifest.insert(
                bundle.task_template_id(),
                Resource::TaskTemplate(bundle.task_template().clone()),
            );
            manifest.insert(
                bundle.service_id(),
                Resource::RunningService(bundle.running_service().clone()),
            );
            if let Some(node) = bundle.mesh_node() {
                manifest.insert(bundle.mesh_node_id(), Resource::MeshNode(node.clone()));
            }
            if let Some(route) = bundle.mesh_route() {
                manifest.insert(bundle.mesh_route_id(), Resource::MeshRoute(route.clone()));
            }
        }

        for permission in &self.permissions {
            manifest.insert(
                format!(
                    "{}-to-{}-permission",
                    permission.from_service, permission.to_service
                ),
                Resource::NetworkPermission(permission.clone()),
            );
        }

        if let Some(public) = &self.public {
            manifest.insert(
                "external",
                Resource::LoadBalancer(LoadBalancer {
                    name: "external".to_string(),
                    internet_facing: true,
                }),
            );
            manifest.insert(
                "public-listener",
                Resource::LbListener(LbListener {
                    load_balancer: "external".to_string(),
                    port: public.port,
                    open: true,
                    targets: vec![TargetRef {
                        service: public.service.clone(),
                        port: public.target_port,
                    }],
                    rules: Vec::new(),
                }),
            );
            manifest.insert_output(
                "ExternalDNS",
                StackOutput {
                    export_name: public.export_name.clone(),
                    value: OutputValue::LbDnsName("external".to_string()),
                },
            );
        }

        if !meshed && !self.edges.is_empty() {
            manifest.insert(
                "internal",
                Resource::LoadBalancer(LoadBalancer {
                    name: "internal".to_string(),
                    internet_facing: false,
                }),
            );
            manifest.insert(
                "internal-listener",
                Resource::LbListener(LbListener {
                    load_balancer: "internal".to_string(),
                    port: NonZeroU16::new(80).expect("80 is non-zero"),
                    open: false,
                    targets: Vec::new(),
                    rules: self.path_rules(),
                }),
            );
        }

        manifest
    }

    /// One path rule per distinct callee, in first-linked order.
    fn path_rules(&self) -> Vec<PathRule> {
        let mut callees: Vec<&str> = Vec::new();
        for (_, callee) in &self.edges {
            if !callees.contains(&callee.as_str()) {
                callees.push(callee.as_str());
            }
        }

        callees
            .into_iter()
            .enumerate()
            .map(|(i, callee)| {
                let bundle = self
                    .bundles
                    .get(callee)
                    .expect("links are only recorded between known bundles");
                PathRule {
                    path_pattern: format!("/{callee}*"),
                    priority: i as u32 + 1,
                    target: TargetRef {
                        service: bundle.service_id(),
                        port: bundle.port(),
                    },
                }
            })
            .collect()
    }
}
