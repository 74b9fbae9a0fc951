use meshweave_topology_core::{proxy, ClusterCapacity, MeshEndpoint, RoutingMode, ServiceName};

/// Holds the shared context every service bundle is built against.
///
/// Supplied once at topology construction, read-shared by every factory
/// call, and never reassigned: a bundle belongs to exactly one cluster and
/// one mesh for its lifetime.
#[derive(Clone, Debug)]
pub struct TopologyInfo {
    /// Application name; prefixes shared resource names and the default
    /// export name.
    pub app: String,

    /// Name of the shared compute cluster.
    pub cluster_name: String,

    /// Private DNS namespace for service discovery, e.g. "internal".
    pub namespace: String,

    /// Name of the shared mesh.
    pub mesh_name: String,

    /// How service-to-service traffic is routed.
    pub routing_mode: RoutingMode,

    /// Sidecar proxy image reference (pinned tag).
    pub proxy_image: String,

    /// Capacity to request from the cluster provider.
    pub capacity: ClusterCapacity,
}

// === impl TopologyInfo ===

impl TopologyInfo {
    /// A mesh-sidecar topology with the conventional derived names.
    pub fn new(app: impl ToString, namespace: impl ToString) -> Self {
        let app = app.to_string();
        Self {
            cluster_name: format!("{app}-cluster"),
            mesh_name: format!("{app}-mesh"),
            namespace: namespace.to_string(),
            routing_mode: RoutingMode::MeshSidecar,
            proxy_image: proxy::DEFAULT_IMAGE.to_string(),
            capacity: ClusterCapacity::default(),
            app,
        }
    }

    pub(crate) fn endpoint(&self, name: &ServiceName) -> MeshEndpoint {
        MeshEndpoint::new(name, &self.namespace)
    }

    /// The identity handed to a service's sidecar,
    /// `mesh/<mesh>/virtualNode/<name>`.
    pub(crate) fn mesh_node_identity(&self, name: &ServiceName) -> String {
        format!("mesh/{}/virtualNode/{}", self.mesh_name, name)
    }
}
