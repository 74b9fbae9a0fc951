use crate::{topology::ComposeError, TopologyInfo};
use meshweave_topology_cloud_api::{
    ContainerDependency, ContainerHealthCheck, ContainerSpec, DependencyCondition, DiscoveryRecord,
    LogConfig, MeshListener, MeshNode, MeshRoute, NetworkMode, PortMapping, ProxyConfig,
    RunningService, TaskTemplate,
};
use meshweave_topology_core::{
    proxy, AppContainerSpec, HealthCheckPolicy, MeshEndpoint, Protocol, RoutingMode, ServiceName,
    DEFAULT_INTERVAL_SECONDS, DEFAULT_RETRIES, DEFAULT_START_PERIOD_SECONDS,
    DEFAULT_TIMEOUT_SECONDS, HEALTH_INTERVAL_FLOOR_MS, HEALTH_TIMEOUT_FLOOR_MS,
};
use std::{collections::BTreeMap, num::NonZeroU16};

const APP_CONTAINER_NAME: &str = "app";

/// The resources representing one deployable microservice.
///
/// Bundles come out of the factory fully formed: the task template, running
/// service, and (in mesh mode) mesh node and route are structurally linked
/// before the value exists. The only mutation a bundle ever sees afterwards
/// is backend growth when it is the caller of a link.
#[derive(Clone, Debug)]
pub struct ServiceBundle {
    name: ServiceName,
    port: NonZeroU16,
    task_template: TaskTemplate,
    running_service: RunningService,
    mesh_node: Option<MeshNode>,
    mesh_route: Option<MeshRoute>,
    endpoint: Option<MeshEndpoint>,
}

// === impl ServiceBundle ===

impl ServiceBundle {
    /// Builds the full resource set for one service.
    ///
    /// Fails on an invalid container spec; nothing is observable until every
    /// resource is in place.
    pub(crate) fn build(
        info: &TopologyInfo,
        name: ServiceName,
        port: NonZeroU16,
        app: AppContainerSpec,
    ) -> Result<Self, ComposeError> {
        app.validate()?;

        let meshed = info.routing_mode == RoutingMode::MeshSidecar;

        let mut app_container = ContainerSpec {
            name: APP_CONTAINER_NAME.to_string(),
            image: app.image,
            memory_limit_mib: app.memory_limit_mib,
            essential: true,
            environment: app.environment,
            user: None,
            port_mappings: vec![PortMapping {
                container_port: port,
                host_port: port,
            }],
            health_check: app.health_check_command.map(|command| ContainerHealthCheck {
                command,
                start_period_seconds: DEFAULT_START_PERIOD_SECONDS,
                interval_seconds: DEFAULT_INTERVAL_SECONDS,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                retries: DEFAULT_RETRIES,
            }),
            depends_on: Vec::new(),
            logging: LogConfig {
                stream_prefix: format!("{name}-app"),
            },
        };

        let mut containers = Vec::with_capacity(2);
        if meshed {
            // The application must not start until the sidecar is healthy,
            // or its first outbound calls would bypass interception.
            app_container.depends_on.push(ContainerDependency {
                container: proxy::CONTAINER_NAME.to_string(),
                condition: DependencyCondition::Healthy,
            });
            containers.push(app_container);
            containers.push(Self::proxy_container(info, &name));
        } else {
            containers.push(app_container);
        }

        let task_template = TaskTemplate {
            family: format!("{name}-task-template"),
            network_mode: NetworkMode::Isolated,
            proxy: meshed.then(|| ProxyConfig::intercept(port)),
            containers,
        };

        let running_service = RunningService::new(
            &info.cluster_name,
            &task_template.family,
            DiscoveryRecord::for_name(name.as_str()),
        );

        let (mesh_node, mesh_route, endpoint) = if meshed {
            let endpoint = info.endpoint(&name);
            let node = MeshNode {
                mesh: info.mesh_name.clone(),
                name: name.to_string(),
                listener: MeshListener {
                    port,
                    protocol: Protocol::Http,
                    health_check: HealthCheckPolicy::http(
                        port,
                        HEALTH_INTERVAL_FLOOR_MS,
                        HEALTH_TIMEOUT_FLOOR_MS,
                    ),
                },
                backends: Vec::new(),
                discovery_service: format!("{name}-service"),
            };
            let route = MeshRoute {
                mesh: info.mesh_name.clone(),
                name: endpoint.to_string(),
                provider_node: name.to_string(),
            };
            (Some(node), Some(route), Some(endpoint))
        } else {
            (None, None, None)
        };

        Ok(Self {
            name,
            port,
            task_template,
            running_service,
            mesh_node,
            mesh_route,
            endpoint,
        })
    }

    fn proxy_container(info: &TopologyInfo, name: &ServiceName) -> ContainerSpec {
        let mut environment = BTreeMap::new();
        environment.insert(
            proxy::NODE_NAME_ENV.to_string(),
            info.mesh_node_identity(name),
        );

        ContainerSpec {
            name: proxy::CONTAINER_NAME.to_string(),
            image: info.proxy_image.clone(),
            memory_limit_mib: 128,
            essential: true,
            environment,
            user: Some(proxy::BYPASS_UID.to_string()),
            port_mappings: Vec::new(),
            health_check: Some(ContainerHealthCheck {
                command: proxy::readiness_probe(),
                start_period_seconds: DEFAULT_START_PERIOD_SECONDS,
                interval_seconds: DEFAULT_INTERVAL_SECONDS,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                retries: DEFAULT_RETRIES,
            }),
            depends_on: Vec::new(),
            logging: LogConfig {
                stream_prefix: format!("{name}-envoy"),
            },
        }
    }

    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    pub fn port(&self) -> NonZeroU16 {
        self.port
    }

    /// The mesh name other services route to, if this bundle is meshed.
    pub fn endpoint(&self) -> Option<&MeshEndpoint> {
        self.endpoint.as_ref()
    }

    /// Virtual-service names this bundle's proxy may route to.
    pub fn backends(&self) -> &[String] {
        self.mesh_node
            .as_ref()
            .map(|node| node.backends.as_slice())
            .unwrap_or(&[])
    }

    pub fn task_template(&self) -> &TaskTemplate {
        &self.task_template
    }

    pub fn running_service(&self) -> &RunningService {
        &self.running_service
    }

    pub fn mesh_node(&self) -> Option<&MeshNode> {
        self.mesh_node.as_ref()
    }

    pub fn mesh_route(&self) -> Option<&MeshRoute> {
        self.mesh_route.as_ref()
    }

    pub(crate) fn mesh_node_mut(&mut self) -> Option<&mut MeshNode> {
        self.mesh_node.as_mut()
    }

    pub fn task_template_id(&self) -> String {
        format!("{}-task-template", self.name)
    }

    pub fn service_id(&self) -> String {
        format!("{}-service", self.name)
    }

    pub fn mesh_node_id(&self) -> String {
        format!("{}-virtual-node", self.name)
    }

    pub fn mesh_route_id(&self) -> String {
        format!("{}-virtual-service", self.name)
    }
}
