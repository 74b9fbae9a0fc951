//! Composes the demo topology document end to end and checks the
//! synthesized manifest.

use meshweave_topology_cloud_api::Resource;
use meshweave_topology_runtime::{compose, TopologyDoc};

const GREETING_DOC: &str = include_str!("../demos/greeting.json");

#[test]
fn synthesizes_the_greeting_topology() {
    let doc = TopologyDoc::from_json(GREETING_DOC).unwrap();
    let topology = compose(&doc).unwrap();

    assert_eq!(
        topology.bundle("greeter").unwrap().backends(),
        ["name.internal", "greeting.internal"]
    );
    assert!(topology.bundle("name").unwrap().backends().is_empty());
    assert!(topology.bundle("greeting").unwrap().backends().is_empty());

    let manifest = topology.synthesize();

    match manifest.get("cluster") {
        Some(Resource::ComputeCluster(cluster)) => {
            assert_eq!(cluster.namespace, "internal");
            assert_eq!(cluster.capacity.instance_type, "t3.xlarge");
            assert_eq!(cluster.capacity.min_instances, 3);
        }
        other => panic!("expected a compute cluster, found {other:?}"),
    }

    match manifest.get("greeter-task-template") {
        Some(Resource::TaskTemplate(template)) => {
            let proxy = template.proxy.as_ref().unwrap();
            assert_eq!(proxy.proxy_ingress_port, 15000);
            assert_eq!(proxy.proxy_egress_port, 15001);
            assert_eq!(proxy.ignored_uid, 1337);

            let app = &template.containers[0];
            assert_eq!(app.environment["GREETING_URL"], "http://greeting.internal:3000");
            assert_eq!(app.depends_on[0].container, "envoy");
        }
        other => panic!("expected a task template, found {other:?}"),
    }

    match manifest.get("public-listener") {
        Some(Resource::LbListener(listener)) => {
            assert_eq!(listener.port.get(), 80);
            assert_eq!(listener.targets.len(), 1);
            assert_eq!(listener.targets[0].service, "greeter-service");
        }
        other => panic!("expected the public listener, found {other:?}"),
    }

    assert_eq!(
        manifest.outputs["ExternalDNS"].export_name,
        "greeter-app-external"
    );
}

#[test]
fn manifest_json_is_reparsable() {
    let doc = TopologyDoc::from_json(GREETING_DOC).unwrap();
    let manifest = compose(&doc).unwrap().synthesize();

    let json = manifest.to_json_pretty().unwrap();
    let reparsed: meshweave_topology_cloud_api::Manifest = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, manifest);
}
