//! The fixed traffic-interception contract for the sidecar proxy.
//!
//! These values are shared between the task template's proxy configuration,
//! the orchestration layer's traffic redirection rules, and the mesh control
//! plane. They are a wire contract, not tunables.

use std::net::Ipv4Addr;
use std::num::NonZeroU16;

/// Port on which the sidecar intercepts inbound traffic.
pub const INGRESS_PORT: u16 = 15000;

/// Port on which the sidecar intercepts outbound traffic.
pub const EGRESS_PORT: u16 = 15001;

/// UID the sidecar process runs as; traffic from this UID bypasses
/// redirection so the proxy's own connections are not intercepted.
pub const BYPASS_UID: u32 = 1337;

/// Local admin endpoint the readiness probe queries.
pub const ADMIN_PORT: u16 = 9901;

/// Container name the proxy runs under within a task template.
pub const CONTAINER_NAME: &str = "envoy";

/// Environment variable carrying the mesh node identity into the proxy.
pub const NODE_NAME_ENV: &str = "APPMESH_VIRTUAL_NODE_NAME";

/// Provider-owned proxy image, pinned.
pub const DEFAULT_IMAGE: &str =
    "111345817488.dkr.ecr.us-east-1.amazonaws.com/aws-appmesh-envoy:v1.11.1.1-prod";

/// Link-local addresses that must bypass egress interception.
///
/// These are the provider's metadata and credential endpoints; intercepting
/// them leaves tasks unable to fetch credentials.
pub const EGRESS_BYPASS_ADDRS: [Ipv4Addr; 2] = [
    Ipv4Addr::new(169, 254, 170, 2),
    Ipv4Addr::new(169, 254, 169, 254),
];

/// Shell probe asserting the proxy's admin endpoint reports a LIVE state.
pub fn readiness_probe() -> Vec<String> {
    vec![
        "CMD-SHELL".to_string(),
        format!("curl -s http://localhost:{ADMIN_PORT}/server_info | grep state | grep -q LIVE"),
    ]
}

/// Application ports the proxy intercepts for a single-port service.
pub fn app_ports(port: NonZeroU16) -> Vec<NonZeroU16> {
    vec![port]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_addrs_are_fixed() {
        assert_eq!(
            EGRESS_BYPASS_ADDRS,
            [
                "169.254.170.2".parse::<Ipv4Addr>().unwrap(),
                "169.254.169.254".parse::<Ipv4Addr>().unwrap(),
            ]
        );
    }

    #[test]
    fn readiness_probe_asserts_live() {
        let probe = readiness_probe();
        assert_eq!(probe[0], "CMD-SHELL");
        assert!(probe[1].contains("localhost:9901"));
        assert!(probe[1].contains("LIVE"));
    }
}
