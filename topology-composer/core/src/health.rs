use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;

/// Minimum health check interval accepted by the mesh provider.
pub const HEALTH_INTERVAL_FLOOR_MS: u64 = 5000;

/// Minimum health check timeout accepted by the mesh provider.
pub const HEALTH_TIMEOUT_FLOOR_MS: u64 = 2000;

const HEALTHY_THRESHOLD: u32 = 2;
const UNHEALTHY_THRESHOLD: u32 = 2;

/// Traffic protocol for mesh listeners and health probes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Protocol {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "TCP")]
    Tcp,
}

/// Health probe policy for a mesh listener.
///
/// The mesh provider rejects intervals under 5s and timeouts under 2s;
/// constructors clamp sub-floor values rather than passing them through.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckPolicy {
    pub path: String,
    pub port: NonZeroU16,
    pub protocol: Protocol,
    pub interval_millis: u64,
    pub timeout_millis: u64,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
}

// === impl HealthCheckPolicy ===

impl HealthCheckPolicy {
    /// Builds an HTTP probe of `/` on `port`, clamping the interval and
    /// timeout up to the provider floors.
    pub fn http(port: NonZeroU16, interval_millis: u64, timeout_millis: u64) -> Self {
        Self {
            path: "/".to_string(),
            port,
            protocol: Protocol::Http,
            interval_millis: clamp_floor(interval_millis, HEALTH_INTERVAL_FLOOR_MS, "interval"),
            timeout_millis: clamp_floor(timeout_millis, HEALTH_TIMEOUT_FLOOR_MS, "timeout"),
            healthy_threshold: HEALTHY_THRESHOLD,
            unhealthy_threshold: UNHEALTHY_THRESHOLD,
        }
    }
}

fn clamp_floor(value: u64, floor: u64, param: &str) -> u64 {
    if value < floor {
        tracing::debug!(%value, %floor, param, "Clamping health check parameter to provider floor");
        floor
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(p: u16) -> NonZeroU16 {
        NonZeroU16::new(p).unwrap()
    }

    #[test]
    fn clamps_below_floor() {
        let hc = HealthCheckPolicy::http(port(3000), 1000, 500);
        assert_eq!(hc.interval_millis, HEALTH_INTERVAL_FLOOR_MS);
        assert_eq!(hc.timeout_millis, HEALTH_TIMEOUT_FLOOR_MS);
    }

    #[test]
    fn accepts_at_floor() {
        let hc = HealthCheckPolicy::http(port(3000), 5000, 2000);
        assert_eq!(hc.interval_millis, 5000);
        assert_eq!(hc.timeout_millis, 2000);
    }

    #[test]
    fn passes_above_floor() {
        let hc = HealthCheckPolicy::http(port(3000), 30000, 10000);
        assert_eq!(hc.interval_millis, 30000);
        assert_eq!(hc.timeout_millis, 10000);
    }

    #[test]
    fn fixed_thresholds() {
        let hc = HealthCheckPolicy::http(port(3000), 5000, 2000);
        assert_eq!(hc.healthy_threshold, 2);
        assert_eq!(hc.unhealthy_threshold, 2);
        assert_eq!(hc.path, "/");
        assert_eq!(hc.protocol, Protocol::Http);
    }
}
