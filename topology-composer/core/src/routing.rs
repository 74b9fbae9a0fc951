use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selects how service-to-service traffic reaches its destination.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    /// Each task runs a sidecar proxy that intercepts traffic and routes it
    /// through the mesh.
    #[default]
    MeshSidecar,

    /// An internal load balancer listener path-routes requests directly to
    /// backend services. No sidecars, no mesh resources.
    DirectPathRouting,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid routing mode: {0:?}")]
pub struct InvalidRoutingMode(String);

// === impl RoutingMode ===

impl std::str::FromStr for RoutingMode {
    type Err = InvalidRoutingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mesh-sidecar" => Ok(Self::MeshSidecar),
            "direct-path-routing" => Ok(Self::DirectPathRouting),
            s => Err(InvalidRoutingMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeshSidecar => "mesh-sidecar".fmt(f),
            Self::DirectPathRouting => "direct-path-routing".fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for mode in [RoutingMode::MeshSidecar, RoutingMode::DirectPathRouting] {
            assert_eq!(mode.to_string().parse::<RoutingMode>().unwrap(), mode);
        }
        assert!("service-mesh".parse::<RoutingMode>().is_err());
    }

    #[test]
    fn serde_matches_flag_strings() {
        let json = serde_json::to_string(&RoutingMode::DirectPathRouting).unwrap();
        assert_eq!(json, "\"direct-path-routing\"");
        let mode: RoutingMode = serde_json::from_str("\"mesh-sidecar\"").unwrap();
        assert_eq!(mode, RoutingMode::MeshSidecar);
    }
}
