use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

const VALID_NAME_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789-";

/// Service names become DNS labels, which are capped at 63 bytes.
const MAX_NAME_LEN: usize = 63;

/// A validated service name.
///
/// The name is used verbatim to derive every child resource id and the
/// service's internal DNS name, so it is restricted to DNS label form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ServiceName(String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// The name of a service cannot be empty.
    #[error("service name must not be empty")]
    Empty,

    #[error("service name must not exceed {MAX_NAME_LEN} characters")]
    TooLong,

    /// Names can only contain chars in a limited char set.
    #[error("service name characters are limited to lowercase letters, numbers, and dashes")]
    BadChar,

    #[error("service name must not begin or end with a dash")]
    BoundaryDash,
}

/// The externally addressable mesh name for a service, `<name>.<namespace>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct MeshEndpoint(String);

// === impl ServiceName ===

impl ServiceName {
    pub fn parse(s: &str) -> Result<Self, NameError> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        if s.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong);
        }
        if s.chars().any(|c| !VALID_NAME_CHARS.contains(c)) {
            return Err(NameError::BadChar);
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(NameError::BoundaryDash);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// === impl MeshEndpoint ===

impl MeshEndpoint {
    /// Derives the mesh name for `name` within the discovery namespace.
    ///
    /// This is a pure function of its inputs; later lookups of the same
    /// service resolve to the same endpoint.
    pub fn new(name: &ServiceName, namespace: &str) -> Self {
        Self(format!("{}.{}", name, namespace))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeshEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
