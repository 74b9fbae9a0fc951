//! Composes mesh-enabled service bundles into a provisioning manifest.
//!
//! The factory ([`Topology::add_service`]) produces one fully-formed
//! [`ServiceBundle`] per service; the linker ([`Topology::link`]) wires
//! caller→callee connectivity; [`Topology::expose`] attaches one bundle to
//! the public entry point; [`Topology::synthesize`] renders the whole graph.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod bundle;
mod info;
mod topology;


pub use self::{
    bundle::ServiceBundle,
    info::TopologyInfo,
    topology::{ComposeError, Topology},
};
