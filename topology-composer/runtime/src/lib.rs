//! The `meshweave` binary: reads a topology document, composes the service
//! graph, and writes the synthesized manifest for the provisioning engine.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
mod doc;

pub use self::{
    args::Args,
    doc::{compose, TopologyDoc},
};
