use crate::doc::{compose, TopologyDoc};
use anyhow::{Context, Result};
use clap::Parser;
use meshweave_topology_core::RoutingMode;
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Parser)]
#[clap(name = "meshweave", about = "Composes a mesh service topology into a provisioning manifest")]
pub struct Args {
    #[clap(long, default_value = "meshweave=info,warn", env = "MESHWEAVE_LOG")]
    log_level: String,

    /// Path to the topology document, or `-` for stdin.
    #[clap(long, short = 't')]
    topology: PathBuf,

    /// Where to write the synthesized manifest; stdout if omitted.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// Overrides the document's routing mode.
    #[clap(long)]
    routing_mode: Option<RoutingMode>,
}

// === impl Args ===

impl Args {
    pub fn parse_and_run() -> Result<()> {
        let args = Self::parse();
        args.init_logging()?;
        args.run()
    }

    fn init_logging(&self) -> Result<()> {
        let filter = tracing_subscriber::EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("invalid log level {:?}", self.log_level))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    }

    fn run(self) -> Result<()> {
        let json = read_input(&self.topology)?;
        let mut doc = TopologyDoc::from_json(&json)?;
        if let Some(mode) = self.routing_mode {
            doc.routing_mode = mode;
        }

        let topology = compose(&doc)?;
        let manifest = topology.synthesize();
        info!(
            app = %manifest.app,
            resources = manifest.resources.len(),
            "Synthesized manifest"
        );

        let rendered = manifest.to_json_pretty()?;
        match &self.output {
            Some(path) => std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{rendered}"),
        }
        Ok(())
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args() {
        let args = Args::try_parse_from([
            "meshweave",
            "--topology",
            "topology.json",
            "--routing-mode",
            "direct-path-routing",
        ])
        .unwrap();
        assert_eq!(args.topology, PathBuf::from("topology.json"));
        assert_eq!(args.routing_mode, Some(RoutingMode::DirectPathRouting));
        assert_eq!(args.output, None);
    }

    #[test]
    fn rejects_bad_routing_mode() {
        let res = Args::try_parse_from([
            "meshweave",
            "--topology",
            "topology.json",
            "--routing-mode",
            "service-mesh",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn writes_the_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let topology = dir.path().join("topology.json");
        let output = dir.path().join("manifest.json");
        std::fs::write(&topology, include_str!("../demos/greeting.json")).unwrap();

        let args = Args::try_parse_from([
            "meshweave",
            "-t",
            topology.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        args.run().unwrap();

        let manifest = std::fs::read_to_string(output).unwrap();
        assert!(manifest.contains("\"greeter-virtual-node\""));
        assert!(manifest.contains("\"exportName\": \"greeter-app-external\""));
    }
}
