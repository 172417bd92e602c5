//! Problem instances: synthesized samples or JSON design files.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use stackplan_core::{generate_sample_blocks, generate_sample_connectivity, Block, Connection};

/// A JSON design file.
///
/// ```json
/// {
///   "layers": 2,
///   "floorplan_size": 60,
///   "blocks": [{ "id": 0, "width": 10, "height": 8 }, { "id": 1, "width": 6, "height": 6 }],
///   "connectivity": [[0, 1]]
/// }
/// ```
///
/// `layers` and `floorplan_size` are optional and override the configured
/// values when present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignFile {
    /// Blocks to place; any positions in the file are ignored.
    pub blocks: Vec<Block>,
    /// Wiring requirements between block ids.
    #[serde(default)]
    pub connectivity: Vec<Connection>,
    /// Layer count override.
    pub layers: Option<u32>,
    /// Floorplan side length override.
    pub floorplan_size: Option<u32>,
}

/// Where a problem instance came from, as recorded in the experiment log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemSource {
    /// Randomly synthesized blocks and connectivity.
    Sample,
    /// Loaded from the named design file.
    Design(String),
}

impl ProblemSource {
    /// Value of the `Benchmark Type` log column.
    pub fn kind(&self) -> &'static str {
        match self {
            ProblemSource::Sample => "Sample",
            ProblemSource::Design(_) => "Design",
        }
    }

    /// Value of the `Benchmark File` log column.
    pub fn file(&self) -> &str {
        match self {
            ProblemSource::Sample => "N/A",
            ProblemSource::Design(path) => path,
        }
    }
}

/// The blocks and connectivity handed to every run.
#[derive(Debug, Clone)]
pub struct Problem {
    pub blocks: Vec<Block>,
    pub connectivity: Vec<Connection>,
    pub source: ProblemSource,
}

impl Problem {
    /// Synthesizes `num_blocks` random blocks with `connections_per_block`
    /// partners each.
    pub fn sample<R: Rng + ?Sized>(num_blocks: u32, connections_per_block: u32, rng: &mut R) -> Self {
        let blocks = generate_sample_blocks(num_blocks, rng);
        let connectivity = generate_sample_connectivity(num_blocks, connections_per_block, rng);
        Self {
            blocks,
            connectivity,
            source: ProblemSource::Sample,
        }
    }

    /// Builds a problem from a parsed design file, returning any layer and
    /// size overrides alongside it.
    pub fn from_design(design: DesignFile, path: &str) -> (Self, Option<u32>, Option<u32>) {
        let problem = Self {
            blocks: design
                .blocks
                .into_iter()
                .map(|b| Block::new(b.id(), b.width(), b.height()))
                .collect(),
            connectivity: design.connectivity,
            source: ProblemSource::Design(path.to_string()),
        };
        (problem, design.layers, design.floorplan_size)
    }
}

/// Reads and parses a JSON design file.
pub fn load_design(path: &Path) -> Result<DesignFile, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read design file '{}': {e}", path.display()))?;
    let design = serde_json::from_str(&content)
        .map_err(|e| format!("invalid design file '{}': {e}", path.display()))?;
    Ok(design)
}
