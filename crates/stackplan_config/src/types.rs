//! Configuration types deserialized from `stackplan.toml`.

use serde::{Deserialize, Serialize};

/// The top-level run configuration parsed from `stackplan.toml`.
///
/// Every section is optional; missing sections and fields take the defaults
/// documented on each type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Sizes used when synthesizing a sample design.
    pub sample: SampleConfig,
    /// Simulated annealing schedule.
    pub anneal: AnnealConfig,
    /// Weights of the energy terms.
    pub energy: EnergyConfig,
    /// Where results, logs, and images are written.
    pub output: OutputConfig,
}

/// Parameters for sample design synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of blocks to generate (default 20).
    pub num_blocks: u32,
    /// Number of stacked layers (default 3).
    pub layers: u32,
    /// Distinct partners generated for every block (default 3).
    pub connections_per_block: u32,
    /// Side length of the square placement area shared by all layers (default 100).
    pub floorplan_size: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            num_blocks: 20,
            layers: 3,
            connections_per_block: 3,
            floorplan_size: 100,
        }
    }
}

/// Simulated annealing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealConfig {
    /// Starting temperature (default 1000).
    pub initial_temperature: f64,
    /// Multiplicative per-iteration decay (default 0.003).
    pub cooling_rate: f64,
    /// Temperature at or below which the search stops (default 1).
    pub min_temperature: f64,
    /// Hard iteration cap (default 10000).
    pub max_iterations: u64,
    /// Relocation draws per proposed move (default 100).
    pub max_placement_attempts_per_move: u32,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.003,
            min_temperature: 1.0,
            max_iterations: 10_000,
            max_placement_attempts_per_move: 100,
        }
    }
}

/// Weights of the footprint-area and wire-length energy terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Weight of the total footprint area (default 1.0).
    pub area_weight: f64,
    /// Weight of the total wire length (default 1.0).
    pub wire_weight: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            area_weight: 1.0,
            wire_weight: 1.0,
        }
    }
}

/// Output locations and reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only CSV log of every run.
    pub results_csv: String,
    /// Directory receiving the per-layer SVG renderings.
    pub image_dir: String,
    /// Fixed random seed; a fresh seed is drawn per run when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_csv: "experimental_results.csv".to_string(),
            image_dir: "images".to_string(),
            seed: None,
        }
    }
}
