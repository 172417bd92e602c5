//! Before/after metrics for one optimization run.
//!
//! The report compares the starting layout with the annealed one. Besides
//! energy, area, and wire length it carries two coarse proxies used by the
//! experiment log: a power figure proportional to wire length and a
//! "temperature" derived from the most crowded layer. Neither is a physical
//! simulation.

use crate::data::{Connection, Layout};
use crate::placement::{total_wire_length, AnnealResult, EnergyWeights};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Power proxy per unit of wire length.
pub const POWER_PER_WIRE_UNIT: f64 = 1.0;

/// Temperature proxy per block on the most crowded layer.
pub const TEMPERATURE_PER_BLOCK: u64 = 10;

/// Metrics describing one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Seed of the random source driving the run.
    pub seed: u64,
    /// Energy of the starting layout.
    pub initial_energy: f64,
    /// Energy of the best layout found.
    pub optimized_energy: f64,
    /// Footprint area before annealing.
    pub initial_area: u64,
    /// Footprint area after annealing.
    pub optimized_area: u64,
    /// Footprint area reduction in percent.
    pub area_reduction: f64,
    /// Wire length before annealing.
    pub initial_wire_length: u64,
    /// Wire length after annealing.
    pub optimized_wire_length: u64,
    /// Wire length reduction in percent.
    pub wire_length_reduction: f64,
    /// Power proxy before annealing.
    pub initial_power: f64,
    /// Power proxy after annealing.
    pub optimized_power: f64,
    /// Power proxy reduction in percent.
    pub power_reduction: f64,
    /// Temperature proxy before annealing.
    pub initial_temperature: u64,
    /// Temperature proxy after annealing.
    pub optimized_temperature: u64,
    /// Absolute temperature proxy drop.
    pub temperature_reduction: i64,
    /// Wall-clock annealing time in seconds, rounded to two decimals.
    pub execution_time: f64,
    /// Annealing iterations performed.
    pub iterations: u64,
    /// Starting position of every block, e.g. `Block 0: (x=3, y=7, layer=0); ...`.
    pub initial_placements: String,
    /// Rendered images of the starting layout, one per layer.
    #[serde(default)]
    pub initial_images: Vec<String>,
    /// Rendered images of the optimized layout, one per layer.
    #[serde(default)]
    pub optimized_images: Vec<String>,
}

impl RunReport {
    /// Compares `initial` with the annealing result.
    pub fn new(
        initial: &Layout,
        result: &AnnealResult,
        connectivity: &[Connection],
        weights: &EnergyWeights,
        seed: u64,
        elapsed: Duration,
    ) -> Self {
        let optimized = &result.layout;

        let initial_area = initial.total_footprint_area();
        let optimized_area = optimized.total_footprint_area();
        let initial_wire_length = total_wire_length(initial, connectivity);
        let optimized_wire_length = total_wire_length(optimized, connectivity);
        let initial_power = initial_wire_length as f64 * POWER_PER_WIRE_UNIT;
        let optimized_power = optimized_wire_length as f64 * POWER_PER_WIRE_UNIT;
        let initial_temperature = temperature_proxy(initial);
        let optimized_temperature = temperature_proxy(optimized);

        Self {
            seed,
            initial_energy: weights.energy(initial, connectivity),
            optimized_energy: result.energy,
            initial_area,
            optimized_area,
            area_reduction: reduction_percent(initial_area as f64, optimized_area as f64),
            initial_wire_length,
            optimized_wire_length,
            wire_length_reduction: reduction_percent(
                initial_wire_length as f64,
                optimized_wire_length as f64,
            ),
            initial_power,
            optimized_power,
            power_reduction: reduction_percent(initial_power, optimized_power),
            initial_temperature,
            optimized_temperature,
            temperature_reduction: initial_temperature as i64 - optimized_temperature as i64,
            execution_time: round2(elapsed.as_secs_f64()),
            iterations: result.stats.iterations,
            initial_placements: placement_summary(initial),
            initial_images: Vec::new(),
            optimized_images: Vec::new(),
        }
    }
}

/// Percentage drop from `initial` to `optimized`, rounded to two decimals.
///
/// Returns 0 when `initial` is 0.
pub fn reduction_percent(initial: f64, optimized: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    round2((initial - optimized) / initial * 100.0)
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coarse thermal figure: population of the most crowded layer times
/// [`TEMPERATURE_PER_BLOCK`].
pub fn temperature_proxy(layout: &Layout) -> u64 {
    layout.max_blocks_per_layer() as u64 * TEMPERATURE_PER_BLOCK
}

/// Renders every block's position as `Block {id}: (x={x}, y={y}, layer={layer})`,
/// joined by `"; "` in input order.
pub fn placement_summary(layout: &Layout) -> String {
    layout
        .blocks()
        .iter()
        .map(|b| {
            format!(
                "Block {}: (x={}, y={}, layer={})",
                b.id(),
                b.x(),
                b.y(),
                b.layer()
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Block;
    use crate::ids::BlockId;
    use crate::placement::AnnealStats;

    fn block(id: u32, w: u32, h: u32) -> Block {
        Block::new(BlockId::from_raw(id), w, h)
    }

    fn spread_layout() -> Layout {
        Layout::from_placed_blocks(
            vec![
                block(0, 10, 10).placed_at(0, 0, 0),
                block(1, 10, 10).placed_at(0, 30, 30),
                block(2, 5, 5).placed_at(1, 0, 0),
            ],
            2,
            50,
        )
        .unwrap()
    }

    fn packed_layout() -> Layout {
        Layout::from_placed_blocks(
            vec![
                block(0, 10, 10).placed_at(0, 0, 0),
                block(1, 10, 10).placed_at(0, 10, 0),
                block(2, 5, 5).placed_at(1, 0, 0),
            ],
            2,
            50,
        )
        .unwrap()
    }

    #[test]
    fn reduction_percent_rounds_and_handles_zero() {
        assert_eq!(reduction_percent(200.0, 150.0), 25.0);
        assert_eq!(reduction_percent(3.0, 2.0), 33.33);
        assert_eq!(reduction_percent(100.0, 120.0), -20.0);
        assert_eq!(reduction_percent(0.0, 10.0), 0.0);
    }

    #[test]
    fn placement_summary_format() {
        assert_eq!(
            placement_summary(&packed_layout()),
            "Block 0: (x=0, y=0, layer=0); Block 1: (x=10, y=0, layer=0); Block 2: (x=0, y=0, layer=1)"
        );
    }

    #[test]
    fn temperature_proxy_uses_most_crowded_layer() {
        assert_eq!(temperature_proxy(&packed_layout()), 20);
    }

    #[test]
    fn report_compares_layouts() {
        let initial = spread_layout();
        let optimized = packed_layout();
        let connectivity = [Connection::new(0, 1), Connection::new(1, 2)];
        let weights = EnergyWeights::default();
        let result = AnnealResult {
            energy: weights.energy(&optimized, &connectivity),
            layout: optimized,
            stats: AnnealStats {
                iterations: 7,
                ..AnnealStats::default()
            },
            final_temperature: 0.5,
        };

        let report = RunReport::new(
            &initial,
            &result,
            &connectivity,
            &weights,
            99,
            Duration::from_millis(1234),
        );

        assert_eq!(report.seed, 99);
        assert_eq!(report.initial_area, 40 * 40 + 25);
        assert_eq!(report.optimized_area, 20 * 10 + 25);
        // 0->1: 30 + 30, 1->2: 30 + 30 + 10
        assert_eq!(report.initial_wire_length, 130);
        // 0->1: 10, 1->2: 10 + 10
        assert_eq!(report.optimized_wire_length, 30);
        assert_eq!(report.initial_energy, 1625.0 + 130.0);
        assert_eq!(report.optimized_energy, 225.0 + 30.0);
        assert_eq!(report.wire_length_reduction, 76.92);
        assert_eq!(report.power_reduction, report.wire_length_reduction);
        assert_eq!(report.temperature_reduction, 0);
        assert_eq!(report.execution_time, 1.23);
        assert_eq!(report.iterations, 7);
        assert!(report.initial_placements.starts_with("Block 0: (x=0, y=0, layer=0)"));
    }

    #[test]
    fn report_serializes_to_json() {
        let layout = packed_layout();
        let result = AnnealResult {
            layout: layout.clone(),
            energy: 0.0,
            stats: AnnealStats::default(),
            final_temperature: 1.0,
        };
        let report = RunReport::new(
            &layout,
            &result,
            &[],
            &EnergyWeights::default(),
            1,
            Duration::ZERO,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["area_reduction"], 0.0);
        assert!(json["initial_images"].as_array().unwrap().is_empty());
    }
}
