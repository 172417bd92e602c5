//! Placement engine.
//!
//! Builds a legal starting layout by random round-robin placement, then
//! refines it with simulated annealing to minimize footprint area and wire
//! length.

pub mod anneal;
pub mod cost;
pub mod random;

use crate::data::{validate_inputs, Block, Layout};
use crate::error::LayoutError;
use rand::Rng;

pub use anneal::{
    anneal, AnnealParams, AnnealResult, AnnealState, AnnealStats, Annealer, MoveOutcome,
};
pub use cost::{energy, total_wire_length, unresolved_connections, EnergyWeights, LAYER_PENALTY};
pub use random::MAX_INITIAL_PLACEMENT_ATTEMPTS;

/// Validates the inputs and places every block without overlap.
///
/// Block `i` goes to layer `i mod layer_count`. Fails with
/// [`LayoutError::InvalidInput`] for malformed inputs (checked before any
/// placement attempt) and [`LayoutError::PlacementInfeasible`] if some block
/// cannot be placed.
pub fn build_layout<R: Rng + ?Sized>(
    blocks: Vec<Block>,
    layer_count: u32,
    bound_size: u32,
    rng: &mut R,
) -> Result<Layout, LayoutError> {
    validate_inputs(&blocks, layer_count, bound_size)?;
    random::initial_placement(blocks, layer_count, bound_size, rng)
}
