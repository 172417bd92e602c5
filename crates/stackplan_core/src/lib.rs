//! Multi-layer block floorplanner.
//!
//! Rectangular blocks are distributed over a fixed number of stacked layers,
//! each a square of side `bound_size`. Blocks on the same layer must not
//! overlap. Placement quality is measured by an energy that adds the summed
//! per-layer bounding-box area to the total Manhattan wire length between
//! connected blocks, with a penalty for every layer a wire crosses.
//!
//! # Pipeline
//!
//! 1. **Build**: validate inputs and place blocks round-robin over the layers
//!    at random non-overlapping positions
//! 2. **Anneal**: relocate blocks within their layer under a geometric cooling
//!    schedule, keeping the lowest-energy layout seen
//! 3. **Report**: compare the starting and optimized layouts
//!
//! # Usage
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use stackplan_core::{anneal, build_layout, AnnealParams, EnergyWeights};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let layout = build_layout(blocks, 3, 100, &mut rng)?;
//! let result = anneal(&layout, &connectivity, AnnealParams::default(),
//!     EnergyWeights::default(), &mut rng, &sink);
//! assert!(result.energy <= EnergyWeights::default().energy(&layout, &connectivity));
//! ```

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod ids;
pub mod placement;
pub mod report;
pub mod sample;

pub use data::{Block, Connection, Layout};
pub use error::LayoutError;
pub use ids::BlockId;
pub use placement::{
    anneal, build_layout, energy, total_wire_length, unresolved_connections, AnnealParams,
    AnnealResult, AnnealState, AnnealStats, Annealer, EnergyWeights, MoveOutcome,
};
pub use report::RunReport;
pub use sample::{generate_sample_blocks, generate_sample_connectivity};
