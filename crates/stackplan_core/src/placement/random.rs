//! Random placement under the no-overlap constraint.
//!
//! Initial construction assigns layers round-robin and drops each block at
//! uniformly random positions until one does not collide with the blocks
//! already on its layer. Annealing moves reuse the same sampling to relocate
//! a single block.

use crate::data::{Block, Layout};
use crate::error::LayoutError;
use rand::Rng;

/// Random positions tried per block during initial construction.
pub const MAX_INITIAL_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Places every block in input order, assigning block `i` to layer
/// `i mod layer_count`.
///
/// Inputs must already be validated. Fails on the first block that cannot be
/// placed; no partial layout is returned.
pub(crate) fn initial_placement<R: Rng + ?Sized>(
    blocks: Vec<Block>,
    layer_count: u32,
    bound_size: u32,
    rng: &mut R,
) -> Result<Layout, LayoutError> {
    let mut layout = Layout::empty(layer_count, bound_size, blocks.len());

    for (i, mut block) in blocks.into_iter().enumerate() {
        block.set_layer((i % layer_count as usize) as u32);
        let placed = place_block(&layout, block, MAX_INITIAL_PLACEMENT_ATTEMPTS, rng)?;
        layout.push_placed(placed);
    }

    Ok(layout)
}

/// Draws up to `max_attempts` positions for a block not yet in the layout.
fn place_block<R: Rng + ?Sized>(
    layout: &Layout,
    mut block: Block,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Block, LayoutError> {
    let bound = layout.bound_size();
    let (Some(max_x), Some(max_y)) = (
        bound.checked_sub(block.width()),
        bound.checked_sub(block.height()),
    ) else {
        // No valid x/y range exists at all
        return Err(LayoutError::PlacementInfeasible {
            block: block.id(),
            attempts: 0,
        });
    };

    for _ in 0..max_attempts {
        let x = rng.gen_range(0..=max_x);
        let y = rng.gen_range(0..=max_y);
        block.set_position(x, y);
        if !layout.overlaps(&block) {
            return Ok(block);
        }
    }

    Err(LayoutError::PlacementInfeasible {
        block: block.id(),
        attempts: max_attempts,
    })
}

/// Tries up to `max_attempts` random positions for the block at `index`,
/// keeping it on its layer. Returns `false` and leaves the block where it was
/// if every draw collides.
pub(crate) fn relocate_block<R: Rng + ?Sized>(
    layout: &mut Layout,
    index: usize,
    max_attempts: u32,
    rng: &mut R,
) -> bool {
    let block = *layout.block_at(index);
    let bound = layout.bound_size();
    let max_x = bound.saturating_sub(block.width());
    let max_y = bound.saturating_sub(block.height());

    for _ in 0..max_attempts {
        let x = rng.gen_range(0..=max_x);
        let y = rng.gen_range(0..=max_y);
        if layout.try_move(index, x, y) {
            return true;
        }
    }
    false
}
