//! Core floorplan data structures.
//!
//! Defines the [`Block`] rectangle, the [`Connection`] between two blocks, and
//! the [`Layout`] that owns every block together with its per-layer index.
//! The layout is the value that flows through construction, energy
//! evaluation, and annealing; snapshots are taken with `Clone`.

use crate::error::LayoutError;
use crate::ids::BlockId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A fixed-size rectangle placed on exactly one layer.
///
/// The rectangle covers `[x, x + width) × [y, y + height)`. Identity and
/// dimensions never change after construction; layer and position are only
/// written by placement and annealing moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    width: u32,
    height: u32,
    #[serde(default)]
    layer: u32,
    #[serde(default)]
    x: u32,
    #[serde(default)]
    y: u32,
}

impl Block {
    /// Creates an unplaced block at the origin of layer 0.
    pub fn new(id: BlockId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            layer: 0,
            x: 0,
            y: 0,
        }
    }

    /// Returns this block positioned on `layer` at `(x, y)`.
    ///
    /// Used to describe pre-placed designs for [`Layout::from_placed_blocks`].
    pub fn placed_at(mut self, layer: u32, x: u32, y: u32) -> Self {
        self.layer = layer;
        self.x = x;
        self.y = y;
        self
    }

    /// Returns the block's identity.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the block's width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the block's height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the layer the block is assigned to.
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Returns the x coordinate of the block's origin.
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Returns the y coordinate of the block's origin.
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive top edge.
    pub fn top(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Returns `true` if the two rectangles intersect.
    ///
    /// Half-open on both axes: blocks that only touch along an edge or a
    /// corner do not intersect. Layers and identities are not consulted.
    pub fn intersects(&self, other: &Block) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.top()
            && self.top() > u64::from(other.y)
    }

    pub(crate) fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    pub(crate) fn set_position(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }
}

/// Returns `true` if `block` intersects any of `others`, skipping the block
/// with the same identity.
pub fn overlaps<'a>(block: &Block, others: impl IntoIterator<Item = &'a Block>) -> bool {
    others
        .into_iter()
        .any(|other| other.id != block.id && block.intersects(other))
}

/// An unordered wiring requirement between two blocks.
///
/// Serialized as a two-element array, e.g. `[0, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection(pub BlockId, pub BlockId);

impl Connection {
    /// Creates a connection between two raw block ids.
    pub fn new(a: u32, b: u32) -> Self {
        Self(BlockId::from_raw(a), BlockId::from_raw(b))
    }
}

/// The full set of blocks with their per-layer positions (the floorplan).
///
/// Invariants after every public operation:
/// - no two distinct blocks on the same layer intersect;
/// - every block lies inside `[0, bound_size]` on both axes.
///
/// Serialized as its placed blocks plus `layer_count` and `bound_size`;
/// deserialization goes through [`Layout::from_placed_blocks`], so a layout
/// read from disk is checked like any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutRepr", into = "LayoutRepr")]
pub struct Layout {
    blocks: Vec<Block>,
    layer_count: u32,
    bound_size: u32,
    /// Block indices per layer, in assignment order.
    layers: Vec<Vec<usize>>,
    block_by_id: HashMap<BlockId, usize>,
}

/// On-disk form of a [`Layout`]; the per-layer and id indices are derived.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutRepr {
    blocks: Vec<Block>,
    layer_count: u32,
    bound_size: u32,
}

impl TryFrom<LayoutRepr> for Layout {
    type Error = LayoutError;

    fn try_from(repr: LayoutRepr) -> Result<Self, Self::Error> {
        Layout::from_placed_blocks(repr.blocks, repr.layer_count, repr.bound_size)
    }
}

impl From<Layout> for LayoutRepr {
    fn from(layout: Layout) -> Self {
        Self {
            blocks: layout.blocks,
            layer_count: layout.layer_count,
            bound_size: layout.bound_size,
        }
    }
}

impl Layout {
    pub(crate) fn empty(layer_count: u32, bound_size: u32, capacity: usize) -> Self {
        Self {
            blocks: Vec::with_capacity(capacity),
            layer_count,
            bound_size,
            layers: vec![Vec::new(); layer_count as usize],
            block_by_id: HashMap::with_capacity(capacity),
        }
    }

    /// Appends an already-positioned block and indexes it under its layer.
    pub(crate) fn push_placed(&mut self, block: Block) {
        let index = self.blocks.len();
        self.layers[block.layer as usize].push(index);
        self.block_by_id.insert(block.id, index);
        self.blocks.push(block);
    }

    /// Builds a layout from blocks whose layers and positions are already set.
    ///
    /// Fails with [`LayoutError::InvalidInput`] if the blocks are malformed or
    /// the placement breaks the overlap or bounds invariants.
    pub fn from_placed_blocks(
        blocks: Vec<Block>,
        layer_count: u32,
        bound_size: u32,
    ) -> Result<Self, LayoutError> {
        validate_inputs(&blocks, layer_count, bound_size)?;

        let mut layout = Self::empty(layer_count, bound_size, blocks.len());
        for block in blocks {
            if block.layer >= layer_count {
                return Err(LayoutError::invalid(format!(
                    "block {} is on layer {} but the layout has {} layers",
                    block.id, block.layer, layer_count
                )));
            }
            if !layout.fits(&block) {
                return Err(LayoutError::invalid(format!(
                    "block {} extends past the {bound_size}x{bound_size} floorplan",
                    block.id
                )));
            }
            if layout.overlaps(&block) {
                return Err(LayoutError::invalid(format!(
                    "block {} overlaps another block on layer {}",
                    block.id, block.layer
                )));
            }
            layout.push_placed(block);
        }
        Ok(layout)
    }

    /// Returns all blocks in input order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Looks up a block by identity.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.block_by_id.get(&id).map(|&index| &self.blocks[index])
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of stacked layers.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Returns the side length of the square placement area.
    pub fn bound_size(&self) -> u32 {
        self.bound_size
    }

    /// Iterates the blocks assigned to `layer`, in assignment order.
    ///
    /// Yields nothing for a layer index outside the layout.
    pub fn layer_blocks(&self, layer: u32) -> impl Iterator<Item = &Block> + '_ {
        self.layers
            .get(layer as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&index| &self.blocks[index])
    }

    /// Returns how many blocks are assigned to `layer`.
    pub fn layer_len(&self, layer: u32) -> usize {
        self.layers.get(layer as usize).map_or(0, Vec::len)
    }

    /// Returns the index into [`blocks`](Self::blocks) of the `slot`-th block on `layer`.
    pub(crate) fn layer_slot(&self, layer: u32, slot: usize) -> usize {
        self.layers[layer as usize][slot]
    }

    pub(crate) fn block_at(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    /// Returns `true` if `block` intersects another block on its layer.
    pub fn overlaps(&self, block: &Block) -> bool {
        overlaps(block, self.layer_blocks(block.layer))
    }

    /// Returns `true` if `block` lies entirely inside the placement area.
    pub fn fits(&self, block: &Block) -> bool {
        let bound = u64::from(self.bound_size);
        block.right() <= bound && block.top() <= bound
    }

    /// Checks both layout invariants over every block.
    pub fn is_legal(&self) -> bool {
        self.blocks
            .iter()
            .all(|block| self.fits(block) && !self.overlaps(block))
    }

    /// Moves the block at `index` to `(x, y)` on its current layer if the new
    /// position is legal. Returns whether the move was applied.
    pub(crate) fn try_move(&mut self, index: usize, x: u32, y: u32) -> bool {
        let mut moved = self.blocks[index];
        moved.set_position(x, y);
        if !self.fits(&moved) || self.overlaps(&moved) {
            return false;
        }
        self.blocks[index] = moved;
        true
    }

    /// Sums, over every non-empty layer, the area of the bounding box anchored
    /// at the origin and reaching the furthest right and top block edges.
    ///
    /// This is an enclosing-box measure, not the covered area of the union of
    /// rectangles.
    pub fn total_footprint_area(&self) -> u64 {
        (0..self.layer_count)
            .filter_map(|layer| {
                let max_x = self.layer_blocks(layer).map(Block::right).max()?;
                let max_y = self.layer_blocks(layer).map(Block::top).max()?;
                Some(max_x * max_y)
            })
            .sum()
    }

    /// Returns the population of the most crowded layer.
    pub fn max_blocks_per_layer(&self) -> usize {
        self.layers.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Rejects malformed construction parameters before any placement attempt.
pub(crate) fn validate_inputs(
    blocks: &[Block],
    layer_count: u32,
    bound_size: u32,
) -> Result<(), LayoutError> {
    if layer_count < 1 {
        return Err(LayoutError::invalid("layer count must be at least 1"));
    }
    if bound_size == 0 {
        return Err(LayoutError::invalid("floorplan size must be positive"));
    }

    let mut seen = HashSet::with_capacity(blocks.len());
    for block in blocks {
        if block.width == 0 || block.height == 0 {
            return Err(LayoutError::invalid(format!(
                "block {} has a zero dimension ({}x{})",
                block.id, block.width, block.height
            )));
        }
        if !seen.insert(block.id) {
            return Err(LayoutError::invalid(format!(
                "duplicate block id {}",
                block.id
            )));
        }
    }
    Ok(())
}
