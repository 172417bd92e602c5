//! Energy model.
//!
//! Scores a layout as a weighted sum of its total footprint area and the
//! total wire length of the connectivity graph. Wire length is the in-plane
//! Manhattan distance between block origins plus a fixed penalty for every
//! layer separating the two blocks. The simulated annealer minimizes this
//! value.

use crate::data::{Connection, Layout};

/// Wire length charged per layer of vertical separation.
pub const LAYER_PENALTY: u64 = 10;

/// Weights for the energy components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyWeights {
    /// Weight of the total footprint area.
    pub area: f64,
    /// Weight of the total wire length.
    pub wire: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            area: 1.0,
            wire: 1.0,
        }
    }
}

impl EnergyWeights {
    /// Computes the energy of `layout` under these weights.
    pub fn energy(&self, layout: &Layout, connectivity: &[Connection]) -> f64 {
        let area = layout.total_footprint_area() as f64;
        let wire = total_wire_length(layout, connectivity) as f64;
        self.area * area + self.wire * wire
    }
}

/// Computes `weights.area * footprint + weights.wire * wire_length`.
///
/// Pure: the layout is only read.
pub fn energy(layout: &Layout, connectivity: &[Connection], weights: &EnergyWeights) -> f64 {
    weights.energy(layout, connectivity)
}

/// Sums the wire length of every connection whose endpoints both exist.
///
/// Connections naming an unknown block contribute nothing.
pub fn total_wire_length(layout: &Layout, connectivity: &[Connection]) -> u64 {
    connectivity
        .iter()
        .filter_map(|&Connection(a, b)| {
            let a = layout.block(a)?;
            let b = layout.block(b)?;
            let dx = u64::from(a.x().abs_diff(b.x()));
            let dy = u64::from(a.y().abs_diff(b.y()));
            let dz = u64::from(a.layer().abs_diff(b.layer())) * LAYER_PENALTY;
            Some(dx + dy + dz)
        })
        .sum()
}

/// Returns the connections skipped by [`total_wire_length`].
pub fn unresolved_connections(layout: &Layout, connectivity: &[Connection]) -> Vec<Connection> {
    connectivity
        .iter()
        .filter(|&&Connection(a, b)| layout.block(a).is_none() || layout.block(b).is_none())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Block;
    use crate::ids::BlockId;

    fn block(id: u32, w: u32, h: u32) -> Block {
        Block::new(BlockId::from_raw(id), w, h)
    }

    fn two_block_layout() -> Layout {
        Layout::from_placed_blocks(
            vec![
                block(0, 10, 10).placed_at(0, 0, 0),
                block(1, 10, 10).placed_at(0, 10, 0),
            ],
            1,
            20,
        )
        .unwrap()
    }

    #[test]
    fn two_block_scenario() {
        let layout = two_block_layout();
        let connectivity = [Connection::new(0, 1)];
        assert_eq!(layout.total_footprint_area(), 200);
        assert_eq!(total_wire_length(&layout, &connectivity), 10);
        assert_eq!(
            energy(&layout, &connectivity, &EnergyWeights::default()),
            210.0
        );
    }

    #[test]
    fn empty_connectivity_is_weighted_area() {
        let layout = two_block_layout();
        let weights = EnergyWeights {
            area: 2.5,
            wire: 7.0,
        };
        assert_eq!(energy(&layout, &[], &weights), 2.5 * 200.0);
    }

    #[test]
    fn layer_separation_penalty() {
        let layout = Layout::from_placed_blocks(
            vec![
                block(0, 2, 2).placed_at(0, 3, 4),
                block(1, 2, 2).placed_at(2, 1, 9),
            ],
            3,
            20,
        )
        .unwrap();
        // |3-1| + |4-9| + 2 layers * 10
        assert_eq!(total_wire_length(&layout, &[Connection::new(0, 1)]), 27);
    }

    #[test]
    fn missing_ids_are_skipped() {
        let layout = two_block_layout();
        let connectivity = [
            Connection::new(0, 1),
            Connection::new(0, 42),
            Connection::new(42, 43),
        ];
        assert_eq!(total_wire_length(&layout, &connectivity), 10);
        assert_eq!(
            unresolved_connections(&layout, &connectivity),
            vec![Connection::new(0, 42), Connection::new(42, 43)]
        );
    }

    #[test]
    fn connection_order_does_not_matter() {
        let layout = two_block_layout();
        assert_eq!(
            total_wire_length(&layout, &[Connection::new(1, 0)]),
            total_wire_length(&layout, &[Connection::new(0, 1)])
        );
    }

    #[test]
    fn energy_is_pure() {
        let layout = two_block_layout();
        let snapshot = layout.clone();
        let connectivity = [Connection::new(0, 1), Connection::new(1, 0)];
        let weights = EnergyWeights::default();
        let first = energy(&layout, &connectivity, &weights);
        let second = energy(&layout, &connectivity, &weights);
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(layout, snapshot);
    }
}
