//! Synthetic designs for experiments and tests.

use crate::data::{Block, Connection};
use crate::ids::BlockId;
use rand::Rng;
use std::collections::HashSet;

/// Smallest generated block side.
pub const MIN_SAMPLE_DIMENSION: u32 = 5;

/// Largest generated block side.
pub const MAX_SAMPLE_DIMENSION: u32 = 15;

/// Generates blocks `0..num_blocks` with sides drawn uniformly from
/// `[MIN_SAMPLE_DIMENSION, MAX_SAMPLE_DIMENSION]`.
pub fn generate_sample_blocks<R: Rng + ?Sized>(num_blocks: u32, rng: &mut R) -> Vec<Block> {
    (0..num_blocks)
        .map(|i| {
            let width = rng.gen_range(MIN_SAMPLE_DIMENSION..=MAX_SAMPLE_DIMENSION);
            let height = rng.gen_range(MIN_SAMPLE_DIMENSION..=MAX_SAMPLE_DIMENSION);
            Block::new(BlockId::from_raw(i), width, height)
        })
        .collect()
}

/// Connects every block to `connections_per_block` distinct other blocks.
///
/// The count is clamped to `num_blocks - 1` since a block never connects to
/// itself.
pub fn generate_sample_connectivity<R: Rng + ?Sized>(
    num_blocks: u32,
    connections_per_block: u32,
    rng: &mut R,
) -> Vec<Connection> {
    let per_block = connections_per_block.min(num_blocks.saturating_sub(1)) as usize;
    let mut connectivity = Vec::with_capacity(num_blocks as usize * per_block);

    for i in 0..num_blocks {
        let mut connected = HashSet::with_capacity(per_block);
        while connected.len() < per_block {
            let j = rng.gen_range(0..num_blocks);
            if j != i && connected.insert(j) {
                connectivity.push(Connection::new(i, j));
            }
        }
    }

    connectivity
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blocks_have_sequential_ids_and_bounded_sides() {
        let mut rng = StdRng::seed_from_u64(1);
        let blocks = generate_sample_blocks(50, &mut rng);
        assert_eq!(blocks.len(), 50);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.id().as_raw(), i as u32);
            assert!((MIN_SAMPLE_DIMENSION..=MAX_SAMPLE_DIMENSION).contains(&block.width()));
            assert!((MIN_SAMPLE_DIMENSION..=MAX_SAMPLE_DIMENSION).contains(&block.height()));
        }
    }

    #[test]
    fn connectivity_has_distinct_partners() {
        let mut rng = StdRng::seed_from_u64(2);
        let connectivity = generate_sample_connectivity(10, 3, &mut rng);
        assert_eq!(connectivity.len(), 30);
        for i in 0..10 {
            let partners: HashSet<u32> = connectivity
                .iter()
                .filter(|c| c.0.as_raw() == i)
                .map(|c| c.1.as_raw())
                .collect();
            assert_eq!(partners.len(), 3);
            assert!(!partners.contains(&i));
        }
    }

    #[test]
    fn connectivity_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(generate_sample_connectivity(3, 10, &mut rng).len(), 6);
        assert!(generate_sample_connectivity(1, 3, &mut rng).is_empty());
        assert!(generate_sample_connectivity(0, 3, &mut rng).is_empty());
    }
}
