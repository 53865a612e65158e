use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;
use smallvec::SmallVec;

use crate::*;

/// Builds the mine layout for a fresh game once the first reveal is known.
pub trait MinePlacer {
    fn place(&mut self, config: GameConfig, first_reveal: Pos) -> MineLayout;
}

/// Seeded placement that samples the cells outside the safe zone without
/// replacement, so it terminates unconditionally.
#[derive(Clone, Debug)]
pub struct ShufflePlacer {
    rng: SmallRng,
}

impl ShufflePlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinePlacer for ShufflePlacer {
    fn place(&mut self, config: GameConfig, first_reveal: Pos) -> MineLayout {
        let size = config.size;
        let zone: SmallVec<[Pos; 9]> = safe_zone(first_reveal, size).collect();

        let mut eligible: Vec<Pos> = Vec::with_capacity(config.total_cells() as usize);
        for row in 0..size.0 {
            for col in 0..size.1 {
                let pos = (row, col);
                if !zone.contains(&pos) {
                    eligible.push(pos);
                }
            }
        }

        let mut mines = config.mines as usize;
        if mines > eligible.len() {
            log::warn!(
                "requested {} mines but only {} cells sit outside the safe zone, placing {}",
                mines,
                eligible.len(),
                eligible.len()
            );
            mines = eligible.len();
        }

        let mut mask: Array2<bool> = Array2::default(nd(size));
        for pick in index::sample(&mut self.rng, eligible.len(), mines) {
            mask[nd(eligible[pick])] = true;
        }
        log::debug!(
            "placed {} mines on {}x{} avoiding {} cells around {:?}",
            mines,
            size.0,
            size.1,
            zone.len(),
            first_reveal
        );
        MineLayout::from_mine_mask(mask)
    }
}
