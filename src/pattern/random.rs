//! Uniform random access pattern
//!
//! Shuffles the linear order with `SliceRandom::shuffle`, an unbiased Fisher-Yates
//! shuffle, so every permutation of the block set is equally likely.

use super::{BlockPlan, Pattern};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Uniform permutation of all blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct Random;

impl Pattern for Random {
    fn name(&self) -> &'static str {
        "random"
    }

    fn order(&self, plan: &BlockPlan, rng: &mut dyn RngCore) -> Vec<u64> {
        let mut offsets = plan.linear_offsets();
        offsets.shuffle(rng);
        offsets
    }
}
