//! Linear access pattern
//!
//! Emits blocks in ascending order: block `i` at offset `i * block_size`.

use super::{BlockPlan, Pattern};
use rand::RngCore;

/// Ascending block order; consumes no randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Pattern for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn order(&self, plan: &BlockPlan, _rng: &mut dyn RngCore) -> Vec<u64> {
        plan.linear_offsets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Geometry, RandomSource, Strategy};

    #[test]
    fn test_linear_ascending() {
        let plan = BlockPlan::new(Strategy::Linear, 1024 * 1024, 4096, Geometry::default()).unwrap();
        let mut rng = RandomSource::Entropy.into_rng();
        let offsets = Linear.order(&plan, &mut rng);

        assert_eq!(offsets.len(), 256);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[255], 255 * 4096);
        assert!(offsets.windows(2).all(|w| w[1] == w[0] + 4096));
    }

    #[test]
    fn test_linear_ignores_page_alignment() {
        // 12K blocks do not divide 32K pages; linear does not care
        let plan = BlockPlan::new(Strategy::Linear, 3 * 12288, 12288, Geometry::default()).unwrap();
        let mut rng = RandomSource::Seeded(1).into_rng();
        assert_eq!(Linear.order(&plan, &mut rng), vec![0, 12288, 24576]);
    }

    #[test]
    fn test_linear_deterministic_without_seed() {
        let plan = BlockPlan::new(Strategy::Linear, 64 * 4096, 4096, Geometry::default()).unwrap();
        let a = Linear.order(&plan, &mut RandomSource::Entropy.into_rng());
        let b = Linear.order(&plan, &mut RandomSource::Entropy.into_rng());
        assert_eq!(a, b);
    }
}
