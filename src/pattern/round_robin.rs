//! Channel-interleaved access patterns
//!
//! All three patterns first split the linear block set into one lane per channel
//! using [`Geometry::channel_of`](super::Geometry::channel_of), then emit the lanes
//! round-robin: next item from channel 0, then channel 1, and so on. When the extent
//! is not channel aligned some lanes run out early; exhausted lanes are skipped in
//! later cycles instead of leaving a gap.
//!
//! The patterns differ in how each lane is ordered before interleaving:
//!
//! - `RoundRobinSequential`: ascending
//! - `RoundRobinRandom`: shuffled block by block
//! - `RoundRobinPerPages`: shuffled page run by page run, and a whole run is emitted
//!   per channel turn so page locality survives the interleave

use super::{BlockPlan, Pattern};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Split the linear offsets into one ascending lane per channel
pub fn partition_by_channel(plan: &BlockPlan) -> Vec<Vec<u64>> {
    let geometry = plan.geometry();
    let per_lane = plan.block_count() / geometry.channels + 1;
    let mut lanes: Vec<Vec<u64>> = (0..geometry.channels)
        .map(|_| Vec::with_capacity(per_lane))
        .collect();

    for offset in plan.linear_offsets() {
        lanes[geometry.channel_of(offset)].push(offset);
    }
    lanes
}

/// Emit lanes round-robin, skipping exhausted lanes
pub fn interleave<T>(lanes: Vec<Vec<T>>) -> Vec<T> {
    let total = lanes.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    let mut lanes: Vec<_> = lanes.into_iter().map(Vec::into_iter).collect();

    while out.len() < total {
        for lane in lanes.iter_mut() {
            if let Some(item) = lane.next() {
                out.push(item);
            }
        }
    }
    out
}

/// Group an ascending lane into runs of offsets sharing a page
///
/// A run holds `page_size / block_size` blocks, except for a trailing partial page.
pub fn page_runs(plan: &BlockPlan, lane: Vec<u64>) -> Vec<Vec<u64>> {
    let geometry = plan.geometry();
    let run_len = plan.blocks_per_page() as usize;
    let mut runs: Vec<Vec<u64>> = Vec::new();

    for offset in lane {
        match runs.last_mut() {
            Some(run) if geometry.page_of(run[0]) == geometry.page_of(offset) => run.push(offset),
            _ => {
                let mut run = Vec::with_capacity(run_len);
                run.push(offset);
                runs.push(run);
            }
        }
    }
    runs
}

/// Round-robin over ascending channel lanes
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinSequential;

impl Pattern for RoundRobinSequential {
    fn name(&self) -> &'static str {
        "round_robin_sequential"
    }

    fn is_channel_striped(&self) -> bool {
        true
    }

    fn order(&self, plan: &BlockPlan, _rng: &mut dyn RngCore) -> Vec<u64> {
        interleave(partition_by_channel(plan))
    }
}

/// Round-robin over independently shuffled channel lanes
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinRandom;

impl Pattern for RoundRobinRandom {
    fn name(&self) -> &'static str {
        "round_robin_random"
    }

    fn is_channel_striped(&self) -> bool {
        true
    }

    fn order(&self, plan: &BlockPlan, rng: &mut dyn RngCore) -> Vec<u64> {
        let mut lanes = partition_by_channel(plan);
        for lane in lanes.iter_mut() {
            lane.shuffle(rng);
        }
        interleave(lanes)
    }
}

/// Round-robin over whole page runs, runs shuffled per channel
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinPerPages;

impl Pattern for RoundRobinPerPages {
    fn name(&self) -> &'static str {
        "round_robin_per_pages"
    }

    fn is_channel_striped(&self) -> bool {
        true
    }

    fn order(&self, plan: &BlockPlan, rng: &mut dyn RngCore) -> Vec<u64> {
        let mut lanes = Vec::with_capacity(plan.geometry().channels);
        for lane in partition_by_channel(plan) {
            let mut runs = page_runs(plan, lane);
            runs.shuffle(rng);
            lanes.push(runs);
        }

        interleave(lanes).into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Geometry, RandomSource, Strategy};

    const PAGE: u64 = 32768;
    const BS: u64 = 4096;

    fn plan(strategy: Strategy, extent: u64) -> BlockPlan {
        BlockPlan::new(strategy, extent, BS, Geometry::default()).unwrap()
    }

    fn channels(offsets: &[u64]) -> Vec<usize> {
        let geometry = Geometry::default();
        offsets.iter().map(|&o| geometry.channel_of(o)).collect()
    }

    fn lane(offsets: &[u64], channel: usize) -> Vec<u64> {
        let geometry = Geometry::default();
        offsets
            .iter()
            .copied()
            .filter(|&o| geometry.channel_of(o) == channel)
            .collect()
    }

    #[test]
    fn test_partition_by_channel() {
        let lanes = partition_by_channel(&plan(Strategy::RoundRobinSequential, 8 * PAGE));
        assert_eq!(lanes.len(), 4);
        for (channel, lane) in lanes.iter().enumerate() {
            assert_eq!(lane.len(), 16);
            assert_eq!(lane[0], channel as u64 * PAGE);
            assert_eq!(lane[8], (channel as u64 + 4) * PAGE);
        }
    }

    #[test]
    fn test_interleave_skips_exhausted_lanes() {
        let lanes = vec![vec![1, 2, 3], vec![10], vec![], vec![30, 31]];
        assert_eq!(interleave(lanes), vec![1, 10, 30, 2, 31, 3]);
    }

    #[test]
    fn test_round_robin_sequential_first_cycle() {
        let offsets = RoundRobinSequential.order(
            &plan(Strategy::RoundRobinSequential, 8 * PAGE),
            &mut RandomSource::Entropy.into_rng(),
        );

        assert_eq!(offsets.len(), 64);
        assert_eq!(&offsets[..4], &[0, PAGE, 2 * PAGE, 3 * PAGE]);
        assert_eq!(&offsets[4..8], &[BS, PAGE + BS, 2 * PAGE + BS, 3 * PAGE + BS]);

        for channel in 0..4 {
            let own = lane(&offsets, channel);
            assert!(own.windows(2).all(|w| w[0] < w[1]), "channel {} not ascending", channel);
        }
    }

    #[test]
    fn test_round_robin_sequential_unequal_channels() {
        // 5 pages: channel 0 owns pages 0 and 4, the rest own one page each
        let offsets = RoundRobinSequential.order(
            &plan(Strategy::RoundRobinSequential, 5 * PAGE),
            &mut RandomSource::Entropy.into_rng(),
        );

        assert_eq!(offsets.len(), 40);
        assert_eq!(channels(&offsets[..32]), [0usize, 1, 2, 3].repeat(8));
        let tail: Vec<u64> = (0..8).map(|i| 4 * PAGE + i * BS).collect();
        assert_eq!(&offsets[32..], tail.as_slice());
    }

    #[test]
    fn test_round_robin_sequential_partial_page() {
        // 9 blocks: a full page on channel 0 plus one block on channel 1
        let offsets = RoundRobinSequential.order(
            &plan(Strategy::RoundRobinSequential, 9 * BS),
            &mut RandomSource::Entropy.into_rng(),
        );
        assert_eq!(offsets[..3], [0, PAGE, BS]);
        assert_eq!(offsets.len(), 9);
    }

    #[test]
    fn test_round_robin_random_keeps_channel_rotation() {
        let offsets = RoundRobinRandom.order(
            &plan(Strategy::RoundRobinRandom, 8 * PAGE),
            &mut RandomSource::Seeded(9).into_rng(),
        );

        assert_eq!(channels(&offsets), [0usize, 1, 2, 3].repeat(16));

        let mut shuffled = false;
        for channel in 0..4 {
            let own = lane(&offsets, channel);
            if own.windows(2).any(|w| w[0] > w[1]) {
                shuffled = true;
            }
        }
        assert!(shuffled, "no channel lane was shuffled");
    }

    #[test]
    fn test_round_robin_random_unequal_channels() {
        let offsets = RoundRobinRandom.order(
            &plan(Strategy::RoundRobinRandom, 5 * PAGE),
            &mut RandomSource::Seeded(4).into_rng(),
        );
        assert_eq!(channels(&offsets[..32]), [0usize, 1, 2, 3].repeat(8));
        assert!(channels(&offsets[32..]).iter().all(|&c| c == 0));
    }

    #[test]
    fn test_page_runs() {
        let plan = plan(Strategy::RoundRobinPerPages, 9 * PAGE + 2 * BS);
        let lanes = partition_by_channel(&plan);

        let runs = page_runs(&plan, lanes[0].clone());
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].len(), 8);
        assert_eq!(runs[1][0], 4 * PAGE);

        let runs = page_runs(&plan, lanes[1].clone());
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[2], vec![9 * PAGE, 9 * PAGE + BS]);
    }

    #[test]
    fn test_round_robin_per_pages_emits_whole_pages() {
        let extent = 16 * PAGE;
        let offsets = RoundRobinPerPages.order(
            &plan(Strategy::RoundRobinPerPages, extent),
            &mut RandomSource::Seeded(21).into_rng(),
        );
        assert_eq!(offsets.len(), 128);

        let geometry = Geometry::default();
        let mut page_order = Vec::new();
        for run in offsets.chunks(8) {
            let page = geometry.page_of(run[0]);
            assert!(run.iter().all(|&o| geometry.page_of(o) == page), "run split across pages");
            assert!(run.windows(2).all(|w| w[1] == w[0] + BS), "run not contiguous");
            page_order.push(page);
        }

        let page_channels: Vec<u64> = page_order.iter().map(|p| p % 4).collect();
        assert_eq!(page_channels, [0u64, 1, 2, 3].repeat(4));

        let mut sorted_pages = page_order.clone();
        sorted_pages.sort_unstable();
        assert_eq!(sorted_pages, (0..16).collect::<Vec<u64>>());
        assert_ne!(page_order, sorted_pages, "pages were not shuffled");
    }
}
