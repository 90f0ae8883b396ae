//! Coverage verification
//!
//! Checks that an offset sequence covers `[0, extent)` in block steps exactly once:
//! every offset aligned and in range, no duplicates, nothing missing.
//! Used on freshly generated sequences and on testset files read back from disk.

/// Why a sequence is not a complete coverage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageFault {
    /// Offset is not a multiple of the block size
    Misaligned { index: usize, offset: u64 },
    /// Offset lies at or beyond the extent
    OutOfRange { index: usize, offset: u64 },
    /// Offset appears more than once
    Duplicate { index: usize, offset: u64 },
    /// Offset of the first block never emitted
    Missing { offset: u64 },
}

/// Verification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageResult {
    /// Sequence is a permutation of the linear block set
    Complete,
    /// First fault found
    Incomplete(CoverageFault),
}

impl CoverageResult {
    pub fn is_complete(&self) -> bool {
        matches!(self, CoverageResult::Complete)
    }
}

impl std::fmt::Display for CoverageFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageFault::Misaligned { index, offset } => {
                write!(f, "offset {} at line {} is not block aligned", offset, index + 1)
            }
            CoverageFault::OutOfRange { index, offset } => {
                write!(f, "offset {} at line {} is beyond the extent", offset, index + 1)
            }
            CoverageFault::Duplicate { index, offset } => {
                write!(f, "offset {} at line {} appears more than once", offset, index + 1)
            }
            CoverageFault::Missing { offset } => write!(f, "offset {} is never emitted", offset),
        }
    }
}

/// Verify that `offsets` covers `[0, extent)` in `block_size` steps exactly once
///
/// Misalignment, range and duplicates are reported at the first offending position;
/// a short sequence is reported by its lowest missing offset. `block_size` must be
/// non-zero.
pub fn check_coverage(offsets: &[u64], extent: u64, block_size: u64) -> CoverageResult {
    assert!(block_size > 0, "block_size must be non-zero");

    let expected = extent / block_size;
    let mut seen = vec![false; expected as usize];

    for (index, &offset) in offsets.iter().enumerate() {
        if offset % block_size != 0 {
            return CoverageResult::Incomplete(CoverageFault::Misaligned { index, offset });
        }

        let block = offset / block_size;
        if block >= expected {
            return CoverageResult::Incomplete(CoverageFault::OutOfRange { index, offset });
        }

        let slot = &mut seen[block as usize];
        if *slot {
            return CoverageResult::Incomplete(CoverageFault::Duplicate { index, offset });
        }
        *slot = true;
    }

    match seen.iter().position(|&s| !s) {
        Some(block) => CoverageResult::Incomplete(CoverageFault::Missing {
            offset: block as u64 * block_size,
        }),
        None => CoverageResult::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete() {
        assert_eq!(check_coverage(&[8192, 0, 4096], 12288, 4096), CoverageResult::Complete);
        assert!(check_coverage(&[], 0, 4096).is_complete());
    }

    #[test]
    fn test_missing() {
        let result = check_coverage(&[0, 8192], 12288, 4096);
        assert_eq!(
            result,
            CoverageResult::Incomplete(CoverageFault::Missing { offset: 4096 })
        );
    }

    #[test]
    fn test_misaligned() {
        let result = check_coverage(&[0, 4095, 8192], 12288, 4096);
        assert_eq!(
            result,
            CoverageResult::Incomplete(CoverageFault::Misaligned { index: 1, offset: 4095 })
        );
    }

    #[test]
    fn test_out_of_range() {
        let result = check_coverage(&[0, 4096, 12288], 12288, 4096);
        assert_eq!(
            result,
            CoverageResult::Incomplete(CoverageFault::OutOfRange { index: 2, offset: 12288 })
        );
    }

    #[test]
    fn test_duplicate() {
        let result = check_coverage(&[0, 4096, 0], 12288, 4096);
        assert_eq!(
            result,
            CoverageResult::Incomplete(CoverageFault::Duplicate { index: 2, offset: 0 })
        );
    }

    #[test]
    fn test_fault_display() {
        let fault = CoverageFault::Duplicate { index: 2, offset: 0 };
        assert_eq!(fault.to_string(), "offset 0 at line 3 appears more than once");
    }
}
