//! Allocation policies.
//!
//! Every policy carves the request from the low end of the range it picks,
//! so the returned offset is that range's old `start`. They differ only in
//! which range they pick:
//!
//! - [`FirstFit`]: the first range in list order that is large enough.
//! - [`BestFit`]: the smallest range that is large enough.
//! - [`WorstFit`]: the largest range.
//!
//! Ties go to the earliest entry, so on a sorted list every policy is
//! deterministic and prefers lower addresses.

use memops_core::{AllocationStrategy, FreeRange};

/// Shrink `range` to `[start + block_size, end)` and return the old start.
#[inline]
fn carve(range: &mut FreeRange, block_size: u32) -> u32 {
    let offset = range.start();
    *range = range.with_start(offset + block_size);
    offset
}

/// Take the first range that fits.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFit;

impl AllocationStrategy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32> {
        let range = free_ranges.iter_mut().find(|r| r.len() >= block_size)?;
        Some(carve(range, block_size))
    }
}

/// Take the smallest range that fits, stopping early on an exact fit.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestFit;

impl AllocationStrategy for BestFit {
    fn name(&self) -> &'static str {
        "best-fit"
    }

    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32> {
        let mut best: Option<(usize, u32)> = None;
        for (i, r) in free_ranges.iter().enumerate() {
            let len = r.len();
            if len < block_size {
                continue;
            }
            if len == block_size {
                best = Some((i, len));
                break;
            }
            if best.is_none_or(|(_, best_len)| len < best_len) {
                best = Some((i, len));
            }
        }
        let (index, _) = best?;
        Some(carve(&mut free_ranges[index], block_size))
    }
}

/// Take the largest range, leaving the biggest possible remainder.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorstFit;

impl AllocationStrategy for WorstFit {
    fn name(&self) -> &'static str {
        "worst-fit"
    }

    fn try_allocate(&self, block_size: u32, free_ranges: &mut [FreeRange]) -> Option<u32> {
        let mut worst: Option<(usize, u32)> = None;
        for (i, r) in free_ranges.iter().enumerate() {
            let len = r.len();
            if len >= block_size && worst.is_none_or(|(_, worst_len)| len > worst_len) {
                worst = Some((i, len));
            }
        }
        let (index, _) = worst?;
        Some(carve(&mut free_ranges[index], block_size))
    }
}

/// The policy allocators start with.
pub fn default_strategy() -> Box<dyn AllocationStrategy> {
    Box::new(FirstFit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<FreeRange> {
        vec![
            FreeRange::new(0, 40),
            FreeRange::new(50, 60),
            FreeRange::new(70, 170),
            FreeRange::new(200, 220),
        ]
    }

    #[test]
    fn first_fit_takes_first_large_enough() {
        let mut r = ranges();
        assert_eq!(FirstFit.try_allocate(15, &mut r), Some(0));
        assert_eq!(r[0], FreeRange::new(15, 40));
        assert_eq!(FirstFit.try_allocate(30, &mut r), Some(70));
        assert_eq!(r[2], FreeRange::new(100, 170));
    }

    #[test]
    fn first_fit_only_mutates_chosen_range() {
        let mut r = ranges();
        FirstFit.try_allocate(50, &mut r).unwrap();
        assert_eq!(r[0], FreeRange::new(0, 40));
        assert_eq!(r[1], FreeRange::new(50, 60));
        assert_eq!(r[2], FreeRange::new(120, 170));
        assert_eq!(r[3], FreeRange::new(200, 220));
    }

    #[test]
    fn first_fit_leaves_exhausted_range_in_place() {
        let mut r = ranges();
        assert_eq!(FirstFit.try_allocate(40, &mut r), Some(0));
        assert_eq!(r[0], FreeRange::new(40, 40));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn first_fit_scans_in_list_order_not_address_order() {
        let mut r = vec![FreeRange::new(500, 600), FreeRange::new(0, 100)];
        assert_eq!(FirstFit.try_allocate(10, &mut r), Some(500));
    }

    #[test]
    fn best_fit_takes_smallest_sufficient() {
        let mut r = ranges();
        assert_eq!(BestFit.try_allocate(15, &mut r), Some(200));
        assert_eq!(r[3], FreeRange::new(215, 220));
    }

    #[test]
    fn best_fit_prefers_exact_fit() {
        let mut r = ranges();
        assert_eq!(BestFit.try_allocate(10, &mut r), Some(50));
        assert!(r[1].is_empty());
    }

    #[test]
    fn best_fit_ties_go_to_first() {
        let mut r = vec![FreeRange::new(0, 30), FreeRange::new(100, 130)];
        assert_eq!(BestFit.try_allocate(20, &mut r), Some(0));
    }

    #[test]
    fn worst_fit_takes_largest() {
        let mut r = ranges();
        assert_eq!(WorstFit.try_allocate(5, &mut r), Some(70));
        assert_eq!(r[2], FreeRange::new(75, 170));
    }

    #[test]
    fn worst_fit_ties_go_to_first() {
        let mut r = vec![FreeRange::new(0, 30), FreeRange::new(100, 130)];
        assert_eq!(WorstFit.try_allocate(20, &mut r), Some(0));
    }

    #[test]
    fn all_policies_fail_when_nothing_fits() {
        let policies: [&dyn AllocationStrategy; 3] = [&FirstFit, &BestFit, &WorstFit];
        for p in policies {
            let mut r = ranges();
            assert_eq!(p.try_allocate(101, &mut r), None, "{}", p.name());
            assert_eq!(r, ranges(), "{} mutated on failure", p.name());
        }
    }

    #[test]
    fn empty_list_fails() {
        assert_eq!(FirstFit.try_allocate(1, &mut []), None);
        assert_eq!(BestFit.try_allocate(1, &mut []), None);
        assert_eq!(WorstFit.try_allocate(1, &mut []), None);
    }

    #[test]
    fn high_offsets_carve_without_overflow() {
        let mut r = vec![FreeRange::new(u32::MAX - 10, u32::MAX)];
        assert_eq!(FirstFit.try_allocate(10, &mut r), Some(u32::MAX - 10));
        assert_eq!(r[0], FreeRange::new(u32::MAX, u32::MAX));
    }
}
