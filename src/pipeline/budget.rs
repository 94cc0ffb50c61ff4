//! Slide budget: how many chunks a document of a given length should yield.

/// Target used when the page count is unknown.
pub const UNKNOWN_PAGE_TARGET: usize = 10;
/// Truncation cap applied when the page count is unknown.
pub const DEFAULT_UNKNOWN_PAGE_CAP: usize = 30;
const MAX_TARGET: usize = 50;

/// Target slide count for a page count (`0` means unknown).
#[must_use]
pub fn target_count(page_count: u32) -> usize {
    let pages = page_count as usize;
    match pages {
        0 => UNKNOWN_PAGE_TARGET,
        1..=10 => (pages / 2).max(5),
        11..=30 => pages / 3,
        31..=100 => pages / 4,
        _ => (pages / 5).min(MAX_TARGET),
    }
}

/// Maximum number of chunks handed downstream.
#[must_use]
pub fn chunk_cap(page_count: u32, unknown_cap: usize) -> usize {
    if page_count == 0 {
        unknown_cap
    } else {
        target_count(page_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_values() {
        assert_eq!(target_count(0), 10);
        assert_eq!(target_count(1), 5);
        assert_eq!(target_count(10), 5);
        assert_eq!(target_count(12), 4);
        assert_eq!(target_count(30), 10);
        assert_eq!(target_count(45), 11);
        assert_eq!(target_count(100), 25);
        assert_eq!(target_count(101), 20);
        assert_eq!(target_count(250), 50);
        assert_eq!(target_count(10_000), 50);
    }

    #[test]
    fn monotonic_within_tiers() {
        for (lo, hi) in [(1u32, 10u32), (11, 30), (31, 100), (101, 1000)] {
            for n in lo..hi {
                assert!(target_count(n) <= target_count(n + 1), "tier break at {n}");
            }
        }
    }

    #[test]
    fn cap_uses_fixed_value_for_unknown_pages() {
        assert_eq!(chunk_cap(0, DEFAULT_UNKNOWN_PAGE_CAP), 30);
        assert_eq!(chunk_cap(0, 7), 7);
        assert_eq!(chunk_cap(45, DEFAULT_UNKNOWN_PAGE_CAP), 11);
    }
}
