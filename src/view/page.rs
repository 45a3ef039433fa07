//! Page math: totals, slice bounds, and the caller-side clamp.

use std::ops::Range;

/// Number of pages a filtered count occupies.
///
/// An empty result still has one (empty) page, so pagination UI never
/// divides by zero. `page_size` must be positive.
pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    assert!(page_size > 0, "page_size must be positive");
    filtered_count.div_ceil(page_size).max(1)
}

/// Index range of a 1-based page within a list of `len` items.
///
/// A page past the end yields an empty range rather than an error; the
/// pipeline does not clamp on behalf of the caller.
pub fn slice_bounds(page: usize, page_size: usize, len: usize) -> Range<usize> {
    assert!(page >= 1, "pages are 1-based");
    assert!(page_size > 0, "page_size must be positive");
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// Clamp a 1-based page into `[1, total_pages]`.
///
/// Callers (the dashboard after a refetch, the list command on user input)
/// use this; the pipeline itself renders out-of-range pages as empty.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.max(1).min(total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(31, 10), 4);
    }

    #[test]
    fn test_empty_count_is_one_page() {
        assert_eq!(total_pages(0, 10), 1);
    }

    #[test]
    fn test_slice_bounds_last_partial_page() {
        assert_eq!(slice_bounds(3, 10, 25), 20..25);
    }

    #[test]
    fn test_slice_bounds_past_end_is_empty() {
        let range = slice_bounds(4, 10, 25);
        assert!(range.is_empty());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    #[should_panic(expected = "page_size must be positive")]
    fn test_zero_page_size_panics() {
        total_pages(10, 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every page's bounds stay inside the list.
        #[test]
        fn slice_bounds_within_len(
            page in 1usize..100,
            page_size in 1usize..50,
            len in 0usize..1000
        ) {
            let range = slice_bounds(page, page_size, len);
            prop_assert!(range.start <= range.end);
            prop_assert!(range.end <= len);
            prop_assert!(range.end - range.start <= page_size);
        }

        /// Property: pages tile the list exactly - no gaps, no overlap.
        #[test]
        fn pages_tile_the_list(
            page_size in 1usize..50,
            len in 0usize..1000
        ) {
            let pages = total_pages(len, page_size);
            let mut covered = 0;
            for page in 1..=pages {
                let range = slice_bounds(page, page_size, len);
                prop_assert_eq!(range.start, covered);
                covered = range.end;
            }
            prop_assert_eq!(covered, len);
        }

        /// Property: clamp output is always a renderable page.
        #[test]
        fn clamp_always_in_range(
            page in 0usize..10000,
            total in 0usize..1000
        ) {
            let clamped = clamp_page(page, total);
            prop_assert!(clamped >= 1);
            prop_assert!(clamped <= total.max(1));
        }
    }
}
