//! Auto-fit search: find the largest integer font size satisfying a size
//! constraint, using only a measurement oracle.
//!
//! Both strategies are generic over a `FnMut(u32) -> (u32, u32)` closure
//! mapping a font size to measured `(width, height)`; they never touch
//! pixels or fonts themselves. The oracle may be expensive. Neither search
//! caches, but an integrating caller measuring the same (text, font, size)
//! repeatedly can memoize at its level.
//!
//! Searches never fail; they always return a usable (possibly minimum)
//! result.

use tracing::trace;

/// Lower bound of the row-height binary search.
pub const MIN_SEARCH_SIZE: u32 = 4;
/// Upper bound of the row-height binary search (at most 9 probes).
pub const MAX_SEARCH_SIZE: u32 = 300;

/// Ceiling for the growth search. Only reachable with an oracle that never
/// overflows the box; with any monotonic real-font measurer the search stops
/// far below it.
const GROWTH_CEILING: u32 = 8192;

/// Largest integer font size whose measured text fits inside
/// `max_width x max_height`, floored at 1.
///
/// Linear growth from size 1: measure at increasing sizes and step back one
/// the moment either dimension exceeds the box. Assuming `measure` is
/// monotonic non-decreasing in size, the result is the exact maximum.
///
/// # Example
///
/// ```
/// use rastergrid::fit::fit_to_box;
///
/// // Stub: each size unit is 7px wide and 2px tall.
/// let size = fit_to_box(|s| (s * 7, s * 2), 100, 50);
/// assert_eq!(size, 14); // 14*7 = 98 <= 100, 15*7 = 105 > 100
/// ```
pub fn fit_to_box(mut measure: impl FnMut(u32) -> (u32, u32), max_width: u32, max_height: u32) -> u32 {
    let mut size = 1;
    loop {
        let (w, h) = measure(size);
        if w > max_width || h > max_height {
            let fitted = (size - 1).max(1);
            trace!(fitted, max_width, max_height, "growth search done");
            return fitted;
        }
        if size >= GROWTH_CEILING {
            trace!(size, "growth search hit ceiling");
            return size;
        }
        size += 1;
    }
}

/// Tallest measured height among font sizes in `[4, 300]` whose measured
/// width fits `max_width`, or 0 when no size fits.
///
/// Binary search on width; width is the binding constraint and height is
/// read off whichever size the width constraint selects, so the two
/// dimensions are deliberately not required to be jointly monotonic.
pub fn tallest_fitting_height(mut measure: impl FnMut(u32) -> (u32, u32), max_width: u32) -> u32 {
    let mut lo = MIN_SEARCH_SIZE;
    let mut hi = MAX_SEARCH_SIZE;
    let mut best_height = 0;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        let (w, h) = measure(mid);
        if w <= max_width {
            best_height = h;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    trace!(best_height, max_width, "row height search done");
    best_height
}
