use crate::Point;

/// Largest dimension a [`PointRegionQuadtree`](crate::PointRegionQuadtree) accepts.
/// Every node holds `2^dimension` child slots.
pub const MAX_QUADTREE_DIMENSION: usize = 16;

/// Number of child slots of a quadtree node in `dimension` dimensions
pub(crate) fn child_count(dimension: usize) -> usize {
    1 << dimension
}

/// Determine which child slot of `pivot` the point belongs under.
///
/// Bit `i` of the result is set when `point[i] >= pivot[i]`, so axis 0 is the
/// least significant bit. Slot 0 holds points smaller on every axis and slot
/// `2^d - 1` points greater-or-equal on every axis.
pub(crate) fn slot_index(point: &Point, pivot: &Point) -> usize {
    (0..pivot.dimension())
        .filter(|&i| point[i] >= pivot[i])
        .fold(0, |slot, i| slot | (1 << i))
}
