//! Deterministic cell orderings over the search cube.

use crate::config::ScanOrder;

/// Offsets `(dx, dy, dz)` covering the cube of the given half-width, in `order`.
///
/// Every offset with all components in `-half..=half` is yielded exactly once.
pub fn offsets(half: i32, order: ScanOrder) -> Box<dyn Iterator<Item = (i32, i32, i32)>> {
    match order {
        ScanOrder::CenterOut => Box::new((0..=half).flat_map(ring)),
        ScanOrder::Linear => Box::new((-half..=half).flat_map(move |dx| {
            (-half..=half).flat_map(move |dy| (-half..=half).map(move |dz| (dx, dy, dz)))
        })),
    }
}

/// Cells at Chebyshev distance exactly `r`, lexicographic in `(dx, dy, dz)`.
fn ring(r: i32) -> impl Iterator<Item = (i32, i32, i32)> {
    (-r..=r).flat_map(move |dx| {
        (-r..=r).flat_map(move |dy| {
            // Off the x/y faces only the two z caps belong to the ring.
            let on_face = dx.abs() == r || dy.abs() == r;
            let step = if on_face { 1 } else { (2 * r) as usize };
            (-r..=r).step_by(step).map(move |dz| (dx, dy, dz))
        })
    })
}
