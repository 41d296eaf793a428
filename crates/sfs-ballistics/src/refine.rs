//! Sub-step refinement of a surface crossing.

use glam::DVec2;

/// Earliest point where the segment `from -> to` enters the circle `|r|² = radius_sq`.
///
/// Half-`b` form of `|from + s·Δ|² = R²`: `a = |Δ|²`, `b = from·Δ`,
/// `c = |from|² − R²`, roots `(−b ∓ √(b² − a·c)) / a`. The smaller root
/// in `[0, 1]` wins. Returns `None` for a zero-length segment or a miss.
pub(crate) fn segment_circle_entry(from: DVec2, to: DVec2, radius_sq: f64) -> Option<DVec2> {
    let oc = from;
    let delta = to - from;
    let a = delta.length_squared();
    if a <= 0.0 {
        return None;
    }
    let b = oc.dot(delta);
    let c = oc.dot(oc) - radius_sq;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let (s_near, s_far) = ((-b - sqrt_disc) / a, (-b + sqrt_disc) / a);

    [s_near, s_far]
        .into_iter()
        .find(|s| (0.0..=1.0).contains(s))
        .map(|s| from + s * delta)
}
