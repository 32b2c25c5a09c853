//! Collision and range predicates
//!
//! Everything in the game is a circle: units, the town centre, blast and
//! field radii. Contact is strict overlap; range checks are inclusive.

use glam::DVec2;

/// True if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_touch(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// True if `point` lies within `range` of `centre` (edge included)
#[inline]
pub fn within_range(point: DVec2, centre: DVec2, range: f64) -> bool {
    point.distance(centre) <= range
}

/// Key and distance of the candidate closest to `origin`.
///
/// Ties keep the first candidate found.
pub fn nearest<K, I>(origin: DVec2, candidates: I) -> Option<(K, f64)>
where
    I: IntoIterator<Item = (K, DVec2)>,
{
    candidates
        .into_iter()
        .map(|(key, p)| (key, origin.distance(p)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_touch_is_strict() {
        assert!(circles_touch(DVec2::ZERO, 10.0, DVec2::new(19.9, 0.0), 10.0));
        assert!(!circles_touch(DVec2::ZERO, 10.0, DVec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_within_range_is_inclusive() {
        assert!(within_range(DVec2::new(0.0, 100.0), DVec2::ZERO, 100.0));
        assert!(!within_range(DVec2::new(0.0, 100.01), DVec2::ZERO, 100.0));
    }

    #[test]
    fn test_nearest_picks_closest_and_first_on_tie() {
        let points = [
            (0, DVec2::new(30.0, 0.0)),
            (1, DVec2::new(0.0, 10.0)),
            (2, DVec2::new(-10.0, 0.0)),
        ];
        assert_eq!(nearest(DVec2::ZERO, points), Some((1, 10.0)));
        assert_eq!(nearest::<u32, _>(DVec2::ZERO, std::iter::empty()), None);
    }
}
