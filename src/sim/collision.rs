//! Collision detection for circles and camera-relative bounds
//!
//! Everything in the arena is a circle. Two entities touch when the distance
//! between their centers is strictly less than the reach (sum of radii, or a
//! single size where only one side has a visual extent).

use glam::Vec2;

use crate::consts::{SCREEN_CENTER, SCREEN_SIZE};

/// Circle-circle overlap test with an explicit reach
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}

/// Whether a world position is inside the screen box around the camera
#[inline]
pub fn on_screen(pos: Vec2, camera: Vec2) -> bool {
    let screen = pos - camera + Vec2::splat(SCREEN_CENTER);
    (0.0..=SCREEN_SIZE).contains(&screen.x) && (0.0..=SCREEN_SIZE).contains(&screen.y)
}

/// Whether a world position is beyond the screen plus a margin on either axis
#[inline]
pub fn beyond_margin(pos: Vec2, camera: Vec2, margin: f32) -> bool {
    let delta = (pos - camera).abs();
    let limit = SCREEN_CENTER + margin;
    delta.x > limit || delta.y > limit
}

/// Index of the first position in `candidates` that touches `pos`, skipping
/// entries already marked as removed
pub fn first_touching<I>(pos: Vec2, reach: f32, candidates: I, removed: &[bool]) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    candidates
        .into_iter()
        .enumerate()
        .find(|&(i, other)| !removed.get(i).copied().unwrap_or(false) && circles_touch(pos, other, reach))
        .map(|(i, _)| i)
}

/// Index and distance of the nearest position within `range`
pub fn nearest_within<I>(pos: Vec2, range: f32, candidates: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = Vec2>,
{
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, other)| (i, pos.distance(other)))
        .filter(|&(_, dist)| dist <= range)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_touch_is_strict() {
        assert!(circles_touch(Vec2::ZERO, Vec2::new(7.9, 0.0), 8.0));
        assert!(!circles_touch(Vec2::ZERO, Vec2::new(8.0, 0.0), 8.0));
        assert!(circles_touch(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.1));
    }

    #[test]
    fn test_on_screen_follows_camera() {
        let camera = Vec2::new(1000.0, 1000.0);
        assert!(on_screen(camera, camera));
        assert!(on_screen(camera + Vec2::new(128.0, -128.0), camera));
        assert!(!on_screen(camera + Vec2::new(129.0, 0.0), camera));
        assert!(!on_screen(Vec2::ZERO, camera));
    }

    #[test]
    fn test_beyond_margin() {
        assert!(!beyond_margin(Vec2::new(300.0, 0.0), Vec2::ZERO, 256.0));
        assert!(beyond_margin(Vec2::new(0.0, -385.0), Vec2::ZERO, 256.0));
    }

    #[test]
    fn test_first_touching_skips_removed() {
        let others = [Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(50.0, 0.0)];
        let removed = [true, false, false];
        assert_eq!(first_touching(Vec2::ZERO, 8.0, others, &removed), Some(1));

        let removed = [true, true, false];
        assert_eq!(first_touching(Vec2::ZERO, 8.0, others, &removed), None);
    }

    #[test]
    fn test_nearest_within() {
        let others = [Vec2::new(30.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(200.0, 0.0)];
        let (idx, dist) = nearest_within(Vec2::ZERO, 100.0, others).unwrap();
        assert_eq!(idx, 1);
        assert!((dist - 10.0).abs() < 1e-5);
        assert!(nearest_within(Vec2::ZERO, 5.0, others).is_none());
    }
}
