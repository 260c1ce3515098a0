//! Ray and proximity tests between the player and enemies
//!
//! The laser is a hit-scan: one ray per firing frame against every enemy's
//! box, nearest hit wins.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geometry::{Rect, View, direction_to};
use super::state::Enemy;

/// Rays closer to parallel than this never cross a slab
const PARALLEL_EPSILON: f32 = 1e-4;

/// Slab test of a ray against an axis-aligned box
///
/// Returns the distance along `dir` (unit length) to the entry point. A ray
/// starting inside the box hits at distance 0.
pub fn ray_aabb(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<f32> {
    let mut tmin = 0.0_f32;
    let mut tmax = f32::INFINITY;

    for axis in 0..2 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (rect.min[axis], rect.max[axis]);

        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (lo - o) * inv;
        let mut t2 = (hi - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        tmin = tmin.max(t1);
        tmax = tmax.min(t2);
        if tmin > tmax {
            return None;
        }
    }

    Some(tmin)
}

/// Outcome of one hit-scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitScan {
    /// Beam length: distance to the struck enemy, or the cap on a miss
    pub length: f32,
    /// Index of the struck enemy
    pub target: Option<usize>,
}

/// Cast a beam and pick the nearest enemy closer than `max_len`
pub fn hit_scan(origin: Vec2, dir: Vec2, enemies: &[Enemy], max_len: f32) -> HitScan {
    let mut best = HitScan {
        length: max_len,
        target: None,
    };
    for (i, enemy) in enemies.iter().enumerate() {
        if let Some(t) = ray_aabb(origin, dir, &enemy.bounds())
            && t < best.length
        {
            best = HitScan {
                length: t,
                target: Some(i),
            };
        }
    }
    best
}

/// A point on the band just outside the view
///
/// A coin flip picks a vertical or horizontal edge, a second picks which of
/// the pair, and the position along the edge is uniform over the view plus
/// the margin on both ends.
pub fn respawn_point(view: &View, margin: f32, rng: &mut Pcg32) -> Vec2 {
    let tight = view.bounds(0.0);
    let loose = tight.expand(margin);
    let along = |rng: &mut Pcg32, lo: f32, hi: f32| {
        if hi > lo { rng.random_range(lo..=hi) } else { lo }
    };

    if rng.random_bool(0.5) {
        // Left or right edge
        let x = if rng.random_bool(0.5) { loose.min.x } else { loose.max.x };
        Vec2::new(x, along(rng, loose.min.y, loose.max.y))
    } else {
        let y = if rng.random_bool(0.5) { loose.min.y } else { loose.max.y };
        Vec2::new(along(rng, loose.min.x, loose.max.x), y)
    }
}

/// An off-screen enemy the player is flying away from fast enough to lose
pub fn should_recycle(
    enemy_pos: Vec2,
    tight_view: &Rect,
    player_pos: Vec2,
    player_vel: Vec2,
    min_speed: f32,
) -> bool {
    !tight_view.contains(enemy_pos)
        && player_vel.length_squared() > min_speed * min_speed
        && player_vel.dot(enemy_pos - player_pos) < 0.0
}

/// Displacement pushing an enemy straight away from the player
#[inline]
pub fn repulsion(enemy_pos: Vec2, player_pos: Vec2, force: f32, dt: f32) -> Vec2 {
    direction_to(player_pos, enemy_pos) * force * dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnemyTuning;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), &EnemyTuning::default())
    }

    #[test]
    fn test_ray_hits_box_ahead() {
        let rect = Rect::from_center_size(Vec2::new(100.0, 0.0), Vec2::splat(20.0));
        let t = ray_aabb(Vec2::ZERO, Vec2::X, &rect).unwrap();
        assert!((t - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_misses_box_behind_or_aside() {
        let rect = Rect::from_center_size(Vec2::new(-100.0, 0.0), Vec2::splat(20.0));
        assert_eq!(ray_aabb(Vec2::ZERO, Vec2::X, &rect), None);
        let rect = Rect::from_center_size(Vec2::new(100.0, 50.0), Vec2::splat(20.0));
        assert_eq!(ray_aabb(Vec2::ZERO, Vec2::X, &rect), None);
    }

    #[test]
    fn test_ray_from_inside_hits_at_zero() {
        let rect = Rect::from_center_size(Vec2::ZERO, Vec2::splat(20.0));
        assert_eq!(ray_aabb(Vec2::ZERO, Vec2::Y, &rect), Some(0.0));
    }

    #[test]
    fn test_diagonal_ray() {
        let rect = Rect::from_center_size(Vec2::new(100.0, 100.0), Vec2::splat(20.0));
        let dir = Vec2::ONE.normalize();
        let t = ray_aabb(Vec2::ZERO, dir, &rect).unwrap();
        assert!((t - 90.0 * std::f32::consts::SQRT_2).abs() < 1e-2);
    }

    #[test]
    fn test_hit_scan_picks_nearest() {
        // Box near faces at 300, 150 and 500 along +x
        let half = 36.0;
        let enemies = vec![
            enemy_at(300.0 + half, 0.0),
            enemy_at(150.0 + half, 0.0),
            enemy_at(500.0 + half, 0.0),
        ];
        let hit = hit_scan(Vec2::ZERO, Vec2::X, &enemies, 2000.0);
        assert_eq!(hit.target, Some(1));
        assert!((hit.length - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_scan_miss_extends_to_cap() {
        let enemies = vec![enemy_at(0.0, 500.0)];
        let hit = hit_scan(Vec2::ZERO, Vec2::X, &enemies, 2000.0);
        assert_eq!(hit.target, None);
        assert_eq!(hit.length, 2000.0);
    }

    #[test]
    fn test_hit_scan_ignores_targets_past_the_cap() {
        let enemies = vec![enemy_at(2100.0, 0.0)];
        let hit = hit_scan(Vec2::ZERO, Vec2::X, &enemies, 2000.0);
        assert_eq!(hit.target, None);
    }

    #[test]
    fn test_recycle_only_behind_a_fast_player() {
        let view = View::new(Vec2::ZERO, Vec2::new(1920.0, 1080.0)).bounds(0.0);
        let behind = Vec2::new(-1500.0, 0.0);
        let ahead = Vec2::new(1500.0, 0.0);
        let fast = Vec2::new(300.0, 0.0);
        let slow = Vec2::new(100.0, 0.0);

        assert!(should_recycle(behind, &view, Vec2::ZERO, fast, 240.0));
        assert!(!should_recycle(ahead, &view, Vec2::ZERO, fast, 240.0));
        assert!(!should_recycle(behind, &view, Vec2::ZERO, slow, 240.0));
        assert!(!should_recycle(Vec2::new(-100.0, 0.0), &view, Vec2::ZERO, fast, 240.0));
    }

    #[test]
    fn test_repulsion_points_away() {
        let push = repulsion(Vec2::new(10.0, 0.0), Vec2::ZERO, 300.0, 0.5);
        assert_eq!(push, Vec2::new(150.0, 0.0));
        assert_eq!(repulsion(Vec2::ZERO, Vec2::ZERO, 300.0, 0.5), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn test_respawn_lands_on_the_margin_band(
            seed in any::<u64>(),
            cx in -10_000.0f32..10_000.0,
            cy in -10_000.0f32..10_000.0,
            margin in 1.0f32..200.0,
        ) {
            let view = View::new(Vec2::new(cx, cy), Vec2::new(1920.0, 1080.0));
            let mut rng = Pcg32::seed_from_u64(seed);
            let tight = view.bounds(0.0);
            let loose = view.bounds(margin + 0.01);
            for _ in 0..16 {
                let p = respawn_point(&view, margin, &mut rng);
                prop_assert!(!tight.contains_strict(p));
                prop_assert!(loose.contains(p));
            }
        }
    }
}
