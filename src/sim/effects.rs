//! Presentation-only effects driven by gameplay
//!
//! None of this feeds back into gameplay. What matters is *when* effects are
//! triggered; how they look is up to the renderer.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Count down a lifetime; returns `true` while it is still alive
#[inline]
pub fn tick_lifetime(remaining: &mut f32, dt: f32) -> bool {
    *remaining -= dt;
    *remaining > 0.0
}

/// Trauma-based camera shake
#[derive(Debug, Clone)]
pub struct ScreenShake {
    /// 0..=1
    pub trauma: f32,
    pub max_offset: f32,
    pub decay: f32,
    /// Axis the camera shakes along; picked when shaking starts from rest
    pub axis: Vec2,
}

impl ScreenShake {
    pub fn new(max_offset: f32, decay: f32) -> Self {
        Self {
            trauma: 0.0,
            max_offset,
            decay,
            axis: Vec2::X,
        }
    }

    pub fn add_trauma(&mut self, amount: f32, rng: &mut Pcg32) {
        if self.trauma <= 0.01 {
            self.axis = match rng.random_range(0..4) {
                0 => Vec2::X,
                1 => Vec2::Y,
                2 => Vec2::new(std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
                _ => Vec2::new(-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
            };
        }
        self.trauma = (self.trauma + amount).min(1.0);
    }

    pub fn update(&mut self, dt: f32) {
        self.trauma = (self.trauma - self.decay * dt).max(0.0);
    }

    /// Camera offset for this frame; `time` seeds the jitter
    pub fn offset(&self, time: f32) -> Vec2 {
        if self.trauma <= 0.0 {
            return Vec2::ZERO;
        }
        let shake = self.trauma * self.trauma;
        let n = (time * 12.9898 + 78.233).sin() * 43_758.547;
        let noise = n - n.floor();
        self.axis * self.max_offset * shake * (2.0 * noise - 1.0)
    }

    pub fn clear(&mut self) {
        self.trauma = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub color: [u8; 4],
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        crate::fraction(self.life, self.max_life).clamp(0.0, 1.0)
    }
}

/// Parameters for a radial burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub speed: f32,
    pub color: [u8; 4],
    pub life_min: f32,
    pub life_max: f32,
}

/// Capped particle pool
#[derive(Debug, Clone, Default)]
pub struct Particles {
    pub items: Vec<Particle>,
    pub cap: usize,
}

impl Particles {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Emit up to `burst.count` particles in random directions
    pub fn emit(&mut self, pos: Vec2, burst: Burst, rng: &mut Pcg32) {
        let room = self.cap.saturating_sub(self.items.len());
        for _ in 0..burst.count.min(room) {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(burst.speed * 0.5..=burst.speed * 1.5);
            let life = rng.random_range(burst.life_min..=burst.life_max);
            let max_life = rng.random_range(burst.life_min..=burst.life_max).max(life);
            self.items.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life,
                max_life,
                color: burst.color,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.items {
            p.pos += p.vel * dt;
        }
        self.items.retain_mut(|p| tick_lifetime(&mut p.life, dt));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Recent positions sampled on a fixed interval, newest first
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
    timer: f32,
}

impl Trail {
    pub fn record(&mut self, pos: Vec2, dt: f32, interval: f32, max_points: usize) {
        self.timer += dt;
        if self.timer >= interval {
            self.timer = 0.0;
            self.points.push_front(pos);
            self.points.truncate(max_points);
        }
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn burst(count: usize) -> Burst {
        Burst {
            count,
            speed: 100.0,
            color: [255, 0, 0, 255],
            life_min: 0.3,
            life_max: 0.8,
        }
    }

    #[test]
    fn test_trauma_caps_and_decays() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut shake = ScreenShake::new(10.0, 1.5);
        shake.add_trauma(0.8, &mut rng);
        shake.add_trauma(0.8, &mut rng);
        assert_eq!(shake.trauma, 1.0);
        assert!(shake.offset(0.3).length() <= 10.0);
        shake.update(0.5);
        assert!((shake.trauma - 0.25).abs() < 1e-6);
        shake.update(1.0);
        assert_eq!(shake.trauma, 0.0);
        assert_eq!(shake.offset(0.3), Vec2::ZERO);
    }

    #[test]
    fn test_particles_respect_cap_and_expire() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Particles::new(25);
        particles.emit(Vec2::ZERO, burst(20), &mut rng);
        particles.emit(Vec2::ZERO, burst(20), &mut rng);
        assert_eq!(particles.len(), 25);
        particles.update(0.9);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_zero_cap_emits_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Particles::new(0);
        particles.emit(Vec2::ZERO, burst(30), &mut rng);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_trail_keeps_newest_points() {
        let mut trail = Trail::default();
        for i in 0..50 {
            trail.record(Vec2::new(i as f32, 0.0), 0.02, 0.02, 20);
        }
        assert_eq!(trail.len(), 20);
        assert_eq!(trail.points().next(), Some(&Vec2::new(49.0, 0.0)));
        trail.clear();
        assert!(trail.is_empty());
    }

    #[test]
    fn test_lifetime_countdown() {
        let mut life = 0.15;
        assert!(tick_lifetime(&mut life, 0.1));
        assert!(!tick_lifetime(&mut life, 0.1));
    }
}
