//! The player ship: kinematics, resource gauges and shockwave charges

use glam::Vec2;

use crate::tuning::{LaserTuning, PlayerTuning, ShockwaveTuning};
use crate::{approach_zero, fraction};

/// A drainable resource that refills after a quiet period
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub value: f32,
    pub capacity: f32,
    pub recharge_rate: f32,
    pub recharge_delay: f32,
    /// Seconds left before recharge resumes
    delay_timer: f32,
}

impl Gauge {
    pub fn full(capacity: f32, recharge_rate: f32, recharge_delay: f32) -> Self {
        Self {
            value: capacity,
            capacity,
            recharge_rate,
            recharge_delay,
            delay_timer: 0.0,
        }
    }

    /// Remove up to `amount` and restart the recharge delay
    pub fn drain(&mut self, amount: f32) {
        self.value = (self.value - amount).max(0.0);
        self.delay_timer = self.recharge_delay;
    }

    /// Count down the delay, then refill
    pub fn recharge(&mut self, dt: f32) {
        if self.delay_timer > 0.0 {
            self.delay_timer -= dt;
        } else if self.value < self.capacity {
            self.value = (self.value + self.recharge_rate * dt).min(self.capacity);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        fraction(self.value, self.capacity)
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Acceleration requested this frame (px/s²), cleared after integration
    pub accel: Vec2,
    /// Unit aim direction toward the pointer
    pub facing: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub boost: Gauge,
    pub boost_active: bool,
    pub energy: Gauge,
    pub overheated: bool,
    overheat_recover_fraction: f32,
    pub shockwave_charges: u8,
    pub max_shockwave_charges: u8,
    /// Seconds of shockwave left; zero when inactive
    pub shockwave_timer: f32,
    shockwave_duration: f32,
    /// A movement key was held this frame
    pub thrusting: bool,
}

impl Player {
    pub fn new(pos: Vec2, player: &PlayerTuning, laser: &LaserTuning, shockwave: &ShockwaveTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            facing: Vec2::NEG_Y,
            health: player.max_health,
            max_health: player.max_health,
            boost: Gauge::full(player.boost_capacity, player.boost_recharge_rate, player.boost_recharge_delay),
            boost_active: false,
            energy: Gauge::full(
                laser.energy_capacity,
                laser.energy_recharge_rate,
                laser.energy_recharge_delay,
            ),
            overheated: false,
            overheat_recover_fraction: laser.overheat_recover_fraction,
            shockwave_charges: 0,
            max_shockwave_charges: shockwave.max_charges,
            shockwave_timer: 0.0,
            shockwave_duration: shockwave.duration,
            thrusting: false,
        }
    }

    /// Engage or release boost; returns whether it is active this frame
    pub fn update_boost(&mut self, engage: bool, drain_rate: f32, dt: f32) -> bool {
        if engage && !self.boost.is_empty() {
            self.boost.drain(drain_rate * dt);
            self.boost_active = !self.boost.is_empty();
        } else {
            self.boost_active = false;
            self.boost.recharge(dt);
        }
        self.boost_active
    }

    /// Recharge laser energy and clear an overheat once refilled enough
    pub fn update_energy(&mut self, dt: f32) {
        self.energy.recharge(dt);
        if self.overheated && self.energy.fraction() >= self.overheat_recover_fraction {
            self.overheated = false;
        }
    }

    pub fn can_fire(&self) -> bool {
        !self.overheated && !self.energy.is_empty()
    }

    pub fn consume_energy(&mut self, amount: f32) {
        self.energy.drain(amount);
        if self.energy.is_empty() {
            self.overheated = true;
        }
    }

    /// Set this frame's acceleration from held movement axes (-1, 0, +1 each)
    pub fn thrust(&mut self, axes: Vec2, t: &PlayerTuning) {
        let max_speed = self.max_speed(t);
        let thrust = if self.boost_active {
            t.thrust * t.boost_thrust_multiplier
        } else {
            t.thrust
        };
        self.thrusting = axes != Vec2::ZERO;

        // Only push an axis that has not yet reached top speed in that direction
        if axes.x != 0.0 && self.vel.x * axes.x < max_speed {
            self.accel.x = -t.drag * self.vel.x + thrust * axes.x;
        }
        if axes.y != 0.0 && self.vel.y * axes.y < max_speed {
            self.accel.y = -t.drag * self.vel.y + thrust * axes.y;
        }
    }

    /// Integrate velocity and position, apply per-axis friction and clamp the
    /// diagonal speed
    pub fn integrate(&mut self, dt: f32, t: &PlayerTuning) {
        self.vel += self.accel * dt;
        self.pos += self.vel * dt;
        self.accel = Vec2::ZERO;

        let friction = if self.boost_active {
            t.friction * t.boost_friction_factor
        } else {
            t.friction
        } * dt;
        self.vel.x = approach_zero(self.vel.x, friction);
        self.vel.y = approach_zero(self.vel.y, friction);

        let max_speed = self.max_speed(t);
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel *= max_speed / speed;
        }
    }

    pub fn max_speed(&self, t: &PlayerTuning) -> f32 {
        if self.boost_active {
            t.boost_max_speed
        } else {
            t.max_speed
        }
    }

    /// Face the pointer; keeps the old facing if the pointer is on the ship
    pub fn aim_at(&mut self, target: Vec2) {
        let dir = (target - self.pos).normalize_or_zero();
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }

    pub fn shockwave_active(&self) -> bool {
        self.shockwave_timer > 0.0
    }

    /// Spend a charge; fails with no charges or while one is running
    pub fn activate_shockwave(&mut self) -> bool {
        if self.shockwave_charges > 0 && !self.shockwave_active() {
            self.shockwave_charges -= 1;
            self.shockwave_timer = self.shockwave_duration;
            true
        } else {
            false
        }
    }

    pub fn update_shockwave(&mut self, dt: f32) {
        if self.shockwave_timer > 0.0 {
            self.shockwave_timer = (self.shockwave_timer - dt).max(0.0);
        }
    }

    pub fn add_shockwave_charge(&mut self) {
        if self.shockwave_charges < self.max_shockwave_charges {
            self.shockwave_charges += 1;
        }
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health as f32, self.max_health as f32)
    }
}
