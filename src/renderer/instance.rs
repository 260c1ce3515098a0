//! Instance records handed to a sprite batcher

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Which art an instance uses
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Star = 0,
    Planet,
    Dust,
    Player,
    PlayerThrust,
    PlayerBoost,
    Enemy,
    EnemyArmed,
    EnemyTrail,
    Laser,
    HitSplash,
    Coin,
    Orb,
    Ripple,
    Particle,
    Title,
}

/// One textured quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    /// Center, world space
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Radians
    pub rotation: f32,
    /// [`Sprite`] discriminant
    pub sprite: u32,
    /// Variant within the sprite (star texture, animation frame)
    pub variant: u32,
    pub tint: [f32; 4],
}

impl DrawInstance {
    pub fn new(sprite: Sprite, position: Vec2, size: Vec2, tint: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            size: size.to_array(),
            rotation: 0.0,
            sprite: sprite as u32,
            variant: 0,
            tint,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }
}

/// 8-bit RGBA to float, with an extra alpha factor
pub fn rgba(c: [u8; 4], alpha: f32) -> [f32; 4] {
    [
        c[0] as f32 / 255.0,
        c[1] as f32 / 255.0,
        c[2] as f32 / 255.0,
        c[3] as f32 / 255.0 * alpha.clamp(0.0, 1.0),
    ]
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const LASER: [f32; 4] = [0.3, 0.9, 1.0, 1.0];
    pub const ENEMY_TRAIL: [f32; 4] = [1.0, 0.3, 0.2, 0.6];
    pub const COIN: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const ORB: [f32; 4] = [0.4, 0.6, 1.0, 1.0];
    pub const RIPPLE: [f32; 4] = [0.5, 0.8, 1.0, 1.0];
    pub const MENU_IDLE: [f32; 4] = [0.7, 0.7, 0.8, 1.0];
    pub const MENU_SELECTED: [f32; 4] = [1.0, 0.9, 0.3, 1.0];
    pub const GAME_OVER: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
}
