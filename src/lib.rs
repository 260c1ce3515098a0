//! Shade - an arcade shooter in an endless starfield
//!
//! Core modules:
//! - `sim`: Simulation (world streaming, entity pools, difficulty, interactions)
//! - `game`: Frame driver that owns the simulation and forwards its side effects
//! - `renderer`: Draw descriptors handed to a rendering backend
//! - `assets`: Asset registry with critical/decorative degradation
//! - `audio`: Sound cue sinks
//! - `input`: Per-frame input snapshots and edge detection
//! - `hud`: Read-only HUD snapshot
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod game;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Frame rate the per-frame tuning values were authored against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Default world view size (pixels) used by the headless runner
    pub const DEFAULT_VIEW_SIZE: [f32; 2] = [1920.0, 1080.0];
}

/// Move `value` toward zero by `amount` without crossing it
#[inline]
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}

/// `part / whole`, or 0 when `whole` is not positive
#[inline]
pub fn fraction(part: f32, whole: f32) -> f32 {
    if whole <= 0.0 { 0.0 } else { part / whole }
}

/// Angle (radians) of a direction vector
#[inline]
pub fn heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}
