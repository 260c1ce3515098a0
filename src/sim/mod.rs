//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Variable frame delta, clamped per tick
//! - Seeded RNG only (one for world content, one for everything else)
//! - Stable iteration order within each pool
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod effects;
pub mod geometry;
pub mod interaction;
pub mod player;
pub mod pools;
pub mod state;
pub mod tick;
pub mod world;

pub use difficulty::Difficulty;
pub use effects::{Particle, Particles, ScreenShake, Trail};
pub use geometry::{Rect, View};
pub use interaction::{HitScan, hit_scan, ray_aabb, respawn_point, should_recycle};
pub use player::{Gauge, Player};
pub use state::{
    Coin, Enemy, FloatingText, GameEvent, GamePhase, GameState, HitSplash, Laser, LoadStage,
    MenuOption, ShockwaveOrb, ShockwaveRipple, TitleMenu,
};
pub use tick::tick;
pub use world::{Chunk, Decoration, DecorationCatalog, DecorationKind, WorldStreamer};
