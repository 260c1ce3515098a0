//! Game state and core simulation types
//!
//! Every entity category is its own plain struct in its own `Vec`; shared
//! behaviour lives in free functions (`pools`, `interaction`, `effects`).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::effects::{Particles, ScreenShake, Trail};
use super::geometry::{Rect, View};
use super::interaction::respawn_point;
use super::player::Player;
use super::world::{DecorationCatalog, WorldStreamer};
use crate::heading;
use crate::tuning::{EnemyTuning, Tuning};

/// Coarse mode of the whole game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Intro card while subsystems initialise
    Loading,
    /// Title menu
    Title,
    /// Active gameplay
    Playing,
    /// Run ended; waiting for restart or cancel
    GameOver,
}

/// Staged initialisation walked one step per loading frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadStage {
    Assets,
    Player,
    World,
    ScreenShake,
    Particles,
    Title,
    Enemies,
    Hud,
    Done,
}

impl LoadStage {
    pub fn next(self) -> Self {
        match self {
            LoadStage::Assets => LoadStage::Player,
            LoadStage::Player => LoadStage::World,
            LoadStage::World => LoadStage::ScreenShake,
            LoadStage::ScreenShake => LoadStage::Particles,
            LoadStage::Particles => LoadStage::Title,
            LoadStage::Title => LoadStage::Enemies,
            LoadStage::Enemies => LoadStage::Hud,
            LoadStage::Hud | LoadStage::Done => LoadStage::Done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Loading {
    pub stage: LoadStage,
    pub elapsed: f32,
}

/// Title menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Play,
    HowToPlay,
    Credits,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [
        MenuOption::Play,
        MenuOption::HowToPlay,
        MenuOption::Credits,
        MenuOption::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Play => "PLAY",
            MenuOption::HowToPlay => "HOW TO PLAY",
            MenuOption::Credits => "CREDITS",
            MenuOption::Exit => "EXIT",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TitleMenu {
    pub selected: usize,
    /// Info page shown over the menu (how to play, credits)
    pub page: Option<MenuOption>,
}

impl TitleMenu {
    pub fn selected(&self) -> MenuOption {
        MenuOption::ALL[self.selected % MenuOption::ALL.len()]
    }

    pub fn move_up(&mut self) {
        let n = MenuOption::ALL.len();
        self.selected = (self.selected + n - 1) % n;
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % MenuOption::ALL.len();
    }
}

/// A homing enemy that detonates near the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub base_speed: f32,
    /// Current speed (px/s), scaled by difficulty
    pub speed: f32,
    /// Hit box edge length
    pub size: f32,
    /// Close enough to the player to show its warning look
    pub armed: bool,
    pub trail: Trail,
}

impl Enemy {
    pub fn new(pos: Vec2, t: &EnemyTuning) -> Self {
        Self {
            pos,
            health: t.max_health,
            max_health: t.max_health,
            base_speed: t.base_speed,
            speed: t.base_speed,
            size: t.size,
            armed: false,
            trail: Trail::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.pos, Vec2::splat(self.size))
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn knockback(&mut self, dir: Vec2, distance: f32) {
        self.pos += dir * distance;
    }

    pub fn move_toward(&mut self, target: Vec2, dt: f32) {
        self.pos += super::geometry::direction_to(self.pos, target) * self.speed * dt;
    }

    pub fn apply_difficulty(&mut self, level: f32, t: &EnemyTuning) {
        self.speed = self.base_speed * level.clamp(t.speed_scale_min, t.speed_scale_max);
    }

    /// Reuse this enemy at a new position with full health
    pub fn respawn_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.health = self.max_health;
        self.armed = false;
        self.trail.clear();
    }
}

/// The visible remnant of one frame's hit-scan
#[derive(Debug, Clone)]
pub struct Laser {
    pub origin: Vec2,
    pub dir: Vec2,
    pub length: f32,
    pub remaining: f32,
    pub fade_time: f32,
}

impl Laser {
    pub fn angle(&self) -> f32 {
        heading(self.dir)
    }

    pub fn alpha(&self) -> f32 {
        crate::fraction(self.remaining, self.fade_time).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub pos: Vec2,
    /// Once set, the coin flies to the player every frame
    pub homing: bool,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, homing: false }
    }
}

/// Pickup that grants a shockwave charge
#[derive(Debug, Clone, PartialEq)]
pub struct ShockwaveOrb {
    pub pos: Vec2,
    pub homing: bool,
}

impl ShockwaveOrb {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, homing: false }
    }
}

/// Expanding ring drawn when a shockwave fires
#[derive(Debug, Clone)]
pub struct ShockwaveRipple {
    pub center: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub max_radius: f32,
}

impl ShockwaveRipple {
    fn progress(&self) -> f32 {
        crate::fraction(self.age, self.lifetime).clamp(0.0, 1.0)
    }

    pub fn radius(&self) -> f32 {
        self.max_radius * self.progress()
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.progress().powi(2)
    }

    pub fn thickness(&self) -> f32 {
        30.0 * (1.0 - self.progress())
    }
}

#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub remaining: f32,
    pub lifetime: f32,
    pub color: [u8; 4],
}

impl FloatingText {
    pub fn alpha(&self) -> f32 {
        crate::fraction(self.remaining, self.lifetime).clamp(0.0, 1.0)
    }
}

/// Impact flash at the end of the beam; shown only on frames with a hit
#[derive(Debug, Clone, Default)]
pub struct HitSplash {
    pub pos: Vec2,
    pub angle: f32,
    pub visible: bool,
    /// Animation frame 0..3
    pub frame: u8,
    frame_timer: f32,
}

impl HitSplash {
    pub fn show(&mut self, pos: Vec2, angle: f32, dt: f32, frame_time: f32) {
        self.pos = pos;
        self.angle = angle;
        self.visible = true;
        self.frame_timer += dt;
        if self.frame_timer >= frame_time {
            self.frame_timer = 0.0;
            self.frame = (self.frame + 1) % 3;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Gameplay side effects raised during a frame, drained by the frame driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Fire control went from idle to firing
    LaserStarted,
    EnemyDestroyed { pos: Vec2 },
    PlayerHit { pos: Vec2, damage: i32 },
    PlayerExploded,
    CoinCollected,
    OrbCollected,
    ShockwaveActivated { pos: Vec2 },
    Repaired,
    ExitRequested,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// World seed
    pub seed: u64,
    /// Cosmetic and drop randomness (the world streamer seeds its own)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub loading: Loading,
    pub title: TitleMenu,
    /// Camera view; its center follows the player
    pub view: View,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub lasers: Vec<Laser>,
    pub coins: Vec<Coin>,
    pub orbs: Vec<ShockwaveOrb>,
    pub ripples: Vec<ShockwaveRipple>,
    pub floating_texts: Vec<FloatingText>,
    pub hit_splash: HitSplash,
    pub particles: Particles,
    pub shake: ScreenShake,
    pub world: WorldStreamer,
    pub difficulty: Difficulty,
    /// Coins banked this run
    pub currency: u32,
    pub kills: u32,
    /// Fire control was active last frame
    pub was_firing: bool,
    /// Seconds simulated since startup
    pub time: f32,
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        view_size: Vec2,
        particle_cap: usize,
        catalog: DecorationCatalog,
    ) -> Self {
        let player = Player::new(Vec2::ZERO, &tuning.player, &tuning.laser, &tuning.shockwave);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed.wrapping_mul(2654435761).wrapping_add(1)),
            phase: GamePhase::Loading,
            loading: Loading {
                stage: LoadStage::Assets,
                elapsed: 0.0,
            },
            title: TitleMenu::default(),
            view: View::new(Vec2::ZERO, view_size),
            player,
            enemies: Vec::with_capacity(tuning.enemy.max_count),
            lasers: Vec::with_capacity(32),
            coins: Vec::with_capacity(128),
            orbs: Vec::with_capacity(16),
            ripples: Vec::with_capacity(4),
            floating_texts: Vec::new(),
            hit_splash: HitSplash::default(),
            particles: Particles::new(particle_cap),
            shake: ScreenShake::new(tuning.effects.max_shake_offset, tuning.effects.trauma_decay),
            world: WorldStreamer::new(seed, &tuning.world, catalog),
            difficulty: Difficulty::new(&tuning.difficulty),
            currency: 0,
            kills: 0,
            was_firing: false,
            time: 0.0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Move to `to`, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        if self.phase != to {
            log::info!("Phase {:?} -> {:?}", self.phase, to);
            self.events.push(GameEvent::PhaseChanged { from: self.phase, to });
            self.phase = to;
        }
    }

    /// Add one enemy on the spawn band around the view
    pub fn spawn_enemy(&mut self) {
        let pos = respawn_point(&self.view, self.tuning.enemy.spawn_margin, &mut self.rng);
        let mut enemy = Enemy::new(pos, &self.tuning.enemy);
        enemy.apply_difficulty(self.difficulty.level(), &self.tuning.enemy);
        self.enemies.push(enemy);
    }

    /// Grow the enemy pool up to what the difficulty asks for
    pub fn top_up_enemies(&mut self) {
        let target = self
            .difficulty
            .target_population(self.tuning.enemy.base_count, self.tuning.enemy.max_count);
        if self.enemies.len() < target {
            log::debug!("Enemy pool {} -> {}", self.enemies.len(), target);
        }
        while self.enemies.len() < target {
            self.spawn_enemy();
        }
    }

    /// Wipe the run and start a fresh one: full health, empty pools, base
    /// difficulty, base enemy count
    pub fn start_run(&mut self) {
        let t = &self.tuning;
        self.player = Player::new(Vec2::ZERO, &t.player, &t.laser, &t.shockwave);
        self.view.center = self.player.pos;
        self.enemies.clear();
        self.lasers.clear();
        self.coins.clear();
        self.orbs.clear();
        self.ripples.clear();
        self.floating_texts.clear();
        self.particles.clear();
        self.shake.clear();
        self.hit_splash = HitSplash::default();
        self.currency = 0;
        self.kills = 0;
        self.was_firing = false;
        self.difficulty.reset();
        for _ in 0..self.tuning.enemy.base_count {
            self.spawn_enemy();
        }
        log::info!("New run started with {} enemies", self.enemies.len());
    }
}
