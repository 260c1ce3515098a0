//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override it. Each
//! section is `#[serde(default)]`, so a partial document only replaces the
//! values it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read or accept a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Player ship movement, health and boost gauge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    /// Top speed without boost (px/s)
    pub max_speed: f32,
    /// Top speed while boosting (px/s)
    pub boost_max_speed: f32,
    /// Thrust from a held movement key (px/s²)
    pub thrust: f32,
    pub boost_thrust_multiplier: f32,
    /// Proportional drag applied against the held axis (1/s)
    pub drag: f32,
    /// Constant deceleration toward rest (px/s²)
    pub friction: f32,
    pub boost_friction_factor: f32,
    pub boost_capacity: f32,
    pub boost_drain_rate: f32,
    pub boost_recharge_rate: f32,
    pub boost_recharge_delay: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 1000,
            max_speed: 360.0,
            boost_max_speed: 720.0,
            thrust: 1680.0,
            boost_thrust_multiplier: 2.0,
            drag: 3.0,
            friction: 288.0,
            boost_friction_factor: 0.25,
            boost_capacity: 120.0,
            boost_drain_rate: 45.0,
            boost_recharge_rate: 22.0,
            boost_recharge_delay: 0.25,
        }
    }
}

/// Hit-scan laser and its energy gauge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserTuning {
    pub energy_capacity: f32,
    /// Energy consumed per second of continuous fire
    pub energy_drain_rate: f32,
    pub energy_recharge_rate: f32,
    /// Seconds without firing before energy recharges
    pub energy_recharge_delay: f32,
    /// Fraction of capacity that clears an overheat
    pub overheat_recover_fraction: f32,
    pub max_length: f32,
    pub damage_per_frame: i32,
    /// Displacement applied to the struck enemy per firing frame (px)
    pub knockback_per_frame: f32,
    pub lifetime: f32,
    pub fade_time: f32,
    /// Hit splash sits this far before the impact point
    pub splash_inset: f32,
    pub splash_frame_time: f32,
    pub trauma_per_frame: f32,
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            energy_capacity: 100.0,
            energy_drain_rate: 18.0,
            energy_recharge_rate: 60.0,
            energy_recharge_delay: 0.5,
            overheat_recover_fraction: 0.5,
            max_length: 2000.0,
            damage_per_frame: 2,
            knockback_per_frame: 0.5,
            lifetime: 0.15,
            fade_time: 0.1,
            splash_inset: 10.0,
            splash_frame_time: 0.1,
            trauma_per_frame: 0.01,
        }
    }
}

/// Enemy population, movement and detonation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_count: usize,
    pub max_count: usize,
    /// Edge length of the square hit box (px)
    pub size: f32,
    pub max_health: i32,
    pub base_speed: f32,
    pub explosion_damage: i32,
    pub explosion_radius: f32,
    pub arming_radius: f32,
    /// Width of the spawn band outside the view (px)
    pub spawn_margin: f32,
    /// Player speed above which left-behind enemies are recycled (px/s)
    pub recycle_min_speed: f32,
    pub speed_scale_min: f32,
    pub speed_scale_max: f32,
    pub trail_interval: f32,
    pub trail_points: usize,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_count: 4,
            max_count: 32,
            size: 72.0,
            max_health: 100,
            base_speed: 126.0,
            explosion_damage: 30,
            explosion_radius: 100.0,
            arming_radius: 209.0,
            spawn_margin: 50.0,
            recycle_min_speed: 240.0,
            speed_scale_min: 0.5,
            speed_scale_max: 5.0,
            trail_interval: 0.02,
            trail_points: 20,
        }
    }
}

/// Coins and shockwave orbs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub coin_magnet_radius: f32,
    pub coin_speed: f32,
    pub coin_collect_radius: f32,
    pub coin_despawn_distance: f32,
    pub coin_drop_min: u32,
    pub coin_drop_max: u32,
    /// Coins scatter up to this far from the kill position (px)
    pub coin_scatter: i32,
    pub orb_magnet_radius: f32,
    pub orb_speed: f32,
    pub orb_collect_radius: f32,
    pub orb_drop_chance: f64,
    /// Orbs outside the view grown by this margin are discarded
    pub orb_cull_margin: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            coin_magnet_radius: 250.0,
            coin_speed: 600.0,
            coin_collect_radius: 60.0,
            coin_despawn_distance: 2500.0,
            coin_drop_min: 1,
            coin_drop_max: 3,
            coin_scatter: 20,
            orb_magnet_radius: 4000.0,
            orb_speed: 480.0,
            orb_collect_radius: 30.0,
            orb_drop_chance: 0.25,
            orb_cull_margin: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub start_level: f32,
    pub max_level: f32,
    pub seconds_per_level: f32,
    /// Multiplier applied to the current level when a shockwave fires
    pub shockwave_discount: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            start_level: 1.0,
            max_level: 5.0,
            seconds_per_level: 60.0,
            shockwave_discount: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveTuning {
    pub max_charges: u8,
    pub duration: f32,
    /// Repulsion speed applied to every enemy while active (px/s)
    pub force: f32,
    pub ripple_lifetime: f32,
    pub ripple_max_radius: f32,
}

impl Default for ShockwaveTuning {
    fn default() -> Self {
        Self {
            max_charges: 3,
            duration: 1.0,
            force: 300.0,
            ripple_lifetime: 1.5,
            ripple_max_radius: 1500.0,
        }
    }
}

/// What a parallax layer is populated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerRole {
    DistantStars,
    MidStars,
    Planets,
    Dust,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTuning {
    pub parallax: f32,
    pub role: LayerRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub chunk_size: f32,
    /// Extra chunks kept around the visible area
    pub stream_margin: i32,
    /// Ordered back to front
    pub layers: Vec<LayerTuning>,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            chunk_size: 1024.0,
            stream_margin: 2,
            layers: vec![
                LayerTuning { parallax: 0.05, role: LayerRole::DistantStars },
                LayerTuning { parallax: 0.1, role: LayerRole::MidStars },
                LayerTuning { parallax: 0.2, role: LayerRole::Planets },
                LayerTuning { parallax: 0.8, role: LayerRole::Dust },
            ],
        }
    }
}

/// Screen shake, particles and floating text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub kill_trauma: f32,
    pub hit_trauma: f32,
    pub trauma_decay: f32,
    pub max_shake_offset: f32,
    pub kill_particles: usize,
    pub kill_particle_speed: f32,
    pub hit_particles: usize,
    pub hit_particle_speed: f32,
    pub particle_life_min: f32,
    pub particle_life_max: f32,
    pub floating_text_lifetime: f32,
    pub floating_text_rise: f32,
    pub floating_text_drift: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            kill_trauma: 0.4,
            hit_trauma: 0.8,
            trauma_decay: 1.5,
            max_shake_offset: 10.0,
            kill_particles: 20,
            kill_particle_speed: 150.0,
            hit_particles: 30,
            hit_particle_speed: 200.0,
            particle_life_min: 0.3,
            particle_life_max: 0.8,
            floating_text_lifetime: 1.0,
            floating_text_rise: 50.0,
            floating_text_drift: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairTuning {
    pub cost: u32,
}

impl Default for RepairTuning {
    fn default() -> Self {
        Self { cost: 500 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingTuning {
    /// Intro screen stays up at least this long (seconds)
    pub min_duration: f32,
}

impl Default for LoadingTuning {
    fn default() -> Self {
        Self { min_duration: 4.0 }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub laser: LaserTuning,
    pub enemy: EnemyTuning,
    pub pickups: PickupTuning,
    pub difficulty: DifficultyTuning,
    pub shockwave: ShockwaveTuning,
    pub world: WorldTuning,
    pub effects: EffectsTuning,
    pub repair: RepairTuning,
    pub loading: LoadingTuning,
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation's guards
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player.max_speed", self.player.max_speed),
            ("player.boost_max_speed", self.player.boost_max_speed),
            ("player.boost_capacity", self.player.boost_capacity),
            ("laser.energy_capacity", self.laser.energy_capacity),
            ("laser.max_length", self.laser.max_length),
            ("laser.lifetime", self.laser.lifetime),
            ("enemy.size", self.enemy.size),
            ("enemy.explosion_radius", self.enemy.explosion_radius),
            ("pickups.coin_collect_radius", self.pickups.coin_collect_radius),
            ("pickups.orb_collect_radius", self.pickups.orb_collect_radius),
            ("difficulty.seconds_per_level", self.difficulty.seconds_per_level),
            ("shockwave.ripple_lifetime", self.shockwave.ripple_lifetime),
            ("world.chunk_size", self.world.chunk_size),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if self.player.max_health <= 0 || self.enemy.max_health <= 0 {
            return Err(ConfigError::Invalid("health values must be positive".into()));
        }
        if self.difficulty.start_level > self.difficulty.max_level {
            return Err(ConfigError::Invalid(
                "difficulty.start_level exceeds difficulty.max_level".into(),
            ));
        }
        if self.enemy.base_count > self.enemy.max_count {
            return Err(ConfigError::Invalid("enemy.base_count exceeds enemy.max_count".into()));
        }
        if self.pickups.coin_drop_min > self.pickups.coin_drop_max {
            return Err(ConfigError::Invalid("coin drop range is inverted".into()));
        }
        if self.effects.particle_life_min <= 0.0
            || self.effects.particle_life_min > self.effects.particle_life_max
        {
            return Err(ConfigError::Invalid("particle lifetime range is invalid".into()));
        }
        if self.world.stream_margin < 0 {
            return Err(ConfigError::Invalid("world.stream_margin must not be negative".into()));
        }
        if self.enemy.speed_scale_min > self.enemy.speed_scale_max {
            return Err(ConfigError::Invalid("enemy speed scale range is inverted".into()));
        }
        let non_negative = [
            ("enemy.spawn_margin", self.enemy.spawn_margin),
            ("effects.kill_particle_speed", self.effects.kill_particle_speed),
            ("effects.hit_particle_speed", self.effects.hit_particle_speed),
            ("pickups.coin_scatter", self.pickups.coin_scatter as f32),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must not be negative")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_document_overrides_only_named_values() {
        let tuning = Tuning::from_json(r#"{ "enemy": { "base_count": 6 } }"#).unwrap();
        assert_eq!(tuning.enemy.base_count, 6);
        assert_eq!(tuning.enemy.max_count, 32);
        assert_eq!(tuning.player.max_health, 1000);
    }

    #[test]
    fn test_inverted_difficulty_range_is_rejected() {
        let err = Tuning::from_json(r#"{ "difficulty": { "start_level": 6.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_inverted_speed_scale_is_rejected() {
        let err = Tuning::from_json(r#"{ "enemy": { "speed_scale_min": 6.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_spawn_margin_is_rejected() {
        let err = Tuning::from_json(r#"{ "enemy": { "spawn_margin": -200.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_particle_speed_and_scatter_are_rejected() {
        for doc in [
            r#"{ "effects": { "kill_particle_speed": -1.0 } }"#,
            r#"{ "effects": { "hit_particle_speed": -1.0 } }"#,
            r#"{ "pickups": { "coin_scatter": -20 } }"#,
        ] {
            let err = Tuning::from_json(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{doc}");
        }
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let tuning = Tuning::load_or_default(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(tuning, Tuning::default());
    }
}
