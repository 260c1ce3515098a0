//! Asset manifest and availability registry
//!
//! Startup checks every asset the game knows about. A missing decorative
//! asset only switches off its category (no stars, silent coin pickups); a
//! missing critical one aborts startup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::SoundCue;
use crate::settings::Settings;
use crate::sim::DecorationCatalog;

/// Error type for asset loading
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {id} not found at {path:?}")]
    Missing { id: String, path: PathBuf },

    #[error("asset {id} could not be decoded: {reason}")]
    Decode { id: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Sound,
    Font,
}

/// What a failed load costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    /// Startup cannot continue without it
    Critical,
    /// Its category is disabled
    Decorative,
}

/// Assets that are switched on or off together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetGroup {
    Font,
    Player,
    Title,
    Enemy,
    Laser,
    HitSplash,
    Coin,
    Stars,
    Planets,
    Sound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub id: String,
    /// Relative to the asset root
    pub path: PathBuf,
    pub kind: AssetKind,
    pub group: AssetGroup,
    pub criticality: Criticality,
}

impl AssetSpec {
    fn new(id: &str, path: &str, kind: AssetKind, group: AssetGroup, criticality: Criticality) -> Self {
        Self {
            id: id.to_string(),
            path: PathBuf::from(path),
            kind,
            group,
            criticality,
        }
    }

    fn decorative(id: &str, path: &str, kind: AssetKind, group: AssetGroup) -> Self {
        Self::new(id, path, kind, group, Criticality::Decorative)
    }

    fn critical(id: &str, path: &str, kind: AssetKind, group: AssetGroup) -> Self {
        Self::new(id, path, kind, group, Criticality::Critical)
    }
}

pub const STAR_VARIANTS: u8 = 5;
pub const PLANET_VARIANTS: u8 = 9;

/// Every asset the game uses
pub fn manifest() -> Vec<AssetSpec> {
    use AssetGroup as G;
    use AssetKind as K;

    let mut specs = vec![
        AssetSpec::critical("font", "Font/Jumps Winter.ttf", K::Font, G::Font),
        AssetSpec::critical("player_idle", "Player/Initial.png", K::Texture, G::Player),
        AssetSpec::decorative("player_thrust", "Player/OnAcceleration.png", K::Texture, G::Player),
        AssetSpec::decorative("player_boost", "Player/OnBoost.png", K::Texture, G::Player),
        AssetSpec::critical("title", "Title.png", K::Texture, G::Title),
        AssetSpec::decorative("pre_credit", "PreCredit.png", K::Texture, G::Title),
        AssetSpec::decorative("enemy", "enemy_Initial.png", K::Texture, G::Enemy),
        AssetSpec::decorative("enemy_armed", "Enemy_BeforeExplosion.png", K::Texture, G::Enemy),
        AssetSpec::decorative("laser", "Laser.png", K::Texture, G::Laser),
        AssetSpec::decorative("coin", "Coin/Coin3.png", K::Texture, G::Coin),
        AssetSpec::decorative("sfx_blast_enemy", "Blast1.wav", K::Sound, G::Sound),
        AssetSpec::decorative("sfx_blast_player", "Blast2.wav", K::Sound, G::Sound),
        AssetSpec::decorative("sfx_laser", "LaserShoot.wav", K::Sound, G::Sound),
        AssetSpec::decorative("sfx_coin", "1_Coins.ogg", K::Sound, G::Sound),
        AssetSpec::decorative("sfx_bell", "bell.wav", K::Sound, G::Sound),
        AssetSpec::decorative("sfx_button", "UI_Button.wav", K::Sound, G::Sound),
    ];
    for i in 1..=3 {
        specs.push(AssetSpec::decorative(
            &format!("hit_splash_{i}"),
            &format!("HitSplash/HS{i}.png"),
            K::Texture,
            G::HitSplash,
        ));
    }
    for i in 1..=STAR_VARIANTS {
        specs.push(AssetSpec::decorative(
            &format!("star_{i}"),
            &format!("Stars/Star_{i}.png"),
            K::Texture,
            G::Stars,
        ));
    }
    for i in 1..=PLANET_VARIANTS {
        specs.push(AssetSpec::decorative(
            &format!("planet_{i}"),
            &format!("Planets/Planet_{i}.png"),
            K::Texture,
            G::Planets,
        ));
    }
    specs
}

/// Sound asset behind a cue
pub fn cue_asset(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::EnemyDestroyed => "sfx_blast_enemy",
        SoundCue::PlayerExploded => "sfx_blast_player",
        SoundCue::LaserFired => "sfx_laser",
        SoundCue::CoinCollected => "sfx_coin",
        SoundCue::ShockwaveCollected | SoundCue::PlayerRepaired => "sfx_bell",
    }
}

/// Where asset bytes come from
pub trait AssetSource {
    /// Check that `spec` can be loaded
    fn probe(&self, spec: &AssetSpec) -> Result<(), AssetError>;
}

/// Assets on disk under a root directory
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl AssetSource for FsAssetSource {
    fn probe(&self, spec: &AssetSpec) -> Result<(), AssetError> {
        let path = self.root.join(&spec.path);
        let meta = std::fs::metadata(&path).map_err(|_| AssetError::Missing {
            id: spec.id.clone(),
            path: path.clone(),
        })?;
        if !meta.is_file() {
            return Err(AssetError::Missing { id: spec.id.clone(), path });
        }
        if meta.len() == 0 {
            return Err(AssetError::Decode {
                id: spec.id.clone(),
                reason: "file is empty".into(),
            });
        }
        Ok(())
    }
}

/// Reports every asset present; for runs without any art
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessAssets;

impl AssetSource for HeadlessAssets {
    fn probe(&self, _spec: &AssetSpec) -> Result<(), AssetError> {
        Ok(())
    }
}

/// Which assets made it through startup
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    available: HashSet<String>,
    missing: Vec<String>,
    star_variants: u8,
    planet_variants: u8,
}

impl AssetRegistry {
    pub fn load(source: &dyn AssetSource, manifest: &[AssetSpec]) -> Result<Self, AssetError> {
        let mut registry = Self::default();
        for spec in manifest {
            match source.probe(spec) {
                Ok(()) => {
                    match spec.group {
                        AssetGroup::Stars => registry.star_variants += 1,
                        AssetGroup::Planets => registry.planet_variants += 1,
                        _ => {}
                    }
                    registry.available.insert(spec.id.clone());
                }
                Err(e) if spec.criticality == Criticality::Critical => {
                    log::error!("{e}");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("{e}; continuing without it");
                    registry.missing.push(spec.id.clone());
                }
            }
        }
        log::info!(
            "Assets ready: {} available, {} missing",
            registry.available.len(),
            registry.missing.len()
        );
        Ok(registry)
    }

    pub fn is_available(&self, id: &str) -> bool {
        self.available.contains(id)
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn cue_available(&self, cue: SoundCue) -> bool {
        self.is_available(cue_asset(cue))
    }

    /// Decoration art the world generator may use
    pub fn catalog(&self, settings: &Settings) -> DecorationCatalog {
        DecorationCatalog {
            star_variants: self.star_variants,
            planet_variants: self.planet_variants,
            dust_density: settings.quality.dust_density(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pretends the listed ids are missing
    struct Without(Vec<&'static str>);

    impl AssetSource for Without {
        fn probe(&self, spec: &AssetSpec) -> Result<(), AssetError> {
            if self.0.contains(&spec.id.as_str()) {
                Err(AssetError::Missing {
                    id: spec.id.clone(),
                    path: spec.path.clone(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_headless_has_everything() {
        let reg = AssetRegistry::load(&HeadlessAssets, &manifest()).unwrap();
        assert!(reg.missing().is_empty());
        let catalog = reg.catalog(&Settings::default());
        assert_eq!(catalog.star_variants, 5);
        assert_eq!(catalog.planet_variants, 9);
    }

    #[test]
    fn test_missing_decoration_disables_only_its_category() {
        let source = Without(vec!["star_1", "star_2", "star_3", "star_4", "star_5", "sfx_coin"]);
        let reg = AssetRegistry::load(&source, &manifest()).unwrap();
        assert_eq!(reg.catalog(&Settings::default()).star_variants, 0);
        assert_eq!(reg.catalog(&Settings::default()).planet_variants, 9);
        assert!(!reg.cue_available(SoundCue::CoinCollected));
        assert!(reg.cue_available(SoundCue::LaserFired));
        assert_eq!(reg.missing().len(), 6);
    }

    #[test]
    fn test_missing_font_aborts() {
        let err = AssetRegistry::load(&Without(vec!["font"]), &manifest()).unwrap_err();
        assert!(matches!(err, AssetError::Missing { ref id, .. } if id == "font"));
    }

    #[test]
    fn test_fs_source_reports_missing_files() {
        let source = FsAssetSource::new("/definitely/not/a/real/dir");
        let spec = &manifest()[0];
        assert!(matches!(source.probe(spec), Err(AssetError::Missing { .. })));
    }
}
