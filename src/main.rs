//! Shade entry point
//!
//! Loads configuration and assets, then flies a headless autopilot session
//! through the full game loop. A windowed frontend drives `Game` the same
//! way, feeding real input and drawing `Game::draw_list`.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use glam::Vec2;
    use shade::assets::{AssetRegistry, FsAssetSource, HeadlessAssets, manifest};
    use shade::audio::{AudioManager, SoundCue};
    use shade::consts::{DEFAULT_VIEW_SIZE, REFERENCE_FPS};
    use shade::{Game, QualityPreset, Settings, Tuning, autopilot};

    const DEFAULT_SEED: u64 = 0x5AD3;
    const SESSION_SECONDS: u64 = 120;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Shade (headless) starting...");

    let env_path = |key: &str| std::env::var_os(key).map(PathBuf::from);

    let mut settings = Settings::load_or_default(env_path("SHADE_SETTINGS").as_deref());
    if let Ok(name) = std::env::var("SHADE_QUALITY") {
        match QualityPreset::parse(&name) {
            Some(preset) => settings.quality = preset,
            None => log::warn!("Unknown quality preset {name:?}; keeping {}", settings.quality.as_str()),
        }
    }
    let tuning = Tuning::load_or_default(env_path("SHADE_TUNING").as_deref());
    let seed = std::env::var("SHADE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let loaded = match env_path("SHADE_ASSETS") {
        Some(root) => {
            log::info!("Loading assets from {}", root.display());
            AssetRegistry::load(&FsAssetSource::new(root), &manifest())
        }
        None => AssetRegistry::load(&HeadlessAssets, &manifest()),
    };
    let assets = match loaded {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("Startup aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut audio = AudioManager::from_settings(&settings);
    for cue in SoundCue::ALL {
        if !assets.cue_available(cue) {
            audio.silence(cue);
        }
    }

    let mut game = Game::with_assets(seed, tuning, settings, &assets, Vec2::from(DEFAULT_VIEW_SIZE));
    log::info!("World seed {seed:#x}");

    let dt = 1.0 / REFERENCE_FPS;
    let frames = SESSION_SECONDS * REFERENCE_FPS as u64;
    let mut hud = None;
    for frame in 0..frames {
        let input = autopilot::drive(&game.state, frame);
        hud = Some(game.step(input, dt, &mut audio));

        if frame % (10 * REFERENCE_FPS as u64) == 0 {
            let list = game.draw_list();
            log::debug!(
                "Frame {frame}: {} instances, {} labels, {} enemies",
                list.instances.len(),
                list.labels.len(),
                game.state.enemies.len()
            );
        }
        if game.exit_requested() {
            log::info!("Exit requested after {frame} frames");
            break;
        }
    }

    if let Some(hud) = hud {
        log::info!(
            "Session over: {:?}, health {}%, {} coins, {} kills, difficulty {:.2}",
            hud.phase,
            hud.health_percent(),
            hud.currency,
            hud.kills,
            hud.difficulty
        );
    }
    log::info!("{} cues played over {} frames", audio.played(), game.frames());
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds drive `shade::Game` from the host page
}
