// Shared setup for the end-to-end tests: build a game and fly it into a run.
#![allow(dead_code)]

use glam::Vec2;
use shade::audio::CueRecorder;
use shade::input::InputState;
use shade::sim::{DecorationCatalog, GamePhase};
use shade::{Game, Settings, Tuning};

pub const DT: f32 = 1.0 / 60.0;

// A game at the start of its loading screen.
pub fn new_game(seed: u64) -> Game {
    Game::new(
        seed,
        Tuning::default(),
        Settings::default(),
        DecorationCatalog::default(),
        Vec2::new(1920.0, 1080.0),
    )
}

// Idle through loading, then pick Play on the title menu.
pub fn start_playing(game: &mut Game, audio: &mut CueRecorder) {
    let idle = InputState::default();
    let mut frames = 0;
    while game.phase() == GamePhase::Loading {
        game.step(idle, DT, audio);
        frames += 1;
        assert!(frames < 10_000, "loading never finished");
    }
    assert_eq!(game.phase(), GamePhase::Title);

    let confirm = InputState {
        confirm: true,
        ..Default::default()
    };
    game.step(confirm, DT, audio);
    assert_eq!(game.phase(), GamePhase::Playing);
}

// Put the first enemy right next to the ship so it detonates this frame.
pub fn enemy_on_player(game: &mut Game) {
    let pos = game.state.player.pos + Vec2::new(50.0, 0.0);
    game.state.enemies[0].pos = pos;
}
