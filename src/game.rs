//! Frame driver: owns the simulation, keeps the previous input snapshot and
//! forwards the frame's side effects to the audio sink

use glam::Vec2;

use crate::assets::AssetRegistry;
use crate::audio::{AudioSink, SoundCue};
use crate::hud::HudSnapshot;
use crate::input::{InputFrame, InputState};
use crate::renderer::{self, DrawList};
use crate::settings::Settings;
use crate::sim::{DecorationCatalog, GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

pub struct Game {
    pub state: GameState,
    pub settings: Settings,
    previous: InputState,
    exit_requested: bool,
    frames: u64,
}

impl Game {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        catalog: DecorationCatalog,
        view_size: Vec2,
    ) -> Self {
        let state = GameState::new(seed, tuning, view_size, settings.max_particles(), catalog);
        Self {
            state,
            settings,
            previous: InputState::default(),
            exit_requested: false,
            frames: 0,
        }
    }

    /// Build a game whose decorations match what the registry found
    pub fn with_assets(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        assets: &AssetRegistry,
        view_size: Vec2,
    ) -> Self {
        let catalog = assets.catalog(&settings);
        Self::new(seed, tuning, settings, catalog, view_size)
    }

    /// Run one frame with this frame's input
    pub fn step(&mut self, input: InputState, dt: f32, audio: &mut dyn AudioSink) -> HudSnapshot {
        let frame = InputFrame::new(input, self.previous);
        tick(&mut self.state, &frame, dt);
        self.previous = input;
        self.frames += 1;

        // Coin pickups in the same frame share one cue
        let mut coin_cue_played = false;
        for event in self.state.events.drain(..) {
            if event == GameEvent::ExitRequested {
                self.exit_requested = true;
            }
            let Some(cue) = SoundCue::for_event(&event) else {
                continue;
            };
            if cue == SoundCue::CoinCollected {
                if coin_cue_played {
                    continue;
                }
                coin_cue_played = true;
            }
            audio.play(cue);
        }

        HudSnapshot::from_state(&self.state)
    }

    pub fn draw_list(&self) -> DrawList {
        renderer::build(&self.state, &self.settings)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueRecorder;
    use crate::sim::Coin;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Game {
        Game::new(
            5,
            Tuning::default(),
            Settings::default(),
            DecorationCatalog::default(),
            Vec2::new(1920.0, 1080.0),
        )
    }

    #[test]
    fn test_coin_cue_plays_once_per_frame() {
        let mut g = game();
        g.state.start_run();
        g.state.phase = GamePhase::Playing;
        for _ in 0..3 {
            g.state.coins.push(Coin::new(Vec2::new(10.0, 0.0)));
        }
        let mut audio = CueRecorder::default();
        let hud = g.step(InputState::default(), DT, &mut audio);
        assert_eq!(hud.currency, 3);
        assert_eq!(audio.count(SoundCue::CoinCollected), 1);
        assert!(g.state.events.is_empty());
    }

    #[test]
    fn test_previous_input_is_remembered() {
        let mut g = game();
        g.state.start_run();
        g.state.phase = GamePhase::Playing;
        g.state.player.add_shockwave_charge();
        g.state.player.add_shockwave_charge();
        let mut audio = CueRecorder::default();
        let held = InputState {
            shockwave: true,
            ..Default::default()
        };
        g.step(held, DT, &mut audio);
        g.step(held, DT, &mut audio);
        assert_eq!(g.state.player.shockwave_charges, 1);
    }

    #[test]
    fn test_exit_from_title_is_latched() {
        let mut g = game();
        g.state.phase = GamePhase::Title;
        let mut audio = CueRecorder::default();
        g.step(InputState { menu_up: true, ..Default::default() }, DT, &mut audio);
        g.step(InputState::default(), DT, &mut audio);
        g.step(InputState { confirm: true, ..Default::default() }, DT, &mut audio);
        assert!(g.exit_requested());
        assert_eq!(g.frames(), 3);
    }
}
