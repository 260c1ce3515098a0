//! Scripted pilot for headless runs and demos
//!
//! Reads the state and produces the input a cautious player would: aim at
//! the closest enemy, hold the trigger, back off when something gets close.

use glam::Vec2;

use crate::input::InputState;
use crate::sim::{GamePhase, GameState, MenuOption};

/// Enemies closer than this are run away from
const DANGER_RADIUS: f32 = 320.0;
/// Enemies closer than this trigger a shockwave
const PANIC_RADIUS: f32 = 180.0;

/// Input for this frame; `frame` alternates edge-triggered presses
pub fn drive(state: &GameState, frame: u64) -> InputState {
    let pulse = frame % 2 == 0;
    let mut input = InputState::default();

    match state.phase {
        GamePhase::Loading => {}
        GamePhase::Title => {
            if state.title.page.is_some() {
                input.cancel = pulse;
            } else if state.title.selected() != MenuOption::Play {
                input.menu_down = pulse;
            } else {
                input.confirm = pulse;
            }
        }
        GamePhase::GameOver => input.restart = pulse,
        GamePhase::Playing => fly(state, frame, pulse, &mut input),
    }
    input
}

fn fly(state: &GameState, frame: u64, pulse: bool, input: &mut InputState) {
    let player = &state.player;
    let nearest = state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .partial_cmp(&b.pos.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos);

    // Slow circle when nothing is around
    let wander = Vec2::from_angle(frame as f32 * 0.01);
    let mut steer = wander;

    if let Some(target) = nearest {
        input.pointer = target;
        input.fire = player.can_fire();

        let dist = target.distance(player.pos);
        if dist < DANGER_RADIUS {
            steer = (player.pos - target).normalize_or_zero();
            input.boost = true;
        }
        if dist < PANIC_RADIUS && player.shockwave_charges > 0 && !player.shockwave_active() {
            input.shockwave = pulse;
        }
    } else {
        input.pointer = player.pos + wander * 100.0;
    }

    input.right = steer.x > 0.3;
    input.left = steer.x < -0.3;
    input.down = steer.y > 0.3;
    input.up = steer.y < -0.3;

    input.repair = pulse
        && player.health < player.max_health / 2
        && state.currency >= state.tuning.repair.cost;
}
