//! Per-frame simulation step
//!
//! Advances the game by one variable frame. The delta is clamped so a stall
//! can't tunnel enemies through the player or drain a gauge in one go.

use glam::Vec2;
use rand::Rng;

use super::effects::Burst;
use super::interaction::hit_scan;
use super::player::Player;
use super::pools::{
    EnemyOutcome, EnemyPass, update_coins, update_enemies, update_floating_texts, update_lasers,
    update_orbs, update_ripples,
};
use super::state::{
    Coin, FloatingText, GameEvent, GamePhase, GameState, Laser, LoadStage, MenuOption,
    ShockwaveOrb, ShockwaveRipple,
};
use crate::consts::MAX_FRAME_DT;
use crate::heading;
use crate::input::{Button, InputFrame};

const KILL_COLOR: [u8; 4] = [255, 60, 40, 255];
const HIT_COLOR: [u8; 4] = [255, 170, 60, 255];
const REPAIR_TEXT_COLOR: [u8; 4] = [80, 255, 120, 255];

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &InputFrame, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time += dt;

    match state.phase {
        GamePhase::Loading => tick_loading(state, dt),
        GamePhase::Title => tick_title(state, input, dt),
        GamePhase::Playing => tick_playing(state, input, dt),
        GamePhase::GameOver => tick_game_over(state, input, dt),
    }
}

/// One initialisation stage per frame; leave for the title once every
/// stage is done and the intro has been up long enough
fn tick_loading(state: &mut GameState, dt: f32) {
    state.loading.elapsed += dt;

    let stage = state.loading.stage;
    match stage {
        LoadStage::Assets | LoadStage::Hud | LoadStage::Done => {}
        LoadStage::Player => {
            let t = &state.tuning;
            state.player = Player::new(Vec2::ZERO, &t.player, &t.laser, &t.shockwave);
        }
        LoadStage::World => {
            state.world.update(state.view.center, state.view.size);
        }
        LoadStage::ScreenShake => state.shake.clear(),
        LoadStage::Particles => state.particles.clear(),
        LoadStage::Title => state.title = Default::default(),
        LoadStage::Enemies => state.top_up_enemies(),
    }
    if stage != LoadStage::Done {
        log::info!("Loaded {stage:?}");
        state.loading.stage = stage.next();
    }

    if state.loading.stage == LoadStage::Done
        && state.loading.elapsed >= state.tuning.loading.min_duration
    {
        state.set_phase(GamePhase::Title);
    }
}

fn update_ambient(state: &mut GameState, dt: f32) {
    state.world.update(state.view.center, state.view.size);
    state.shake.update(dt);
    state.particles.update(dt);
    update_floating_texts(&mut state.floating_texts, dt);
    update_ripples(&mut state.ripples, dt);
}

fn tick_title(state: &mut GameState, input: &InputFrame, dt: f32) {
    state.view.center = Vec2::ZERO;
    update_ambient(state, dt);

    if state.title.page.is_some() {
        if input.pressed(Button::Cancel) || input.pressed(Button::Confirm) {
            state.title.page = None;
        }
        return;
    }

    if input.pressed(Button::MenuUp) || input.pressed(Button::Up) {
        state.title.move_up();
    }
    if input.pressed(Button::MenuDown) || input.pressed(Button::Down) {
        state.title.move_down();
    }
    if !input.pressed(Button::Confirm) {
        return;
    }

    match state.title.selected() {
        MenuOption::Play => {
            state.start_run();
            state.set_phase(GamePhase::Playing);
        }
        page @ (MenuOption::HowToPlay | MenuOption::Credits) => state.title.page = Some(page),
        MenuOption::Exit => {
            log::info!("Exit selected");
            state.events.push(GameEvent::ExitRequested);
        }
    }
}

fn tick_game_over(state: &mut GameState, input: &InputFrame, dt: f32) {
    update_ambient(state, dt);

    if input.pressed(Button::Restart) {
        state.start_run();
        state.set_phase(GamePhase::Playing);
    } else if input.pressed(Button::Cancel) {
        state.set_phase(GamePhase::Title);
    }
}

fn tick_playing(state: &mut GameState, input: &InputFrame, dt: f32) {
    let first_event = state.events.len();

    // Difficulty and population
    state.difficulty.advance(dt);
    state.top_up_enemies();

    // Resources
    let boost_drain = state.tuning.player.boost_drain_rate;
    state.player.update_boost(input.held(Button::Boost), boost_drain, dt);
    state.player.update_energy(dt);

    // Movement
    state.player.thrust(input.movement_axes(), &state.tuning.player);
    state.player.integrate(dt, &state.tuning.player);

    // Camera follows the ship
    state.view.center = state.player.pos;
    state.player.aim_at(input.pointer());

    state.world.update(state.view.center, state.view.size);
    state.shake.update(dt);
    state.particles.update(dt);

    fire_control(state, input, dt);

    if input.pressed(Button::Shockwave) && state.player.activate_shockwave() {
        let t = &state.tuning.shockwave;
        state.ripples.push(ShockwaveRipple {
            center: state.player.pos,
            age: 0.0,
            lifetime: t.ripple_lifetime,
            max_radius: t.ripple_max_radius,
        });
        state.difficulty.apply_discount(state.tuning.difficulty.shockwave_discount);
        state.events.push(GameEvent::ShockwaveActivated {
            pos: state.player.pos,
        });
    }
    state.player.update_shockwave(dt);
    update_ripples(&mut state.ripples, dt);

    if input.pressed(Button::Cancel) {
        state.set_phase(GamePhase::Title);
        return;
    }

    if input.pressed(Button::Repair) {
        try_repair(state);
    }

    // Pools, in order
    update_lasers(&mut state.lasers, state.player.pos, state.player.facing, dt);

    let orbs = update_orbs(
        &mut state.orbs,
        state.player.pos,
        &state.view,
        &state.tuning.pickups,
        dt,
        &mut state.events,
    );
    for _ in 0..orbs {
        state.player.add_shockwave_charge();
    }

    let coins = update_coins(
        &mut state.coins,
        state.player.pos,
        &state.tuning.pickups,
        dt,
        &mut state.events,
    );
    state.currency += coins;

    let pass = EnemyPass {
        tuning: &state.tuning.enemy,
        view: &state.view,
        level: state.difficulty.level(),
        shockwave_force: state.tuning.shockwave.force,
        dt,
    };
    let outcome = update_enemies(
        &mut state.enemies,
        &mut state.player,
        &pass,
        &mut state.rng,
        &mut state.events,
    );

    update_floating_texts(&mut state.floating_texts, dt);
    react_to_events(state, first_event);

    if outcome == EnemyOutcome::PlayerKilled {
        state.set_phase(GamePhase::GameOver);
    }
}

/// Hit-scan while the trigger is held and the weapon is not overheated
fn fire_control(state: &mut GameState, input: &InputFrame, dt: f32) {
    state.hit_splash.hide();

    let firing = input.held(Button::Fire) && state.player.can_fire();
    if firing {
        let t = &state.tuning.laser;
        let origin = state.player.pos;
        let dir = state.player.facing;
        let scan = hit_scan(origin, dir, &state.enemies, t.max_length);

        if let Some(i) = scan.target {
            let enemy = &mut state.enemies[i];
            enemy.take_damage(t.damage_per_frame);
            enemy.knockback(dir, t.knockback_per_frame);
            let splash_at = origin + dir * (scan.length - t.splash_inset).max(0.0);
            state.hit_splash.show(splash_at, heading(dir), dt, t.splash_frame_time);
        }

        state.lasers.push(Laser {
            origin,
            dir,
            length: scan.length,
            remaining: t.lifetime,
            fade_time: t.fade_time,
        });
        let cost = t.energy_drain_rate * dt;
        let trauma = t.trauma_per_frame;
        state.player.consume_energy(cost);
        state.shake.add_trauma(trauma, &mut state.rng);

        if !state.was_firing {
            state.events.push(GameEvent::LaserStarted);
        }
    }
    state.was_firing = firing;
}

fn try_repair(state: &mut GameState) {
    let cost = state.tuning.repair.cost;
    let player = &mut state.player;
    if state.currency < cost || player.health >= player.max_health {
        return;
    }
    state.currency -= cost;
    player.heal_full();
    let pos = player.pos;
    push_floating_text(state, format!("Repaired! -{cost}"), pos, REPAIR_TEXT_COLOR);
    state.events.push(GameEvent::Repaired);
    log::info!("Ship repaired for {cost}");
}

fn push_floating_text(state: &mut GameState, text: String, pos: Vec2, color: [u8; 4]) {
    let fx = &state.tuning.effects;
    let drift = fx.floating_text_drift;
    let vx = if drift > 0.0 {
        state.rng.random_range(-drift..=drift)
    } else {
        0.0
    };
    state.floating_texts.push(FloatingText {
        text,
        pos,
        vel: Vec2::new(vx, -fx.floating_text_rise),
        remaining: fx.floating_text_lifetime,
        lifetime: fx.floating_text_lifetime,
        color,
    });
}

/// Effects and drops for the kills and hits raised this frame
fn react_to_events(state: &mut GameState, first_event: usize) {
    let raised: Vec<GameEvent> = state.events[first_event..].to_vec();
    for event in raised {
        match event {
            GameEvent::EnemyDestroyed { pos } => {
                state.kills += 1;
                let fx = &state.tuning.effects;
                let burst = Burst {
                    count: fx.kill_particles,
                    speed: fx.kill_particle_speed,
                    color: KILL_COLOR,
                    life_min: fx.particle_life_min,
                    life_max: fx.particle_life_max,
                };
                let trauma = fx.kill_trauma;
                state.particles.emit(pos, burst, &mut state.rng);
                state.shake.add_trauma(trauma, &mut state.rng);
                drop_loot(state, pos);
            }
            GameEvent::PlayerHit { pos, .. } => {
                let fx = &state.tuning.effects;
                let burst = Burst {
                    count: fx.hit_particles,
                    speed: fx.hit_particle_speed,
                    color: HIT_COLOR,
                    life_min: fx.particle_life_min,
                    life_max: fx.particle_life_max,
                };
                let trauma = fx.hit_trauma;
                state.particles.emit(pos, burst, &mut state.rng);
                state.shake.add_trauma(trauma, &mut state.rng);
            }
            _ => {}
        }
    }
}

fn drop_loot(state: &mut GameState, pos: Vec2) {
    let t = &state.tuning.pickups;
    let count = state.rng.random_range(t.coin_drop_min..=t.coin_drop_max);
    let scatter = t.coin_scatter;
    for _ in 0..count {
        let offset = Vec2::new(
            state.rng.random_range(-scatter..=scatter) as f32,
            state.rng.random_range(-scatter..=scatter) as f32,
        );
        state.coins.push(Coin::new(pos + offset));
    }
    if state.rng.random_bool(t.orb_drop_chance.clamp(0.0, 1.0)) {
        state.orbs.push(ShockwaveOrb::new(pos));
    }
}
