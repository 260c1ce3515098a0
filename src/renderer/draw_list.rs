//! Turn a read-only game state into draw records
//!
//! Parallax layers are folded into world space: a decoration at `p` on a
//! layer with factor `f` is drawn at `p + camera * (1 - f)`, so one camera
//! covers every layer.

use glam::Vec2;

use super::instance::{DrawInstance, Sprite, colors, rgba};
use crate::consts::REFERENCE_FPS;
use crate::heading;
use crate::settings::Settings;
use crate::sim::state::MenuOption;
use crate::sim::world::DecorationKind;
use crate::sim::{GamePhase, GameState};
use crate::tuning::LayerRole;

const PLAYER_SIZE: f32 = 64.0;
const COIN_SIZE: f32 = 24.0;
const ORB_SIZE: f32 = 28.0;
const PARTICLE_SIZE: f32 = 4.0;
const SPLASH_SIZE: f32 = 48.0;
const LASER_WIDTH: f32 = 8.0;
const DUST_BASE_SCALE: f32 = 2.0;

/// Text drawn with the UI font
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: [f32; 2],
    pub size: f32,
    pub color: [f32; 4],
    /// Screen space instead of world space
    pub screen: bool,
}

impl Label {
    fn screen(text: impl Into<String>, position: Vec2, size: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            position: position.to_array(),
            size,
            color,
            screen: true,
        }
    }
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// World point at the center of the screen, shake included
    pub camera: [f32; 2],
    pub instances: Vec<DrawInstance>,
    pub labels: Vec<Label>,
}

impl DrawList {
    pub fn count(&self, sprite: Sprite) -> usize {
        self.instances.iter().filter(|i| i.sprite == sprite as u32).count()
    }
}

/// Horizontal stretch and angle for foreground dust at this player
/// velocity (px/s); `None` below the threshold
pub fn dust_stretch(vel: Vec2) -> Option<(f32, f32)> {
    let speed = vel.length() / REFERENCE_FPS;
    if speed > 0.5 {
        Some(((speed * 1.5).min(20.0), heading(-vel)))
    } else {
        None
    }
}

pub fn build(state: &GameState, settings: &Settings) -> DrawList {
    let mut list = DrawList::default();
    let shake = if settings.effective_screen_shake() {
        state.shake.offset(state.time)
    } else {
        Vec2::ZERO
    };
    let camera = state.view.center + shake;
    list.camera = camera.to_array();

    if state.phase == GamePhase::Loading {
        push_loading(&mut list, state);
        return list;
    }

    push_background(&mut list, state, settings, camera);

    match state.phase {
        GamePhase::Title => push_title(&mut list, state),
        GamePhase::Playing | GamePhase::GameOver => {
            push_gameplay(&mut list, state, settings);
            if state.phase == GamePhase::GameOver {
                let half = state.view.size * 0.5;
                list.labels.push(Label::screen("GAME OVER", half, 72.0, colors::GAME_OVER));
                list.labels.push(Label::screen(
                    "R to restart, Esc for title",
                    half + Vec2::new(0.0, 80.0),
                    28.0,
                    colors::WHITE,
                ));
            }
        }
        GamePhase::Loading => {}
    }
    list
}

fn push_loading(list: &mut DrawList, state: &GameState) {
    let half = state.view.size * 0.5;
    list.labels.push(Label::screen(
        format!("Loading... {:?}", state.loading.stage),
        half,
        36.0,
        colors::WHITE,
    ));
}

fn push_background(list: &mut DrawList, state: &GameState, settings: &Settings, camera: Vec2) {
    let stretch = if settings.effective_dust_stretch() {
        dust_stretch(state.player.vel)
    } else {
        None
    };

    for layer in state.world.layers() {
        let shift = camera * (1.0 - layer.parallax);
        for chunk in layer.chunks() {
            for d in &chunk.decorations {
                let pos = d.pos + shift;
                let tint = rgba(d.tint, 1.0);
                let inst = match d.kind {
                    DecorationKind::Star { variant } => {
                        DrawInstance::new(Sprite::Star, pos, Vec2::splat(32.0 * d.scale), tint)
                            .variant(variant as u32)
                    }
                    DecorationKind::Planet { variant } => {
                        DrawInstance::new(Sprite::Planet, pos, Vec2::splat(256.0 * d.scale), tint)
                            .variant(variant as u32)
                            .rotated(d.rotation)
                    }
                    DecorationKind::Dust => match (layer.role, stretch) {
                        (LayerRole::Dust, Some((factor, angle))) => DrawInstance::new(
                            Sprite::Dust,
                            pos,
                            Vec2::new(DUST_BASE_SCALE + factor, DUST_BASE_SCALE),
                            tint,
                        )
                        .rotated(angle),
                        _ => DrawInstance::new(Sprite::Dust, pos, Vec2::splat(d.scale), tint),
                    },
                };
                list.instances.push(inst);
            }
        }
    }
}

fn push_title(list: &mut DrawList, state: &GameState) {
    let half = state.view.size * 0.5;
    list.instances.push(DrawInstance::new(
        Sprite::Title,
        state.view.center - Vec2::new(0.0, 200.0),
        Vec2::new(800.0, 240.0),
        colors::WHITE,
    ));

    if let Some(page) = state.title.page {
        let body = match page {
            MenuOption::HowToPlay => {
                "WASD move, Shift boost, hold mouse to fire, Space shockwave, R repair"
            }
            _ => "SHADE  -  thanks for playing",
        };
        list.labels.push(Label::screen(body, half, 28.0, colors::WHITE));
        return;
    }

    for (i, option) in MenuOption::ALL.iter().enumerate() {
        let color = if *option == state.title.selected() {
            colors::MENU_SELECTED
        } else {
            colors::MENU_IDLE
        };
        let pos = half + Vec2::new(0.0, 60.0 * i as f32);
        list.labels.push(Label::screen(option.label(), pos, 40.0, color));
    }
}

fn push_gameplay(list: &mut DrawList, state: &GameState, settings: &Settings) {
    for ripple in &state.ripples {
        let mut tint = colors::RIPPLE;
        tint[3] *= ripple.alpha();
        list.instances.push(
            DrawInstance::new(Sprite::Ripple, ripple.center, Vec2::splat(ripple.radius() * 2.0), tint)
                .variant(ripple.thickness().round() as u32),
        );
    }

    for coin in &state.coins {
        list.instances
            .push(DrawInstance::new(Sprite::Coin, coin.pos, Vec2::splat(COIN_SIZE), colors::COIN));
    }
    for orb in &state.orbs {
        list.instances
            .push(DrawInstance::new(Sprite::Orb, orb.pos, Vec2::splat(ORB_SIZE), colors::ORB));
    }

    for enemy in &state.enemies {
        if settings.trails {
            let n = enemy.trail.len().max(1) as f32;
            for (i, p) in enemy.trail.points().enumerate() {
                let fade = 1.0 - i as f32 / n;
                let mut tint = colors::ENEMY_TRAIL;
                tint[3] *= fade;
                list.instances.push(DrawInstance::new(
                    Sprite::EnemyTrail,
                    *p,
                    Vec2::splat(enemy.size * 0.3 * fade),
                    tint,
                ));
            }
        }
        let sprite = if enemy.armed { Sprite::EnemyArmed } else { Sprite::Enemy };
        let facing = heading(state.player.pos - enemy.pos);
        list.instances.push(
            DrawInstance::new(sprite, enemy.pos, Vec2::splat(enemy.size), colors::WHITE)
                .rotated(facing),
        );
    }

    for laser in &state.lasers {
        let mut tint = colors::LASER;
        tint[3] *= laser.alpha();
        let mid = laser.origin + laser.dir * laser.length * 0.5;
        list.instances.push(
            DrawInstance::new(Sprite::Laser, mid, Vec2::new(laser.length, LASER_WIDTH), tint)
                .rotated(laser.angle()),
        );
    }

    if state.hit_splash.visible {
        let s = &state.hit_splash;
        list.instances.push(
            DrawInstance::new(Sprite::HitSplash, s.pos, Vec2::splat(SPLASH_SIZE), colors::WHITE)
                .rotated(s.angle)
                .variant(s.frame as u32),
        );
    }

    let p = &state.player;
    let sprite = if p.boost_active {
        Sprite::PlayerBoost
    } else if p.thrusting {
        Sprite::PlayerThrust
    } else {
        Sprite::Player
    };
    list.instances.push(
        DrawInstance::new(sprite, p.pos, Vec2::splat(PLAYER_SIZE), colors::WHITE)
            .rotated(heading(p.facing)),
    );

    if settings.particles {
        for particle in &state.particles.items {
            list.instances.push(DrawInstance::new(
                Sprite::Particle,
                particle.pos,
                Vec2::splat(PARTICLE_SIZE),
                rgba(particle.color, particle.alpha()),
            ));
        }
    }

    for text in &state.floating_texts {
        list.labels.push(Label {
            text: text.text.clone(),
            position: text.pos.to_array(),
            size: 24.0,
            color: rgba(text.color, text.alpha()),
            screen: false,
        });
    }
}
