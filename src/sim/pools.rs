//! Per-pool update and removal passes
//!
//! Each pass moves its entities, then drops the ones whose removal test
//! fails on the post-move state. Anything another subsystem cares about
//! (score, cues, drops) is reported as a [`GameEvent`].

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::tick_lifetime;
use super::geometry::{View, step_toward, within_radius};
use super::interaction::{repulsion, respawn_point, should_recycle};
use super::player::Player;
use super::state::{
    Coin, Enemy, FloatingText, GameEvent, Laser, ShockwaveOrb, ShockwaveRipple,
};
use crate::tuning::{EnemyTuning, PickupTuning};

/// Shared pickup motion: latch into homing once inside `trigger_radius`,
/// then close in on `target` at `speed`
pub fn home_toward(
    pos: &mut Vec2,
    homing: &mut bool,
    target: Vec2,
    trigger_radius: f32,
    speed: f32,
    dt: f32,
) {
    if !*homing && within_radius(*pos, target, trigger_radius) {
        *homing = true;
    }
    if *homing {
        *pos = step_toward(*pos, target, speed * dt);
    }
}

/// Lasers ride along with the ship until they fade out
pub fn update_lasers(lasers: &mut Vec<Laser>, origin: Vec2, dir: Vec2, dt: f32) {
    for laser in lasers.iter_mut() {
        laser.origin = origin;
        laser.dir = dir;
    }
    lasers.retain_mut(|l| tick_lifetime(&mut l.remaining, dt));
}

/// Returns the number of orbs picked up this frame
pub fn update_orbs(
    orbs: &mut Vec<ShockwaveOrb>,
    player_pos: Vec2,
    view: &View,
    t: &PickupTuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let keep_area = view.bounds(t.orb_cull_margin);
    let mut collected = 0;
    orbs.retain_mut(|orb| {
        home_toward(
            &mut orb.pos,
            &mut orb.homing,
            player_pos,
            t.orb_magnet_radius,
            t.orb_speed,
            dt,
        );
        if within_radius(orb.pos, player_pos, t.orb_collect_radius) {
            collected += 1;
            events.push(GameEvent::OrbCollected);
            return false;
        }
        keep_area.contains(orb.pos)
    });
    collected
}

/// Returns the number of coins banked this frame
pub fn update_coins(
    coins: &mut Vec<Coin>,
    player_pos: Vec2,
    t: &PickupTuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut collected = 0;
    coins.retain_mut(|coin| {
        home_toward(
            &mut coin.pos,
            &mut coin.homing,
            player_pos,
            t.coin_magnet_radius,
            t.coin_speed,
            dt,
        );
        if within_radius(coin.pos, player_pos, t.coin_collect_radius) {
            collected += 1;
            events.push(GameEvent::CoinCollected);
            return false;
        }
        within_radius(coin.pos, player_pos, t.coin_despawn_distance)
    });
    collected
}

pub fn update_ripples(ripples: &mut Vec<ShockwaveRipple>, dt: f32) {
    ripples.retain_mut(|r| {
        r.age += dt;
        r.age < r.lifetime
    });
}

pub fn update_floating_texts(texts: &mut Vec<FloatingText>, dt: f32) {
    for text in texts.iter_mut() {
        text.pos += text.vel * dt;
    }
    texts.retain_mut(|t| tick_lifetime(&mut t.remaining, dt));
}

/// What the enemy pass needs besides the pool itself
pub struct EnemyPass<'a> {
    pub tuning: &'a EnemyTuning,
    pub view: &'a View,
    pub level: f32,
    /// Repulsion speed while a shockwave is running
    pub shockwave_force: f32,
    pub dt: f32,
}

/// How the enemy pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyOutcome {
    Completed,
    /// An explosion killed the player; the remaining enemies were skipped
    PlayerKilled,
}

fn respawn(enemy: &mut Enemy, pass: &EnemyPass, rng: &mut Pcg32) {
    enemy.respawn_at(respawn_point(pass.view, pass.tuning.spawn_margin, rng));
    enemy.apply_difficulty(pass.level, pass.tuning);
}

/// Enemies are never removed: dead, detonated or left-behind ones respawn on
/// the band outside the view
pub fn update_enemies(
    enemies: &mut [Enemy],
    player: &mut Player,
    pass: &EnemyPass,
    rng: &mut Pcg32,
    events: &mut Vec<GameEvent>,
) -> EnemyOutcome {
    let t = pass.tuning;
    let tight = pass.view.bounds(0.0);

    for enemy in enemies.iter_mut() {
        if enemy.is_dead() {
            events.push(GameEvent::EnemyDestroyed { pos: enemy.pos });
            respawn(enemy, pass, rng);
            continue;
        }

        if should_recycle(enemy.pos, &tight, player.pos, player.vel, t.recycle_min_speed) {
            respawn(enemy, pass, rng);
            continue;
        }

        enemy.armed = within_radius(enemy.pos, player.pos, t.arming_radius);

        if within_radius(enemy.pos, player.pos, t.explosion_radius) {
            player.take_damage(t.explosion_damage);
            events.push(GameEvent::PlayerHit {
                pos: enemy.pos,
                damage: t.explosion_damage,
            });
            respawn(enemy, pass, rng);
            if player.is_dead() {
                events.push(GameEvent::PlayerExploded);
                return EnemyOutcome::PlayerKilled;
            }
            continue;
        }

        if player.shockwave_active() {
            enemy.pos += repulsion(enemy.pos, player.pos, pass.shockwave_force, pass.dt);
        } else {
            enemy.move_toward(player.pos, pass.dt);
        }
        enemy.trail.record(enemy.pos, pass.dt, t.trail_interval, t.trail_points);
    }

    EnemyOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn view() -> View {
        View::new(Vec2::ZERO, Vec2::new(1920.0, 1080.0))
    }

    fn player(t: &Tuning) -> Player {
        Player::new(Vec2::ZERO, &t.player, &t.laser, &t.shockwave)
    }

    #[test]
    fn test_coin_collect_uses_post_move_position() {
        let t = PickupTuning::default();
        let mut events = Vec::new();
        // 65 px away: outside the 60 px collect radius until it moves 10 px
        let mut coins = vec![Coin::new(Vec2::new(65.0, 0.0))];
        let collected = update_coins(&mut coins, Vec2::ZERO, &t, DT, &mut events);
        assert_eq!(collected, 1);
        assert!(coins.is_empty());
        assert_eq!(events, vec![GameEvent::CoinCollected]);
    }

    #[test]
    fn test_distant_coin_stays_put_and_far_coin_despawns() {
        let t = PickupTuning::default();
        let mut events = Vec::new();
        let mut coins = vec![Coin::new(Vec2::new(1000.0, 0.0)), Coin::new(Vec2::new(3000.0, 0.0))];
        update_coins(&mut coins, Vec2::ZERO, &t, DT, &mut events);
        assert_eq!(coins, vec![Coin::new(Vec2::new(1000.0, 0.0))]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_orbs_home_from_anywhere_on_screen_and_grant_charges() {
        let t = PickupTuning::default();
        let mut events = Vec::new();
        let mut orbs = vec![ShockwaveOrb::new(Vec2::new(400.0, 0.0))];
        let mut total = 0;
        for _ in 0..120 {
            total += update_orbs(&mut orbs, Vec2::ZERO, &view(), &t, DT, &mut events);
        }
        assert_eq!(total, 1);
        assert!(orbs.is_empty());
    }

    #[test]
    fn test_orbs_outside_the_view_are_culled() {
        let t = PickupTuning::default();
        let mut events = Vec::new();
        let mut orbs = vec![ShockwaveOrb::new(Vec2::new(5000.0, 0.0))];
        update_orbs(&mut orbs, Vec2::ZERO, &view(), &t, DT, &mut events);
        assert!(orbs.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_lasers_follow_the_ship_and_expire() {
        let mut lasers = vec![Laser {
            origin: Vec2::ZERO,
            dir: Vec2::X,
            length: 100.0,
            remaining: 0.15,
            fade_time: 0.1,
        }];
        update_lasers(&mut lasers, Vec2::new(5.0, 5.0), Vec2::Y, 0.1);
        assert_eq!(lasers[0].origin, Vec2::new(5.0, 5.0));
        assert_eq!(lasers[0].dir, Vec2::Y);
        update_lasers(&mut lasers, Vec2::ZERO, Vec2::Y, 0.1);
        assert!(lasers.is_empty());
    }

    #[test]
    fn test_ripples_and_texts_expire() {
        let mut ripples = vec![ShockwaveRipple {
            center: Vec2::ZERO,
            age: 0.0,
            lifetime: 1.5,
            max_radius: 1500.0,
        }];
        update_ripples(&mut ripples, 1.0);
        assert!((ripples[0].radius() - 1000.0).abs() < 1e-3);
        update_ripples(&mut ripples, 0.6);
        assert!(ripples.is_empty());

        let mut texts = vec![FloatingText {
            text: "x".into(),
            pos: Vec2::ZERO,
            vel: Vec2::new(0.0, -50.0),
            remaining: 1.0,
            lifetime: 1.0,
            color: [255; 4],
        }];
        update_floating_texts(&mut texts, 0.5);
        assert_eq!(texts[0].pos, Vec2::new(0.0, -25.0));
        update_floating_texts(&mut texts, 0.6);
        assert!(texts.is_empty());
    }

    #[test]
    fn test_explosion_damages_player_and_respawns_enemy() {
        let t = Tuning::default();
        let mut p = player(&t);
        let mut rng = Pcg32::seed_from_u64(9);
        let mut events = Vec::new();
        let mut enemies = vec![Enemy::new(Vec2::new(50.0, 0.0), &t.enemy)];
        let pass = EnemyPass {
            tuning: &t.enemy,
            view: &view(),
            level: 1.0,
            shockwave_force: t.shockwave.force,
            dt: DT,
        };
        let outcome = update_enemies(&mut enemies, &mut p, &pass, &mut rng, &mut events);
        assert_eq!(outcome, EnemyOutcome::Completed);
        assert_eq!(p.health, 970);
        assert!(!view().bounds(0.0).contains_strict(enemies[0].pos));
        assert!(matches!(events[0], GameEvent::PlayerHit { damage: 30, .. }));
    }

    #[test]
    fn test_fatal_explosion_skips_remaining_enemies() {
        let t = Tuning::default();
        let mut p = player(&t);
        p.health = 30;
        let mut rng = Pcg32::seed_from_u64(9);
        let mut events = Vec::new();
        let mut enemies = vec![
            Enemy::new(Vec2::new(50.0, 0.0), &t.enemy),
            Enemy::new(Vec2::new(0.0, 50.0), &t.enemy),
        ];
        let pass = EnemyPass {
            tuning: &t.enemy,
            view: &view(),
            level: 1.0,
            shockwave_force: t.shockwave.force,
            dt: DT,
        };
        let outcome = update_enemies(&mut enemies, &mut p, &pass, &mut rng, &mut events);
        assert_eq!(outcome, EnemyOutcome::PlayerKilled);
        assert_eq!(p.health, 0);
        // The second enemy never got its turn
        assert_eq!(enemies[1].pos, Vec2::new(0.0, 50.0));
        assert_eq!(events.last(), Some(&GameEvent::PlayerExploded));
    }

    #[test]
    fn test_dead_enemy_is_reported_and_respawned_at_full_health() {
        let t = Tuning::default();
        let mut p = player(&t);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut events = Vec::new();
        let mut enemies = vec![Enemy::new(Vec2::new(600.0, 0.0), &t.enemy)];
        enemies[0].take_damage(100);
        let pass = EnemyPass {
            tuning: &t.enemy,
            view: &view(),
            level: 2.0,
            shockwave_force: t.shockwave.force,
            dt: DT,
        };
        update_enemies(&mut enemies, &mut p, &pass, &mut rng, &mut events);
        assert_eq!(events, vec![GameEvent::EnemyDestroyed { pos: Vec2::new(600.0, 0.0) }]);
        assert_eq!(enemies[0].health, 100);
        assert!((enemies[0].speed - 252.0).abs() < 1e-3);
    }

    #[test]
    fn test_shockwave_pushes_enemies_away() {
        let t = Tuning::default();
        let mut p = player(&t);
        p.add_shockwave_charge();
        assert!(p.activate_shockwave());
        let mut rng = Pcg32::seed_from_u64(4);
        let mut events = Vec::new();
        let mut enemies = vec![Enemy::new(Vec2::new(400.0, 0.0), &t.enemy)];
        let pass = EnemyPass {
            tuning: &t.enemy,
            view: &view(),
            level: 1.0,
            shockwave_force: t.shockwave.force,
            dt: DT,
        };
        update_enemies(&mut enemies, &mut p, &pass, &mut rng, &mut events);
        assert!((enemies[0].pos.x - 405.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn test_homing_latches_once_triggered(
            start in -600.0f32..600.0,
            moves in proptest::collection::vec((-800.0f32..800.0, -800.0f32..800.0), 1..60),
        ) {
            let t = PickupTuning::default();
            let mut coin = Coin::new(Vec2::new(start, 0.0));
            let mut ever_inside = false;
            for (x, y) in moves {
                let target = Vec2::new(x, y);
                ever_inside |= within_radius(coin.pos, target, t.coin_magnet_radius);
                home_toward(&mut coin.pos, &mut coin.homing, target, t.coin_magnet_radius, t.coin_speed, DT);
                prop_assert_eq!(coin.homing, ever_inside);
            }
        }
    }
}
