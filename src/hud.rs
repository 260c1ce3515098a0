//! Read-only numbers for the heads-up display

use crate::sim::{GamePhase, GameState};

/// Everything the HUD draws, taken once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    /// 0..=1
    pub health: f32,
    /// 0..=1
    pub energy: f32,
    /// 0..=1
    pub boost: f32,
    pub overheated: bool,
    pub shockwave_charges: u8,
    pub max_shockwave_charges: u8,
    pub currency: u32,
    pub kills: u32,
    pub difficulty: f32,
    /// Repair is affordable and would heal something
    pub can_repair: bool,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let p = &state.player;
        Self {
            phase: state.phase,
            health: p.health_fraction().clamp(0.0, 1.0),
            energy: p.energy.fraction().clamp(0.0, 1.0),
            boost: p.boost.fraction().clamp(0.0, 1.0),
            overheated: p.overheated,
            shockwave_charges: p.shockwave_charges,
            max_shockwave_charges: p.max_shockwave_charges,
            currency: state.currency,
            kills: state.kills,
            difficulty: state.difficulty.level(),
            can_repair: state.currency >= state.tuning.repair.cost && p.health < p.max_health,
        }
    }

    /// Health as a whole percentage for the text readout
    pub fn health_percent(&self) -> u32 {
        (self.health * 100.0).round() as u32
    }
}
