//! Time-driven difficulty with shockwave rollback
//!
//! `level = start + (elapsed - offset) / seconds_per_level`, clamped to
//! `[start, max]`. A shockwave moves `offset` forward so the level drops to a
//! fraction of its current value; the clock keeps running from there.

use crate::tuning::DifficultyTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    elapsed: f32,
    time_offset: f32,
    level: f32,
    start_level: f32,
    max_level: f32,
    seconds_per_level: f32,
}

impl Difficulty {
    pub fn new(tuning: &DifficultyTuning) -> Self {
        Self {
            elapsed: 0.0,
            time_offset: 0.0,
            level: tuning.start_level,
            start_level: tuning.start_level,
            max_level: tuning.max_level,
            seconds_per_level: tuning.seconds_per_level.max(f32::EPSILON),
        }
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time_offset(&self) -> f32 {
        self.time_offset
    }

    fn recompute(&mut self) {
        let raw = self.start_level + (self.elapsed - self.time_offset) / self.seconds_per_level;
        self.level = raw.clamp(self.start_level, self.max_level);
    }

    /// Advance the clock and return the new level
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.recompute();
        self.level
    }

    /// Shift the clock offset so the level becomes `factor` × its current
    /// value (never below the start level). Returns the new level.
    pub fn apply_discount(&mut self, factor: f32) -> f32 {
        let before = self.level;
        let target = (before * factor).max(self.start_level);
        self.time_offset = self.elapsed - (target - self.start_level) * self.seconds_per_level;
        self.recompute();
        log::debug!("Difficulty rolled back {:.2} -> {:.2}", before, self.level);
        self.level
    }

    /// Restart the clock for a new run
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.time_offset = 0.0;
        self.level = self.start_level;
    }

    /// Enemy population the current level asks for
    pub fn target_population(&self, base_count: usize, max_count: usize) -> usize {
        max_count.min((base_count as f32 * self.level) as usize)
    }
}
