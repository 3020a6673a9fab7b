//! Cursor-driven replay of a finished backtest.
//!
//! The controller owns only a bounded cursor and playback flags, never
//! business data. A single external periodic driver calls [`ReplayController::tick`]
//! at [`ReplayController::tick_interval`] while playing; consumers feed
//! [`ReplayController::visible`] slices back into the pure calculators.
//! Every cursor operation clamps to `[0, max_steps - 1]`; out-of-range
//! requests are no-ops, never errors.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 5.0;
pub const BASE_TICK_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayConfig {
    /// Tick interval at 1.0x speed.
    pub base_interval: Duration,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            base_interval: Duration::from_millis(BASE_TICK_MS),
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
        }
    }
}

/// Serializable snapshot of the controller. `0 <= current_step < max_steps`
/// holds whenever `max_steps > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayState {
    pub current_step: usize,
    pub max_steps: usize,
    pub is_playing: bool,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct ReplayController {
    current_step: usize,
    max_steps: usize,
    is_playing: bool,
    speed: f64,
    config: ReplayConfig,
}

impl ReplayController {
    pub fn new(max_steps: usize) -> Self {
        Self::with_config(max_steps, ReplayConfig::default())
    }

    pub fn with_config(max_steps: usize, config: ReplayConfig) -> Self {
        ReplayController {
            current_step: 0,
            max_steps,
            is_playing: false,
            speed: 1.0f64.clamp(config.min_speed, config.max_speed),
            config,
        }
    }

    pub fn state(&self) -> ReplayState {
        ReplayState {
            current_step: self.current_step,
            max_steps: self.max_steps,
            is_playing: self.is_playing,
            speed: self.speed,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn last_step(&self) -> usize {
        self.max_steps.saturating_sub(1)
    }

    /// Start playback. No-op when the cursor already sits on the last step
    /// (or there is nothing to play).
    pub fn play(&mut self) {
        if self.max_steps > 1 && self.current_step < self.last_step() {
            self.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Manual stepping pauses playback and clamps at the last step.
    pub fn step_forward(&mut self, steps: usize) {
        self.is_playing = false;
        if self.max_steps > 0 {
            self.current_step = (self.current_step + steps).min(self.last_step());
        }
    }

    /// Manual stepping pauses playback and clamps at step 0.
    pub fn step_back(&mut self, steps: usize) {
        self.is_playing = false;
        self.current_step = self.current_step.saturating_sub(steps);
    }

    pub fn skip_to_start(&mut self) {
        self.is_playing = false;
        self.current_step = 0;
    }

    pub fn skip_to_end(&mut self) {
        self.is_playing = false;
        self.current_step = self.last_step();
    }

    /// Clamp the multiplier into the configured range. Never moves the cursor.
    pub fn set_speed(&mut self, multiplier: f64) {
        let fallback = if multiplier.is_nan() { 1.0 } else { multiplier };
        self.speed = fallback.clamp(self.config.min_speed, self.config.max_speed);
    }

    /// Interval the external driver should wait between ticks: base
    /// interval divided by the speed multiplier.
    pub fn tick_interval(&self) -> Duration {
        self.config.base_interval.div_f64(self.speed)
    }

    /// Advance one step on the driver's tick. Returns true when the cursor
    /// moved so the consumer knows to recompute its visible slices.
    /// Reaching the last step auto-pauses.
    pub fn tick(&mut self) -> bool {
        if !self.is_playing {
            return false;
        }
        if self.current_step >= self.last_step() {
            self.is_playing = false;
            return false;
        }
        self.current_step += 1;
        if self.current_step == self.last_step() {
            self.is_playing = false;
        }
        true
    }

    /// Cursor position as 0-100; 100 when there is at most one step.
    pub fn progress_percent(&self) -> f64 {
        if self.max_steps <= 1 {
            100.0
        } else {
            self.current_step as f64 / self.last_step() as f64 * 100.0
        }
    }

    /// The "up to current step" slice of any run-aligned sequence.
    pub fn visible<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        let end = (self.current_step + 1).min(data.len());
        &data[..end]
    }
}
