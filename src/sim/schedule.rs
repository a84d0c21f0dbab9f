//! Keyed timer arena
//!
//! Everything that takes time in the simulation is a timer entry here:
//! the spawn loop, obstacle travel, tap slides, grapple pulls, damping
//! restores, line fades and the short orientation/squash tweens.
//! Timers advance once per tick. Cancelling one means removing its key.

use serde::{Deserialize, Serialize};

/// Identifies what a timer drives. At most one timer exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKey {
    /// Repeating obstacle row spawner
    Spawning,
    /// Upward travel of one obstacle (by obstacle id)
    Travel(u32),
    /// Tap-to-slide: stop and snap when it fires
    TapMove,
    /// Player rotation between horizontal and vertical
    OrientationTurn,
    /// Sprite squash/stretch tween
    Squash,
    /// Grapple pull toward the hit point
    GrapplePull,
    /// Raised post-grapple damping, restored when it fires
    DriftDamping,
    /// Fading "miss" line (by line id)
    MissLine(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    Once,
    Forever,
}

/// A single scheduled entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub key: TimerKey,
    pub elapsed: f32,
    pub duration: f32,
    pub repeat: Repeat,
}

impl Timer {
    /// Fraction of the current period elapsed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Arena of timers in insertion order (fired keys come out in that order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Schedule a one-shot timer. Replaces any timer with the same key.
    pub fn schedule(&mut self, key: TimerKey, duration: f32) {
        self.insert(Timer {
            key,
            elapsed: 0.0,
            duration: duration.max(0.0),
            repeat: Repeat::Once,
        });
    }

    /// Schedule a repeating timer. With `fire_immediately` the first firing
    /// happens on the next advance instead of after one full period.
    pub fn schedule_repeating(&mut self, key: TimerKey, period: f32, fire_immediately: bool) {
        let period = period.max(0.0);
        self.insert(Timer {
            key,
            elapsed: if fire_immediately { period } else { 0.0 },
            duration: period,
            repeat: Repeat::Forever,
        });
    }

    fn insert(&mut self, timer: Timer) {
        self.cancel(timer.key);
        self.timers.push(timer);
    }

    /// Remove a timer by key. Returns whether one was scheduled.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key != key);
        self.timers.len() != before
    }

    /// Remove every timer whose key matches
    pub fn cancel_where(&mut self, mut matches: impl FnMut(&TimerKey) -> bool) {
        self.timers.retain(|t| !matches(&t.key));
    }

    pub fn contains(&self, key: TimerKey) -> bool {
        self.timers.iter().any(|t| t.key == key)
    }

    pub fn get(&self, key: TimerKey) -> Option<&Timer> {
        self.timers.iter().find(|t| t.key == key)
    }

    pub fn progress(&self, key: TimerKey) -> Option<f32> {
        self.get(key).map(Timer::progress)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Advance every timer by `dt` and return the keys that fired.
    ///
    /// One-shot timers are removed when they fire. Repeating timers carry
    /// the overshoot into the next period and may fire more than once if
    /// `dt` spans several periods.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerKey> {
        let mut fired = Vec::new();

        for timer in &mut self.timers {
            timer.elapsed += dt;
            match timer.repeat {
                Repeat::Once => {
                    if timer.elapsed >= timer.duration {
                        fired.push(timer.key);
                    }
                }
                Repeat::Forever => {
                    if timer.duration <= 0.0 {
                        fired.push(timer.key);
                        timer.elapsed = 0.0;
                        continue;
                    }
                    while timer.elapsed >= timer.duration {
                        fired.push(timer.key);
                        timer.elapsed -= timer.duration;
                    }
                }
            }
        }

        self.timers
            .retain(|t| t.repeat == Repeat::Forever || t.elapsed < t.duration);

        fired
    }
}
