//! Touch gesture interpretation
//!
//! A touch is a tap when it barely moved or was held too long, otherwise a
//! swipe whose direction is the angle of its displacement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle_of;
use crate::consts::SWIPE_MAX_TIME;

/// Touch position (scene coordinates) and timestamp (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub pos: Vec2,
    pub time: f64,
}

impl TouchSample {
    pub fn new(pos: Vec2, time: f64) -> Self {
        Self { pos, time }
    }
}

/// A completed gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short or stationary touch, reported at the release point
    Tap { at: Vec2 },
    /// Quick directional drag
    Swipe { delta: Vec2, angle: f32 },
}

/// Classify a touch from its down and up samples.
///
/// Tap when displacement < `min_distance` or elapsed > 0.6s. A displacement
/// exactly at the threshold is a swipe, as is an elapsed time of exactly 0.6s.
pub fn classify(start: TouchSample, end: TouchSample, min_distance: f32) -> Gesture {
    let delta = end.pos - start.pos;
    let distance = delta.length();
    let elapsed = end.time - start.time;

    if distance < min_distance || elapsed > SWIPE_MAX_TIME {
        Gesture::Tap { at: end.pos }
    } else {
        Gesture::Swipe {
            delta,
            angle: angle_of(delta),
        }
    }
}

/// Remembers the touch-down sample until the matching touch-up
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    start: Option<TouchSample>,
}

impl GestureTracker {
    pub fn touch_down(&mut self, sample: TouchSample) {
        self.start = Some(sample);
    }

    /// Finish the touch. `None` if no touch-down was recorded.
    pub fn touch_up(&mut self, sample: TouchSample, min_distance: f32) -> Option<Gesture> {
        let start = self.start.take()?;
        Some(classify(start, sample, min_distance))
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn clear(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn sample(x: f32, y: f32, time: f64) -> TouchSample {
        TouchSample::new(Vec2::new(x, y), time)
    }

    #[test]
    fn test_threshold_boundary() {
        let start = sample(100.0, 100.0, 0.0);

        // Exactly at the threshold: swipe
        let at = classify(start, sample(130.0, 100.0, 0.1), 30.0);
        assert!(matches!(at, Gesture::Swipe { .. }));

        // Just under: tap
        let under = classify(start, sample(129.99, 100.0, 0.1), 30.0);
        assert_eq!(under, Gesture::Tap { at: Vec2::new(129.99, 100.0) });
    }

    #[test]
    fn test_time_boundary() {
        let start = sample(0.0, 0.0, 10.0);
        let held = classify(start, sample(0.0, 200.0, 10.61), 30.0);
        assert!(matches!(held, Gesture::Tap { .. }));

        let quick = classify(start, sample(0.0, 200.0, 10.5), 30.0);
        assert!(matches!(quick, Gesture::Swipe { .. }));
    }

    #[test]
    fn test_exact_max_time_is_still_a_swipe() {
        let start = sample(0.0, 0.0, 0.0);
        let at_limit = classify(start, sample(200.0, 0.0, 0.6), 30.0);
        assert!(matches!(at_limit, Gesture::Swipe { .. }));

        let just_over = classify(start, sample(200.0, 0.0, 0.6 + 1e-6), 30.0);
        assert_eq!(just_over, Gesture::Tap { at: Vec2::new(200.0, 0.0) });

        let barely_over = classify(start, sample(200.0, 0.0, 0.60000001), 30.0);
        assert!(matches!(barely_over, Gesture::Tap { .. }));
    }

    #[test]
    fn test_swipe_angle() {
        let g = classify(sample(50.0, 50.0, 0.0), sample(50.0, 150.0, 0.2), 20.0);
        match g {
            Gesture::Swipe { delta, angle } => {
                assert_eq!(delta, Vec2::new(0.0, 100.0));
                assert!((angle - FRAC_PI_2).abs() < 1e-5);
            }
            other => panic!("expected swipe, got {other:?}"),
        }
    }

    #[test]
    fn test_tracker_requires_touch_down() {
        let mut tracker = GestureTracker::default();
        assert!(tracker.touch_up(sample(0.0, 0.0, 0.0), 30.0).is_none());

        tracker.touch_down(sample(0.0, 0.0, 0.0));
        assert!(tracker.is_tracking());
        assert!(tracker.touch_up(sample(5.0, 0.0, 0.1), 30.0).is_some());
        assert!(!tracker.is_tracking());
        assert!(tracker.touch_up(sample(5.0, 0.0, 0.2), 30.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_fast_long_touches_are_swipes(
            angle in -3.1f32..3.1,
            extra in 0.5f32..500.0,
            elapsed in 0.0f64..0.59,
            threshold in prop::sample::select(vec![20.0f32, 30.0]),
        ) {
            let start = sample(200.0, 400.0, 3.0);
            let end_pos = start.pos + Vec2::new(angle.cos(), angle.sin()) * (threshold + extra);
            let gesture = classify(start, TouchSample::new(end_pos, 3.0 + elapsed), threshold);
            prop_assert!(matches!(gesture, Gesture::Swipe { .. }), "{:?}", gesture);
        }

        #[test]
        fn prop_short_or_slow_touches_are_taps(
            angle in -3.1f32..3.1,
            fraction in 0.0f32..0.98,
            slow in any::<bool>(),
            threshold in prop::sample::select(vec![20.0f32, 30.0]),
        ) {
            let start = sample(200.0, 400.0, 1.0);
            let (length, elapsed) = if slow {
                (threshold * (1.0 + fraction * 10.0), 0.7)
            } else {
                (threshold * fraction, 0.1)
            };
            let end_pos = start.pos + Vec2::new(angle.cos(), angle.sin()) * length;
            let gesture = classify(start, TouchSample::new(end_pos, 1.0 + elapsed), threshold);
            prop_assert_eq!(gesture, Gesture::Tap { at: end_pos });
        }
    }
}
