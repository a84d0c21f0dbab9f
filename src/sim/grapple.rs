//! Grapple: cast along a swipe, pull to the first obstacle hit, drift after
//!
//! Idle -> Casting -> Pulling -> Idle. Any non-idle state cancels to Idle.
//! Leaving Pulling (completion or cancel) hands the player a horizontal
//! drift built from the last pull direction and speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, obstacle_at};
use super::schedule::TimerKey;
use super::state::{GameEvent, GameState, MissLine, Obstacle};
use crate::consts::*;
use crate::{direction_from_angle, normalize_angle};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GrappleState {
    #[default]
    Idle,
    /// Probing along `direction` for an obstacle
    Casting { direction: Vec2 },
    /// Being pulled from `from` to `target`
    Pulling {
        from: Vec2,
        target: Vec2,
        direction: Vec2,
        speed: f32,
    },
}

impl GrappleState {
    pub fn is_active(&self) -> bool {
        !matches!(self, GrappleState::Idle)
    }

    pub fn target(&self) -> Option<Vec2> {
        match self {
            GrappleState::Pulling { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// Direction and speed of the last pull, consumed by the drift
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GrappleMotion {
    pub direction: Vec2,
    pub speed: f32,
}

/// Outcome of a grapple cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastResult {
    Hit { point: Vec2, obstacle_id: u32 },
    Miss,
}

/// Step from `origin` along `direction` and return the first obstacle hit.
///
/// Samples outside the scene bounds grown by the bounds margin are skipped.
pub fn raycast(origin: Vec2, direction: Vec2, obstacles: &[Obstacle], bounds: Rect) -> CastResult {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return CastResult::Miss;
    }

    let bounds = bounds.expanded(GRAPPLE_BOUNDS_MARGIN);
    let step = GRAPPLE_RANGE / GRAPPLE_STEPS as f32;

    for i in 1..=GRAPPLE_STEPS {
        let point = origin + direction * (step * i as f32);
        if !bounds.contains(point) {
            continue;
        }
        if let Some(obstacle) = obstacle_at(obstacles, point) {
            return CastResult::Hit {
                point,
                obstacle_id: obstacle.id,
            };
        }
    }

    CastResult::Miss
}

/// Ease-in timing curve for the pull
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Whether a swipe angle lies within the squash window around straight up
/// or straight down
pub fn is_near_vertical(angle: f32) -> bool {
    (normalize_angle(angle).abs() - std::f32::consts::FRAC_PI_2).abs() <= SQUASH_ANGLE_WINDOW
}

/// Fire the grapple along `angle`. An active grapple is released first.
pub fn start_grapple(state: &mut GameState, angle: f32) {
    if state.grapple.is_active() {
        cancel_grapple(state);
    }

    let direction = direction_from_angle(angle);
    state.grapple = GrappleState::Casting { direction };

    let origin = state.player.pos;
    match raycast(origin, direction, &state.obstacles, state.scene_rect()) {
        CastResult::Hit { point, obstacle_id } => {
            state.timers.cancel(TimerKey::TapMove);
            state.player.freeze_for_pull();

            let speed = GRAPPLE_PULL_SPEED;
            let duration = (point - origin).length() / speed;
            state.grapple = GrappleState::Pulling {
                from: origin,
                target: point,
                direction,
                speed,
            };
            state.grapple_motion = GrappleMotion { direction, speed };
            state.timers.schedule(TimerKey::GrapplePull, duration);
            state.events.push(GameEvent::GrappleHit { target: point });

            log::debug!(
                "Grapple hit obstacle {} at ({:.0}, {:.0}), pull {:.2}s",
                obstacle_id,
                point.x,
                point.y,
                duration
            );
        }
        CastResult::Miss => {
            let id = state.next_entity_id();
            state.miss_lines.push(MissLine {
                id,
                from: origin,
                to: origin + direction * GRAPPLE_MISS_LENGTH,
            });
            state
                .timers
                .schedule(TimerKey::MissLine(id), GRAPPLE_MISS_FADE);
            state.grapple = GrappleState::Idle;
            state.events.push(GameEvent::GrappleMiss);

            log::debug!("Grapple missed (angle {:.2})", angle);
        }
    }
}

/// Move the player along the pull curve from the pull timer's progress
pub fn update_pull(state: &mut GameState) {
    if let GrappleState::Pulling { from, target, .. } = state.grapple {
        if let Some(t) = state.timers.progress(TimerKey::GrapplePull) {
            state.player.pos = from.lerp(target, ease_in(t));
            state.player.refresh_shape();
        }
    }
}

/// Pull timer finished: land on the target and release
pub fn complete_pull(state: &mut GameState) {
    if let GrappleState::Pulling { target, .. } = state.grapple {
        state.player.pos = target;
        state.player.refresh_shape();
    }
    release(state);
}

/// Let go of the grapple. Returns whether one was active.
pub fn cancel_grapple(state: &mut GameState) -> bool {
    let was_active = state.grapple.is_active();
    state.timers.cancel(TimerKey::GrapplePull);
    release(state);
    was_active
}

fn release(state: &mut GameState) {
    let was_active = state.grapple.is_active();
    state.grapple = GrappleState::Idle;
    let drift = apply_drift(state);
    if was_active {
        state.events.push(GameEvent::GrappleReleased { drift });
    }
}

/// Carry the pull's momentum into a horizontal drift, once.
///
/// Returns the horizontal velocity applied, or `None` when there was no
/// stored motion to apply.
pub fn apply_drift(state: &mut GameState) -> Option<f32> {
    let motion = std::mem::take(&mut state.grapple_motion);
    let direction = motion.direction.normalize_or_zero();
    if motion.speed <= 0.0 || direction == Vec2::ZERO {
        return None;
    }

    let vx = direction.x * motion.speed * DRIFT_SCALE;
    state.player.vel.x = vx;

    let current = state.player.linear_damping;
    state.restore_damping.get_or_insert(current);
    state.player.linear_damping = current.max(DRIFT_DAMPING);
    state
        .timers
        .schedule(TimerKey::DriftDamping, DRIFT_DAMPING_DURATION);

    Some(vx)
}

/// Drift boost expired: put the damping back
pub fn restore_damping(state: &mut GameState) {
    if let Some(damping) = state.restore_damping.take() {
        state.player.linear_damping = damping;
    }
}
