//! Player controller: orientation flips, tap slides, squash visual, motion

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::grapple::GrappleState;
use super::schedule::TimerKey;
use super::state::{AngleTween, GameEvent, GameState, ScaleTween};
use crate::consts::*;

/// Turn the player horizontal or vertical. Returns false if it already was.
pub fn set_orientation(state: &mut GameState, vertical: bool) -> bool {
    if state.player.vertical == vertical {
        return false;
    }

    let player = &mut state.player;
    player.vertical = vertical;
    player.turn = Some(AngleTween {
        from: player.angle,
        to: if vertical { FRAC_PI_2 } else { 0.0 },
    });
    state
        .timers
        .schedule(TimerKey::OrientationTurn, ORIENTATION_TURN_DURATION);
    state.events.push(GameEvent::OrientationChanged { vertical });
    true
}

/// Slide toward `x` (clamped so the body stays on screen), then snap
pub fn tap_move_to(state: &mut GameState, x: f32) {
    let half = state.player.extents().x / 2.0;
    let max_x = (state.scene_size.x - half).max(half);
    let target = x.clamp(half, max_x);

    let player = &mut state.player;
    player.vel = Vec2::new((target - player.pos.x) / TAP_MOVE_DURATION, 0.0);
    player.slide_target_x = Some(target);
    state.timers.schedule(TimerKey::TapMove, TAP_MOVE_DURATION);
}

/// Tap slide finished: stop and land exactly on the target
pub fn finish_tap_move(state: &mut GameState) {
    let player = &mut state.player;
    player.vel = Vec2::ZERO;
    if let Some(x) = player.slide_target_x.take() {
        player.pos.x = x;
    }
    player.refresh_shape();
}

/// Squash the sprite for near-vertical travel, or restore it
pub fn set_visual_squash(state: &mut GameState, vertical: bool) {
    let to = if vertical {
        Vec2::new(SQUASH_SCALE.0, SQUASH_SCALE.1)
    } else {
        Vec2::ONE
    };
    state.player.squash = Some(ScaleTween {
        from: state.player.visual_scale,
        to,
    });
    state.timers.schedule(TimerKey::Squash, SQUASH_DURATION);
}

/// Apply in-flight turn and squash tweens from their timer progress
pub fn update_tweens(state: &mut GameState) {
    if let Some(turn) = state.player.turn {
        if let Some(t) = state.timers.progress(TimerKey::OrientationTurn) {
            state.player.angle = turn.from + (turn.to - turn.from) * t;
        }
    }
    if let Some(squash) = state.player.squash {
        if let Some(t) = state.timers.progress(TimerKey::Squash) {
            state.player.visual_scale = squash.from.lerp(squash.to, t);
        }
    }
    state.player.refresh_shape();
}

pub fn finish_turn(state: &mut GameState) {
    if let Some(turn) = state.player.turn.take() {
        state.player.angle = turn.to;
        state.player.refresh_shape();
    }
}

pub fn finish_squash(state: &mut GameState) {
    if let Some(squash) = state.player.squash.take() {
        state.player.visual_scale = squash.to;
    }
}

/// Integrate velocity, gravity and damping. The body stays inside the
/// scene on both axes. Skipped while a grapple pull drives the position.
pub fn integrate(state: &mut GameState, dt: f32) {
    if dt <= 0.0 || matches!(state.grapple, GrappleState::Pulling { .. }) {
        return;
    }

    let gravity = state.gravity;
    let scene = state.scene_size;
    let player = &mut state.player;

    if player.affected_by_gravity {
        player.vel += gravity * dt;
    }
    player.vel *= 1.0 / (1.0 + dt * player.linear_damping);
    player.pos += player.vel * dt;

    if player.allows_rotation {
        player.angle += player.angular_vel * dt;
    }

    let half = player.extents() / 2.0;
    let max = (scene - half).max(half);
    if player.pos.x < half.x {
        player.pos.x = half.x;
        player.vel.x = 0.0;
    } else if player.pos.x > max.x {
        player.pos.x = max.x;
        player.vel.x = 0.0;
    }
    if player.pos.y < half.y {
        player.pos.y = half.y;
        player.vel.y = 0.0;
    } else if player.pos.y > max.y {
        player.pos.y = max.y;
        player.vel.y = 0.0;
    }

    player.refresh_shape();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameMode;
    use crate::sim::{TickInput, tick};

    fn quiet_state() -> GameState {
        let mut state = GameState::new(3, Vec2::new(390.0, 844.0), GameMode::Orientation);
        state.stop_spawning();
        state
    }

    fn run_ticks(state: &mut GameState, n: u32) {
        for _ in 0..n {
            tick(state, &TickInput::default(), SIM_DT);
        }
    }

    #[test]
    fn test_orientation_change_is_guarded() {
        let mut state = quiet_state();
        assert!(!set_orientation(&mut state, false));
        assert!(set_orientation(&mut state, true));
        assert!(!set_orientation(&mut state, true));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::OrientationChanged { vertical: true }]
        );
    }

    #[test]
    fn test_orientation_turn_completes_with_vertical_shape() {
        let mut state = quiet_state();
        set_orientation(&mut state, true);
        run_ticks(&mut state, 20);

        assert!((state.player.angle - FRAC_PI_2).abs() < 1e-5);
        assert!(state.player.turn.is_none());
        assert!((state.player.shape.width() - PLAYER_HEIGHT).abs() < 1e-3);
        assert!((state.player.shape.height() - PLAYER_WIDTH).abs() < 1e-3);
    }

    #[test]
    fn test_tap_move_snaps_to_clamped_target() {
        let mut state = quiet_state();
        tap_move_to(&mut state, 5.0);
        assert!(state.player.vel.x < 0.0);
        assert_eq!(state.player.vel.y, 0.0);

        run_ticks(&mut state, 20);
        assert_eq!(state.player.pos.x, PLAYER_WIDTH / 2.0);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(state.player.slide_target_x.is_none());
    }

    #[test]
    fn test_tap_move_target_inside_scene() {
        let mut state = quiet_state();
        tap_move_to(&mut state, 300.0);
        run_ticks(&mut state, 20);
        assert_eq!(state.player.pos.x, 300.0);
    }

    #[test]
    fn test_squash_tween() {
        let mut state = quiet_state();
        set_visual_squash(&mut state, true);
        run_ticks(&mut state, 20);
        assert_eq!(state.player.visual_scale, Vec2::new(0.7, 1.25));

        set_visual_squash(&mut state, false);
        run_ticks(&mut state, 20);
        assert_eq!(state.player.visual_scale, Vec2::ONE);
    }

    #[test]
    fn test_integrate_clamps_to_scene() {
        let mut state = quiet_state();
        state.player.vel = Vec2::new(-10_000.0, 0.0);
        integrate(&mut state, 0.1);
        assert_eq!(state.player.pos.x, PLAYER_WIDTH / 2.0);
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_integrate_pulls_body_back_on_screen() {
        let mut state = quiet_state();
        state.player.pos.y = 844.0 + 150.0;
        state.player.vel = Vec2::new(0.0, 40.0);
        integrate(&mut state, SIM_DT);
        assert_eq!(state.player.pos.y, 844.0 - PLAYER_HEIGHT / 2.0);
        assert_eq!(state.player.vel.y, 0.0);
        assert!(state.player.shape.max().y <= 844.0 + 1e-3);
    }

    #[test]
    fn test_integrate_damping_slows_body() {
        let mut state = quiet_state();
        state.player.vel = Vec2::new(100.0, 0.0);
        state.player.linear_damping = DRIFT_DAMPING;
        integrate(&mut state, SIM_DT);
        assert!(state.player.vel.x < 100.0);
        assert!(state.player.vel.x > 90.0);
    }

    #[test]
    fn test_gravity_only_when_enabled() {
        let mut state = quiet_state();
        state.gravity = Vec2::new(0.0, -100.0);
        integrate(&mut state, SIM_DT);
        assert_eq!(state.player.vel.y, 0.0);

        state.player.affected_by_gravity = true;
        integrate(&mut state, SIM_DT);
        assert!(state.player.vel.y < 0.0);
    }
}
