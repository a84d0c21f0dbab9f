//! Fixed timestep simulation tick
//!
//! Order within a tick: input, timers (scaled by time scale), tweens and
//! obstacle travel, player integration (scaled by physics speed), contacts.

use super::collision::{find_contacts, handle_contact};
use super::gesture::{Gesture, TouchSample};
use super::grapple::{self, is_near_vertical};
use super::player;
use super::schedule::TimerKey;
use super::spawner::spawn_obstacle_row;
use super::state::{GameMode, GamePhase, GameState};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Finger/mouse went down
    pub touch_down: Option<TouchSample>,
    /// Finger/mouse went up (processed after `touch_down`)
    pub touch_up: Option<TouchSample>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(sample) = input.touch_down {
        state.gestures.touch_down(sample);
    }
    if let Some(sample) = input.touch_up {
        handle_touch_up(state, sample);
    }

    state.time_ticks += 1;

    let scaled_dt = dt * state.time_scale;
    state.time_secs += scaled_dt;

    for key in state.timers.advance(scaled_dt) {
        on_timer_fired(state, key);
    }

    for obstacle in &mut state.obstacles {
        if let Some(t) = state.timers.progress(TimerKey::Travel(obstacle.id)) {
            obstacle.set_travel_progress(t);
        }
    }
    player::update_tweens(state);
    grapple::update_pull(state);

    player::integrate(state, dt * state.physics_speed);

    let contacts = find_contacts(
        &state.player.body(),
        state.player.category,
        state.player.contact_mask,
        &state.obstacles,
    );
    for contact in &contacts {
        handle_contact(state, contact);
    }
}

fn handle_touch_up(state: &mut GameState, sample: TouchSample) {
    if let GamePhase::GameOver { overlay } = state.phase {
        state.gestures.clear();
        if overlay.restart_button.contains(sample.pos) {
            state.restart();
        }
        return;
    }

    let threshold = state.mode.swipe_threshold();
    let Some(gesture) = state.gestures.touch_up(sample, threshold) else {
        return;
    };

    match (state.mode, gesture) {
        (GameMode::Orientation, Gesture::Tap { at }) => player::tap_move_to(state, at.x),
        (GameMode::Orientation, Gesture::Swipe { delta, .. }) => {
            player::set_orientation(state, delta.y.abs() > delta.x.abs());
        }
        (GameMode::Grapple, Gesture::Tap { .. }) => {
            if state.grapple.is_active() {
                grapple::cancel_grapple(state);
            }
        }
        (GameMode::Grapple, Gesture::Swipe { angle, .. }) => {
            player::set_visual_squash(state, is_near_vertical(angle));
            grapple::start_grapple(state, angle);
        }
    }
}

fn on_timer_fired(state: &mut GameState, key: TimerKey) {
    match key {
        TimerKey::Spawning => {
            spawn_obstacle_row(state);
        }
        TimerKey::Travel(id) => {
            state.obstacles.retain(|o| o.id != id);
        }
        TimerKey::TapMove => player::finish_tap_move(state),
        TimerKey::OrientationTurn => player::finish_turn(state),
        TimerKey::Squash => player::finish_squash(state),
        TimerKey::GrapplePull => grapple::complete_pull(state),
        TimerKey::DriftDamping => grapple::restore_damping(state),
        TimerKey::MissLine(id) => {
            state.miss_lines.retain(|l| l.id != id);
        }
    }
}
