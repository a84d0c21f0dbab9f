//! Game flow transitions: start, game over, restart

use super::grapple::{GrappleMotion, GrappleState};
use super::schedule::TimerKey;
use super::state::{GameEvent, GamePhase, GameState, Overlay, Player, player_anchor};
use crate::consts::*;

impl GameState {
    /// Enter Running with the initial spawn constants and start spawning
    pub fn start_game(&mut self) {
        self.phase = GamePhase::Running;
        self.spawn_interval = SPAWN_INTERVAL;
        self.scroll_duration = SCROLL_DURATION;
        self.start_spawning();
        log::info!(
            "Run started ({} mode, interval {}s, travel {}s)",
            self.mode.as_str(),
            self.spawn_interval,
            self.scroll_duration
        );
    }

    /// First row spawns on the next tick, then one per interval
    pub fn start_spawning(&mut self) {
        self.timers
            .schedule_repeating(TimerKey::Spawning, self.spawn_interval, true);
    }

    pub fn stop_spawning(&mut self) {
        self.timers.cancel(TimerKey::Spawning);
    }

    pub fn is_spawning(&self) -> bool {
        self.timers.contains(TimerKey::Spawning)
    }

    /// Freeze the run behind the overlay. Calling it again is a no-op.
    pub fn show_game_over(&mut self) {
        if self.is_game_over() {
            return;
        }

        self.stop_spawning();
        self.time_scale = 0.0;
        self.physics_speed = 0.0;
        self.phase = GamePhase::GameOver {
            overlay: Overlay::new(self.scene_size),
        };
        self.events.push(GameEvent::GameOver);

        log::info!(
            "Game over after {:.1}s ({} obstacles on screen)",
            self.time_secs,
            self.obstacles.len()
        );
    }

    /// Drop the overlay, clear the field, reset the player and run again
    pub fn restart(&mut self) {
        self.time_scale = 1.0;
        self.physics_speed = 1.0;

        self.remove_all_obstacles();
        self.reset_player();

        self.events.push(GameEvent::Restarted);
        self.start_game();
    }

    /// Remove every obstacle along with its travel timer
    pub fn remove_all_obstacles(&mut self) {
        self.timers
            .cancel_where(|key| matches!(key, TimerKey::Travel(_)));
        self.obstacles.clear();
    }

    /// Put the player back at the anchor, horizontal and at rest, with no
    /// grapple, slide or fade in progress
    pub fn reset_player(&mut self) {
        self.timers.cancel_where(|key| {
            matches!(
                key,
                TimerKey::TapMove
                    | TimerKey::OrientationTurn
                    | TimerKey::Squash
                    | TimerKey::GrapplePull
                    | TimerKey::DriftDamping
                    | TimerKey::MissLine(_)
            )
        });

        self.player = Player::new(player_anchor(self.scene_size));
        self.grapple = GrappleState::Idle;
        self.grapple_motion = GrappleMotion::default();
        self.miss_lines.clear();
        self.restore_damping = None;
        self.gestures.clear();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::GameMode;
    use crate::sim::{TickInput, tick};

    fn run_for(state: &mut GameState, secs: f32) {
        let ticks = (secs / SIM_DT).round() as u32;
        for _ in 0..ticks {
            tick(state, &TickInput::default(), SIM_DT);
        }
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = GameState::new(5, Vec2::new(390.0, 844.0), GameMode::Orientation);
        state.show_game_over();
        let overlay = *state.overlay().unwrap();
        state.show_game_over();

        assert_eq!(state.overlay(), Some(&overlay));
        assert_eq!(state.time_scale, 0.0);
        assert_eq!(state.physics_speed, 0.0);
        let overs = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::GameOver)
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_game_over_stops_spawning_and_freezes_obstacles() {
        let mut state = GameState::new(5, Vec2::new(390.0, 844.0), GameMode::Orientation);
        state.player.contact_mask = crate::sim::category::NONE;
        run_for(&mut state, 1.0);
        assert!(!state.obstacles.is_empty());

        state.show_game_over();
        assert!(!state.is_spawning());
        let before: Vec<_> = state.obstacles.iter().map(|o| o.rect).collect();
        let count = state.obstacles.len();

        run_for(&mut state, 5.0);
        let after: Vec<_> = state.obstacles.iter().map(|o| o.rect).collect();
        assert_eq!(state.obstacles.len(), count);
        assert_eq!(before, after);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(8, Vec2::new(390.0, 844.0), GameMode::Orientation);
        state.player.contact_mask = crate::sim::category::NONE;
        run_for(&mut state, 2.0);
        state.player.pos = Vec2::new(20.0, 300.0);
        state.player.vertical = true;
        state.spawn_interval = 0.1;
        state.show_game_over();

        state.restart();

        assert!(state.is_running());
        assert!(state.overlay().is_none());
        assert_eq!(state.time_scale, 1.0);
        assert_eq!(state.physics_speed, 1.0);
        assert!(state.obstacles.is_empty());
        assert!(!state.timers.contains(TimerKey::Travel(1)));
        assert_eq!(state.player.pos, Vec2::new(195.0, 724.0));
        assert!(!state.player.vertical);
        assert_eq!(state.player.angle, 0.0);
        assert_eq!(state.spawn_interval, SPAWN_INTERVAL);
        assert_eq!(state.scroll_duration, SCROLL_DURATION);
        assert!(state.is_spawning());
    }

    #[test]
    fn test_restart_from_running_is_safe() {
        let mut state = GameState::new(8, Vec2::new(390.0, 844.0), GameMode::Grapple);
        run_for(&mut state, 1.0);
        state.restart();
        assert!(state.is_running());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.grapple, GrappleState::Idle);
    }
}
