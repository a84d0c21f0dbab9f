//! Builds the frame's vertex list from the simulation state

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{PLACEHOLDER_PULSE_HALF_PERIOD, PLACEHOLDER_PULSE_MIN_ALPHA};
use crate::settings::Settings;
use crate::sim::{GameState, GrappleState, ObstacleKind, TimerKey};

const GRAPPLE_LINE_WIDTH: f32 = 2.0;
const MISS_LINE_WIDTH: f32 = 2.0;
const OUTLINE_WIDTH: f32 = 1.0;

/// Alpha of the pulsing player placeholder: 1.0 → 0.6 → 1.0 each cycle
pub fn placeholder_alpha(time_secs: f32) -> f32 {
    let half = PLACEHOLDER_PULSE_HALF_PERIOD;
    let phase = time_secs.rem_euclid(half * 2.0);
    let t = if phase < half {
        phase / half
    } else {
        2.0 - phase / half
    };
    1.0 - (1.0 - PLACEHOLDER_PULSE_MIN_ALPHA) * t
}

/// Vertices for the whole scene, back to front
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6 * (state.node_count() + 4));

    for obstacle in &state.obstacles {
        let color = match obstacle.kind {
            ObstacleKind::RowSegment => colors::ROW_SEGMENT,
            ObstacleKind::Pillar => colors::PILLAR,
        };
        vertices.extend(shapes::rect(&obstacle.rect, color));
    }

    for miss in &state.miss_lines {
        let fade = state.timers.progress(TimerKey::MissLine(miss.id)).unwrap_or(1.0);
        let color = colors::with_alpha(colors::MISS_LINE, 1.0 - fade);
        vertices.extend(shapes::line(miss.from, miss.to, MISS_LINE_WIDTH, color));
    }

    if let GrappleState::Pulling { target, .. } = state.grapple {
        vertices.extend(shapes::line(
            state.player.pos,
            target,
            GRAPPLE_LINE_WIDTH,
            colors::GRAPPLE_LINE,
        ));
    }

    let player = &state.player;
    let alpha = placeholder_alpha(state.time_secs);
    vertices.extend(shapes::rotated_rect(
        player.pos,
        player.size * player.visual_scale,
        player.angle,
        colors::with_alpha(colors::PLAYER, alpha),
    ));

    if settings.show_physics {
        vertices.extend(shapes::rect_outline(&player.shape, OUTLINE_WIDTH, colors::DEBUG_OUTLINE));
        for obstacle in &state.obstacles {
            vertices.extend(shapes::rect_outline(&obstacle.rect, OUTLINE_WIDTH, colors::DEBUG_OUTLINE));
        }
    }

    if let Some(overlay) = state.overlay() {
        vertices.extend(shapes::rect(&overlay.backdrop, colors::OVERLAY_BG));
        vertices.extend(shapes::rect(&overlay.restart_button, colors::BUTTON));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameMode;
    use glam::Vec2;

    #[test]
    fn test_placeholder_pulse() {
        assert!((placeholder_alpha(0.0) - 1.0).abs() < 1e-5);
        assert!((placeholder_alpha(0.3) - 0.6).abs() < 1e-4);
        assert!((placeholder_alpha(0.15) - 0.8).abs() < 1e-4);
        assert!((placeholder_alpha(0.6) - 1.0).abs() < 1e-4);
        assert!((placeholder_alpha(0.9) - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_scene_contains_player_only_at_start() {
        let state = GameState::new(1, Vec2::new(390.0, 844.0), GameMode::Orientation);
        let vertices = build_scene(&state, &Settings::default());
        assert_eq!(vertices.len(), 6);
    }

    #[test]
    fn test_overlay_and_outlines() {
        let mut state = GameState::new(1, Vec2::new(390.0, 844.0), GameMode::Orientation);
        state.show_game_over();

        let plain = build_scene(&state, &Settings::default());
        // Player, backdrop, button
        assert_eq!(plain.len(), 18);

        let debug = Settings {
            show_physics: true,
            ..Settings::default()
        };
        // Plus the player outline
        assert_eq!(build_scene(&state, &debug).len(), 18 + 24);
    }
}
