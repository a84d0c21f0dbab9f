//! Falling - a falling-player arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, gestures, grapple, collisions, game flow)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Run configuration and debug toggles

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default scene size (portrait phone, points)
    pub const DEFAULT_SCENE_WIDTH: f32 = 390.0;
    pub const DEFAULT_SCENE_HEIGHT: f32 = 844.0;

    /// Player body, horizontal orientation (rotated by π/2 when vertical)
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Player anchor is this far below the top edge
    pub const PLAYER_TOP_OFFSET: f32 = 120.0;
    /// Default linear damping of the player body
    pub const PLAYER_DAMPING: f32 = 0.1;

    /// Spawning
    pub const SPAWN_INTERVAL: f32 = 0.9;
    pub const SCROLL_DURATION: f32 = 3.5;
    pub const ROW_HEIGHT: f32 = 30.0;
    pub const HOLE_WIDTH_MIN: f32 = 70.0;
    pub const HOLE_WIDTH_MAX: f32 = 160.0;
    /// Segments this narrow (or narrower) are dropped
    pub const MIN_SEGMENT_WIDTH: f32 = 1.0;
    pub const PILLAR_WIDTH: f32 = 20.0;
    pub const PILLAR_HEIGHT_MIN: f32 = 40.0;
    pub const PILLAR_HEIGHT_MAX: f32 = 140.0;
    pub const PILLAR_CHANCE: f64 = 0.5;
    /// Pillars only spawn on scenes wider than this
    pub const PILLAR_MIN_SCENE_WIDTH: f32 = 200.0;
    /// Extra distance past the top edge before an obstacle is removed
    pub const TRAVEL_MARGIN: f32 = 200.0;

    /// Gestures
    pub const SWIPE_MIN_DISTANCE_ORIENTATION: f32 = 30.0;
    pub const SWIPE_MIN_DISTANCE_GRAPPLE: f32 = 20.0;
    pub const SWIPE_MAX_TIME: f64 = 0.6;
    pub const TAP_MOVE_DURATION: f32 = 0.15;
    pub const ORIENTATION_TURN_DURATION: f32 = 0.12;
    pub const SQUASH_DURATION: f32 = 0.12;
    /// Half-width of the near-vertical window for the squash visual (30°)
    pub const SQUASH_ANGLE_WINDOW: f32 = std::f32::consts::PI / 6.0;
    pub const SQUASH_SCALE: (f32, f32) = (0.7, 1.25);

    /// Grapple
    pub const GRAPPLE_RANGE: f32 = 2000.0;
    pub const GRAPPLE_STEPS: u32 = 120;
    pub const GRAPPLE_BOUNDS_MARGIN: f32 = 200.0;
    pub const GRAPPLE_PULL_SPEED: f32 = 300.0;
    pub const GRAPPLE_PULL_DAMPING: f32 = 0.5;
    pub const GRAPPLE_MISS_LENGTH: f32 = 120.0;
    pub const GRAPPLE_MISS_FADE: f32 = 0.25;

    /// Post-grapple drift
    pub const DRIFT_SCALE: f32 = 0.65;
    pub const DRIFT_DAMPING: f32 = 2.0;
    pub const DRIFT_DAMPING_DURATION: f32 = 0.6;

    /// Game-over overlay restart button
    pub const RESTART_BUTTON_WIDTH: f32 = 120.0;
    pub const RESTART_BUTTON_HEIGHT: f32 = 48.0;
    /// Button centre sits this far below the scene centre
    pub const RESTART_BUTTON_DROP: f32 = 20.0;

    /// Placeholder sprite pulse (alpha 1.0 -> 0.6 -> 1.0)
    pub const PLACEHOLDER_PULSE_HALF_PERIOD: f32 = 0.3;
    pub const PLACEHOLDER_PULSE_MIN_ALPHA: f32 = 0.6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle (radians, counter-clockwise from +x)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of a vector (radians, counter-clockwise from +x)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
