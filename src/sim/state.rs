//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{OrientedRect, Rect, category, rotated_extents};
use super::gesture::GestureTracker;
use super::grapple::{GrappleMotion, GrappleState};
use super::schedule::Scheduler;
use crate::consts::*;

/// Which control scheme the run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Swipes flip the player between horizontal and vertical, taps slide it
    #[default]
    Orientation,
    /// Swipes fire a grappling hook, taps release it
    Grapple,
}

impl GameMode {
    /// Minimum displacement for a touch to count as a swipe
    pub fn swipe_threshold(&self) -> f32 {
        match self {
            GameMode::Orientation => SWIPE_MIN_DISTANCE_ORIENTATION,
            GameMode::Grapple => SWIPE_MIN_DISTANCE_GRAPPLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Orientation => "orientation",
            GameMode::Grapple => "grapple",
        }
    }
}

/// Modal game-over overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Dimmed full-scene backdrop
    pub backdrop: Rect,
    /// Tapping inside this region restarts the run
    pub restart_button: Rect,
}

impl Overlay {
    pub fn new(scene_size: Vec2) -> Self {
        let center = scene_size * 0.5;
        Self {
            backdrop: Rect::new(Vec2::ZERO, scene_size),
            restart_button: Rect::from_center(
                Vec2::new(center.x, center.y - RESTART_BUTTON_DROP),
                Vec2::new(RESTART_BUTTON_WIDTH, RESTART_BUTTON_HEIGHT),
            ),
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Obstacles spawn and scroll, input steers the player
    Running,
    /// Simulation frozen behind the overlay until restart
    GameOver { overlay: Overlay },
}

/// In-flight angle tween of the player body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleTween {
    pub from: f32,
    pub to: f32,
}

/// In-flight visual scale tween of the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTween {
    pub from: Vec2,
    pub to: Vec2,
}

/// The player body. Its collision shape is a single record updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub pos: Vec2,
    /// Unrotated body size (horizontal orientation)
    pub size: Vec2,
    /// Body rotation (radians)
    pub angle: f32,
    /// Binary orientation target (angle π/2 when settled)
    pub vertical: bool,
    pub vel: Vec2,
    pub angular_vel: f32,
    pub linear_damping: f32,
    pub affected_by_gravity: bool,
    pub allows_rotation: bool,
    pub category: u32,
    pub contact_mask: u32,
    /// Sprite scale (visual only)
    pub visual_scale: Vec2,
    /// Broad-phase collision bounds derived from pos, size and angle
    pub shape: Rect,
    /// Destination of an in-progress tap slide
    pub slide_target_x: Option<f32>,
    pub turn: Option<AngleTween>,
    pub squash: Option<ScaleTween>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let mut player = Self {
            pos,
            size,
            angle: 0.0,
            vertical: false,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            linear_damping: PLAYER_DAMPING,
            affected_by_gravity: false,
            allows_rotation: false,
            category: category::PLAYER,
            contact_mask: category::OBSTACLE,
            visual_scale: Vec2::ONE,
            shape: Rect::from_center(pos, size),
            slide_target_x: None,
            turn: None,
            squash: None,
        };
        player.refresh_shape();
        player
    }

    /// Bounding-box extents at the current angle
    pub fn extents(&self) -> Vec2 {
        rotated_extents(self.size, self.angle)
    }

    /// The rotated body used for the narrow-phase contact test
    pub fn body(&self) -> OrientedRect {
        OrientedRect::new(self.pos, self.size, self.angle)
    }

    /// Recompute the collision shape from position, size and angle
    pub fn refresh_shape(&mut self) {
        self.shape = Rect::from_center(self.pos, self.extents());
    }

    /// Stop all motion and hand position control to a grapple pull
    pub fn freeze_for_pull(&mut self) {
        self.vel = Vec2::ZERO;
        self.angular_vel = 0.0;
        self.allows_rotation = false;
        self.affected_by_gravity = false;
        self.linear_damping = GRAPPLE_PULL_DAMPING;
        self.slide_target_x = None;
    }
}

/// Obstacle shapes the spawner emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Left or right half of a gapped platform row
    RowSegment,
    /// Vertical wall piece
    Pillar,
}

/// A static obstacle translating straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Current bounds
    pub rect: Rect,
    /// Bounds' min corner at spawn time
    pub origin: Vec2,
    /// Total upward distance covered over the travel timer
    pub travel: f32,
    pub category: u32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, rect: Rect, travel: f32) -> Self {
        Self {
            id,
            kind,
            rect,
            origin: rect.min,
            travel,
            category: category::OBSTACLE,
        }
    }

    /// Place the obstacle along its travel path (`t` in [0, 1])
    pub fn set_travel_progress(&mut self, t: f32) {
        self.rect.min = self.origin + Vec2::new(0.0, self.travel * t);
    }
}

/// Short line left behind by a grapple that hit nothing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissLine {
    pub id: u32,
    pub from: Vec2,
    pub to: Vec2,
}

/// Notifications for the frontend (drained each frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RowSpawned { segments: u32, pillar: bool },
    OrientationChanged { vertical: bool },
    GrappleHit { target: Vec2 },
    GrappleMiss,
    GrappleReleased { drift: Option<f32> },
    GameOver,
    Restarted,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    /// Scene size in points (origin bottom-left, y up)
    pub scene_size: Vec2,
    pub phase: GamePhase,
    /// Seconds between obstacle rows
    pub spawn_interval: f32,
    /// Seconds an obstacle takes to cross the scene
    pub scroll_duration: f32,
    /// Multiplier on timer/tween time (0 while game over)
    pub time_scale: f32,
    /// Multiplier on physics integration (0 while game over)
    pub physics_speed: f32,
    /// World gravity applied to bodies that accept it
    pub gravity: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Scaled seconds elapsed (drives visual animation)
    pub time_secs: f32,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub grapple: GrappleState,
    pub grapple_motion: GrappleMotion,
    pub miss_lines: Vec<MissLine>,
    pub timers: Scheduler,
    pub gestures: GestureTracker,
    pub events: Vec<GameEvent>,
    /// Damping to put back when the drift boost expires
    pub(crate) restore_damping: Option<f32>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new running game with the given seed
    pub fn new(seed: u64, scene_size: Vec2, mode: GameMode) -> Self {
        let mut state = Self {
            seed,
            mode,
            scene_size,
            phase: GamePhase::Running,
            spawn_interval: SPAWN_INTERVAL,
            scroll_duration: SCROLL_DURATION,
            time_scale: 1.0,
            physics_speed: 1.0,
            gravity: Vec2::ZERO,
            time_ticks: 0,
            time_secs: 0.0,
            player: Player::new(player_anchor(scene_size)),
            obstacles: Vec::new(),
            grapple: GrappleState::Idle,
            grapple_motion: GrappleMotion::default(),
            miss_lines: Vec::new(),
            timers: Scheduler::new(),
            gestures: GestureTracker::default(),
            events: Vec::new(),
            restore_damping: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        state.start_game();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match &self.phase {
            GamePhase::GameOver { overlay } => Some(overlay),
            GamePhase::Running => None,
        }
    }

    /// Scene bounds as a rectangle
    pub fn scene_rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.scene_size)
    }

    /// Number of drawable nodes (debug HUD)
    pub fn node_count(&self) -> usize {
        let grapple_line = usize::from(self.grapple.target().is_some());
        let overlay = if self.is_game_over() { 2 } else { 0 };
        1 + self.obstacles.len() + self.miss_lines.len() + grapple_line + overlay
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serializable summary for logs and headless runs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            mode: self.mode,
            phase: if self.is_running() { "running" } else { "game_over" },
            time_ticks: self.time_ticks,
            time_secs: self.time_secs,
            obstacles: self.obstacles.len(),
            player_pos: self.player.pos,
            player_vertical: self.player.vertical,
            grappling: self.grapple.is_active(),
            spawning: self.is_spawning(),
        }
    }
}

/// Fixed top-centre spawn point of the player
pub fn player_anchor(scene_size: Vec2) -> Vec2 {
    Vec2::new(scene_size.x / 2.0, scene_size.y - PLAYER_TOP_OFFSET)
}

/// Point-in-time summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub seed: u64,
    pub mode: GameMode,
    pub phase: &'static str,
    pub time_ticks: u64,
    pub time_secs: f32,
    pub obstacles: usize,
    pub player_pos: Vec2,
    pub player_vertical: bool,
    pub grappling: bool,
    pub spawning: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_new_state_is_running_and_spawning() {
        let state = GameState::new(42, Vec2::new(390.0, 844.0), GameMode::Orientation);
        assert!(state.is_running());
        assert!(state.is_spawning());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos, Vec2::new(195.0, 724.0));
        assert_eq!(state.spawn_interval, SPAWN_INTERVAL);
        assert_eq!(state.scroll_duration, SCROLL_DURATION);
    }

    #[test]
    fn test_player_shape_follows_angle() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!((player.shape.width() - PLAYER_WIDTH).abs() < 1e-4);
        assert!((player.shape.height() - PLAYER_HEIGHT).abs() < 1e-4);

        player.angle = FRAC_PI_2;
        player.refresh_shape();
        assert!((player.shape.width() - PLAYER_HEIGHT).abs() < 1e-3);
        assert!((player.shape.height() - PLAYER_WIDTH).abs() < 1e-3);
        assert!((player.shape.center() - player.pos).length() < 1e-4);
    }

    #[test]
    fn test_obstacle_travel_progress() {
        let rect = Rect::new(Vec2::new(0.0, -45.0), Vec2::new(100.0, 30.0));
        let mut obstacle = Obstacle::new(1, ObstacleKind::RowSegment, rect, 1000.0);
        obstacle.set_travel_progress(0.5);
        assert_eq!(obstacle.rect.min, Vec2::new(0.0, 455.0));
        obstacle.set_travel_progress(1.0);
        assert_eq!(obstacle.rect.min, Vec2::new(0.0, 955.0));
    }

    #[test]
    fn test_overlay_button_position() {
        let overlay = Overlay::new(Vec2::new(400.0, 800.0));
        assert_eq!(overlay.restart_button.center(), Vec2::new(200.0, 380.0));
        assert_eq!(overlay.restart_button.size, Vec2::new(120.0, 48.0));
    }

    #[test]
    fn test_mode_thresholds() {
        assert_eq!(GameMode::Orientation.swipe_threshold(), 30.0);
        assert_eq!(GameMode::Grapple.swipe_threshold(), 20.0);
    }
}
