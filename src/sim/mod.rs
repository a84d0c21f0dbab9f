//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers advance only through `tick`
//! - No rendering or platform dependencies

pub mod collision;
pub mod flow;
pub mod gesture;
pub mod grapple;
pub mod player;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, ContactBody, OrientedRect, Rect, category, find_contacts, handle_contact, obstacle_at,
};
pub use gesture::{Gesture, GestureTracker, TouchSample, classify};
pub use grapple::{CastResult, GrappleMotion, GrappleState, cancel_grapple, raycast, start_grapple};
pub use schedule::{Scheduler, TimerKey};
pub use spawner::{RowPlan, plan_row, spawn_obstacle_row};
pub use state::{
    GameEvent, GameMode, GamePhase, GameState, MissLine, Obstacle, ObstacleKind, Overlay, Player,
    Snapshot,
};
pub use tick::{TickInput, tick};
