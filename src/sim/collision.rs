//! Collision shapes, contact detection and the contact handler
//!
//! Obstacles are axis-aligned rectangles that only translate. The player is
//! an oriented rectangle: its axis-aligned bounding box is the broad phase,
//! and a separating-axis test on the body's own axes confirms the contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Obstacle};

/// Category bitmasks used to decide which pairs generate contacts
pub mod category {
    pub const NONE: u32 = 0;
    pub const PLAYER: u32 = 0x1 << 0;
    pub const OBSTACLE: u32 = 0x1 << 1;
}

/// Axis-aligned rectangle (y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Area overlap. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Grow on every side by `margin`
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }
}

/// Bounding-box extents of a `size` rectangle rotated by `angle`
pub fn rotated_extents(size: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        (size.x * cos).abs() + (size.y * sin).abs(),
        (size.x * sin).abs() + (size.y * cos).abs(),
    )
}

/// Rectangle rotated about its centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    pub center: Vec2,
    /// Unrotated full size
    pub size: Vec2,
    pub angle: f32,
}

impl OrientedRect {
    pub fn new(center: Vec2, size: Vec2, angle: f32) -> Self {
        Self { center, size, angle }
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.center, rotated_extents(self.size, self.angle))
    }

    /// Strict overlap with an axis-aligned rectangle (touching edges do not
    /// count). The world axes are covered by the bounds test, the body's two
    /// local axes by projection.
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        if !self.bounds().overlaps(rect) {
            return false;
        }

        let rect_half = rect.size * 0.5;
        let offset = rect.center() - self.center;
        let axis_u = Vec2::from_angle(self.angle);
        let axis_v = axis_u.perp();

        [(axis_u, self.size.x * 0.5), (axis_v, self.size.y * 0.5)]
            .into_iter()
            .all(|(axis, body_radius)| {
                let rect_radius = rect_half.x * axis.x.abs() + rect_half.y * axis.y.abs();
                offset.dot(axis).abs() < body_radius + rect_radius
            })
    }
}

/// One side of a contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub category: u32,
    /// Set when the body is an obstacle
    pub obstacle_id: Option<u32>,
}

/// A begin-contact between two bodies (order is arbitrary)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub body_a: ContactBody,
    pub body_b: ContactBody,
}

/// Contacts between the player body and every obstacle it can report
pub fn find_contacts(
    player_body: &OrientedRect,
    player_category: u32,
    player_contact_mask: u32,
    obstacles: &[Obstacle],
) -> Vec<Contact> {
    let broad = player_body.bounds();
    obstacles
        .iter()
        .filter(|o| o.category & player_contact_mask != 0)
        .filter(|o| o.rect.overlaps(&broad) && player_body.overlaps_rect(&o.rect))
        .map(|o| Contact {
            body_a: ContactBody {
                category: o.category,
                obstacle_id: Some(o.id),
            },
            body_b: ContactBody {
                category: player_category,
                obstacle_id: None,
            },
        })
        .collect()
}

/// First obstacle (in spawn order) containing the point
pub fn obstacle_at(obstacles: &[Obstacle], point: Vec2) -> Option<&Obstacle> {
    obstacles
        .iter()
        .find(|o| o.category & category::OBSTACLE != 0 && o.rect.contains(point))
}

/// Contact callback: a player touching an obstacle while running ends the run
pub fn handle_contact(state: &mut GameState, contact: &Contact) {
    let other = if contact.body_a.category == category::PLAYER {
        contact.body_b
    } else if contact.body_b.category == category::PLAYER {
        contact.body_a
    } else {
        return;
    };

    if other.category == category::OBSTACLE && state.is_running() {
        log::debug!("Player hit obstacle {:?}", other.obstacle_id);
        state.show_game_over();
    }
}
