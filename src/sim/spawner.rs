//! Obstacle row generation
//!
//! Each row is a platform with a random hole, split into a left and right
//! segment, plus an optional pillar. Every shape gets a travel timer that
//! carries it up past the top edge and removes it when done.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::schedule::TimerKey;
use super::state::{GameEvent, GameState, Obstacle, ObstacleKind};
use crate::consts::*;

/// Horizontal layout of one row, before degenerate segments are dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlan {
    pub hole_width: f32,
    /// Hole centre x
    pub hole_x: f32,
    pub left_width: f32,
    pub right_width: f32,
    pub pillar: Option<PillarPlan>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillarPlan {
    /// Left edge x
    pub x: f32,
    pub height: f32,
}

impl RowPlan {
    pub fn has_left(&self) -> bool {
        self.left_width > MIN_SEGMENT_WIDTH
    }

    pub fn has_right(&self) -> bool {
        self.right_width > MIN_SEGMENT_WIDTH
    }

    /// Number of obstacles this row emits
    pub fn obstacle_count(&self) -> usize {
        usize::from(self.has_left()) + usize::from(self.has_right()) + usize::from(self.pillar.is_some())
    }
}

/// Roll a row layout for a scene of the given width
pub fn plan_row<R: Rng>(rng: &mut R, scene_width: f32) -> RowPlan {
    let hole_width = rng
        .random_range(HOLE_WIDTH_MIN..=HOLE_WIDTH_MAX)
        .min(scene_width.max(0.0));
    let half = hole_width / 2.0;

    let hole_x = if scene_width - half > half {
        rng.random_range(half..=scene_width - half)
    } else {
        scene_width / 2.0
    };

    let left_width = hole_x - half;
    let right_width = scene_width - (hole_x + half);

    let pillar = if rng.random_bool(PILLAR_CHANCE) && scene_width > PILLAR_MIN_SCENE_WIDTH {
        Some(PillarPlan {
            height: rng.random_range(PILLAR_HEIGHT_MIN..=PILLAR_HEIGHT_MAX),
            x: rng.random_range(0.0..=scene_width - PILLAR_WIDTH),
        })
    } else {
        None
    };

    RowPlan {
        hole_width,
        hole_x,
        left_width,
        right_width,
        pillar,
    }
}

/// Emit one row of obstacles below the screen. Returns how many were added.
pub fn spawn_obstacle_row(state: &mut GameState) -> usize {
    let plan = plan_row(&mut state.rng, state.scene_size.x);
    let row_y = -ROW_HEIGHT;
    let row_bottom = row_y - ROW_HEIGHT / 2.0;
    let mut segments = 0;

    if plan.has_left() {
        let rect = Rect::new(
            Vec2::new(0.0, row_bottom),
            Vec2::new(plan.left_width, ROW_HEIGHT),
        );
        add_obstacle(state, ObstacleKind::RowSegment, rect);
        segments += 1;
    }

    if plan.has_right() {
        let rect = Rect::new(
            Vec2::new(plan.hole_x + plan.hole_width / 2.0, row_bottom),
            Vec2::new(plan.right_width, ROW_HEIGHT),
        );
        add_obstacle(state, ObstacleKind::RowSegment, rect);
        segments += 1;
    }

    if let Some(pillar) = plan.pillar {
        let rect = Rect::new(
            Vec2::new(pillar.x, -pillar.height),
            Vec2::new(PILLAR_WIDTH, pillar.height),
        );
        add_obstacle(state, ObstacleKind::Pillar, rect);
    }

    log::trace!(
        "Row spawned: hole {:.0} at {:.0}, {} segments, pillar {}",
        plan.hole_width,
        plan.hole_x,
        segments,
        plan.pillar.is_some()
    );
    state.events.push(GameEvent::RowSpawned {
        segments,
        pillar: plan.pillar.is_some(),
    });

    plan.obstacle_count()
}

/// Add an obstacle and schedule its upward travel
fn add_obstacle(state: &mut GameState, kind: ObstacleKind, rect: Rect) {
    let id = state.next_entity_id();
    let travel = state.scene_size.y + rect.height() + TRAVEL_MARGIN;
    state.obstacles.push(Obstacle::new(id, kind, rect, travel));
    state
        .timers
        .schedule(TimerKey::Travel(id), state.scroll_duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameMode;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_thousand_rows_respect_bounds() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let width = 390.0;

        for _ in 0..1000 {
            let plan = plan_row(&mut rng, width);
            assert!((HOLE_WIDTH_MIN..=HOLE_WIDTH_MAX).contains(&plan.hole_width));
            assert!(plan.hole_x - plan.hole_width / 2.0 >= 0.0);
            assert!(plan.hole_x + plan.hole_width / 2.0 <= width + 1e-3);
            let total = plan.left_width + plan.hole_width + plan.right_width;
            assert!((total - width).abs() < 1e-3, "widths sum to {total}");

            if let Some(pillar) = plan.pillar {
                assert!((PILLAR_HEIGHT_MIN..=PILLAR_HEIGHT_MAX).contains(&pillar.height));
                assert!(pillar.x >= 0.0 && pillar.x + PILLAR_WIDTH <= width + 1e-3);
            }
        }
    }

    #[test]
    fn test_pillar_chance_is_roughly_half() {
        let mut rng = Pcg32::seed_from_u64(7);
        let pillars = (0..1000)
            .filter(|_| plan_row(&mut rng, 390.0).pillar.is_some())
            .count();
        assert!((400..600).contains(&pillars), "{pillars} pillars");
    }

    #[test]
    fn test_narrow_scene_never_gets_pillars() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            assert!(plan_row(&mut rng, 200.0).pillar.is_none());
        }
    }

    #[test]
    fn test_degenerate_segments_are_dropped() {
        let plan = RowPlan {
            hole_width: 100.0,
            hole_x: 50.5,
            left_width: 0.5,
            right_width: 289.5,
            pillar: None,
        };
        assert!(!plan.has_left());
        assert!(plan.has_right());
        assert_eq!(plan.obstacle_count(), 1);

        let exact = RowPlan { left_width: 1.0, ..plan };
        assert!(!exact.has_left());
    }

    #[test]
    fn test_spawned_row_geometry_and_timers() {
        let mut state = GameState::new(99, Vec2::new(390.0, 844.0), GameMode::Orientation);
        let added = spawn_obstacle_row(&mut state);

        assert_eq!(added, state.obstacles.len());
        assert!(added >= 1);
        for obstacle in &state.obstacles {
            assert!(obstacle.rect.max().y <= 0.0);
            let timer = state.timers.get(TimerKey::Travel(obstacle.id)).unwrap();
            assert_eq!(timer.duration, SCROLL_DURATION);
            let expected = 844.0 + obstacle.rect.height() + TRAVEL_MARGIN;
            assert!((obstacle.travel - expected).abs() < 1e-4);
        }

        let segments: Vec<_> = state
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::RowSegment)
            .collect();
        for s in &segments {
            assert_eq!(s.rect.height(), ROW_HEIGHT);
            assert_eq!(s.rect.center().y, -ROW_HEIGHT);
        }
    }

    proptest! {
        #[test]
        fn prop_hole_fits_any_reasonable_width(seed in any::<u64>(), width in 170.0f32..2000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = plan_row(&mut rng, width);
            prop_assert!(plan.left_width >= -1e-3);
            prop_assert!(plan.right_width >= -1e-3);
            prop_assert!((plan.left_width + plan.hole_width + plan.right_width - width).abs() < 1e-2);
        }
    }
}
