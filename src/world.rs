use macroquad::prelude::*;
use serde::Serialize;

use crate::config;
use crate::spatial_hash::SpatialHash;

/// Category label carried by every obstacle and reported by sensor rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Boundary,
    Block,
    Target,
}

impl Tag {
    pub fn color(self) -> Color {
        match self {
            Tag::Boundary | Tag::Block => BLACK,
            Tag::Target => GREEN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Boundary => "boundary",
            Tag::Block => "block",
            Tag::Target => "target",
        }
    }
}

/// Color reported for a ray that hit nothing.
pub const COLOR_OF_NOTHING: Color = WHITE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub bounds: Rect,
    pub tag: Tag,
}

/// First thing a ray met, or max range with no tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub tag: Option<Tag>,
}

impl RayHit {
    pub fn nothing(max_distance: f32) -> Self {
        Self {
            distance: max_distance,
            tag: None,
        }
    }

    pub fn color(&self) -> Color {
        self.tag.map_or(COLOR_OF_NOTHING, Tag::color)
    }
}

/// Positive-area overlap. Rectangles that only share an edge do not collide.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// Half-open containment: the left and top edges are inside, right and bottom are not.
pub fn rect_contains(r: &Rect, p: Vec2) -> bool {
    p.x >= r.x && p.x < r.x + r.w && p.y >= r.y && p.y < r.y + r.h
}

/// Grow (positive) or shrink (negative) a rectangle about its center.
pub fn inflate(r: &Rect, dw: f32, dh: f32) -> Rect {
    Rect::new(r.x - dw * 0.5, r.y - dh * 0.5, r.w + dw, r.h + dh)
}

/// Append-only obstacle registry for one run.
pub struct World {
    pub width: f32,
    pub height: f32,
    obstacles: Vec<Obstacle>,
    index: SpatialHash,
}

impl World {
    /// Empty arena with no walls.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
            index: SpatialHash::new(width, height, config::SPATIAL_CELL_SIZE),
        }
    }

    /// Arena enclosed by four boundary walls: top, right, bottom, left.
    pub fn with_walls(width: f32, height: f32, thickness: f32) -> Self {
        let mut world = Self::new(width, height);
        world.add_obstacle(Rect::new(0.0, 0.0, width, thickness), Tag::Boundary);
        world.add_obstacle(
            Rect::new(width - thickness, 0.0, thickness, height),
            Tag::Boundary,
        );
        world.add_obstacle(
            Rect::new(0.0, height - thickness, width, thickness),
            Tag::Boundary,
        );
        world.add_obstacle(Rect::new(0.0, 0.0, thickness, height), Tag::Boundary);
        world
    }

    /// Register an obstacle and return its index. Width and height must be non-negative.
    pub fn add_obstacle(&mut self, bounds: Rect, tag: Tag) -> usize {
        debug_assert!(bounds.w >= 0.0 && bounds.h >= 0.0, "negative obstacle size");
        let idx = self.obstacles.len();
        self.index.insert(idx as u32, &bounds);
        self.obstacles.push(Obstacle { bounds, tag });
        idx
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Lowest-index obstacle overlapping `rect`.
    pub fn query_first_intersecting(&self, rect: &Rect) -> Option<usize> {
        let mut best: Option<u32> = None;
        for cell in self.index.cells_covering(rect) {
            for &idx in cell {
                if best.is_some_and(|b| idx >= b) {
                    break;
                }
                if rects_overlap(rect, &self.obstacles[idx as usize].bounds) {
                    best = Some(idx);
                    break;
                }
            }
        }
        best.map(|idx| idx as usize)
    }

    /// Lowest-index obstacle containing `pos`.
    pub fn query_first_at_point(&self, pos: Vec2) -> Option<usize> {
        self.index
            .candidates_at(pos)
            .iter()
            .map(|&idx| idx as usize)
            .find(|&idx| rect_contains(&self.obstacles[idx].bounds, pos))
    }

    /// March along a ray in fixed steps from `step` up to `max_distance` and
    /// report the first sample that lands inside an obstacle.
    ///
    /// `direction` is expected to be unit length. Thin obstacles narrower than
    /// `step` can be stepped over.
    pub fn query_first_along_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        step: f32,
    ) -> RayHit {
        if step <= 0.0 {
            return RayHit::nothing(max_distance);
        }
        let num_steps = (max_distance / step).floor() as usize;
        for k in 1..=num_steps {
            let distance = k as f32 * step;
            if let Some(idx) = self.query_first_at_point(origin + direction * distance) {
                return RayHit {
                    distance,
                    tag: Some(self.obstacles[idx].tag),
                };
            }
        }
        RayHit::nothing(max_distance)
    }
}
