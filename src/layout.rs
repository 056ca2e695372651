use ::rand::Rng;
use macroquad::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::config::{self, SimConfig};
use crate::world::{rects_overlap, Tag, World};

/// Obstacle arrangement placed inside the boundary walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Random,
    LayoutA,
    LayoutB,
}

impl Layout {
    /// Preset ids 1 and 2 name the fixed layouts; anything else is random.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Self::LayoutA,
            2 => Self::LayoutB,
            _ => Self::Random,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Self::Random => 0,
            Self::LayoutA => 1,
            Self::LayoutB => 2,
        }
    }

    pub fn parse_cli(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "random" | "0" => Some(Self::Random),
            "a" | "layout-a" | "1" => Some(Self::LayoutA),
            "b" | "layout-b" | "2" => Some(Self::LayoutB),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::LayoutA => "layout_a",
            Self::LayoutB => "layout_b",
        }
    }
}

/// Walls, then the layout's obstacles, then the target, in that registry order.
///
/// Random blocks that would overlap `keep_clear` (the robot's starting
/// footprint) are re-rolled, and dropped if no clear spot turns up.
pub fn build_world(
    config: &SimConfig,
    layout: Layout,
    obstacle_count: usize,
    keep_clear: &Rect,
    rng: &mut impl Rng,
) -> World {
    let arena = &config.arena;
    let mut world = World::with_walls(arena.width, arena.height, arena.wall_thickness);

    match layout {
        Layout::Random => place_random_blocks(&mut world, obstacle_count / 2, keep_clear, rng),
        Layout::LayoutA => {
            for bounds in layout_a(arena.width, arena.height) {
                world.add_obstacle(bounds, Tag::Block);
            }
        }
        Layout::LayoutB => {
            for bounds in layout_b(arena.width, arena.height) {
                world.add_obstacle(bounds, Tag::Block);
            }
        }
    }

    world.add_obstacle(arena.target.to_rect(), Tag::Target);
    world
}

/// `pairs` vertical blocks and `pairs` horizontal blocks, interleaved.
fn place_random_blocks(world: &mut World, pairs: usize, keep_clear: &Rect, rng: &mut impl Rng) {
    let long = config::BLOCK_LONG_SIDE;
    let short = config::BLOCK_SHORT_SIDE;
    for _ in 0..pairs {
        for (w, h) in [(short, long), (long, short)] {
            match random_clear_spot(world.width, world.height, w, h, keep_clear, rng) {
                Some(bounds) => {
                    world.add_obstacle(bounds, Tag::Block);
                }
                None => warn!(w, h, "no clear spot for random block; skipping"),
            }
        }
    }
}

fn random_clear_spot(
    arena_w: f32,
    arena_h: f32,
    w: f32,
    h: f32,
    keep_clear: &Rect,
    rng: &mut impl Rng,
) -> Option<Rect> {
    let max_col = (arena_w - w).max(0.0) as i32;
    let max_row = (arena_h - h).max(0.0) as i32;
    (0..config::BLOCK_PLACEMENT_ATTEMPTS)
        .map(|_| {
            let col = rng.gen_range(0..=max_col) as f32;
            let row = rng.gen_range(0..=max_row) as f32;
            Rect::new(col, row, w, h)
        })
        .find(|bounds| !rects_overlap(bounds, keep_clear))
}

fn layout_a(w: f32, h: f32) -> Vec<Rect> {
    vec![
        Rect::new(w / 2.0, h - 200.0, 10.0, 200.0),
        Rect::new(w / 2.0, h - 200.0, 80.0, 10.0),
        Rect::new(200.0, 200.0, 200.0, 10.0),
        Rect::new(200.0, 200.0, 10.0, 200.0),
        Rect::new(800.0, 150.0, 10.0, 200.0),
        Rect::new(1000.0, 0.0, 10.0, 200.0),
    ]
}

fn layout_b(w: f32, h: f32) -> Vec<Rect> {
    vec![
        Rect::new(w / 2.0, h - 200.0, 10.0, 200.0),
        Rect::new(100.0, 400.0, 200.0, 10.0),
        Rect::new(300.0, 400.0, 10.0, 200.0),
        Rect::new(0.0, 200.0, 200.0, 10.0),
        Rect::new(400.0, 0.0, 10.0, 100.0),
        Rect::new(400.0, 100.0, 100.0, 10.0),
        Rect::new(500.0, 250.0, 10.0, 100.0),
        Rect::new(750.0, 250.0, 10.0, 200.0),
        Rect::new(500.0, 350.0, 250.0, 10.0),
        Rect::new(w - 150.0, 500.0, 150.0, 10.0),
        Rect::new(900.0, 150.0, 100.0, 200.0),
    ]
}
