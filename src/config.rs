// All tunable simulation constants in one place.

use std::path::Path;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SimError;

// Arena
pub const ARENA_WIDTH: f32 = 1200.0;
pub const ARENA_HEIGHT: f32 = 700.0;
pub const WALL_THICKNESS: f32 = 5.0;
pub const DEFAULT_OBSTACLE_COUNT: usize = 10;

// Obstacle index
pub const SPATIAL_CELL_SIZE: f32 = 64.0;

// Random layout pieces
pub const BLOCK_LONG_SIDE: f32 = 120.0;
pub const BLOCK_SHORT_SIDE: f32 = 30.0;
pub const BLOCK_PLACEMENT_ATTEMPTS: usize = 32;

// Target
pub const TARGET_X: f32 = 1150.0;
pub const TARGET_Y: f32 = 20.0;
pub const TARGET_SIZE: f32 = 20.0;

// Robot
pub const ROBOT_START_X: f32 = 10.0; // top-left, must be >= WALL_THICKNESS
pub const ROBOT_START_Y: f32 = ARENA_HEIGHT - 60.0;
pub const ROBOT_WIDTH: f32 = 40.0;
pub const ROBOT_HEIGHT: f32 = 40.0;
pub const ROBOT_START_HEADING: f32 = 0.0; // degrees, 0 is up
pub const ROBOT_FWD_SPEED: f32 = 5.0; // pixels per tick
pub const ROBOT_SPIN_SPEED: f32 = 3.0; // degrees per tick
pub const TRACE_SHRINK: f32 = 17.0;

// Sensing
pub const VISUAL_RANGE: f32 = 200.0; // from robot center
pub const VISUAL_ANGLE: f32 = 15.0; // degrees, should divide 90 exactly
pub const VISUAL_GRANULARITY: f32 = 5.0; // must not exceed the thinnest obstacle

// Goal quadrant
pub const GOAL_X_MIN: f32 = 1120.0;
pub const GOAL_Y_MAX: f32 = 68.0;

/// Axis-aligned box as stored in config files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub target: Bounds,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            target: Bounds::new(TARGET_X, TARGET_Y, TARGET_SIZE, TARGET_SIZE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    pub heading: f32,
    pub fwd_speed: f32,
    pub spin_speed: f32,
    pub trace_shrink: f32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            start_x: ROBOT_START_X,
            start_y: ROBOT_START_Y,
            width: ROBOT_WIDTH,
            height: ROBOT_HEIGHT,
            heading: ROBOT_START_HEADING,
            fwd_speed: ROBOT_FWD_SPEED,
            spin_speed: ROBOT_SPIN_SPEED,
            trace_shrink: TRACE_SHRINK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingConfig {
    pub visual_range: f32,
    pub visual_angle: f32,
    pub granularity: f32,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            visual_range: VISUAL_RANGE,
            visual_angle: VISUAL_ANGLE,
            granularity: VISUAL_GRANULARITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub x_min: f32,
    pub y_max: f32,
    /// Use the bounded corner zone up to the arena edge instead of the open quadrant.
    pub strict: bool,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            x_min: GOAL_X_MIN,
            y_max: GOAL_Y_MAX,
            strict: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub arena: ArenaConfig,
    pub robot: RobotConfig,
    pub sensing: SensingConfig,
    pub goal: GoalConfig,
}

impl SimConfig {
    /// Load a (possibly partial) JSON override on top of the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the simulation degenerate. Sensing
    /// accuracy preconditions are only warned about.
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("robot.width", self.robot.width),
            ("robot.height", self.robot.height),
            ("sensing.visual_range", self.sensing.visual_range),
            ("sensing.visual_angle", self.sensing.visual_angle),
            ("sensing.granularity", self.sensing.granularity),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let finite = [
            ("robot.start_x", self.robot.start_x),
            ("robot.start_y", self.robot.start_y),
            ("robot.heading", self.robot.heading),
            ("robot.fwd_speed", self.robot.fwd_speed),
            ("robot.spin_speed", self.robot.spin_speed),
            ("robot.trace_shrink", self.robot.trace_shrink),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if 90.0 % self.sensing.visual_angle != 0.0 {
            warn!(
                visual_angle = self.sensing.visual_angle,
                "visual angle does not divide 90; sensor fan will not reach ±90°"
            );
        }
        if self.sensing.granularity > self.arena.wall_thickness {
            warn!(
                granularity = self.sensing.granularity,
                wall_thickness = self.arena.wall_thickness,
                "sensing granularity exceeds wall thickness; rays may skip walls"
            );
        }
        Ok(())
    }
}
