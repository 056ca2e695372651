use macroquad::prelude::*;
use tracing::debug;

use crate::config::SimConfig;
use crate::sensory::{SensorArray, SensorReading};
use crate::trace::TraceLog;
use crate::world::{inflate, World};

/// Where the robot is and which way it faces.
///
/// `heading` is in degrees, 0 points up (negative y) and positive angles turn
/// counterclockwise. It stays within (-360, 360); both signs are valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub center: Vec2,
    pub heading: f32,
}

impl Pose {
    pub fn new(center: Vec2, heading: f32) -> Self {
        Self { center, heading }
    }

    pub fn forward(&self) -> Vec2 {
        heading_direction(self.heading)
    }
}

/// Unit vector for a heading in degrees.
pub fn heading_direction(heading: f32) -> Vec2 {
    let rad = heading.to_radians();
    vec2(-rad.sin(), -rad.cos())
}

/// Fold a heading back into (-360, 360) without clamping the sign.
/// Non-finite headings fold to 0.
pub fn wrap_heading(heading: f32) -> f32 {
    if !heading.is_finite() {
        return 0.0;
    }
    // `%` keeps the sign of the dividend, so the result stays in (-360, 360).
    heading % 360.0
}

/// Occupied rectangle of a robot of `size` centered at `center`.
pub fn footprint(center: Vec2, size: Vec2) -> Rect {
    Rect::new(
        center.x - size.x * 0.5,
        center.y - size.y * 0.5,
        size.x,
        size.y,
    )
}

/// A translation was refused because the moved footprint would overlap `obstacle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collision {
    pub obstacle: usize,
}

/// Translate `pose` by `delta` if the moved footprint is clear of every obstacle.
pub fn try_move(pose: Pose, delta: Vec2, size: Vec2, world: &World) -> Result<Pose, Collision> {
    let moved = Pose::new(pose.center + delta, pose.heading);
    match world.query_first_intersecting(&footprint(moved.center, size)) {
        Some(obstacle) => Err(Collision { obstacle }),
        None => Ok(moved),
    }
}

/// Kinematic and sensing parameters, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotParams {
    pub size: Vec2,
    pub fwd_speed: f32,
    pub spin_speed: f32,
    pub visual_range: f32,
    pub visual_angle: f32,
    pub granularity: f32,
    pub trace_shrink: f32,
}

impl RobotParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            size: vec2(config.robot.width, config.robot.height),
            fwd_speed: config.robot.fwd_speed,
            spin_speed: config.robot.spin_speed,
            visual_range: config.sensing.visual_range,
            visual_angle: config.sensing.visual_angle,
            granularity: config.sensing.granularity,
            trace_shrink: config.robot.trace_shrink,
        }
    }
}

pub struct Robot {
    pose: Pose,
    params: RobotParams,
    collided: bool,
    leave_trace: bool,
    sensors: SensorArray,
    traces: TraceLog,
}

impl Robot {
    /// Place a robot with its footprint's top-left corner at `top_left`.
    pub fn new(top_left: Vec2, heading: f32, params: RobotParams) -> Self {
        let center = top_left + params.size * 0.5;
        Self {
            pose: Pose::new(center, wrap_heading(heading)),
            params,
            collided: false,
            leave_trace: true,
            sensors: SensorArray::new(params.visual_range, params.visual_angle, params.granularity),
            traces: TraceLog::new(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            vec2(config.robot.start_x, config.robot.start_y),
            config.robot.heading,
            RobotParams::from_config(config),
        )
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn position(&self) -> Vec2 {
        self.pose.center
    }

    pub fn heading(&self) -> f32 {
        self.pose.heading
    }

    pub fn collided(&self) -> bool {
        self.collided
    }

    pub fn params(&self) -> &RobotParams {
        &self.params
    }

    pub fn footprint(&self) -> Rect {
        footprint(self.pose.center, self.params.size)
    }

    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    pub fn read_sensors(&self) -> &[SensorReading] {
        self.sensors.readings()
    }

    pub fn traces(&self) -> &TraceLog {
        &self.traces
    }

    pub fn set_leave_trace(&mut self, on: bool) {
        self.leave_trace = on;
    }

    /// Recast every sensor ray from the current pose.
    pub fn sense(&mut self, world: &World) {
        self.sensors.refresh(&self.pose, world);
    }

    /// Step forward by `fwd_speed` along the heading, unless that would collide.
    ///
    /// Sensors are read before the attempt. A refused move leaves the pose
    /// untouched and raises the collision flag until the next motion call.
    pub fn move_forward(&mut self, world: &World) -> Result<Pose, Collision> {
        self.sense(world);
        self.collided = false;

        let delta = self.pose.forward() * self.params.fwd_speed;
        match try_move(self.pose, delta, self.params.size, world) {
            Ok(pose) => {
                self.pose = pose;
                self.record_trace();
                Ok(pose)
            }
            Err(collision) => {
                debug!(
                    obstacle = collision.obstacle,
                    x = self.pose.center.x,
                    y = self.pose.center.y,
                    heading = self.pose.heading,
                    "forward move rejected"
                );
                self.collided = true;
                Err(collision)
            }
        }
    }

    /// Rotate in place. Rotation is never collision-checked. A non-finite
    /// `dtheta` leaves the heading unchanged.
    pub fn spin(&mut self, dtheta: f32, world: &World) -> Pose {
        self.sense(world);
        self.collided = false;

        if dtheta.is_finite() {
            self.pose.heading = wrap_heading(self.pose.heading + dtheta);
        } else {
            debug!(dtheta, "ignoring non-finite spin");
        }
        self.record_trace();
        self.pose
    }

    fn record_trace(&mut self) {
        if self.leave_trace {
            let shrink = -self.params.trace_shrink;
            self.traces.record(inflate(&self.footprint(), shrink, shrink));
        }
    }
}
