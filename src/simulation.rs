use std::time::{Duration, Instant};

use ::rand::SeedableRng;
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::controller::Command;
use crate::goal::{GoalRegion, RunTimer};
use crate::layout::{self, Layout};
use crate::robot::Robot;
use crate::sensory::SensorReading;
use crate::world::World;

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub tick: u64,
    pub command: Command,
    /// A pose change was accepted (translation or rotation).
    pub committed: bool,
    pub collided: bool,
    pub goal_reached: bool,
}

/// One robot in one arena, advanced one command per tick.
///
/// Within a tick the order is fixed: motion attempt, sensor refresh, goal check.
pub struct Simulation {
    pub world: World,
    pub robot: Robot,
    pub goal: GoalRegion,
    pub timer: RunTimer,
    pub layout: Layout,
    pub seed: u64,
    pub tick_count: u64,
    pub committed_moves: u64,
    pub rejected_moves: u64,
    pub spins: u64,
}

impl Simulation {
    /// Walls, layout and target, a robot at its start pose, and a running timer.
    ///
    /// The config is validated first. A failing config is logged and the world
    /// is still built; use `SimConfig::validate` to reject it up front.
    pub fn init_world(config: &SimConfig, obstacle_count: usize, layout: Layout, seed: u64) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "building world from an invalid config");
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let robot = Robot::from_config(config);
        let world = layout::build_world(config, layout, obstacle_count, &robot.footprint(), &mut rng);
        info!(
            layout = layout.label(),
            obstacles = world.len(),
            seed,
            "world initialized"
        );
        Self::with_world(config, world, robot, layout, seed)
    }

    /// Assemble a simulation around an already-built world.
    pub fn with_world(
        config: &SimConfig,
        world: World,
        mut robot: Robot,
        layout: Layout,
        seed: u64,
    ) -> Self {
        robot.sense(&world);
        Self {
            world,
            robot,
            goal: GoalRegion::from_config(config),
            timer: RunTimer::start_now(),
            layout,
            seed,
            tick_count: 0,
            committed_moves: 0,
            rejected_moves: 0,
            spins: 0,
        }
    }

    pub fn step(&mut self, command: Command) -> TickOutcome {
        self.tick_count += 1;
        debug!(tick = self.tick_count, ?command, "tick");

        let committed = match command {
            Command::Idle => false,
            Command::Forward => self.move_forward(),
            Command::Spin(dtheta) => self.spin(dtheta),
            Command::SpinLeft => self.spin(self.robot.params().spin_speed),
            Command::SpinRight => self.spin(-self.robot.params().spin_speed),
        };

        self.robot.sense(&self.world);
        let goal_reached = self.check_goal();

        TickOutcome {
            tick: self.tick_count,
            command,
            committed,
            collided: self.robot.collided(),
            goal_reached,
        }
    }

    /// Returns true when the move was committed.
    pub fn move_forward(&mut self) -> bool {
        match self.robot.move_forward(&self.world) {
            Ok(_) => {
                self.committed_moves += 1;
                true
            }
            Err(_) => {
                self.rejected_moves += 1;
                false
            }
        }
    }

    /// Rotation always commits.
    pub fn spin(&mut self, dtheta: f32) -> bool {
        self.robot.spin(dtheta, &self.world);
        self.spins += 1;
        true
    }

    /// Evaluate arrival; the first positive result latches the run timer.
    pub fn check_goal(&mut self) -> bool {
        let pos = self.robot.position();
        if !self.goal.reached(pos) {
            return false;
        }
        if self.timer.latch(Instant::now(), self.tick_count) {
            info!(
                tick = self.tick_count,
                x = pos.x,
                y = pos.y,
                elapsed_ms = self.timer.elapsed().as_millis() as u64,
                "goal reached"
            );
        }
        true
    }

    pub fn get_pose(&self) -> Vec2 {
        self.robot.position()
    }

    pub fn get_heading(&self) -> f32 {
        self.robot.heading()
    }

    pub fn get_collision(&self) -> bool {
        self.robot.collided()
    }

    pub fn read_sensors(&self) -> &[SensorReading] {
        self.robot.read_sensors()
    }

    pub fn get_traces(&self) -> Vec<Vec2> {
        self.robot.traces().centers()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn reached_goal(&self) -> bool {
        self.timer.is_latched()
    }
}
