use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::robot::RobotParams;
use crate::simulation::Simulation;

/// One motion request per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Idle,
    Forward,
    /// Explicit rotation in degrees, positive counterclockwise.
    Spin(f32),
    /// Rotate counterclockwise by the robot's spin speed.
    SpinLeft,
    /// Rotate clockwise by the robot's spin speed.
    SpinRight,
}

/// Decides the next command from the state left by the previous tick.
pub trait Controller {
    fn id(&self) -> &'static str;
    fn next_command(&mut self, sim: &Simulation) -> Command;
}

pub fn create_controller(id: &str, sim: &Simulation, target: Vec2, seed: u64) -> Option<Box<dyn Controller>> {
    match id {
        "wander" => Some(Box::new(Wander::new(seed))),
        "seeker" => Some(Box::new(GoalSeeker::new(target, sim.robot.params()))),
        _ => None,
    }
}

/// Signed difference `to - from` folded into (-180, 180].
pub fn angle_diff(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Heading in degrees that points from `from` toward `to`.
pub fn heading_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.x).atan2(-d.y).to_degrees()
}

/// Random walk: drive straight, and after each bump turn a random 45°..180°
/// in either direction at spin speed before driving again.
pub struct Wander {
    rng: ChaCha8Rng,
    turn_left: f32,
}

impl Wander {
    pub const MIN_TURN: f32 = 45.0;
    pub const MAX_TURN: f32 = 180.0;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            turn_left: 0.0,
        }
    }
}

impl Controller for Wander {
    fn id(&self) -> &'static str {
        "wander"
    }

    fn next_command(&mut self, sim: &Simulation) -> Command {
        if sim.get_collision() && self.turn_left == 0.0 {
            let angle = self.rng.gen_range(Self::MIN_TURN..=Self::MAX_TURN);
            self.turn_left = if self.rng.gen_bool(0.5) { angle } else { -angle };
        }
        if self.turn_left != 0.0 {
            let spin_speed = sim.robot.params().spin_speed;
            let step = self.turn_left.abs().min(spin_speed) * self.turn_left.signum();
            self.turn_left -= step;
            if self.turn_left.abs() < 1e-3 {
                self.turn_left = 0.0;
            }
            return Command::Spin(step);
        }
        Command::Forward
    }
}

/// Steer at a fixed point, backing off into the more open side whenever the
/// straight-ahead ray gets short or a move was refused.
pub struct GoalSeeker {
    target: Vec2,
    clearance: f32,
    escape_left: u32,
}

impl GoalSeeker {
    pub const TURN_STEP: f32 = 15.0;
    pub const AVOID_TURN: f32 = 30.0;
    pub const ESCAPE_TICKS: u32 = 12;

    pub fn new(target: Vec2, params: &RobotParams) -> Self {
        Self {
            target,
            clearance: params.size.max_element() * 0.5 + params.fwd_speed * 2.0,
            escape_left: 0,
        }
    }
}

impl Controller for GoalSeeker {
    fn id(&self) -> &'static str {
        "seeker"
    }

    fn next_command(&mut self, sim: &Simulation) -> Command {
        let sensors = sim.robot.sensors();
        let ahead = sensors.straight_ahead();
        let blocked = ahead.tag.is_some() && ahead.distance <= self.clearance;

        if sim.get_collision() || blocked {
            let (left, right) = sensors.side_openness();
            self.escape_left = Self::ESCAPE_TICKS;
            return if left >= right {
                Command::Spin(Self::AVOID_TURN)
            } else {
                Command::Spin(-Self::AVOID_TURN)
            };
        }

        if self.escape_left > 0 {
            self.escape_left -= 1;
            return Command::Forward;
        }

        let desired = heading_toward(sim.get_pose(), self.target);
        let err = angle_diff(sim.get_heading(), desired);
        if err.abs() > sim.robot.params().spin_speed {
            Command::Spin(err.abs().min(Self::TURN_STEP) * err.signum())
        } else {
            Command::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::layout::Layout;

    fn empty_arena() -> Simulation {
        Simulation::init_world(&SimConfig::default(), 0, Layout::Random, 0)
    }

    #[test]
    fn angle_diff_takes_the_short_way() {
        assert_eq!(angle_diff(10.0, 350.0), -20.0);
        assert_eq!(angle_diff(350.0, 10.0), 20.0);
        assert_eq!(angle_diff(-350.0, 10.0), 0.0);
        assert_eq!(angle_diff(0.0, 180.0), 180.0);
    }

    #[test]
    fn heading_toward_matches_motion_convention() {
        assert!((heading_toward(vec2(0.0, 0.0), vec2(0.0, -10.0))).abs() < 1e-4);
        assert!((heading_toward(vec2(0.0, 0.0), vec2(10.0, 0.0)) + 90.0).abs() < 1e-4);
        assert!((heading_toward(vec2(0.0, 0.0), vec2(-10.0, 0.0)) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn wander_drives_until_bumped_then_turns() {
        let mut sim = empty_arena();
        sim.step(Command::Spin(90.0));
        let mut wander = Wander::new(4);

        let mut guard = 0;
        while !sim.get_collision() {
            let command = wander.next_command(&sim);
            assert_eq!(command, Command::Forward);
            sim.step(command);
            guard += 1;
            assert!(guard < 100);
        }

        let mut turned = 0.0;
        loop {
            match wander.next_command(&sim) {
                Command::Spin(step) => {
                    assert!(step.abs() <= sim.robot.params().spin_speed + 1e-4);
                    turned += step;
                    sim.step(Command::Spin(step));
                }
                Command::Forward => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(turned.abs() >= Wander::MIN_TURN - 1e-2);
        assert!(turned.abs() <= Wander::MAX_TURN + 1e-2);
    }

    #[test]
    fn seeker_reaches_goal_in_open_arena() {
        let config = SimConfig::default();
        let mut sim = empty_arena();
        let target = config.arena.target.to_rect().center();
        let mut seeker = GoalSeeker::new(target, sim.robot.params());

        let mut reached = false;
        for _ in 0..1500 {
            let command = seeker.next_command(&sim);
            if sim.step(command).goal_reached {
                reached = true;
                break;
            }
        }
        assert!(reached, "stopped at {:?}", sim.get_pose());
        assert_eq!(sim.rejected_moves, 0);
    }

    #[test]
    fn seeker_turns_away_from_a_close_wall() {
        let mut sim = empty_arena();
        // Face the left wall, then close in on it.
        sim.step(Command::Spin(90.0));
        sim.step(Command::Forward);
        let mut seeker = GoalSeeker::new(vec2(0.0, 660.0), sim.robot.params());

        match seeker.next_command(&sim) {
            Command::Spin(step) => assert_eq!(step.abs(), GoalSeeker::AVOID_TURN),
            other => panic!("expected avoidance spin, got {other:?}"),
        }
    }

    #[test]
    fn factory_knows_both_controllers() {
        let sim = empty_arena();
        let target = vec2(1160.0, 30.0);
        assert_eq!(create_controller("wander", &sim, target, 1).unwrap().id(), "wander");
        assert_eq!(create_controller("seeker", &sim, target, 1).unwrap().id(), "seeker");
        assert!(create_controller("teleop", &sim, target, 1).is_none());
    }
}
