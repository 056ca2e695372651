use std::time::{Duration, Instant};

use macroquad::prelude::*;

use crate::config::SimConfig;

/// Acceptance test for "the robot has arrived".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GoalRegion {
    /// Open quadrant: `x >= x_min && y <= y_max`. Looser than any real box
    /// around the target, kept as the default arrival rule.
    Quadrant { x_min: f32, y_max: f32 },
    /// Closed box the robot center must lie in.
    Zone(Rect),
}

impl GoalRegion {
    pub fn from_config(config: &SimConfig) -> Self {
        let goal = &config.goal;
        if goal.strict {
            GoalRegion::Zone(Rect::new(
                goal.x_min,
                0.0,
                config.arena.width - goal.x_min,
                goal.y_max,
            ))
        } else {
            GoalRegion::Quadrant {
                x_min: goal.x_min,
                y_max: goal.y_max,
            }
        }
    }

    pub fn reached(&self, pos: Vec2) -> bool {
        match *self {
            GoalRegion::Quadrant { x_min, y_max } => pos.x >= x_min && pos.y <= y_max,
            GoalRegion::Zone(r) => {
                pos.x >= r.x && pos.x <= r.x + r.w && pos.y >= r.y && pos.y <= r.y + r.h
            }
        }
    }
}

/// Wall-clock duration of a run, latched on first arrival.
#[derive(Clone, Copy, Debug)]
pub struct RunTimer {
    start: Instant,
    end: Option<Instant>,
    goal_tick: Option<u64>,
}

impl RunTimer {
    pub fn start_now() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(start: Instant) -> Self {
        Self {
            start,
            end: None,
            goal_tick: None,
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn is_latched(&self) -> bool {
        self.end.is_some()
    }

    pub fn goal_tick(&self) -> Option<u64> {
        self.goal_tick
    }

    /// Record arrival. Returns true only for the first call; later calls keep
    /// the original end time.
    pub fn latch(&mut self, now: Instant, tick: u64) -> bool {
        if self.end.is_some() {
            return false;
        }
        self.end = Some(now);
        self.goal_tick = Some(tick);
        true
    }

    /// `end - start` once latched, otherwise time since start.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.end.unwrap_or(now).saturating_duration_since(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_accepts_points_far_from_the_target() {
        let goal = GoalRegion::from_config(&SimConfig::default());
        assert!(goal.reached(vec2(1130.0, 60.0)));
        assert!(goal.reached(vec2(1120.0, 68.0)));
        // Anything up and to the right counts, even off the arena.
        assert!(goal.reached(vec2(5000.0, -500.0)));
        assert!(!goal.reached(vec2(1119.0, 60.0)));
        assert!(!goal.reached(vec2(1130.0, 69.0)));
    }

    #[test]
    fn strict_zone_is_bounded() {
        let mut config = SimConfig::default();
        config.goal.strict = true;
        let goal = GoalRegion::from_config(&config);
        assert!(goal.reached(vec2(1130.0, 60.0)));
        assert!(!goal.reached(vec2(5000.0, -500.0)));
        assert!(!goal.reached(vec2(1130.0, 69.0)));
    }

    #[test]
    fn timer_latches_first_arrival() {
        let t0 = Instant::now();
        let mut timer = RunTimer::started_at(t0);
        assert!(!timer.is_latched());

        assert!(timer.latch(t0 + Duration::from_millis(250), 40));
        assert!(!timer.latch(t0 + Duration::from_millis(900), 90));

        assert_eq!(timer.goal_tick(), Some(40));
        assert_eq!(timer.elapsed(), Duration::from_millis(250));
        assert_eq!(
            timer.elapsed_at(t0 + Duration::from_secs(10)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn running_timer_never_goes_backwards() {
        let t0 = Instant::now();
        let timer = RunTimer::started_at(t0);
        let a = timer.elapsed();
        let b = timer.elapsed();
        assert!(b >= a);
        assert_eq!(timer.elapsed_at(t0), Duration::ZERO);
    }
}
