use serde::Serialize;

use crate::simulation::{Simulation, TickOutcome};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Collects per-tick samples and summarizes them at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    samples: Vec<f64>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Percentage of samples at or below `threshold`.
    pub fn pct_leq(&self, threshold: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let hits = self.samples.iter().filter(|v| **v <= threshold).count();
        hits as f64 * 100.0 / self.samples.len() as f64
    }

    pub fn summary(&self) -> MetricSummary {
        if self.samples.is_empty() {
            return MetricSummary::default();
        }
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let sum: f64 = sorted.iter().sum();

        MetricSummary {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sum / sorted.len() as f64,
            p10: nearest_rank(&sorted, 0.10),
            p50: nearest_rank(&sorted, 0.50),
            p90: nearest_rank(&sorted, 0.90),
        }
    }
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let rank = ((p.clamp(0.0, 1.0) * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub controller: String,
    pub layout: String,
    pub seed: u64,
    pub obstacles: usize,
    pub max_ticks: u64,
    pub ticks: u64,
    pub committed_moves: u64,
    pub rejected_moves: u64,
    pub spins: u64,
    pub trace_len: usize,
    pub path_length: f32,
    pub reached_goal: bool,
    pub goal_tick: Option<u64>,
    pub elapsed_ms: u64,
    pub final_x: f32,
    pub final_y: f32,
    pub final_heading: f32,
    /// Straight-ahead ray distance after each tick.
    pub front_clearance: MetricSummary,
    /// Shortest ray of the fan after each tick.
    pub nearest_clearance: MetricSummary,
    /// Share of ticks that ended with the straight-ahead ray within one robot length.
    pub pct_ticks_crowded: f64,
    /// Ticks that ended with the collision flag raised.
    pub collided_ticks: u64,
}

/// Per-tick observer that turns a finished run into a `RunReport`.
#[derive(Debug, Default)]
pub struct RunRecorder {
    front: MetricAggregator,
    nearest: MetricAggregator,
    collided_ticks: u64,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, outcome: &TickOutcome, sim: &Simulation) {
        if outcome.collided {
            self.collided_ticks += 1;
        }
        let sensors = sim.robot.sensors();
        self.front.push(sensors.straight_ahead().distance as f64);
        self.nearest.push(sensors.nearest().distance as f64);
    }

    pub fn finish(self, sim: &Simulation, controller: &str, max_ticks: u64) -> RunReport {
        let pose = sim.robot.pose();
        let robot_length = sim.robot.params().size.y as f64;
        RunReport {
            controller: controller.to_string(),
            layout: sim.layout.label().to_string(),
            seed: sim.seed,
            obstacles: sim.world.len(),
            max_ticks,
            ticks: sim.tick_count,
            committed_moves: sim.committed_moves,
            rejected_moves: sim.rejected_moves,
            spins: sim.spins,
            trace_len: sim.robot.traces().len(),
            path_length: sim.robot.traces().path_length(),
            reached_goal: sim.reached_goal(),
            goal_tick: sim.timer.goal_tick(),
            elapsed_ms: sim.elapsed().as_millis() as u64,
            final_x: pose.center.x,
            final_y: pose.center.y,
            final_heading: pose.heading,
            front_clearance: self.front.summary(),
            nearest_clearance: self.nearest.summary(),
            pct_ticks_crowded: self.front.pct_leq(robot_length),
            collided_ticks: self.collided_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::controller::Command;
    use crate::layout::Layout;

    #[test]
    fn summary_uses_nearest_rank_percentiles() {
        let mut agg = MetricAggregator::new();
        for i in 1..=20 {
            agg.push(i as f64 * 10.0);
        }
        let s = agg.summary();
        assert_eq!(s.count, 20);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 200.0);
        assert!((s.mean - 105.0).abs() < 1e-9);
        assert_eq!(s.p10, 20.0);
        assert_eq!(s.p50, 100.0);
        assert_eq!(s.p90, 180.0);
    }

    #[test]
    fn empty_aggregator_summarizes_to_zero() {
        let agg = MetricAggregator::new();
        assert!(agg.is_empty());
        assert_eq!(agg.summary(), MetricSummary::default());
        assert_eq!(agg.pct_leq(1.0), 0.0);
    }

    #[test]
    fn recorder_counts_every_tick() {
        let mut sim = Simulation::init_world(&SimConfig::default(), 0, Layout::Random, 0);
        let mut recorder = RunRecorder::new();
        for command in [Command::Forward, Command::SpinLeft, Command::Idle] {
            let out = sim.step(command);
            recorder.observe(&out, &sim);
        }
        let report = recorder.finish(&sim, "scripted", 3);
        assert_eq!(report.ticks, 3);
        assert_eq!(report.front_clearance.count, 3);
        assert_eq!(report.trace_len, 2);
        assert_eq!(report.committed_moves, 1);
        assert_eq!(report.spins, 1);
        assert_eq!(report.collided_ticks, 0);
        assert!(!report.reached_goal);
        assert_eq!(report.goal_tick, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["layout"], "random");
        assert_eq!(json["nearest_clearance"]["count"], 3);
    }
}
