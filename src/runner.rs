use tracing::info;

use crate::controller::Controller;
use crate::reporting::{RunRecorder, RunReport};
use crate::simulation::Simulation;

/// Drive `sim` with `controller` until the goal is reached or `max_ticks` have run.
pub fn run_controller(
    sim: &mut Simulation,
    controller: &mut dyn Controller,
    max_ticks: u64,
) -> RunReport {
    let mut recorder = RunRecorder::new();
    while sim.tick_count < max_ticks {
        let command = controller.next_command(sim);
        let outcome = sim.step(command);
        recorder.observe(&outcome, sim);
        if outcome.goal_reached {
            break;
        }
    }

    let report = recorder.finish(sim, controller.id(), max_ticks);
    info!(
        controller = %report.controller,
        ticks = report.ticks,
        reached_goal = report.reached_goal,
        rejected_moves = report.rejected_moves,
        "run finished"
    );
    report
}
