//! Single-robot arena simulator: rectangular obstacles, collision-gated
//! kinematics, a ray-marched range-sensor fan, a footprint trace and a goal
//! timer, advanced one command per tick.

pub mod config;
pub mod controller;
pub mod error;
pub mod goal;
pub mod layout;
pub mod reporting;
pub mod robot;
pub mod runner;
pub mod sensory;
pub mod simulation;
pub mod spatial_hash;
pub mod trace;
pub mod world;

pub use config::SimConfig;
pub use controller::{Command, Controller};
pub use error::SimError;
pub use layout::Layout;
pub use robot::{Pose, Robot};
pub use sensory::SensorReading;
pub use simulation::{Simulation, TickOutcome};
pub use world::{Obstacle, Tag, World};
