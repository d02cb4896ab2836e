//! octonav: a tick-driven 8-direction navigation engine.
//!
//! The engine answers one question once per world tick: given a set of goal
//! points and an acceptance radius, which of the 8 compass directions should
//! the agent step in next? Simulated moves are expensive (they query the
//! world for nearby obstacles), so the search that answers it is hierarchical
//! and resumable: a coarse tile-level A* with permanent memoization feeds an
//! admissible heuristic to a fine step-level A* whose frontier is budgeted
//! per tick and carried between invocations.
//!
//! The host world stays behind the [`world::World`] trait; the engine owns
//! all of its mutable state in explicit instances ([`FinePathfinder`],
//! [`StepSimulator`]) handed in by the driver, so several agents can run
//! side by side without shared state.
//!
//! ```
//! use octonav::{FinePathfinder, GridWorld, NavConfig, Point, StepSimulator, World};
//!
//! let mut world = GridWorld::new(Point::from_num(0.5, 0.5));
//! let config = NavConfig::default();
//! let mut sim = StepSimulator::new(&config);
//! let mut nav = FinePathfinder::new(config);
//! nav.set_goals(&mut sim, &[Point::from_num(10.5, 0.5)], 1.0);
//!
//! while !nav.arrived(&world) {
//!     if let Some(dir) = nav.next_step(&world, &mut sim) {
//!         let next = sim.walk(&world, world.position(), dir);
//!         world.set_position(next);
//!     }
//! }
//! ```

pub mod config;
pub mod geometry;
pub mod pathfinder;
pub mod point;
pub mod point_index;
pub mod queue;
pub mod simulator;
pub mod tile_path;
pub mod world;

pub use config::NavConfig;
pub use pathfinder::{FinePathfinder, SearchState};
pub use point::{Coord, Direction, Point};
pub use simulator::StepSimulator;
pub use world::{GridWorld, Obstacle, World};

/// Logs a message every 100th invocation when the `perf_stats` feature is
/// enabled; compiles to nothing otherwise, arguments included.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($invocation:expr, $($arg:tt)*) => {
        if $invocation % 100 == 0 {
            tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($invocation:expr, $($arg:tt)*) => {};
}
