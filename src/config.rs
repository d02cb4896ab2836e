//! Static navigation parameters.
//!
//! One value struct, loaded or constructed once by the driver and handed to
//! the engine at construction time. These values feed the deterministic step
//! simulation, so changing them mid-episode would invalidate every cached
//! search state; the engine never mutates them.

use serde::{Deserialize, Serialize};

use crate::point::Coord;

/// Navigation engine configuration. All lengths are in world units on the
/// 1/256 grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavConfig {
    /// Per-tick displacement for the four cardinal directions.
    pub straight_step: Coord,
    /// Per-axis per-tick displacement for the four diagonal directions.
    /// Chosen near `straight_step / sqrt(2)` so all 8 directions cover
    /// roughly equal ground per tick while staying on the grid.
    pub diagonal_step: Coord,
    /// Maximum node expansions the fine pathfinder performs per invocation.
    /// This is the only throttle against per-tick latency spikes.
    pub expansion_budget: usize,
    /// Extra margin added around the queried area when the step simulator
    /// refreshes its obstacle-cache window. A larger margin means fewer world
    /// queries but more shapes tested per step.
    pub cache_margin: Coord,
    /// Safety cap on tile-level A* iterations per query.
    pub tile_iteration_cap: usize,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            // 38/256 straight, 27/256 diagonal: 27/38 = 0.7105, within half a
            // grid unit of the equal-time ratio.
            straight_step: Coord::from_bits(38),
            diagonal_step: Coord::from_bits(27),
            expansion_budget: 200,
            cache_margin: Coord::from_num(4),
            tile_iteration_cap: 100_000,
        }
    }
}

impl NavConfig {
    /// Upper bound on Euclidean ground covered in one tick over all 8
    /// directions. Dividing a remaining distance by this keeps step-count
    /// heuristics admissible.
    pub fn top_speed(&self) -> f64 {
        let straight = self.straight_step.to_num::<f64>();
        let diagonal = self.diagonal_step.to_num::<f64>() * std::f64::consts::SQRT_2;
        straight.max(diagonal)
    }
}
