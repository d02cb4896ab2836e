//! Coarse tile-level A* with permanent exact-distance memoization.
//!
//! Nodes are unit-tile centers, hops are the 8 compass moves weighted by the
//! oct-distance metric, and the heuristic is the nearest-goal lower bound
//! minus the goal radius. Once any tile's exact distance to the goal region
//! is known, every tile along the optimal path that produced it is resolved
//! too: suffixes of optimal paths are optimal, so the reconstruction pass
//! writes exact distances for the whole chain into the memo. The memo lives
//! as long as the goal set does, which is what makes this cheap enough to be
//! queried from inside the fine search's heuristic.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::error;

use crate::geometry::Rect;
use crate::point::{oct_distance, Direction, Point};
use crate::point_index::PointIndex;
use crate::queue::{Prioritized, PriorityQueue};
use crate::world::World;

#[derive(Clone, Copy, Debug)]
struct TileNode {
    tile: (i32, i32),
    predecessor: Option<(i32, i32)>,
    /// Oct-weighted distance traveled from the query tile.
    traveled: f64,
    /// Nearest-goal lower bound at this tile's center.
    remaining: f64,
    cost: f64,
}

impl Prioritized for TileNode {
    type Cost = f64;

    fn cost(&self) -> f64 {
        self.cost
    }
}

/// Tile-level pathfinder for one goal set. Rebuilt whenever the goals change;
/// the exact-distance memo persists across queries within one goal set.
#[derive(Debug)]
pub struct TilePathfinder {
    goal_radius: f64,
    iteration_cap: usize,
    exact: FxHashMap<(i32, i32), f64>,
    /// Query tiles that previously came up empty (impassable, walled off, or
    /// capped out). Cached for the goal set's lifetime so the fine search's
    /// heuristic does not re-run doomed searches every tick; the cost is
    /// that a world change within one goal set is not picked up.
    failed: FxHashSet<(i32, i32)>,
}

impl TilePathfinder {
    pub fn new(goal_radius: f64, iteration_cap: usize) -> Self {
        TilePathfinder {
            goal_radius,
            iteration_cap,
            exact: FxHashMap::default(),
            failed: FxHashSet::default(),
        }
    }

    /// Exact oct-weighted distance from the given tile's center to the goal
    /// region, or `None` when the tile is impassable or no goal is reachable
    /// from it. A `None` for reachability reasons is an expected outcome, to
    /// be retried by the caller on a later tick if the world changed.
    pub fn min_distance<W: World>(
        &mut self,
        world: &W,
        goals: &PointIndex,
        tile: (i32, i32),
    ) -> Option<f64> {
        if let Some(&known) = self.exact.get(&tile) {
            return Some(known);
        }
        if self.failed.contains(&tile) {
            return None;
        }
        if !tile_passable(world, tile) {
            self.failed.insert(tile);
            return None;
        }

        let mut queue: PriorityQueue<TileNode> = PriorityQueue::new();
        let mut visited: FxHashMap<(i32, i32), TileNode> = FxHashMap::default();
        let root_remaining = self.remaining_at(goals, tile);
        queue.push(TileNode {
            tile,
            predecessor: None,
            traveled: 0.0,
            remaining: root_remaining,
            cost: root_remaining,
        });

        let mut iterations = 0usize;
        while let Some(node) = queue.pop() {
            iterations += 1;
            if iterations > self.iteration_cap {
                error!(
                    cap = self.iteration_cap,
                    ?tile,
                    "tile search exceeded its iteration cap, treating goal as unreachable"
                );
                self.failed.insert(tile);
                return None;
            }
            if visited.contains_key(&node.tile) {
                continue;
            }

            // Landing on a resolved tile (or on the goal region itself)
            // finishes the search: the chain back to the query tile is an
            // optimal path, so every tile on it gets an exact distance.
            let base = if let Some(&known) = self.exact.get(&node.tile) {
                Some(known)
            } else if node.remaining <= 0.0 {
                Some(0.0)
            } else {
                None
            };
            if let Some(base) = base {
                self.memoize_chain(&visited, node, base);
                return self.exact.get(&tile).copied();
            }

            visited.insert(node.tile, node);
            for dir in Direction::ALL {
                let offset = dir.tile_offset();
                let neighbor = (node.tile.0 + offset.0, node.tile.1 + offset.1);
                if visited.contains_key(&neighbor) || !tile_passable(world, neighbor) {
                    continue;
                }
                let traveled = node.traveled + oct_distance(node.tile, neighbor);
                let remaining = self.remaining_at(goals, neighbor);
                queue.push(TileNode {
                    tile: neighbor,
                    predecessor: Some(node.tile),
                    traveled,
                    remaining,
                    cost: traveled + remaining,
                });
            }
        }
        // The queue emptied: everything reachable from this tile was visited
        // and none of it touches the goal region.
        self.failed.insert(tile);
        None
    }

    /// Heuristic at a tile center: nearest-goal distance minus the goal
    /// radius, floored at zero.
    fn remaining_at(&self, goals: &PointIndex, tile: (i32, i32)) -> f64 {
        (goals.min_l2_dist(Point::tile_center(tile.0, tile.1)) - self.goal_radius).max(0.0)
    }

    /// Writes exact distances for the chain from `last` back to the search
    /// root. `base` is the exact distance at `last` itself.
    fn memoize_chain(
        &mut self,
        visited: &FxHashMap<(i32, i32), TileNode>,
        last: TileNode,
        base: f64,
    ) {
        self.exact.insert(last.tile, base);
        let mut current = last;
        while let Some(prev_tile) = current.predecessor {
            let prev = visited[&prev_tile];
            // The suffix of an optimal path is optimal, so the exact distance
            // at each predecessor is the exact distance at the end plus the
            // ground covered between them.
            self.exact
                .insert(prev.tile, base + (last.traveled - prev.traveled));
            current = prev;
        }
    }

    /// Number of tiles with memoized exact distances. Exposed for tests.
    pub fn resolved_tiles(&self) -> usize {
        self.exact.len()
    }
}

/// A tile is passable when it does not collide with the movement layer and
/// no blocking obstacle's bounding box covers its center.
fn tile_passable<W: World>(world: &W, tile: (i32, i32)) -> bool {
    // Tiles whose center falls outside the packed-point domain are walls.
    if !(-2048..2048).contains(&tile.0) || !(-2048..2048).contains(&tile.1) {
        return false;
    }
    if world.tile_blocked(tile) {
        return false;
    }
    let center = Point::tile_center(tile.0, tile.1);
    let probe = Rect::from_corners(center, center);
    world
        .obstacles_in(&probe)
        .iter()
        .all(|o| !o.blocks_movement || !o.bounding_box.contains(center))
}
