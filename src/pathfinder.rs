//! Resumable fine-grained A* over simulated one-tick steps.
//!
//! This is the engine's top level: the behavior loop calls [`FinePathfinder::next_step`]
//! once per world tick and gets back one of 8 directions, or `None` when no
//! acceptable step exists yet. Each invocation expands at most a fixed budget
//! of nodes; the frontier (queue plus visited map) survives between
//! invocations as an explicit [`SearchState`] value, so an expensive search
//! simply spreads across ticks while the agent stands still.
//!
//! Node positions come from the step simulator, so the search space is
//! exactly the set of positions the agent can physically reach, not a grid
//! idealization. The heuristic is the larger of two lower bounds on the
//! remaining step count: the straight-line nearest-goal distance, and a
//! refined bound routed through the tile pathfinder's memoized distances and
//! deflated back below the true cost, which sees walls the straight-line
//! bound cannot.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::NavConfig;
use crate::point::{Direction, Point};
use crate::point_index::PointIndex;
use crate::queue::{Prioritized, PriorityQueue};
use crate::simulator::StepSimulator;
use crate::tile_path::TilePathfinder;
use crate::world::World;

/// The refined tile-routed bound only kicks in beyond this direct distance;
/// closer to the goal the deflated route value almost never exceeds the
/// direct bound, so the tile queries are not worth their cost there.
const REFINE_DISTANCE: f64 = 2.0;

/// Worst-case ratio of an 8-direction route through tile centers to the
/// shortest unconstrained path between the same endpoints, `sqrt(4 - 2*sqrt(2))`,
/// reached at a 22.5 degree heading.
const OCT_INFLATION: f64 = 1.082_392_200_292_393_9;

/// Ground credited for the endpoints of a tile route: the query position and
/// the arrival point each sit up to half a tile diagonal away from the
/// centers the route is measured between.
const TILE_SLACK: f64 = std::f64::consts::SQRT_2;

/// One explored step. Owned by the search's visited map; predecessors are
/// position keys resolved through that map, never references.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PathNode {
    pub position: Point,
    pub predecessor: Option<Point>,
    /// Direction taken to reach this node; `None` only at the root.
    pub direction: Option<Direction>,
    /// Simulated ticks from the search start.
    pub steps: u32,
    /// Admissible lower bound on ticks still needed.
    pub remaining: f64,
    /// `steps + remaining`, the A* ordering key.
    pub cost: f64,
}

/// Lightweight heap entry; the node itself lives in the visited map.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct QueueEntry {
    cost: f64,
    position: Point,
}

impl Prioritized for QueueEntry {
    type Cost = f64;

    fn cost(&self) -> f64 {
        self.cost
    }
}

/// A frozen search frontier: everything one invocation hands to the next.
/// Serializable so a driver can snapshot an in-progress search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchState {
    /// Agent position the frontier was seeded at; the frontier is only valid
    /// while the agent still stands here.
    start: Point,
    queue: PriorityQueue<QueueEntry>,
    #[serde(with = "visited_serde")]
    visited: FxHashMap<Point, PathNode>,
    /// Expanded node with the smallest remaining bound seen so far.
    closest: Option<Point>,
    closest_remaining: f64,
}

impl SearchState {
    fn seeded(start: Point, remaining: f64) -> Self {
        let root = PathNode {
            position: start,
            predecessor: None,
            direction: None,
            steps: 0,
            remaining,
            cost: remaining,
        };
        let mut state = SearchState {
            start,
            queue: PriorityQueue::new(),
            visited: FxHashMap::default(),
            closest: None,
            // MAX rather than infinity: the frontier must stay JSON-clean.
            closest_remaining: f64::MAX,
        };
        state.queue.push(QueueEntry {
            cost: root.cost,
            position: root.position,
        });
        state.visited.insert(root.position, root);
        state
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

/// Visited maps serialize as a node list; positions are the map keys and
/// every node carries its own, so the map is rebuilt on deserialization.
mod visited_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        map: &FxHashMap<Point, PathNode>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FxHashMap<Point, PathNode>, D::Error> {
        let nodes: Vec<PathNode> = Vec::deserialize(deserializer)?;
        Ok(nodes.into_iter().map(|n| (n.position, n)).collect())
    }
}

/// Per-goal-set search context.
#[derive(Debug)]
struct GoalSet {
    index: PointIndex,
    radius: f64,
    tiles: TilePathfinder,
    state: Option<SearchState>,
    /// Remaining bound of the last committed node; commits must improve it.
    accepted_remaining: Option<f64>,
    /// Directions of the committed path, next step last (so `pop` drains it
    /// front to back).
    cached_path: Vec<Direction>,
}

/// Tick-driven navigation engine for one agent. Construct once, `set_goals`
/// per destination, then call `next_step` every tick and apply the returned
/// direction.
#[derive(Debug)]
pub struct FinePathfinder {
    config: NavConfig,
    goals: Option<GoalSet>,
    invocations: u64,
}

impl FinePathfinder {
    pub fn new(config: NavConfig) -> Self {
        FinePathfinder {
            config,
            goals: None,
            invocations: 0,
        }
    }

    /// Assigns a new goal set, discarding all search state from the previous
    /// one. Panics on an empty goal list; that is a caller bug.
    pub fn set_goals(&mut self, simulator: &mut StepSimulator, goals: &[Point], radius: f64) {
        assert!(!goals.is_empty(), "goal set must not be empty");
        info!(count = goals.len(), radius, "goals assigned, search state reset");
        simulator.invalidate_cache();
        self.goals = Some(GoalSet {
            index: PointIndex::new(goals),
            radius,
            tiles: TilePathfinder::new(radius, self.config.tile_iteration_cap),
            state: None,
            accepted_remaining: None,
            cached_path: Vec::new(),
        });
    }

    /// Drops the goal set and every cache tied to it.
    pub fn clear_goals(&mut self) {
        self.goals = None;
    }

    pub fn has_goals(&self) -> bool {
        self.goals.is_some()
    }

    /// True once the agent stands within the goal radius of some goal.
    pub fn arrived<W: World>(&self, world: &W) -> bool {
        let goals = self.goals.as_ref().expect("no goals configured");
        goals.index.min_l2_dist(world.position()) <= goals.radius
    }

    /// The frozen frontier, if one is being carried between ticks.
    pub fn search_state(&self) -> Option<&SearchState> {
        self.goals.as_ref().and_then(|g| g.state.as_ref())
    }

    /// Restores a previously snapshotted frontier.
    pub fn restore_search_state(&mut self, state: SearchState) {
        if let Some(goals) = self.goals.as_mut() {
            goals.state = Some(state);
        }
    }

    /// Remaining bound of the last accepted path, if any was committed yet.
    pub fn last_accepted_remaining(&self) -> Option<f64> {
        self.goals.as_ref().and_then(|g| g.accepted_remaining)
    }

    /// Directions still queued from the last committed path, next step last.
    pub fn cached_path(&self) -> &[Direction] {
        self.goals.as_ref().map_or(&[], |g| &g.cached_path)
    }

    /// Decides the direction to move this tick, or `None` when no acceptable
    /// step exists yet. A `None` is not a failure: the search state persists
    /// and the next tick's call resumes it. Panics when no goals are set.
    pub fn next_step<W: World>(
        &mut self,
        world: &W,
        simulator: &mut StepSimulator,
    ) -> Option<Direction> {
        let goals = self.goals.as_mut().expect("no goals configured");
        self.invocations += 1;

        // Drain the committed path first; no search while it lasts.
        if let Some(direction) = goals.cached_path.pop() {
            return Some(direction);
        }

        let position = world.position();

        // Reuse the frontier only while the agent still stands where it was
        // seeded; anything else means the world moved us and the frontier's
        // step counts are wrong.
        let stale = goals
            .state
            .as_ref()
            .is_some_and(|state| state.start != position);
        if stale {
            debug!(?position, "agent diverged from frontier start, search restarted");
            goals.state = None;
        }
        if goals.state.is_none() {
            let remaining = goals.remaining_bound(world, &self.config, position);
            goals.state = Some(SearchState::seeded(position, remaining));
        }

        let expanded = goals.run_budget(world, simulator, &self.config);
        trace!(expanded, "search pass finished");
        crate::profile_log!(
            self.invocations,
            "fine search expanded {} nodes, frontier {}",
            expanded,
            goals.state.as_ref().map_or(0, |s| s.queue.len())
        );

        goals.try_commit()
    }
}

impl GoalSet {
    /// Admissible lower bound on the ticks needed from `position` to the
    /// goal region.
    fn remaining_bound<W: World>(
        &mut self,
        world: &W,
        config: &NavConfig,
        position: Point,
    ) -> f64 {
        let top_speed = config.top_speed();
        let direct_ground = (self.index.min_l2_dist(position) - self.radius).max(0.0);
        let direct = (direct_ground / top_speed).ceil();
        if direct_ground <= REFINE_DISTANCE {
            return direct;
        }

        // Route through the cheapest adjacent tile center: local ground to
        // that center plus the tile pathfinder's exact distance from it.
        let tile = position.tile();
        let mut routed = f64::INFINITY;
        for dir in Direction::ALL {
            let offset = dir.tile_offset();
            let neighbor = (tile.0 + offset.0, tile.1 + offset.1);
            if let Some(tile_dist) = self.tiles.min_distance(world, &self.index, neighbor) {
                let center = Point::tile_center(neighbor.0, neighbor.1);
                routed = routed.min(position.dist(center) + tile_dist);
            }
        }
        if !routed.is_finite() {
            return direct;
        }
        // The routed value is measured center-to-center in the 8-direction
        // metric, while the agent walks freely, cuts corners, and may stop
        // anywhere inside the goal radius. Deflating by the metric inflation
        // factor and crediting the radius and both endpoint offsets turns it
        // into a lower bound on the remaining ground.
        let refined_ground = (routed / OCT_INFLATION - self.radius - TILE_SLACK).max(0.0);
        direct.max((refined_ground / top_speed).ceil())
    }

    /// Pops and expands nodes until the budget, the queue, or the goal ends
    /// the pass. Returns the number of nodes expanded.
    fn run_budget<W: World>(
        &mut self,
        world: &W,
        simulator: &mut StepSimulator,
        config: &NavConfig,
    ) -> usize {
        // The frontier is taken out of `self` for the duration of the pass so
        // the heuristic can borrow the tile memo without fighting it.
        let Some(mut state) = self.state.take() else { return 0 };
        let mut expanded = 0;
        'pass: while expanded < config.expansion_budget {
            let Some(entry) = state.queue.pop() else { break };
            let node = state.visited[&entry.position];
            expanded += 1;

            if node.remaining < state.closest_remaining {
                state.closest = Some(node.position);
                state.closest_remaining = node.remaining;
            }
            if node.remaining <= 0.0 {
                break;
            }

            for direction in Direction::ALL {
                let next = simulator.walk(world, node.position, direction);
                // Blocked moves return the unchanged position; don't push.
                if next == node.position || state.visited.contains_key(&next) {
                    continue;
                }
                let remaining = self.remaining_bound(world, config, next);
                let child = PathNode {
                    position: next,
                    predecessor: Some(node.position),
                    direction: Some(direction),
                    steps: node.steps + 1,
                    remaining,
                    cost: (node.steps + 1) as f64 + remaining,
                };
                state.visited.insert(next, child);
                state.queue.push(QueueEntry {
                    cost: child.cost,
                    position: child.position,
                });
                if remaining <= 0.0 {
                    // A goal node was produced; it is by definition the
                    // closest, so the pass is over.
                    state.closest = Some(next);
                    state.closest_remaining = 0.0;
                    break 'pass;
                }
            }
        }
        self.state = Some(state);
        expanded
    }

    /// Accepts the closest node found so far if it improves on the last
    /// commit; otherwise keeps the frontier for the next tick.
    fn try_commit(&mut self) -> Option<Direction> {
        let state = self.state.as_ref()?;
        let closest = state.closest?;
        if let Some(accepted) = self.accepted_remaining {
            // Committing to a worse remaining bound than a previous commit
            // would walk the agent away from the goal.
            if state.closest_remaining >= accepted {
                return None;
            }
        }

        // Reversed reconstruction through the visited map leaves the first
        // step at the back, which is exactly the drain order.
        let mut directions = Vec::new();
        let mut cursor = state.visited[&closest];
        while let Some(direction) = cursor.direction {
            directions.push(direction);
            let predecessor = cursor
                .predecessor
                .expect("non-root nodes always record a predecessor");
            cursor = state.visited[&predecessor];
        }
        if directions.is_empty() {
            // The closest node is the start itself; nothing to walk yet.
            return None;
        }

        debug!(
            steps = directions.len(),
            remaining = state.closest_remaining,
            "path committed"
        );
        self.accepted_remaining = Some(state.closest_remaining);
        self.cached_path = directions;
        self.cached_path.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coord;
    use crate::world::GridWorld;

    fn engine() -> (GridWorld, StepSimulator, FinePathfinder) {
        let world = GridWorld::new(Point::from_num(0.5, 0.5));
        let config = NavConfig::default();
        let sim = StepSimulator::new(&config);
        (world, sim, FinePathfinder::new(config))
    }

    /// Runs the engine until arrival or the tick limit, applying each step
    /// the way a driver would. Returns the directions taken.
    fn drive(
        world: &mut GridWorld,
        sim: &mut StepSimulator,
        nav: &mut FinePathfinder,
        max_ticks: usize,
    ) -> Vec<Direction> {
        let mut taken = Vec::new();
        for _ in 0..max_ticks {
            if nav.arrived(world) {
                break;
            }
            if let Some(dir) = nav.next_step(world, sim) {
                let next = sim.walk(world, world.position(), dir);
                world.set_position(next);
                taken.push(dir);
            }
        }
        taken
    }

    #[test]
    #[should_panic(expected = "no goals configured")]
    fn next_step_without_goals_panics() {
        let (world, mut sim, mut nav) = engine();
        let _ = nav.next_step(&world, &mut sim);
    }

    #[test]
    #[should_panic(expected = "goal set must not be empty")]
    fn empty_goal_set_panics() {
        let (_, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[], 1.0);
    }

    #[test]
    fn straight_run_east_until_arrival() {
        let (mut world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(10.5, 0.5)], 1.0);

        let taken = drive(&mut world, &mut sim, &mut nav, 300);
        assert!(nav.arrived(&world), "agent must reach the goal radius");
        assert!(!taken.is_empty());
        // Equal-cost heap ties may swap an east step for a near-east
        // diagonal, but nothing ever walks away from a goal due east.
        assert!(
            taken.iter().all(|&d| matches!(
                d,
                Direction::East | Direction::NorthEast | Direction::SouthEast
            )),
            "every step makes eastward progress: {taken:?}"
        );
        assert!(world.position().dist(Point::from_num(10.5, 0.5)) <= 1.0);
        // Step count stays near the straight-line optimum.
        assert!(taken.len() <= 70, "took {} steps", taken.len());
    }

    #[test]
    fn already_within_radius_yields_no_step() {
        let (world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(1.0, 0.5)], 1.0);
        assert!(nav.arrived(&world));
        // The root has remaining 0; there is no path to cache.
        assert_eq!(nav.next_step(&world, &mut sim), None);
    }

    #[test]
    fn frontier_survives_no_step_ticks() {
        let world = GridWorld::new(Point::from_num(0.5, 0.5));
        // Budget 1 expands only the root on the first invocation, so nothing
        // can be committed and the frontier must carry over.
        let mut config = NavConfig::default();
        config.expansion_budget = 1;
        let mut sim = StepSimulator::new(&config);
        let mut nav = FinePathfinder::new(config);
        nav.set_goals(&mut sim, &[Point::from_num(30.5, 0.5)], 1.0);

        assert_eq!(nav.next_step(&world, &mut sim), None);
        let before = nav.search_state().expect("frontier retained").visited_len();
        let _ = nav.next_step(&world, &mut sim);
        let after = nav.search_state().expect("frontier retained").visited_len();
        assert!(after > before, "second invocation resumed the same search");
    }

    #[test]
    fn cached_path_drains_before_searching_again() {
        let (mut world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(10.5, 0.5)], 1.0);

        let first = nav.next_step(&world, &mut sim).expect("open ground commits");
        let cached = nav.cached_path().len();
        assert!(cached > 0, "committed path extends past the first step");
        let next = sim.walk(&world, world.position(), first);
        world.set_position(next);

        let queries_before = world.query_count();
        let _ = nav.next_step(&world, &mut sim).expect("served from cache");
        assert_eq!(nav.cached_path().len(), cached - 1);
        assert_eq!(world.query_count(), queries_before, "no search, no world queries");
    }

    #[test]
    fn accepted_remaining_is_monotone() {
        let (mut world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(14.5, 8.5)], 1.0);

        let mut last = f64::INFINITY;
        for _ in 0..400 {
            if nav.arrived(&world) {
                break;
            }
            if let Some(dir) = nav.next_step(&world, &mut sim) {
                if let Some(accepted) = nav.last_accepted_remaining() {
                    assert!(accepted <= last, "accepted remaining rose: {accepted} > {last}");
                    last = accepted;
                }
                let next = sim.walk(&world, world.position(), dir);
                world.set_position(next);
            }
        }
        assert!(nav.arrived(&world));
    }

    #[test]
    fn committed_estimates_never_exceed_actual_steps() {
        let (mut world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(12.5, 0.5)], 1.0);

        // At every step the engine implicitly claims a total of
        // taken-so-far + this step + cached prefix + accepted bound; since
        // the bound is admissible, no claim may exceed the real total.
        let mut taken = 0usize;
        let mut estimates: Vec<f64> = Vec::new();
        for _ in 0..400 {
            if nav.arrived(&world) {
                break;
            }
            if let Some(dir) = nav.next_step(&world, &mut sim) {
                if let Some(accepted) = nav.last_accepted_remaining() {
                    estimates.push(
                        taken as f64 + 1.0 + nav.cached_path().len() as f64 + accepted,
                    );
                }
                let next = sim.walk(&world, world.position(), dir);
                world.set_position(next);
                taken += 1;
            }
        }
        assert!(nav.arrived(&world));
        assert!(!estimates.is_empty());
        for &estimate in &estimates {
            assert!(
                estimate <= taken as f64 + 1e-9,
                "estimate {estimate} exceeds the {taken} steps actually needed"
            );
        }
    }

    #[test]
    fn refined_bound_stays_below_a_scripted_wall_hop_route() {
        // A wall just east of the agent forces the tile route on a detour
        // whose center-to-center length exceeds what the agent actually
        // walks; the deflated bound must stay below the real route.
        let mut world = GridWorld::new(Point::from_num(4.5, 0.9));
        world.block_tiles((5, -10), (5, 0));
        let goal = Point::from_num(7.5, 0.9);
        let radius = 0.5;
        let config = NavConfig::default();
        let mut sim = StepSimulator::new(&config);
        let mut nav = FinePathfinder::new(config.clone());
        nav.set_goals(&mut sim, &[goal], radius);

        // A legal route: one step over the wall's top, then straight east.
        let start = world.position();
        let mut pos = sim.walk(&world, start, Direction::NorthEast);
        assert_ne!(pos, start);
        let mut steps = 1u32;
        while pos.dist(goal) > radius {
            let next = sim.walk(&world, pos, Direction::East);
            assert_ne!(next, pos, "scripted route walked into the wall");
            pos = next;
            steps += 1;
        }

        let goals = nav.goals.as_mut().expect("goals set");
        let bound = goals.remaining_bound(&world, &config, start);
        assert!(
            bound <= steps as f64,
            "heuristic {bound} exceeds the {steps}-step route"
        );
    }

    /// Breadth-first reference over the reachable step lattice; every step
    /// costs one tick, so the first arrival depth is the true remaining step
    /// count.
    fn exhaustive_steps(
        world: &GridWorld,
        sim: &mut StepSimulator,
        index: &PointIndex,
        radius: f64,
        from: Point,
    ) -> Option<u32> {
        let mut depth: FxHashMap<Point, u32> = FxHashMap::default();
        let mut frontier = std::collections::VecDeque::new();
        depth.insert(from, 0);
        frontier.push_back(from);
        while let Some(pos) = frontier.pop_front() {
            let d = depth[&pos];
            if index.min_l2_dist(pos) <= radius {
                return Some(d);
            }
            for dir in Direction::ALL {
                let next = sim.walk(world, pos, dir);
                if next != pos && !depth.contains_key(&next) {
                    depth.insert(next, d + 1);
                    frontier.push_back(next);
                }
            }
        }
        None
    }

    #[test]
    fn maze_heuristics_never_exceed_exhaustive_step_counts() {
        // Quarter-unit steps keep the reachable position lattice small
        // enough for the exhaustive reference to cover the whole maze.
        let config = NavConfig {
            straight_step: Coord::from_num(0.25),
            diagonal_step: Coord::from_num(0.25),
            expansion_budget: 40,
            ..NavConfig::default()
        };
        // Sealed ring with two interior walls forming an S-shaped corridor:
        // over the top of the first wall, under the bottom of the second.
        let mut world = GridWorld::new(Point::from_num(1.5, 0.5));
        world.block_tiles((-1, -1), (13, -1));
        world.block_tiles((-1, 9), (13, 9));
        world.block_tiles((-1, 0), (-1, 8));
        world.block_tiles((13, 0), (13, 8));
        world.block_tiles((5, -1), (5, 6));
        world.block_tiles((9, 2), (9, 9));

        let goal = Point::from_num(11.5, 0.5);
        let radius = 1.0;
        let mut sim = StepSimulator::new(&config);
        let mut nav = FinePathfinder::new(config);
        nav.set_goals(&mut sim, &[goal], radius);
        let _ = nav.next_step(&world, &mut sim);

        let nodes: Vec<PathNode> = nav
            .search_state()
            .expect("frontier retained")
            .visited
            .values()
            .copied()
            .collect();
        assert!(nodes.len() > 8, "the pass explored the maze");

        let index = PointIndex::new(&[goal]);
        for node in nodes {
            let truth = exhaustive_steps(&world, &mut sim, &index, radius, node.position)
                .expect("every explored position can still reach the goal");
            assert!(
                node.remaining <= truth as f64,
                "heuristic {} at {:?} exceeds the true {truth} remaining steps",
                node.remaining,
                node.position
            );
        }
    }

    #[test]
    fn goal_change_discards_previous_search() {
        let (mut world, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(10.5, 0.5)], 1.0);
        let _ = nav.next_step(&world, &mut sim);
        assert!(nav.last_accepted_remaining().is_some());

        nav.set_goals(&mut sim, &[Point::from_num(0.5, 10.5)], 1.0);
        assert!(nav.last_accepted_remaining().is_none());
        assert!(nav.cached_path().is_empty());
        let dir = nav.next_step(&world, &mut sim).expect("fresh search commits");
        assert!(matches!(
            dir,
            Direction::North | Direction::NorthEast | Direction::NorthWest
        ));
        let next = sim.walk(&world, world.position(), dir);
        world.set_position(next);
        drive(&mut world, &mut sim, &mut nav, 300);
        assert!(nav.arrived(&world));
    }

    #[test]
    fn clear_goals_returns_to_no_goals() {
        let (_, mut sim, mut nav) = engine();
        nav.set_goals(&mut sim, &[Point::from_num(5.5, 0.5)], 1.0);
        assert!(nav.has_goals());
        nav.clear_goals();
        assert!(!nav.has_goals());
    }

    #[test]
    fn search_state_round_trips_through_serde() {
        let (world, mut sim, _) = engine();
        let mut config = NavConfig::default();
        config.expansion_budget = 5;
        let mut nav = FinePathfinder::new(config);
        nav.set_goals(&mut sim, &[Point::from_num(40.5, 0.5)], 1.0);
        let _ = nav.next_step(&world, &mut sim);

        let state = nav.search_state().expect("in-progress frontier");
        let json = serde_json::to_string(state).expect("serializes");
        let restored: SearchState = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(restored.start(), state.start());
        assert_eq!(restored.visited_len(), state.visited_len());

        // The restored frontier keeps searching from where it left off.
        nav.restore_search_state(restored);
        let _ = nav.next_step(&world, &mut sim);
    }
}
