//! The host-world boundary.
//!
//! The engine never talks to a game engine directly; everything it needs is
//! behind the [`World`] trait: the agent's position, tile passability, the
//! agent's collision footprint, and spatial queries for nearby obstacles.
//! [`GridWorld`] is a self-contained in-memory implementation used by the
//! tests and demos.

use std::cell::Cell;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::point::{Coord, Point};

/// A dynamic obstacle as reported by the host world.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Obstacle {
    pub name: String,
    pub position: Point,
    /// World-space axis-aligned bounds; for rotated obstacles this is the
    /// unrotated footprint, to be rotated by `orientation` around its center.
    pub bounding_box: Rect,
    /// Fraction of a full counter-clockwise turn, if the obstacle is rotated.
    pub orientation: Option<f32>,
    /// False for entities the agent can walk through (items, projectiles).
    pub blocks_movement: bool,
}

impl Obstacle {
    pub fn axis_aligned(name: impl Into<String>, bounding_box: Rect) -> Self {
        let position = Point::new(
            (bounding_box.min.x() + bounding_box.max.x()) / Coord::from_num(2),
            (bounding_box.min.y() + bounding_box.max.y()) / Coord::from_num(2),
        );
        Obstacle {
            name: name.into(),
            position,
            bounding_box,
            orientation: None,
            blocks_movement: true,
        }
    }

    pub fn rotated(name: impl Into<String>, bounding_box: Rect, orientation: f32) -> Self {
        Obstacle {
            orientation: Some(orientation),
            ..Self::axis_aligned(name, bounding_box)
        }
    }
}

/// Read-only view of the host world. All queries are answered from current
/// world state; the engine caches on its own side, the world does not.
pub trait World {
    /// The agent's current position.
    fn position(&self) -> Point;

    /// True when the tile at the given grid coordinates collides with the
    /// agent's movement layer.
    fn tile_blocked(&self, tile: (i32, i32)) -> bool;

    /// All obstacles whose bounding box intersects `area`. An empty result
    /// is a valid answer meaning "no obstacles here".
    fn obstacles_in(&self, area: &Rect) -> Vec<Obstacle>;

    /// The agent's collision box, centered on the agent's position (so its
    /// coordinates are offsets, not world positions).
    fn agent_box(&self) -> Rect;
}

/// In-memory [`World`] backed by a blocked-tile set and an obstacle list.
#[derive(Clone, Debug)]
pub struct GridWorld {
    agent: Point,
    agent_box: Rect,
    blocked: FxHashSet<(i32, i32)>,
    obstacles: Vec<Obstacle>,
    /// Number of `obstacles_in` calls served; tests use this to verify the
    /// simulator's cache window actually absorbs queries.
    query_count: Cell<usize>,
}

impl GridWorld {
    pub fn new(agent: Point) -> Self {
        // A 0.8 x 0.8 footprint, slightly smaller than a tile so the agent
        // fits through single-tile gaps.
        let half = Coord::from_num(0.4);
        GridWorld {
            agent,
            agent_box: Rect::from_center_extents(Point::from_num(0.0, 0.0), half, half),
            blocked: FxHashSet::default(),
            obstacles: Vec::new(),
            query_count: Cell::new(0),
        }
    }

    pub fn with_agent_box(mut self, agent_box: Rect) -> Self {
        self.agent_box = agent_box;
        self
    }

    pub fn block_tile(&mut self, tile: (i32, i32)) {
        self.blocked.insert(tile);
    }

    /// Blocks the inclusive tile range, a convenience for building walls.
    pub fn block_tiles(&mut self, from: (i32, i32), to: (i32, i32)) {
        for tx in from.0..=to.0 {
            for ty in from.1..=to.1 {
                self.blocked.insert((tx, ty));
            }
        }
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Moves the agent; the driver calls this after applying a step.
    pub fn set_position(&mut self, position: Point) {
        self.agent = position;
    }

    pub fn query_count(&self) -> usize {
        self.query_count.get()
    }
}

impl World for GridWorld {
    fn position(&self) -> Point {
        self.agent
    }

    fn tile_blocked(&self, tile: (i32, i32)) -> bool {
        self.blocked.contains(&tile)
    }

    fn obstacles_in(&self, area: &Rect) -> Vec<Obstacle> {
        self.query_count.set(self.query_count.get() + 1);
        self.obstacles
            .iter()
            .filter(|o| o.bounding_box.intersects(area))
            .cloned()
            .collect()
    }

    fn agent_box(&self) -> Rect {
        self.agent_box
    }
}
