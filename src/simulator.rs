//! One-tick movement simulation with obstacle caching.
//!
//! `walk` answers "where does one tick of movement in this direction end up",
//! honoring static tile collision and dynamic obstacles. A simulated move is
//! expensive only when the obstacle cache misses: the cache keeps a window of
//! world space and every blocking shape inside it, and any step whose
//! footprint stays inside the window is resolved without touching the world.
//! On a miss the window is grown to cover the new footprint plus a margin and
//! refreshed with a single world query.

use tracing::debug;

use crate::config::NavConfig;
use crate::geometry::{overlap_polygon, Polygon, Rect};
use crate::point::{Coord, Direction, Point, PointDelta};
use crate::world::World;

/// A cached obstacle in the form the per-step test wants.
#[derive(Clone, Debug)]
enum CachedShape {
    /// Axis-aligned obstacles are pre-expanded by the agent's box, so the
    /// step test is a single point-containment check on the destination.
    Expanded(Rect),
    /// Rotated obstacles keep their polygon and are tested against the
    /// agent's translated box with the separating-axis overlap.
    Rotated(Polygon),
}

#[derive(Clone, Debug)]
struct ObstacleCache {
    window: Rect,
    shapes: Vec<CachedShape>,
}

/// One-tick movement simulator. Owns its obstacle cache exclusively; `walk`
/// mutates nothing but that cache.
#[derive(Debug)]
pub struct StepSimulator {
    /// Per-direction displacement, indexed by `Direction::as_index`.
    deltas: [PointDelta; 8],
    cache_margin: Coord,
    cache: Option<ObstacleCache>,
}

impl StepSimulator {
    pub fn new(config: &NavConfig) -> Self {
        let mut deltas = [PointDelta::new(Coord::ZERO, Coord::ZERO); 8];
        for dir in Direction::ALL {
            deltas[dir.as_index()] = dir.step_delta(config.straight_step, config.diagonal_step);
        }
        StepSimulator {
            deltas,
            cache_margin: config.cache_margin,
            cache: None,
        }
    }

    /// Drops the obstacle cache. Called when the goal episode changes, or by
    /// a driver that knows obstacles moved inside the cached window.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
    }

    /// Simulates one tick of movement. Returns the destination, or the
    /// unchanged `position` when the move is blocked; never fails.
    pub fn walk<W: World>(&mut self, world: &W, position: Point, direction: Direction) -> Point {
        let destination = position + self.deltas[direction.as_index()];
        if !destination.in_domain() {
            return position;
        }
        if world.tile_blocked(destination.tile()) {
            return position;
        }

        let footprint = world.agent_box().translate(destination);
        self.ensure_cache_covers(world, &footprint);
        let cache = self.cache.as_ref().expect("cache populated above");
        for shape in &cache.shapes {
            let hit = match shape {
                CachedShape::Expanded(expanded) => expanded.contains(destination),
                CachedShape::Rotated(poly) => overlap_polygon(&footprint, poly),
            };
            if hit {
                return position;
            }
        }
        destination
    }

    fn ensure_cache_covers<W: World>(&mut self, world: &W, footprint: &Rect) {
        if let Some(cache) = &self.cache {
            if cache.window.contains_rect(footprint) {
                return;
            }
        }
        // Grow, never just recenter: a window that already proved too small
        // for this search would miss again on the next step back.
        let needed = footprint.pad(self.cache_margin);
        let window = match &self.cache {
            Some(cache) => cache.window.union(&needed),
            None => needed,
        };

        let agent_box = world.agent_box();
        let mut shapes = Vec::new();
        for obstacle in world.obstacles_in(&window) {
            if !obstacle.blocks_movement {
                continue;
            }
            match obstacle.orientation {
                None => {
                    // Built from the agent box's actual corners rather than
                    // its half-extents: the box may be off-center, and this
                    // must agree with the footprint test used for rotated
                    // shapes.
                    let b = &obstacle.bounding_box;
                    shapes.push(CachedShape::Expanded(Rect::from_corners(
                        Point::new(
                            b.min.x() - agent_box.max.x(),
                            b.min.y() - agent_box.max.y(),
                        ),
                        Point::new(
                            b.max.x() - agent_box.min.x(),
                            b.max.y() - agent_box.min.y(),
                        ),
                    )));
                }
                Some(orientation) => {
                    // A box too thin to survive grid snapping cannot collide.
                    if let Ok(poly) = Polygon::from_rect(&obstacle.bounding_box, orientation) {
                        shapes.push(CachedShape::Rotated(poly));
                    }
                }
            }
        }
        debug!(
            shapes = shapes.len(),
            "obstacle cache refreshed for window {:?}..{:?}", window.min, window.max
        );
        self.cache = Some(ObstacleCache { window, shapes });
    }
}
