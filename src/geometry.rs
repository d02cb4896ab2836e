//! Axis-aligned boxes, convex polygons and the collision predicates built on
//! them.
//!
//! All shapes live on the same 1/256 grid as [`Point`]. Rotation is the one
//! place floating point enters: a rotated box is converted once into a convex
//! polygon whose vertices are snapped back onto the grid (rounding toward the
//! polygon's center so convexity survives the rounding).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::point::{Coord, Point};

/// Pad used by the separating-axis test so touching shapes count as
/// overlapping.
const SAT_EPSILON: f64 = 1e-7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertices are not strictly convex counter-clockwise")]
    NotConvex,
}

/// Axis-aligned box with normalized corners (`min <= max` component-wise).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Builds a box from any two opposite corners, normalizing them.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (ax, ay) = (a.x(), a.y());
        let (bx, by) = (b.x(), b.y());
        Rect {
            min: Point::new(ax.min(bx), ay.min(by)),
            max: Point::new(ax.max(bx), ay.max(by)),
        }
    }

    pub fn from_center_extents(center: Point, half_x: Coord, half_y: Coord) -> Self {
        Rect {
            min: Point::new(center.x() - half_x, center.y() - half_y),
            max: Point::new(center.x() + half_x, center.y() + half_y),
        }
    }

    pub fn width(&self) -> Coord {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> Coord {
        self.max.y() - self.min.y()
    }

    /// Boundary counts as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x() >= self.min.x()
            && p.x() <= self.max.x()
            && p.y() >= self.min.y()
            && p.y() <= self.max.y()
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Interval overlap on both axes; touching edges overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x() <= other.max.x()
            && other.min.x() <= self.max.x()
            && self.min.y() <= other.max.y()
            && other.min.y() <= self.max.y()
    }

    /// This box translated so its coordinates are relative to `origin`.
    pub fn translate(&self, origin: Point) -> Rect {
        Rect {
            min: Point::new(self.min.x() + origin.x(), self.min.y() + origin.y()),
            max: Point::new(self.max.x() + origin.x(), self.max.y() + origin.y()),
        }
    }

    /// Grows every side by `margin`.
    pub fn pad(&self, margin: Coord) -> Rect {
        Rect {
            min: Point::new(self.min.x() - margin, self.min.y() - margin),
            max: Point::new(self.max.x() + margin, self.max.y() + margin),
        }
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point::new(
                self.min.x().min(other.min.x()),
                self.min.y().min(other.min.y()),
            ),
            max: Point::new(
                self.max.x().max(other.max.x()),
                self.max.y().max(other.max.y()),
            ),
        }
    }

    /// Minkowski sum with `by` re-centered at the origin: the result contains
    /// a point exactly when a `by`-shaped box centered there would touch
    /// `self`. On an odd-width `by` the half-extent rounds outward by one
    /// grid unit.
    pub fn expand(&self, by: &Rect) -> Rect {
        let (hx, hy) = half_extents(by);
        Rect {
            min: Point::new(self.min.x() - hx, self.min.y() - hy),
            max: Point::new(self.max.x() + hx, self.max.y() + hy),
        }
    }
}

/// Half extents of a box, rounded outward onto the grid.
fn half_extents(r: &Rect) -> (Coord, Coord) {
    let wx = r.width().to_bits();
    let wy = r.height().to_bits();
    (
        Coord::from_bits((wx + 1) >> 1),
        Coord::from_bits((wy + 1) >> 1),
    )
}

/// 2D cross product of `b - a` and `c - b` in raw grid units.
fn cross(a: Point, b: Point, c: Point) -> i64 {
    let abx = (b.x() - a.x()).to_bits() as i64;
    let aby = (b.y() - a.y()).to_bits() as i64;
    let bcx = (c.x() - b.x()).to_bits() as i64;
    let bcy = (c.y() - b.y()).to_bits() as i64;
    abx * bcy - aby * bcx
}

/// Convex counter-clockwise polygon on the grid. Immutable after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: SmallVec<[Point; 8]>,
}

impl Polygon {
    /// Validates the convexity invariant: at least 3 vertices, strictly
    /// convex counter-clockwise turns everywhere (no 3 collinear consecutive
    /// vertices).
    pub fn new(vertices: impl Into<SmallVec<[Point; 8]>>) -> Result<Self, GeometryError> {
        let vertices = vertices.into();
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if cross(a, b, c) <= 0 {
                return Err(GeometryError::NotConvex);
            }
        }
        Ok(Polygon { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Boundary counts as inside.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if cross(a, b, p) < 0 {
                return false;
            }
        }
        true
    }

    pub fn bounding_box(&self) -> Rect {
        let mut min_x = self.vertices[0].x();
        let mut min_y = self.vertices[0].y();
        let mut max_x = min_x;
        let mut max_y = min_y;
        for v in &self.vertices[1..] {
            min_x = min_x.min(v.x());
            min_y = min_y.min(v.y());
            max_x = max_x.max(v.x());
            max_y = max_y.max(v.y());
        }
        Rect {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    /// Minkowski sum with `by` re-centered at the origin.
    ///
    /// Each edge is pushed outward by the box corner most aligned with its
    /// outward normal; the connecting segments between pushed edges are edges
    /// of the box, so the result stays convex. Afterwards a point-containment
    /// test against the result is equivalent to a box-vs-polygon overlap
    /// test, which is what keeps the walk loop down to point tests.
    pub fn expand(&self, by: &Rect) -> Polygon {
        let (hx, hy) = half_extents(by);
        let n = self.vertices.len();
        let mut out: SmallVec<[Point; 8]> = SmallVec::new();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            // Outward normal of a counter-clockwise edge points right of its
            // direction: (dy, -dx).
            let nx = (b.y() - a.y()).to_bits();
            let ny = -((b.x() - a.x()).to_bits());
            let ox = hx * Coord::from_num(nx.signum());
            let oy = hy * Coord::from_num(ny.signum());
            out.push(Point::new(a.x() + ox, a.y() + oy));
            out.push(Point::new(b.x() + ox, b.y() + oy));
        }
        let out = drop_redundant_vertices(out);
        Polygon::new(out).expect("minkowski sum of a convex polygon and a box is convex")
    }

    /// Builds the convex polygon of a rotated box.
    ///
    /// `orientation` is a fraction of a full counter-clockwise turn. Vertices
    /// are rotated in floating point around the box center and snapped onto
    /// the 1/256 grid rounding toward the center, which preserves convexity
    /// despite the rounding. Fails on boxes thin enough to collapse under
    /// snapping.
    pub fn from_rect(rect: &Rect, orientation: f32) -> Result<Polygon, GeometryError> {
        let cx = (rect.min.x().to_num::<f64>() + rect.max.x().to_num::<f64>()) / 2.0;
        let cy = (rect.min.y().to_num::<f64>() + rect.max.y().to_num::<f64>()) / 2.0;
        let angle = orientation as f64 * std::f64::consts::TAU;
        let (sin, cos) = angle.sin_cos();

        // Counter-clockwise corner order with y growing north.
        let corners = [
            (rect.min.x(), rect.min.y()),
            (rect.max.x(), rect.min.y()),
            (rect.max.x(), rect.max.y()),
            (rect.min.x(), rect.max.y()),
        ];
        let mut out: SmallVec<[Point; 8]> = SmallVec::new();
        for (x, y) in corners {
            let rx = x.to_num::<f64>() - cx;
            let ry = y.to_num::<f64>() - cy;
            let wx = cx + rx * cos - ry * sin;
            let wy = cy + rx * sin + ry * cos;
            out.push(Point::new(snap_toward(wx, cx), snap_toward(wy, cy)));
        }
        Polygon::new(drop_redundant_vertices(out))
    }
}

/// Snaps `v` onto the 1/256 grid rounding toward `center`.
fn snap_toward(v: f64, center: f64) -> Coord {
    let scaled = v * 256.0;
    let bits = if v > center {
        scaled.floor()
    } else {
        scaled.ceil()
    };
    Coord::from_bits(bits as i32)
}

/// Removes consecutive duplicates and straight-line middle vertices.
fn drop_redundant_vertices(vertices: SmallVec<[Point; 8]>) -> SmallVec<[Point; 8]> {
    let mut out: SmallVec<[Point; 8]> = SmallVec::new();
    for v in vertices {
        if out.last() != Some(&v) {
            out.push(v);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    // Drop middles of collinear forward runs until stable.
    loop {
        let n = out.len();
        if n < 3 {
            return out;
        }
        let mut removed = false;
        for i in 0..n {
            let a = out[(i + n - 1) % n];
            let b = out[i];
            let c = out[(i + 1) % n];
            if cross(a, b, c) == 0 && dot_forward(a, b, c) {
                out.remove(i);
                removed = true;
                break;
            }
        }
        if !removed {
            return out;
        }
    }
}

/// True when `a -> b -> c` keeps moving in the same direction.
fn dot_forward(a: Point, b: Point, c: Point) -> bool {
    let abx = (b.x() - a.x()).to_bits() as i64;
    let aby = (b.y() - a.y()).to_bits() as i64;
    let bcx = (c.x() - b.x()).to_bits() as i64;
    let bcy = (c.y() - b.y()).to_bits() as i64;
    abx * bcx + aby * bcy >= 0
}

/// Separating-axis overlap between an axis-aligned box and a convex polygon.
/// Touching counts as overlapping.
pub fn overlap_polygon(rect: &Rect, poly: &Polygon) -> bool {
    let rect_pts = [
        (rect.min.x().to_num::<f64>(), rect.min.y().to_num::<f64>()),
        (rect.max.x().to_num::<f64>(), rect.min.y().to_num::<f64>()),
        (rect.max.x().to_num::<f64>(), rect.max.y().to_num::<f64>()),
        (rect.min.x().to_num::<f64>(), rect.max.y().to_num::<f64>()),
    ];
    let poly_pts: SmallVec<[(f64, f64); 8]> = poly
        .vertices()
        .iter()
        .map(|v| (v.x().to_num::<f64>(), v.y().to_num::<f64>()))
        .collect();

    // Box axes first, then one normal per polygon edge.
    let mut axes: SmallVec<[(f64, f64); 10]> = SmallVec::new();
    axes.push((1.0, 0.0));
    axes.push((0.0, 1.0));
    let n = poly_pts.len();
    for i in 0..n {
        let (ax, ay) = poly_pts[i];
        let (bx, by) = poly_pts[(i + 1) % n];
        axes.push((by - ay, ax - bx));
    }

    for (ax, ay) in axes {
        let (amin, amax) = project(&rect_pts, ax, ay);
        let (bmin, bmax) = project(&poly_pts, ax, ay);
        if amax < bmin - SAT_EPSILON || bmax < amin - SAT_EPSILON {
            return false;
        }
    }
    true
}

/// Separating-axis overlap between an axis-aligned box and a rotated box,
/// with the rotated box given as corners plus an orientation.
pub fn overlap_rotated(rect: &Rect, rotated: &Rect, orientation: f32) -> bool {
    match Polygon::from_rect(rotated, orientation) {
        Ok(poly) => overlap_polygon(rect, &poly),
        // A box that collapses under grid snapping is too thin to collide.
        Err(_) => false,
    }
}

fn project(points: &[(f64, f64)], ax: f64, ay: f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(x, y) in points {
        let d = x * ax + y * ay;
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Picks a point inside `a` but outside `b` using a midpoint-biased probe:
/// the center of `a` first, then points pulled halfway toward each corner
/// and edge midpoint, then the corners themselves. Returns `None` when every
/// probe lands inside `b`; this is a heuristic, not a full box difference.
pub fn selection_diff(a: &Rect, b: &Rect) -> Option<Point> {
    let minx = a.min.x().to_num::<f64>();
    let miny = a.min.y().to_num::<f64>();
    let maxx = a.max.x().to_num::<f64>();
    let maxy = a.max.y().to_num::<f64>();
    let cx = (minx + maxx) / 2.0;
    let cy = (miny + maxy) / 2.0;

    let anchors = [
        (cx, cy),
        (minx, miny),
        (maxx, miny),
        (maxx, maxy),
        (minx, maxy),
        (cx, miny),
        (cx, maxy),
        (minx, cy),
        (maxx, cy),
    ];
    let mut probes: SmallVec<[(f64, f64); 17]> = SmallVec::new();
    probes.push((cx, cy));
    for &(x, y) in &anchors[1..] {
        probes.push(((x + cx) / 2.0, (y + cy) / 2.0));
    }
    for &(x, y) in &anchors[1..5] {
        probes.push((x, y));
    }

    for (x, y) in probes {
        let p = Point::from_num(x, y);
        if a.contains(p) && !b.contains(p) {
            return Some(p);
        }
    }
    None
}
