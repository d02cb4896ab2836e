//! Static nearest-point index over a fixed goal set.
//!
//! A two-way space partition built once per goal assignment: leaves hold up
//! to four points scanned exhaustively, internal nodes split their point list
//! at the median of the bounding box's longer axis. Queries return the exact
//! Euclidean distance to the nearest point via branch-and-bound, descending
//! the cheaper child first and pruning the other against the best distance
//! found so far.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::point::Point;

/// Maximum points per leaf before a split is attempted.
const LEAF_CAPACITY: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointIndex {
    root: Node,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Node {
    /// Every point of this subtree lies inside `bounds`.
    bounds: Rect,
    kind: NodeKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum NodeKind {
    Leaf(SmallVec<[Point; 4]>),
    Split(Box<Node>, Box<Node>),
}

impl PointIndex {
    /// Builds the index. Panics on an empty point list; a goal set with no
    /// goals is a caller bug.
    pub fn new(points: &[Point]) -> Self {
        assert!(!points.is_empty(), "point index needs at least one point");
        let mut owned: Vec<Point> = points.to_vec();
        PointIndex {
            root: build(&mut owned),
        }
    }

    /// Exact Euclidean distance from `query` to the nearest indexed point.
    pub fn min_l2_dist(&self, query: Point) -> f64 {
        let mut best = f64::INFINITY;
        search(&self.root, query, &mut best);
        best
    }
}

fn bounding_box(points: &[Point]) -> Rect {
    let mut bounds = Rect::from_corners(points[0], points[0]);
    for &p in &points[1..] {
        bounds = bounds.union(&Rect::from_corners(p, p));
    }
    bounds
}

fn build(points: &mut [Point]) -> Node {
    let bounds = bounding_box(points);
    // A degenerate box means all points are (near) coincident on one axis
    // and a median split cannot make progress.
    let zero_area = bounds.width().to_bits() == 0 || bounds.height().to_bits() == 0;
    if points.len() <= LEAF_CAPACITY || zero_area {
        return Node {
            bounds,
            kind: NodeKind::Leaf(points.iter().copied().collect()),
        };
    }

    let split_x = bounds.width() >= bounds.height();
    let mid = points.len() / 2;
    if split_x {
        points.sort_unstable_by_key(|p| p.x());
    } else {
        points.sort_unstable_by_key(|p| p.y());
    }
    let (lo, hi) = points.split_at_mut(mid);
    Node {
        bounds,
        kind: NodeKind::Split(Box::new(build(lo)), Box::new(build(hi))),
    }
}

/// Lower bound on the distance from `p` to any point inside `bounds`; zero
/// when `p` is inside.
fn box_dist(bounds: &Rect, p: Point) -> f64 {
    let x = p.x().to_num::<f64>();
    let y = p.y().to_num::<f64>();
    let dx = (bounds.min.x().to_num::<f64>() - x).max(x - bounds.max.x().to_num::<f64>());
    let dy = (bounds.min.y().to_num::<f64>() - y).max(y - bounds.max.y().to_num::<f64>());
    let dx = dx.max(0.0);
    let dy = dy.max(0.0);
    (dx * dx + dy * dy).sqrt()
}

fn search(node: &Node, query: Point, best: &mut f64) {
    match &node.kind {
        NodeKind::Leaf(points) => {
            for &p in points {
                let d = query.dist(p);
                if d < *best {
                    *best = d;
                }
            }
        }
        NodeKind::Split(a, b) => {
            let da = box_dist(&a.bounds, query);
            let db = box_dist(&b.bounds, query);
            let (near, near_bound, far, far_bound) =
                if da <= db { (a, da, b, db) } else { (b, db, a, da) };
            if near_bound < *best {
                search(near, query, best);
            }
            if far_bound < *best {
                search(far, query, best);
            }
        }
    }
}
