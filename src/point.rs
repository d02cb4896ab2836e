//! Packed 2D points on a 1/256 fixed-point grid.
//!
//! Every position the engine touches lives on a grid with 1/256-unit
//! resolution inside the open domain (-2048, 2048) on both axes. A position
//! is packed into a single `i64` key so it can be used directly as a map key,
//! ordered, and moved by pure integer addition in the hot search loops.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Fixed-point coordinate type used throughout the engine.
///
/// I24F8 format: 24 integer bits, 8 fractional bits, i.e. exactly the 1/256
/// resolution of the supported grid. All world positions, collision-box
/// corners and per-tick step lengths are multiples of this resolution, so
/// encode/decode is lossless by construction.
pub type Coord = fixed::types::I24F8;

/// Raw scaled-integer bound: 2048 * 256. Coordinates must be strictly inside.
const DOMAIN_BITS: i32 = 2048 * 256;

/// Bias added to the x lane so that the low 32 bits of a key are always a
/// positive value well away from the lane boundaries. Valid deltas can then
/// never carry or borrow across lanes, which is what makes `key + delta`
/// plain integer addition.
const X_BIAS: i64 = 1 << 30;

/// A grid position packed into one comparable, hashable integer key.
///
/// Layout: high 32 bits hold the scaled y coordinate, low 32 bits hold the
/// scaled x coordinate plus [`X_BIAS`]. Since |scaled coordinate| < 2^19 the
/// x lane stays inside (2^30 - 2^19, 2^30 + 2^19) and lane arithmetic never
/// overflows into the y lane.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point(i64);

impl Point {
    /// Packs a coordinate pair. Panics if either coordinate is outside the
    /// supported domain; that is a caller bug, not a recoverable condition.
    pub fn new(x: Coord, y: Coord) -> Self {
        let xb = x.to_bits();
        let yb = y.to_bits();
        assert!(
            xb.abs() < DOMAIN_BITS && yb.abs() < DOMAIN_BITS,
            "point ({x}, {y}) outside supported domain (-2048, 2048)"
        );
        Point(((yb as i64) << 32) + (xb as i64 + X_BIAS))
    }

    /// Convenience constructor from plain numbers; rounds to the 1/256 grid.
    pub fn from_num(x: f64, y: f64) -> Self {
        Self::new(Coord::from_num(x), Coord::from_num(y))
    }

    pub fn x(self) -> Coord {
        Coord::from_bits(((self.0 & 0xFFFF_FFFF) - X_BIAS) as i32)
    }

    pub fn y(self) -> Coord {
        Coord::from_bits((self.0 >> 32) as i32)
    }

    /// The raw packed key. Exposed for ordering-sensitive containers.
    pub fn key(self) -> i64 {
        self.0
    }

    /// True when both coordinates are strictly inside the supported domain.
    /// Points produced by delta addition must be checked before they are used
    /// as map keys or unpacked near the domain edge.
    pub fn in_domain(self) -> bool {
        self.x().to_bits().abs() < DOMAIN_BITS && self.y().to_bits().abs() < DOMAIN_BITS
    }

    /// The unit tile containing this point.
    pub fn tile(self) -> (i32, i32) {
        (
            self.x().floor().to_num::<i32>(),
            self.y().floor().to_num::<i32>(),
        )
    }

    /// Center of the unit tile with the given grid coordinates.
    pub fn tile_center(tx: i32, ty: i32) -> Self {
        let half = Coord::from_num(0.5);
        Self::new(Coord::from_num(tx) + half, Coord::from_num(ty) + half)
    }

    /// Euclidean distance to `other`.
    pub fn dist(self, other: Point) -> f64 {
        let dx = (other.x() - self.x()).to_num::<f64>();
        let dy = (other.y() - self.y()).to_num::<f64>();
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

/// A displacement between two packed points.
///
/// Built once per direction and reused every tick: `point + delta` is a
/// single `i64` addition, no unpacking.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PointDelta(i64);

impl PointDelta {
    pub fn new(dx: Coord, dy: Coord) -> Self {
        let dxb = dx.to_bits();
        let dyb = dy.to_bits();
        // A delta may span the whole domain but no more.
        assert!(
            dxb.abs() < 2 * DOMAIN_BITS && dyb.abs() < 2 * DOMAIN_BITS,
            "delta ({dx}, {dy}) outside supported range"
        );
        PointDelta(((dyb as i64) << 32) + dxb as i64)
    }
}

impl Add<PointDelta> for Point {
    type Output = Point;

    fn add(self, rhs: PointDelta) -> Point {
        // Lane arithmetic is exact as long as the resulting coordinates stay
        // in the domain, which the walk/search layers guarantee.
        Point(self.0 + rhs.0)
    }
}

/// The eight compass directions the agent can step in.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    /// All eight directions (cardinal + diagonal).
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Convert to array index for per-direction lookup tables.
    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast
                | Direction::NorthWest
                | Direction::SouthEast
                | Direction::SouthWest
        )
    }

    /// Unit tile offset: x grows east, y grows north.
    pub fn tile_offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }

    /// Per-tick displacement for this direction given the straight and
    /// diagonal step lengths.
    pub fn step_delta(self, straight: Coord, diagonal: Coord) -> PointDelta {
        let z = Coord::ZERO;
        match self {
            Direction::North => PointDelta::new(z, straight),
            Direction::South => PointDelta::new(z, -straight),
            Direction::East => PointDelta::new(straight, z),
            Direction::West => PointDelta::new(-straight, z),
            Direction::NorthEast => PointDelta::new(diagonal, diagonal),
            Direction::NorthWest => PointDelta::new(-diagonal, diagonal),
            Direction::SouthEast => PointDelta::new(diagonal, -diagonal),
            Direction::SouthWest => PointDelta::new(-diagonal, -diagonal),
        }
    }
}

/// 8-direction movement-cost metric between tiles:
/// `|dx - dy| + min(dx, dy) * sqrt(2)`.
pub fn oct_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (a.0 - b.0).abs() as f64;
    let dy = (a.1 - b.1).abs() as f64;
    (dx - dy).abs() + dx.min(dy) * std::f64::consts::SQRT_2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact_on_grid() {
        // Sample the 1/256 grid across the domain, including the extremes.
        let mut bits = vec![0i32, 1, -1, 255, -255, 256, -256, DOMAIN_BITS - 1, 1 - DOMAIN_BITS];
        for _ in 0..200 {
            bits.push(fastrand::i32(1 - DOMAIN_BITS..DOMAIN_BITS));
        }
        for &xb in &bits {
            for &yb in &bits {
                let x = Coord::from_bits(xb);
                let y = Coord::from_bits(yb);
                let p = Point::new(x, y);
                assert_eq!(p.x(), x);
                assert_eq!(p.y(), y);
            }
        }
    }

    #[test]
    fn delta_addition_matches_coordinate_addition() {
        for _ in 0..500 {
            let x = Coord::from_bits(fastrand::i32(-100_000..100_000));
            let y = Coord::from_bits(fastrand::i32(-100_000..100_000));
            let dx = Coord::from_bits(fastrand::i32(-50_000..50_000));
            let dy = Coord::from_bits(fastrand::i32(-50_000..50_000));
            let moved = Point::new(x, y) + PointDelta::new(dx, dy);
            assert_eq!(moved.x(), x + dx);
            assert_eq!(moved.y(), y + dy);
        }
    }

    #[test]
    #[should_panic(expected = "outside supported domain")]
    fn out_of_domain_coordinate_panics() {
        let _ = Point::new(Coord::from_num(2048), Coord::ZERO);
    }

    #[test]
    fn tile_of_negative_coordinates_floors() {
        assert_eq!(Point::from_num(-0.5, -1.25).tile(), (-1, -2));
        assert_eq!(Point::from_num(0.5, 1.25).tile(), (0, 1));
        assert_eq!(Point::from_num(-2.0, 3.0).tile(), (-2, 3));
    }

    #[test]
    fn tile_center_lands_inside_its_tile() {
        for &(tx, ty) in &[(0, 0), (-3, 7), (100, -100)] {
            assert_eq!(Point::tile_center(tx, ty).tile(), (tx, ty));
        }
    }

    #[test]
    fn packed_keys_are_usable_as_map_keys() {
        let mut map = rustc_hash::FxHashMap::default();
        let a = Point::from_num(1.5, -2.25);
        let b = Point::from_num(1.5, -2.25);
        map.insert(a, 7u32);
        assert_eq!(map.get(&b), Some(&7));
    }

    #[test]
    fn oct_distance_matches_known_values() {
        assert_eq!(oct_distance((0, 0), (3, 0)), 3.0);
        assert_eq!(oct_distance((0, 0), (0, 4)), 4.0);
        let d = oct_distance((0, 0), (2, 5));
        assert!((d - (3.0 + 2.0 * std::f64::consts::SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn all_directions_have_distinct_indices() {
        let mut seen = [false; 8];
        for d in Direction::ALL {
            assert!(!seen[d.as_index()]);
            seen[d.as_index()] = true;
        }
    }
}
