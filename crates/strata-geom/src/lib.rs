//! Integer block-space geometry shared by the engine crates.
#![forbid(unsafe_code)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// World block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ZERO: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Saturates at the ends of the `i32` range instead of wrapping.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    #[inline]
    pub fn step(self, side: Side) -> Self {
        let (dx, dy, dz) = side.delta();
        self.offset(dx, dy, dz)
    }

    #[inline]
    pub fn min(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The six face directions of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Right,
    Left,
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Top,
        Side::Bottom,
        Side::Right,
        Side::Left,
        Side::Front,
        Side::Back,
    ];

    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Side::Top => (0, 1, 0),
            Side::Bottom => (0, -1, 0),
            Side::Right => (1, 0, 0),
            Side::Left => (-1, 0, 0),
            Side::Front => (0, 0, 1),
            Side::Back => (0, 0, -1),
        }
    }
}

/// Inclusive axis-aligned box of block positions. A region whose `min`
/// exceeds `max` on any axis is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region3 {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl Default for Region3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Region3 {
    pub const EMPTY: Region3 = Region3 {
        min: BlockPos::new(0, 0, 0),
        max: BlockPos::new(-1, -1, -1),
    };

    #[inline]
    pub const fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_point(p: BlockPos) -> Self {
        Self::new(p, p)
    }

    /// Cube of half-extent `radius` centred on `center`, clamped to the
    /// `i32` range.
    #[inline]
    pub fn around(center: BlockPos, radius: i32) -> Self {
        let r = radius.max(0);
        Self::new(center.offset(-r, -r, -r), center.offset(r, r, r))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        !self.is_empty()
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Smallest region covering both `self` and `p`.
    #[inline]
    pub fn encompass(self, p: BlockPos) -> Self {
        if self.is_empty() {
            Self::from_point(p)
        } else {
            Self::new(self.min.min(p), self.max.max(p))
        }
    }

    #[inline]
    pub fn union(self, other: Region3) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (_, true) => self,
            _ => Self::new(self.min.min(other.min), self.max.max(other.max)),
        }
    }

    #[inline]
    pub fn intersect(self, other: Region3) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        let r = Self::new(self.min.max(other.min), self.max.min(other.max));
        if r.is_empty() { Self::EMPTY } else { r }
    }

    #[inline]
    pub fn intersects(&self, other: &Region3) -> bool {
        !self.intersect(*other).is_empty()
    }

    /// Grows every face outward by `amount`. Empty stays empty.
    #[inline]
    pub fn expand(self, amount: i32) -> Self {
        if self.is_empty() {
            return self;
        }
        let n = amount.saturating_neg();
        Self::new(
            self.min.offset(n, n, n),
            self.max.offset(amount, amount, amount),
        )
    }
}

impl fmt::Display for Region3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty]")
        } else {
            write!(f, "[{} .. {}]", self.min, self.max)
        }
    }
}
