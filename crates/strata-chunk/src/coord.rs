use serde::{Deserialize, Serialize};
use strata_geom::{BlockPos, Region3};

use crate::{SIZE_X, SIZE_Y, SIZE_Z};

/// Chunk coordinate. Ordering is lexicographic on (cx, cy, cz) and is the
/// global lock order for multi-chunk views.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx.saturating_add(dx),
            cy: self.cy.saturating_add(dy),
            cz: self.cz.saturating_add(dz),
        }
    }

    /// World position of the chunk's (0,0,0) voxel.
    #[inline]
    pub fn origin(self) -> BlockPos {
        BlockPos::new(
            self.cx.saturating_mul(SIZE_X as i32),
            self.cy.saturating_mul(SIZE_Y as i32),
            self.cz.saturating_mul(SIZE_Z as i32),
        )
    }

    /// Block-space region covered by this chunk.
    #[inline]
    pub fn block_region(self) -> Region3 {
        let o = self.origin();
        Region3::new(
            o,
            o.offset(SIZE_X as i32 - 1, SIZE_Y as i32 - 1, SIZE_Z as i32 - 1),
        )
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.cx, self.cy, self.cz)
    }
}

/// Chunk owning world position (floor division).
#[inline]
pub fn calc_chunk_pos(x: i32, y: i32, z: i32) -> ChunkCoord {
    ChunkCoord::new(
        x.div_euclid(SIZE_X as i32),
        y.div_euclid(SIZE_Y as i32),
        z.div_euclid(SIZE_Z as i32),
    )
}

/// Position within the owning chunk (euclidean remainder).
#[inline]
pub fn calc_block_pos(x: i32, y: i32, z: i32) -> (usize, usize, usize) {
    (
        x.rem_euclid(SIZE_X as i32) as usize,
        y.rem_euclid(SIZE_Y as i32) as usize,
        z.rem_euclid(SIZE_Z as i32) as usize,
    )
}

/// True when `y` falls inside the stored vertical extent.
#[inline]
pub fn in_height_range(y: i32) -> bool {
    (0..SIZE_Y as i32).contains(&y)
}
