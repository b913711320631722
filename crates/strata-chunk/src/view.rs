use std::sync::Arc;

use strata_blocks::Block;
use strata_geom::{BlockPos, Region3};

use crate::chunk::{Chunk, ChunkLock};
use crate::coord::{ChunkCoord, calc_block_pos, calc_chunk_pos, in_height_range};
use crate::provider::ChunkProvider;
use crate::SIZE_Y;

/// A fixed, fully loaded box of chunks covering a block region.
///
/// Chunks are held in ascending [`ChunkCoord`] order, which is also the order
/// [`ChunkView::lock`] acquires them in. Two views that overlap therefore
/// never wait on each other in a cycle.
#[derive(Debug, Clone)]
pub struct ChunkView {
    region: Region3,
    min: ChunkCoord,
    dims: (usize, usize, usize),
    chunks: Vec<Arc<Chunk>>,
}

impl ChunkView {
    /// Gathers every chunk overlapping `region` from `provider`.
    ///
    /// The region is first clipped to the world's vertical extent. Returns
    /// `None` when nothing is left after clipping or when any chunk in the
    /// box is not loaded.
    pub fn assemble<P>(provider: &P, region: Region3) -> Option<Self>
    where
        P: ChunkProvider + ?Sized,
    {
        if region.is_empty() {
            return None;
        }
        let clip = Region3::new(
            BlockPos::new(i32::MIN, 0, i32::MIN),
            BlockPos::new(i32::MAX, SIZE_Y as i32 - 1, i32::MAX),
        );
        let region = region.intersect(clip);
        if region.is_empty() {
            return None;
        }
        let min = calc_chunk_pos(region.min.x, region.min.y, region.min.z);
        let max = calc_chunk_pos(region.max.x, region.max.y, region.max.z);
        let dims = (
            (max.cx - min.cx + 1) as usize,
            (max.cy - min.cy + 1) as usize,
            (max.cz - min.cz + 1) as usize,
        );
        let mut chunks = Vec::with_capacity(dims.0 * dims.1 * dims.2);
        // x-major, then y, then z: matches ChunkCoord's ordering
        for cx in min.cx..=max.cx {
            for cy in min.cy..=max.cy {
                for cz in min.cz..=max.cz {
                    chunks.push(provider.get_chunk(ChunkCoord::new(cx, cy, cz))?);
                }
            }
        }
        Some(Self {
            region,
            min,
            dims,
            chunks,
        })
    }

    /// Block region this view was built for, after vertical clipping.
    #[inline]
    pub fn region(&self) -> Region3 {
        self.region
    }

    /// Block region spanned by all chunks in the view.
    pub fn chunk_region(&self) -> Region3 {
        self.chunks
            .iter()
            .fold(Region3::EMPTY, |acc, c| acc.union(c.coord().block_region()))
    }

    #[inline]
    pub fn chunks(&self) -> &[Arc<Chunk>] {
        &self.chunks
    }

    fn slot(&self, pos: BlockPos) -> Option<(usize, (usize, usize, usize))> {
        if !in_height_range(pos.y) {
            return None;
        }
        let c = calc_chunk_pos(pos.x, pos.y, pos.z);
        let dx = usize::try_from(c.cx - self.min.cx).ok()?;
        let dy = usize::try_from(c.cy - self.min.cy).ok()?;
        let dz = usize::try_from(c.cz - self.min.cz).ok()?;
        if dx >= self.dims.0 || dy >= self.dims.1 || dz >= self.dims.2 {
            return None;
        }
        let i = (dx * self.dims.1 + dy) * self.dims.2 + dz;
        Some((i, calc_block_pos(pos.x, pos.y, pos.z)))
    }

    /// True when `pos` is stored in one of this view's chunks.
    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.slot(pos).is_some()
    }

    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        let (i, (x, y, z)) = self.slot(pos)?;
        Some(self.chunks[i].get_block(x, y, z))
    }

    pub fn get_light(&self, pos: BlockPos) -> Option<u8> {
        let (i, (x, y, z)) = self.slot(pos)?;
        Some(self.chunks[i].get_light(x, y, z))
    }

    pub fn get_sunlight(&self, pos: BlockPos) -> Option<u8> {
        let (i, (x, y, z)) = self.slot(pos)?;
        Some(self.chunks[i].get_sunlight(x, y, z))
    }

    /// Locks every chunk in ascending coordinate order.
    pub fn lock(&self) -> ViewLock<'_> {
        let guards = self.chunks.iter().map(|c| c.lock()).collect();
        ViewLock { view: self, guards }
    }
}

/// Write access to a [`ChunkView`]. All chunk locks are released on drop,
/// including when unwinding.
#[derive(Debug)]
pub struct ViewLock<'a> {
    view: &'a ChunkView,
    guards: Vec<ChunkLock<'a>>,
}

impl ViewLock<'_> {
    #[inline]
    pub fn view(&self) -> &ChunkView {
        self.view
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.view.contains(pos)
    }

    #[inline]
    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        self.view.get_block(pos)
    }

    #[inline]
    pub fn get_light(&self, pos: BlockPos) -> Option<u8> {
        self.view.get_light(pos)
    }

    #[inline]
    pub fn get_sunlight(&self, pos: BlockPos) -> Option<u8> {
        self.view.get_sunlight(pos)
    }

    /// Returns false when `pos` is outside the view.
    pub fn set_block(&mut self, pos: BlockPos, b: Block) -> bool {
        match self.view.slot(pos) {
            Some((i, (x, y, z))) => {
                self.guards[i].set_block(x, y, z, b);
                true
            }
            None => false,
        }
    }

    pub fn set_light(&mut self, pos: BlockPos, v: u8) -> bool {
        match self.view.slot(pos) {
            Some((i, (x, y, z))) => {
                self.guards[i].set_light(x, y, z, v);
                true
            }
            None => false,
        }
    }

    pub fn set_sunlight(&mut self, pos: BlockPos, v: u8) -> bool {
        match self.view.slot(pos) {
            Some((i, (x, y, z))) => {
                self.guards[i].set_sunlight(x, y, z, v);
                true
            }
            None => false,
        }
    }

    /// Marks the chunk holding `pos` dirty, plus any neighbour chunk that
    /// touches `pos` across a border.
    pub fn set_dirty_around(&mut self, pos: BlockPos) {
        self.set_dirty_around_region(Region3::from_point(pos));
    }

    /// Marks every chunk in the view that overlaps `region` grown by one.
    pub fn set_dirty_around_region(&mut self, region: Region3) {
        if region.is_empty() {
            return;
        }
        let area = region.expand(1);
        for guard in &self.guards {
            if guard.coord().block_region().intersects(&area) {
                guard.mark_dirty();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryChunkProvider;

    fn provider_with(coords: &[(i32, i32, i32)]) -> MemoryChunkProvider {
        let p = MemoryChunkProvider::new();
        for &c in coords {
            p.create_chunk(c.into());
        }
        p
    }

    #[test]
    fn assemble_requires_every_chunk() {
        let p = provider_with(&[(0, 0, 0)]);
        let r = Region3::new(BlockPos::new(14, 10, 0), BlockPos::new(17, 10, 0));
        assert!(ChunkView::assemble(&p, r).is_none());
        p.create_chunk(ChunkCoord::new(1, 0, 0));
        let v = ChunkView::assemble(&p, r).unwrap();
        assert_eq!(v.chunks().len(), 2);
    }

    #[test]
    fn assemble_clips_to_height() {
        let p = provider_with(&[(0, 0, 0)]);
        let above = Region3::from_point(BlockPos::new(0, SIZE_Y as i32, 0));
        assert!(ChunkView::assemble(&p, above).is_none());
        let v = ChunkView::assemble(&p, Region3::around(BlockPos::new(8, 0, 8), 1)).unwrap();
        assert_eq!(v.region().min.y, 0);
        assert!(!v.contains(BlockPos::new(8, -1, 8)));
    }

    #[test]
    fn chunks_are_sorted_by_coord() {
        let p = provider_with(&[(-1, 0, -1), (-1, 0, 0), (0, 0, -1), (0, 0, 0)]);
        let v = ChunkView::assemble(&p, Region3::around(BlockPos::ZERO, 1)).unwrap();
        let coords: Vec<_> = v.chunks().iter().map(|c| c.coord()).collect();
        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
    }

    #[test]
    fn lock_writes_across_chunk_border() {
        let p = provider_with(&[(-1, 0, 0), (0, 0, 0)]);
        let v = ChunkView::assemble(&p, Region3::around(BlockPos::new(0, 5, 5), 1)).unwrap();
        {
            let mut w = v.lock();
            assert!(w.set_block(BlockPos::new(-1, 5, 5), Block::new(3)));
            assert!(w.set_light(BlockPos::new(0, 5, 5), 7));
            assert!(!w.set_block(BlockPos::new(40, 5, 5), Block::new(3)));
        }
        assert!(v.chunks().iter().all(|c| !c.is_locked()));
        let west = p.get_chunk(ChunkCoord::new(-1, 0, 0)).unwrap();
        assert_eq!(west.get_block(15, 5, 5), Block::new(3));
        assert_eq!(v.get_light(BlockPos::new(0, 5, 5)), Some(7));
    }

    #[test]
    fn dirty_marks_neighbours_only_at_border() {
        let p = provider_with(&[(-1, 0, 0), (0, 0, 0), (1, 0, 0)]);
        let r = Region3::new(BlockPos::new(-16, 0, 0), BlockPos::new(31, 10, 15));
        let v = ChunkView::assemble(&p, r).unwrap();
        let mut w = v.lock();
        w.set_dirty_around(BlockPos::new(8, 5, 5));
        drop(w);
        let dirty: Vec<_> = v.chunks().iter().map(|c| c.take_dirty()).collect();
        assert_eq!(dirty, vec![false, true, false]);

        let mut w = v.lock();
        w.set_dirty_around(BlockPos::new(0, 5, 5));
        drop(w);
        let dirty: Vec<_> = v.chunks().iter().map(|c| c.take_dirty()).collect();
        assert_eq!(dirty, vec![true, true, false]);
    }
}
