use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use parking_lot::{Mutex, MutexGuard};
use strata_blocks::Block;

use crate::coord::ChunkCoord;
use crate::liquid::LiquidData;
use crate::{SIZE_X, SIZE_Y, SIZE_Z, VOLUME};

/// One column of voxel storage.
///
/// Every cell is an atomic, so unlocked reads never tear and never block.
/// Writes go through a [`ChunkLock`], which serializes mutators of the same
/// chunk without shutting out readers.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Box<[AtomicU32]>,
    light: Box<[AtomicU8]>,
    sunlight: Box<[AtomicU8]>,
    liquid: Box<[AtomicU8]>,
    write: Mutex<()>,
    dirty: AtomicBool,
}

fn zeroed_u8() -> Box<[AtomicU8]> {
    (0..VOLUME).map(|_| AtomicU8::new(0)).collect()
}

impl Chunk {
    /// All air, dark, dry.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: (0..VOLUME).map(|_| AtomicU32::new(0)).collect(),
            light: zeroed_u8(),
            sunlight: zeroed_u8(),
            liquid: zeroed_u8(),
            write: Mutex::new(()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Builds a chunk from blocks laid out in local index order. Short input
    /// is padded with air; extra entries are ignored.
    pub fn from_blocks_local(coord: ChunkCoord, blocks: &[Block]) -> Self {
        let chunk = Self::new(coord);
        for (cell, b) in chunk.blocks.iter().zip(blocks) {
            cell.store(b.to_bits(), Ordering::Relaxed);
        }
        chunk
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SIZE_X && y < SIZE_Y && z < SIZE_Z);
        (y * SIZE_Z + z) * SIZE_X + x
    }

    #[inline]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Block {
        Block::from_bits(self.blocks[Self::idx(x, y, z)].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn get_light(&self, x: usize, y: usize, z: usize) -> u8 {
        self.light[Self::idx(x, y, z)].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn get_sunlight(&self, x: usize, y: usize, z: usize) -> u8 {
        self.sunlight[Self::idx(x, y, z)].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn get_liquid(&self, x: usize, y: usize, z: usize) -> LiquidData {
        LiquidData::from_byte(self.liquid[Self::idx(x, y, z)].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks
            .iter()
            .any(|c| c.load(Ordering::Relaxed) != Block::AIR.to_bits())
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clears the dirty flag, returning whether it was set.
    #[inline]
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Blocks until this chunk's write lock is held.
    pub fn lock(&self) -> ChunkLock<'_> {
        ChunkLock {
            chunk: self,
            _guard: self.write.lock(),
        }
    }

    pub fn try_lock(&self) -> Option<ChunkLock<'_>> {
        self.write.try_lock().map(|guard| ChunkLock {
            chunk: self,
            _guard: guard,
        })
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.write.is_locked()
    }
}

/// Exclusive write access to one chunk. Released on drop.
pub struct ChunkLock<'a> {
    chunk: &'a Chunk,
    _guard: MutexGuard<'a, ()>,
}

impl<'a> ChunkLock<'a> {
    #[inline]
    pub fn chunk(&self) -> &'a Chunk {
        self.chunk
    }

    #[inline]
    pub fn set_block(&self, x: usize, y: usize, z: usize, b: Block) {
        self.chunk.blocks[Chunk::idx(x, y, z)].store(b.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn set_light(&self, x: usize, y: usize, z: usize, v: u8) {
        self.chunk.light[Chunk::idx(x, y, z)].store(v, Ordering::Relaxed);
    }

    #[inline]
    pub fn set_sunlight(&self, x: usize, y: usize, z: usize, v: u8) {
        self.chunk.sunlight[Chunk::idx(x, y, z)].store(v, Ordering::Relaxed);
    }

    #[inline]
    pub fn set_liquid(&self, x: usize, y: usize, z: usize, v: LiquidData) {
        self.chunk.liquid[Chunk::idx(x, y, z)].store(v.to_byte(), Ordering::Relaxed);
    }

    #[inline]
    pub fn mark_dirty(&self) {
        self.chunk.dirty.store(true, Ordering::Release);
    }
}

impl Deref for ChunkLock<'_> {
    type Target = Chunk;

    fn deref(&self) -> &Chunk {
        self.chunk
    }
}

impl std::fmt::Debug for ChunkLock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkLock")
            .field("coord", &self.chunk.coord)
            .finish()
    }
}
