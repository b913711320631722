use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use hashbrown::HashMap;
use parking_lot::RwLock;
use strata_geom::{BlockPos, Region3};

use crate::chunk::Chunk;
use crate::coord::ChunkCoord;
use crate::view::ChunkView;

/// Source of loaded chunks.
///
/// Only `get_chunk` and `dispose` are required; views are assembled from
/// `get_chunk` unless an implementation has a faster path.
pub trait ChunkProvider: Send + Sync {
    /// The chunk at `coord` if it is loaded and ready.
    fn get_chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>>;

    fn is_chunk_ready(&self, coord: ChunkCoord) -> bool {
        self.get_chunk(coord).is_some()
    }

    /// View over the single chunk at `coord`.
    fn local_view(&self, coord: ChunkCoord) -> Option<ChunkView> {
        ChunkView::assemble(self, coord.block_region())
    }

    /// View over `coord` and its eight horizontal neighbours.
    fn subview_around_chunk(&self, coord: ChunkCoord) -> Option<ChunkView> {
        let r = coord
            .offset(-1, 0, -1)
            .block_region()
            .union(coord.offset(1, 0, 1).block_region());
        ChunkView::assemble(self, r)
    }

    /// View over every chunk within `radius` blocks of `pos`. `None` when
    /// `pos` is outside the vertical extent or any chunk is missing.
    fn subview_around_block(&self, pos: BlockPos, radius: i32) -> Option<ChunkView> {
        if !crate::in_height_range(pos.y) {
            return None;
        }
        ChunkView::assemble(self, Region3::around(pos, radius))
    }

    /// Releases provider resources. Safe to call more than once.
    fn dispose(&self);
}

/// Chunk store backed by a map. Chunks are inserted by the caller.
#[derive(Debug, Default)]
pub struct MemoryChunkProvider {
    chunks: RwLock<HashMap<ChunkCoord, Arc<Chunk>>>,
    lookups: AtomicU64,
    disposed: AtomicBool,
}

impl MemoryChunkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an empty chunk at `coord`, replacing any existing one.
    pub fn create_chunk(&self, coord: ChunkCoord) -> Arc<Chunk> {
        self.insert_chunk(Chunk::new(coord))
    }

    pub fn insert_chunk(&self, chunk: Chunk) -> Arc<Chunk> {
        let chunk = Arc::new(chunk);
        if let Some(old) = self.chunks.write().insert(chunk.coord(), chunk.clone()) {
            log::debug!("replaced chunk {}", old.coord());
        }
        chunk
    }

    pub fn remove_chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.write().remove(&coord)
    }

    /// Coordinates of every loaded chunk, ascending.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.read().keys().copied().collect();
        coords.sort();
        coords
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Number of `get_chunk` calls served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl ChunkProvider for MemoryChunkProvider {
    fn get_chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.chunks.read().get(&coord).cloned()
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut map = self.chunks.write();
        log::info!("disposing chunk provider ({} chunks)", map.len());
        map.clear();
    }
}
