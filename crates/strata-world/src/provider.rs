use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use strata_blocks::{Block, BlockRegistry, compare_light_propagation};
use strata_chunk::{
    Chunk, ChunkCoord, ChunkProvider, ChunkView, LiquidData, MAX_LIGHT, ViewLock, calc_block_pos,
    calc_chunk_pos, in_height_range,
};
use strata_geom::{BlockPos, Region3};
use strata_lighting::{FloodLightPropagator, LightPropagator};

use crate::info::WorldInfo;
use crate::listener::{ListenerRegistry, WorldChangeListener};
use crate::sample::Sampled;

/// One entry of [`WorldProvider::set_blocks`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockUpdate {
    pub pos: BlockPos,
    pub new: Block,
    pub old: Block,
}

impl BlockUpdate {
    pub fn new(pos: BlockPos, new: Block, old: Block) -> Self {
        Self { pos, new, old }
    }
}

/// Mutation and query front end over a [`ChunkProvider`].
///
/// Block writes are compare-and-swap: the caller states the block it expects
/// to replace and the write only lands if that is still what is stored. The
/// check, the write, light propagation, dirty marking and listener
/// notification all happen while every chunk in the surrounding view is
/// locked. Reads never lock.
pub struct WorldProvider {
    title: String,
    seed: String,
    generator: String,
    time_ms: AtomicU64,
    chunks: Arc<dyn ChunkProvider>,
    registry: Arc<BlockRegistry>,
    propagator: Arc<dyn LightPropagator>,
    listeners: ListenerRegistry,
    unloaded_reads: AtomicU64,
    disposed: AtomicBool,
}

impl WorldProvider {
    /// World lit by a [`FloodLightPropagator`] over `registry`.
    pub fn new(
        info: WorldInfo,
        chunks: Arc<dyn ChunkProvider>,
        registry: Arc<BlockRegistry>,
    ) -> Self {
        let propagator = Arc::new(FloodLightPropagator::new(registry.clone()));
        Self::with_propagator(info, chunks, registry, propagator)
    }

    pub fn with_propagator(
        info: WorldInfo,
        chunks: Arc<dyn ChunkProvider>,
        registry: Arc<BlockRegistry>,
        propagator: Arc<dyn LightPropagator>,
    ) -> Self {
        log::info!(
            "world '{}' (seed '{}', generator {}) at {} ms",
            info.title,
            info.seed,
            info.generator,
            info.time_ms
        );
        Self {
            title: info.title,
            seed: info.seed,
            generator: info.generator,
            time_ms: AtomicU64::new(info.time_ms),
            chunks,
            registry,
            propagator,
            listeners: ListenerRegistry::new(),
            unloaded_reads: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Snapshot of the metadata with the current time.
    pub fn world_info(&self) -> WorldInfo {
        WorldInfo {
            title: self.title.clone(),
            seed: self.seed.clone(),
            time_ms: self.time_ms(),
            generator: self.generator.clone(),
        }
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms.load(Ordering::Relaxed)
    }

    pub fn set_time_ms(&self, ms: u64) {
        self.time_ms.store(ms, Ordering::Relaxed);
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn chunk_provider(&self) -> &Arc<dyn ChunkProvider> {
        &self.chunks
    }

    pub fn register_listener(&self, listener: Arc<dyn WorldChangeListener>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener(&self, listener: &Arc<dyn WorldChangeListener>) -> bool {
        self.listeners.unregister(listener)
    }

    pub fn local_view(&self, chunk: ChunkCoord) -> Option<ChunkView> {
        self.chunks.local_view(chunk)
    }

    pub fn world_view_around(&self, chunk: ChunkCoord) -> Option<ChunkView> {
        self.chunks.subview_around_chunk(chunk)
    }

    /// True when the chunk owning the position is loaded and ready.
    pub fn is_block_relevant(&self, x: i32, y: i32, z: i32) -> bool {
        self.chunks.is_chunk_ready(calc_chunk_pos(x, y, z))
    }

    /// True when swapping `old` for `new` can change light anywhere.
    fn affects_light(&self, new: Block, old: Block) -> bool {
        let reg = &self.registry;
        !compare_light_propagation(reg.propagation(new), reg.propagation(old)).is_identical()
            || reg.luminance(new) != reg.luminance(old)
    }

    /// Replaces `expected_old` with `new` at the position.
    ///
    /// Returns true when the block was written, or immediately when `new`
    /// equals `expected_old`. Returns false when the chunks around the
    /// position are not loaded or the stored block is not `expected_old`.
    pub fn set_block(&self, x: i32, y: i32, z: i32, new: Block, expected_old: Block) -> bool {
        if new == expected_old {
            return true;
        }
        let pos = BlockPos::new(x, y, z);
        let relight = self.affects_light(new, expected_old);
        let radius = if relight { MAX_LIGHT as i32 + 1 } else { 1 };
        let Some(view) = self.chunks.subview_around_block(pos, radius) else {
            log::trace!("set_block at {} skipped: view unavailable", pos);
            return false;
        };
        let mut lock = view.lock();
        match lock.get_block(pos) {
            Some(current) if current == expected_old => {
                self.commit(&mut lock, pos, new, expected_old, relight);
                true
            }
            current => {
                log::trace!(
                    "set_block at {} lost race: expected {:?}, found {:?}",
                    pos,
                    expected_old,
                    current
                );
                false
            }
        }
    }

    /// Writes `new` regardless of what is stored. Always relights and
    /// notifies with the block that was replaced. Returns false only when
    /// the chunks around the position are not loaded.
    pub fn set_block_forced(&self, x: i32, y: i32, z: i32, new: Block) -> bool {
        let pos = BlockPos::new(x, y, z);
        let Some(view) = self.chunks.subview_around_block(pos, MAX_LIGHT as i32 + 1) else {
            log::trace!("set_block_forced at {} skipped: view unavailable", pos);
            return false;
        };
        let mut lock = view.lock();
        let Some(current) = lock.get_block(pos) else {
            return false;
        };
        self.commit(&mut lock, pos, new, current, true);
        true
    }

    /// Applies each update with [`WorldProvider::set_block`], one at a time.
    ///
    /// This is not a transaction: every update locks and commits on its own,
    /// a failed update does not stop the rest, and nothing is rolled back.
    /// Returns true only when every update committed.
    pub fn set_blocks<I>(&self, updates: I) -> bool
    where
        I: IntoIterator<Item = BlockUpdate>,
    {
        let mut all = true;
        for u in updates {
            all &= self.set_block(u.pos.x, u.pos.y, u.pos.z, u.new, u.old);
        }
        all
    }

    fn commit(&self, lock: &mut ViewLock<'_>, pos: BlockPos, new: Block, old: Block, relight: bool) {
        lock.set_block(pos, new);
        let affected = if relight {
            self.propagator.update(lock, pos, new, old)
        } else {
            Region3::EMPTY
        };
        if affected.is_empty() {
            lock.set_dirty_around(pos);
        } else {
            lock.set_dirty_around_region(affected);
        }
        self.listeners.notify(pos, new, old);
    }

    /// Replaces `expected_old` liquid with `new`, locking only the owning
    /// chunk. Liquid does not affect light.
    pub fn set_liquid(
        &self,
        x: i32,
        y: i32,
        z: i32,
        new: LiquidData,
        expected_old: LiquidData,
    ) -> bool {
        if !in_height_range(y) {
            return false;
        }
        let Some(chunk) = self.chunks.get_chunk(calc_chunk_pos(x, y, z)) else {
            log::trace!("set_liquid at {}, {}, {} skipped: chunk unavailable", x, y, z);
            return false;
        };
        let (lx, ly, lz) = calc_block_pos(x, y, z);
        let lock = chunk.lock();
        if lock.get_liquid(lx, ly, lz) != expected_old {
            return false;
        }
        lock.set_liquid(lx, ly, lz, new);
        true
    }

    fn sample<T>(
        &self,
        x: i32,
        y: i32,
        z: i32,
        what: &str,
        sentinel: T,
        read: impl FnOnce(&Chunk, usize, usize, usize) -> T,
    ) -> Sampled<T> {
        if !in_height_range(y) {
            return Sampled::out_of_world(sentinel);
        }
        match self.chunks.get_chunk(calc_chunk_pos(x, y, z)) {
            Some(chunk) => {
                let (lx, ly, lz) = calc_block_pos(x, y, z);
                Sampled::stored(read(&*chunk, lx, ly, lz))
            }
            None => {
                self.unloaded_reads.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "attempted to read {} from unavailable chunk at {}, {}, {}",
                    what,
                    x,
                    y,
                    z
                );
                Sampled::unloaded(sentinel)
            }
        }
    }

    pub fn get_block_sampled(&self, x: i32, y: i32, z: i32) -> Sampled<Block> {
        self.sample(x, y, z, "block", Block::AIR, |c, lx, ly, lz| {
            c.get_block(lx, ly, lz)
        })
    }

    pub fn get_light_sampled(&self, x: i32, y: i32, z: i32) -> Sampled<u8> {
        self.sample(x, y, z, "light", 0, |c, lx, ly, lz| c.get_light(lx, ly, lz))
    }

    pub fn get_sunlight_sampled(&self, x: i32, y: i32, z: i32) -> Sampled<u8> {
        self.sample(x, y, z, "sunlight", 0, |c, lx, ly, lz| {
            c.get_sunlight(lx, ly, lz)
        })
    }

    /// Brighter of sunlight and block light; never their sum.
    pub fn get_total_light_sampled(&self, x: i32, y: i32, z: i32) -> Sampled<u8> {
        self.sample(x, y, z, "total light", 0, |c, lx, ly, lz| {
            c.get_sunlight(lx, ly, lz).max(c.get_light(lx, ly, lz))
        })
    }

    pub fn get_liquid_sampled(&self, x: i32, y: i32, z: i32) -> Sampled<LiquidData> {
        self.sample(x, y, z, "liquid", LiquidData::default(), |c, lx, ly, lz| {
            c.get_liquid(lx, ly, lz)
        })
    }

    /// Air when out of the world or unloaded.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Block {
        self.get_block_sampled(x, y, z).value
    }

    pub fn get_light(&self, x: i32, y: i32, z: i32) -> u8 {
        self.get_light_sampled(x, y, z).value
    }

    pub fn get_sunlight(&self, x: i32, y: i32, z: i32) -> u8 {
        self.get_sunlight_sampled(x, y, z).value
    }

    pub fn get_total_light(&self, x: i32, y: i32, z: i32) -> u8 {
        self.get_total_light_sampled(x, y, z).value
    }

    pub fn get_liquid(&self, x: i32, y: i32, z: i32) -> LiquidData {
        self.get_liquid_sampled(x, y, z).value
    }

    /// Reads that hit an unloaded chunk since the world was created.
    pub fn unloaded_reads(&self) -> u64 {
        self.unloaded_reads.load(Ordering::Relaxed)
    }

    /// Disposes the chunk provider. Later calls do nothing.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        log::info!("disposing world '{}'", self.title);
        self.chunks.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for WorldProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldProvider")
            .field("title", &self.title)
            .field("seed", &self.seed)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
