use std::sync::Arc;

use anyhow::{Context, anyhow};
use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{Chunk, ChunkCoord, ChunkView, MemoryChunkProvider, SIZE_X, SIZE_Y, SIZE_Z};
use strata_lighting::FloodLightPropagator;
use strata_world::TerrainConfig;

/// Loads a square of flat chunks around the origin and lights it.
pub fn build_flat(
    cfg: &TerrainConfig,
    registry: &Arc<BlockRegistry>,
) -> anyhow::Result<Arc<MemoryChunkProvider>> {
    let ground = registry
        .block_by_name(&cfg.ground_block)
        .ok_or_else(|| anyhow!("unknown ground block `{}`", cfg.ground_block))?;
    let column = flat_column(ground, cfg.ground_height);
    let chunks = Arc::new(MemoryChunkProvider::new());
    let r = cfg.chunk_radius;
    for cx in -r..=r {
        for cz in -r..=r {
            let coord = ChunkCoord::new(cx, 0, cz);
            chunks.insert_chunk(Chunk::from_blocks_local(coord, &column));
        }
    }
    let area = ChunkCoord::new(-r, 0, -r)
        .block_region()
        .union(ChunkCoord::new(r, 0, r).block_region());
    let view = ChunkView::assemble(chunks.as_ref(), area).context("terrain view incomplete")?;
    FloodLightPropagator::new(registry.clone()).relight(&mut view.lock());
    log::debug!("lit terrain region {:?}", view.region());
    Ok(chunks)
}

/// Blocks of one chunk in local index order: `ground` up to and including
/// `height`, air above.
fn flat_column(ground: Block, height: i32) -> Vec<Block> {
    let layer = SIZE_X * SIZE_Z;
    let solid_layers = (height + 1).clamp(0, SIZE_Y as i32) as usize;
    let mut blocks = vec![Block::AIR; layer * SIZE_Y];
    blocks[..layer * solid_layers].fill(ground);
    blocks
}
