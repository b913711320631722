use std::sync::Arc;

use proptest::prelude::*;
use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{
    Chunk, ChunkCoord, ChunkProvider, MAX_LIGHT, MemoryChunkProvider, SIZE_X, SIZE_Y, SIZE_Z,
};
use strata_geom::BlockPos;
use strata_lighting::{FloodLightPropagator, LightPropagator};

const BLOCKS: &str = r#"
    [[blocks]]
    name = "stone"

    [[blocks]]
    name = "torch"
    solid = false
    luminance = 14

    [[blocks]]
    name = "leaves"
    propagation = "translucent"

    [[blocks]]
    name = "glass"
    propagation = "transparent"
"#;

fn grid() -> MemoryChunkProvider {
    let p = MemoryChunkProvider::new();
    for cx in -1..=1 {
        for cz in -1..=1 {
            p.create_chunk(ChunkCoord::new(cx, 0, cz));
        }
    }
    p
}

fn copy_blocks(src: &MemoryChunkProvider) -> MemoryChunkProvider {
    let dst = MemoryChunkProvider::new();
    for cx in -1..=1 {
        for cz in -1..=1 {
            let coord = ChunkCoord::new(cx, 0, cz);
            let chunk = src.get_chunk(coord).unwrap();
            let mut blocks = Vec::with_capacity(SIZE_X * SIZE_Y * SIZE_Z);
            for y in 0..SIZE_Y {
                for z in 0..SIZE_Z {
                    for x in 0..SIZE_X {
                        blocks.push(chunk.get_block(x, y, z));
                    }
                }
            }
            dst.insert_chunk(Chunk::from_blocks_local(coord, &blocks));
        }
    }
    dst
}

fn edit() -> impl Strategy<Value = (i32, i32, i32, usize)> {
    (0i32..16, 20i32..40, 0i32..16, 0usize..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    // A sequence of incremental updates ends in the same light as a full recompute
    #[test]
    fn incremental_updates_match_full_relight(edits in prop::collection::vec(edit(), 1..12)) {
        let reg = Arc::new(BlockRegistry::from_toml_str(BLOCKS).unwrap());
        let palette = [
            Block::AIR,
            reg.block_by_name("stone").unwrap(),
            reg.block_by_name("torch").unwrap(),
            reg.block_by_name("leaves").unwrap(),
            reg.block_by_name("glass").unwrap(),
        ];
        let flood = FloodLightPropagator::new(reg.clone());
        let live = grid();
        let whole = live.subview_around_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
        flood.relight(&mut whole.lock());

        for &(x, y, z, k) in &edits {
            let pos = BlockPos::new(x, y, z);
            let view = live.subview_around_block(pos, MAX_LIGHT as i32 + 1).unwrap();
            let mut w = view.lock();
            let old = w.get_block(pos).unwrap();
            w.set_block(pos, palette[k]);
            flood.update(&mut w, pos, palette[k], old);
        }

        let fresh = copy_blocks(&live);
        let expect = fresh.subview_around_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
        flood.relight(&mut expect.lock());

        for x in -16..32 {
            for z in -16..32 {
                for y in 0..64 {
                    let p = BlockPos::new(x, y, z);
                    prop_assert_eq!(whole.get_light(p), expect.get_light(p), "light at {}", p);
                    prop_assert_eq!(whole.get_sunlight(p), expect.get_sunlight(p), "sunlight at {}", p);
                }
            }
        }
    }
}
