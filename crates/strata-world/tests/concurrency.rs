use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use proptest::prelude::*;
use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{ChunkCoord, ChunkProvider, MemoryChunkProvider};
use strata_geom::BlockPos;
use strata_lighting::FloodLightPropagator;
use strata_world::{WorldChangeListener, WorldInfo, WorldProvider};

const BLOCKS: &str = r#"
    [[blocks]]
    name = "stone"

    [[blocks]]
    name = "dirt"

    [[blocks]]
    name = "torch"
    solid = false
    luminance = 14
"#;

#[derive(Default)]
struct Count(AtomicUsize);

impl WorldChangeListener for Count {
    fn on_block_changed(&self, _pos: BlockPos, _new: Block, _old: Block) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn world() -> (Arc<WorldProvider>, Arc<MemoryChunkProvider>, Arc<BlockRegistry>) {
    let reg = Arc::new(BlockRegistry::from_toml_str(BLOCKS).unwrap());
    let chunks = Arc::new(MemoryChunkProvider::new());
    for cx in -1..=1 {
        for cz in -1..=1 {
            chunks.create_chunk(ChunkCoord::new(cx, 0, cz));
        }
    }
    let world = Arc::new(WorldProvider::new(
        WorldInfo::new(Some("contention".into()), "c", 0, "strata:flat"),
        chunks.clone(),
        reg.clone(),
    ));
    (world, chunks, reg)
}

#[test]
fn one_writer_wins_per_expected_value() {
    let (world, _chunks, reg) = world();
    let count = Arc::new(Count::default());
    world.register_listener(count.clone());
    let candidates = [
        reg.block_by_name("stone").unwrap(),
        reg.block_by_name("dirt").unwrap(),
    ];
    let wins = AtomicUsize::new(0);
    thread::scope(|s| {
        for t in 0..8 {
            let world = &world;
            let wins = &wins;
            s.spawn(move || {
                if world.set_block(5, 30, 5, candidates[t % 2], Block::AIR) {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });
    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
    assert!(candidates.contains(&world.get_block(5, 30, 5)));
}

#[test]
fn compare_and_swap_loops_never_lose_increments() {
    let (world, _chunks, _reg) = world();
    let count = Arc::new(Count::default());
    assert!(world.set_block_forced(0, 12, 0, Block::new(100)));
    world.register_listener(count.clone());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let world = world.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    loop {
                        let cur = world.get_block(0, 12, 0);
                        if world.set_block(0, 12, 0, Block::new(cur.id + 1), cur) {
                            break;
                        }
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(world.get_block(0, 12, 0), Block::new(300));
    assert_eq!(count.0.load(Ordering::SeqCst), 200);
}

#[test]
fn neighbouring_writers_do_not_deadlock() {
    let (world, _chunks, reg) = world();
    let torch = reg.block_by_name("torch").unwrap();
    // every relight view spans all nine chunks, so each write contends with all others
    let spots = [(2, 2), (13, 2), (2, 13), (13, 13), (8, 8), (0, 15)];
    thread::scope(|s| {
        for &(x, z) in &spots {
            let world = &world;
            s.spawn(move || {
                for i in 0..20 {
                    let (new, old) = if i % 2 == 0 {
                        (torch, Block::AIR)
                    } else {
                        (Block::AIR, torch)
                    };
                    assert!(world.set_block(x, 40, z, new, old));
                }
            });
        }
    });
    for &(x, z) in &spots {
        assert_eq!(world.get_block(x, 40, z), Block::AIR);
        assert_eq!(world.get_light(x, 40, z), 0);
    }
}

fn torch_spot() -> impl Strategy<Value = (i32, i32, i32)> {
    (0i32..16, 1i32..60, 0i32..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Total light is always the brighter of the two channels
    #[test]
    fn total_light_is_max_of_channels(
        torches in prop::collection::vec(torch_spot(), 1..6),
        samples in prop::collection::vec(torch_spot(), 1..32),
    ) {
        let (world, chunks, reg) = world();
        let flood = FloodLightPropagator::new(reg.clone());
        let view = chunks.subview_around_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
        flood.relight(&mut view.lock());
        let torch = reg.block_by_name("torch").unwrap();
        let stone = reg.block_by_name("stone").unwrap();
        for &(x, y, z) in &torches {
            world.set_block(x, y, z, torch, Block::AIR);
            world.set_block(x, y + 1, z, stone, Block::AIR);
        }
        for &(x, y, z) in samples.iter().chain(&torches) {
            let total = world.get_total_light(x, y, z);
            let max = world.get_sunlight(x, y, z).max(world.get_light(x, y, z));
            prop_assert_eq!(total, max);
        }
    }
}
