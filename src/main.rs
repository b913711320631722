mod terrain;
mod workload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use strata_blocks::BlockRegistry;
use strata_chunk::{ChunkProvider, MemoryChunkProvider};
use strata_world::{WorldConfig, WorldProvider};

use crate::workload::{Workload, WorkloadSummary};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Runs concurrent block and liquid edits against a flat world")]
struct Args {
    /// Block definitions
    #[arg(long, default_value = "assets/blocks/blocks.toml")]
    blocks: PathBuf,
    /// World metadata and terrain; built-in defaults when omitted
    #[arg(long)]
    world: Option<PathBuf>,
    /// Worker threads
    #[arg(long, default_value_t = 4)]
    threads: usize,
    /// Total edit attempts
    #[arg(long, default_value_t = 20_000)]
    edits: usize,
    /// Half-width of the square the edits land in, in blocks
    #[arg(long, default_value_t = 6)]
    spread: i32,
    /// Share of edits that target liquid instead of blocks, 0.0..=1.0
    #[arg(long, default_value_t = 0.25)]
    liquid_ratio: f32,
    /// Seed for choosing edit positions
    #[arg(long, default_value_t = 0x5eed)]
    rng_seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
    let args = Args::parse();

    let registry = BlockRegistry::load_from_path(&args.blocks)
        .with_context(|| format!("loading blocks from {}", args.blocks.display()))?;
    let registry = Arc::new(registry);
    let config = match &args.world {
        Some(path) => WorldConfig::load_from_path(path)
            .with_context(|| format!("loading world from {}", path.display()))?,
        None => WorldConfig::default(),
    };
    log::info!("{} block types registered", registry.len());

    let start = Instant::now();
    let chunks = terrain::build_flat(&config.terrain, &registry)?;
    log::info!(
        "generated and lit {} chunks in {:.1?}",
        chunks.loaded_count(),
        start.elapsed()
    );

    let world = Arc::new(WorldProvider::new(config.info(), chunks.clone(), registry));
    let workload = Workload {
        threads: args.threads.max(1),
        edits: args.edits,
        spread: args.spread.max(0),
        surface_y: config.terrain.ground_height + 1,
        liquid_ratio: args.liquid_ratio.clamp(0.0, 1.0),
        seed: args.rng_seed,
    };
    let summary = workload.run(&world)?;
    report(&world, &chunks, &summary);
    world.dispose();
    Ok(())
}

fn report(world: &WorldProvider, chunks: &MemoryChunkProvider, s: &WorkloadSummary) {
    let dirty = chunks_dirty(chunks);
    println!("world '{}' (seed '{}')", world.title(), world.seed());
    println!(
        "  block edits: {} committed, {} rejected",
        s.blocks_committed, s.blocks_rejected
    );
    println!(
        "  liquid edits: {} committed, {} rejected",
        s.liquid_committed, s.liquid_rejected
    );
    println!("  listener notifications: {}", s.notifications);
    println!("  dirty chunks: {}", dirty);
    println!("  unloaded reads: {}", world.unloaded_reads());
    println!("  elapsed: {:.1?}", s.elapsed);
}

fn chunks_dirty(chunks: &MemoryChunkProvider) -> usize {
    chunks
        .coords()
        .into_iter()
        .filter_map(|c| chunks.get_chunk(c))
        .filter(|c| c.take_dirty())
        .count()
}
