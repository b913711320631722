use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::ThreadPoolBuilder;
use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{LiquidData, LiquidType, SIZE_Y};
use strata_geom::BlockPos;
use strata_world::{WorldChangeListener, WorldProvider};

/// Random compare-and-swap edits spread over a pool of worker threads.
#[derive(Clone, Debug)]
pub struct Workload {
    pub threads: usize,
    pub edits: usize,
    /// Edits land in `-spread..=spread` on x and z.
    pub spread: i32,
    /// Lowest y an edit can touch.
    pub surface_y: i32,
    pub liquid_ratio: f32,
    pub seed: u64,
}

#[derive(Clone, Debug, Default)]
pub struct WorkloadSummary {
    pub blocks_committed: usize,
    pub blocks_rejected: usize,
    pub liquid_committed: usize,
    pub liquid_rejected: usize,
    pub notifications: usize,
    pub elapsed: Duration,
}

#[derive(Copy, Clone, Debug)]
enum EditJob {
    Block { pos: BlockPos, new: Block },
    Liquid { pos: BlockPos, new: LiquidData },
}

#[derive(Copy, Clone, Debug)]
struct EditOut {
    liquid: bool,
    committed: bool,
}

#[derive(Default)]
struct NotificationCounter(AtomicUsize);

impl WorldChangeListener for NotificationCounter {
    fn on_block_changed(&self, _pos: BlockPos, _new: Block, _old: Block) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

impl Workload {
    /// Feeds every edit through the pool and waits for all outcomes.
    pub fn run(&self, world: &Arc<WorldProvider>) -> anyhow::Result<WorkloadSummary> {
        let palette = palette(world.registry());
        let counter = Arc::new(NotificationCounter::default());
        let listener: Arc<dyn WorldChangeListener> = counter.clone();
        world.register_listener(listener.clone());

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("strata-edit-{i}"))
            .build()?;
        let (job_tx, job_rx) = unbounded::<EditJob>();
        let (res_tx, res_rx) = unbounded::<EditOut>();
        for _ in 0..self.threads {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    let _ = tx.send(apply(&world, job));
                }
            });
        }
        drop(job_rx);
        drop(res_tx);

        let start = Instant::now();
        let mut rng = ChaCha12Rng::seed_from_u64(self.seed);
        for _ in 0..self.edits {
            job_tx.send(self.next_job(&mut rng, &palette))?;
        }
        drop(job_tx);

        let mut summary = WorkloadSummary::default();
        for out in res_rx.iter() {
            match (out.liquid, out.committed) {
                (false, true) => summary.blocks_committed += 1,
                (false, false) => summary.blocks_rejected += 1,
                (true, true) => summary.liquid_committed += 1,
                (true, false) => summary.liquid_rejected += 1,
            }
        }
        summary.elapsed = start.elapsed();
        world.unregister_listener(&listener);
        summary.notifications = counter.0.load(Ordering::Relaxed);
        log::info!(
            "{} edits on {} threads in {:.1?}",
            self.edits,
            self.threads,
            summary.elapsed
        );
        Ok(summary)
    }

    fn next_job(&self, rng: &mut ChaCha12Rng, palette: &[Block]) -> EditJob {
        let top = (self.surface_y + self.spread).min(SIZE_Y as i32 - 1);
        let pos = BlockPos::new(
            rng.gen_range(-self.spread..=self.spread),
            rng.gen_range(self.surface_y.min(top)..=top),
            rng.gen_range(-self.spread..=self.spread),
        );
        if rng.gen_bool(f64::from(self.liquid_ratio)) {
            let liquid = if rng.gen_bool(0.5) {
                LiquidType::Water
            } else {
                LiquidType::Lava
            };
            let depth = rng.gen_range(0..=LiquidData::MAX_DEPTH);
            EditJob::Liquid {
                pos,
                new: LiquidData::new(liquid, depth),
            }
        } else {
            let new = palette
                .get(rng.gen_range(0..palette.len().max(1)))
                .copied()
                .unwrap_or(Block::AIR);
            EditJob::Block { pos, new }
        }
    }
}

/// Every defined block, air included.
fn palette(registry: &BlockRegistry) -> Vec<Block> {
    registry.iter().map(|ty| Block::new(ty.id)).collect()
}

/// One optimistic attempt: read what is there, then swap against it.
fn apply(world: &WorldProvider, job: EditJob) -> EditOut {
    match job {
        EditJob::Block { pos, new } => {
            let cur = world.get_block(pos.x, pos.y, pos.z);
            // a no-op swap would report success without writing
            let new = if new == cur && cur != Block::AIR {
                Block::AIR
            } else {
                new
            };
            EditOut {
                liquid: false,
                committed: new != cur && world.set_block(pos.x, pos.y, pos.z, new, cur),
            }
        }
        EditJob::Liquid { pos, new } => {
            let cur = world.get_liquid(pos.x, pos.y, pos.z);
            EditOut {
                liquid: true,
                committed: world.set_liquid(pos.x, pos.y, pos.z, new, cur),
            }
        }
    }
}
