use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{MAX_LIGHT, SIZE_Y, ViewLock};
use strata_geom::{BlockPos, Region3, Side};

use crate::LightPropagator;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Channel {
    Block,
    Sun,
}

/// Breadth-first removal and re-add of block light and sunlight.
///
/// Block light decays by one per step and only enters cells whose block
/// passes light. Sunlight behaves the same except that full-strength sunlight
/// falls straight down through transparent blocks without decaying. Above the
/// top of the world the sky is always at full strength.
#[derive(Clone, Debug)]
pub struct FloodLightPropagator {
    registry: Arc<BlockRegistry>,
}

impl FloodLightPropagator {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Recomputes both channels for every chunk in the view from scratch.
    /// Light from chunks outside the view is not considered.
    pub fn relight(&self, view: &mut ViewLock<'_>) {
        let area = view.view().chunk_region();
        if area.is_empty() {
            return;
        }
        let mut sun_seeds = Vec::new();
        let mut block_seeds = Vec::new();
        for x in area.min.x..=area.max.x {
            for z in area.min.z..=area.max.z {
                let mut open_sky = true;
                for y in (area.min.y..=area.max.y).rev() {
                    let p = BlockPos::new(x, y, z);
                    let b = view.get_block(p).unwrap_or(Block::AIR);
                    let prop = self.registry.propagation(b);
                    open_sky = open_sky && prop.keeps_sunlight_falling();
                    let sun = if open_sky {
                        MAX_LIGHT
                    } else if y == SIZE_Y as i32 - 1 && prop.passes_light() {
                        MAX_LIGHT - 1
                    } else {
                        0
                    };
                    view.set_sunlight(p, sun);
                    if sun > 0 {
                        sun_seeds.push(p);
                    }
                    let lum = self.registry.luminance(b);
                    view.set_light(p, lum);
                    if lum > 0 {
                        block_seeds.push(p);
                    }
                }
            }
        }
        let mut sun = Flood::new(view, &self.registry, Channel::Sun, false);
        sun.fill(sun_seeds);
        let mut blk = Flood::new(view, &self.registry, Channel::Block, false);
        blk.fill(block_seeds);
        log::debug!(
            "relit {} chunks over {}",
            view.view().chunks().len(),
            area
        );
    }

    fn update_channel(&self, view: &mut ViewLock<'_>, pos: BlockPos, channel: Channel) -> Region3 {
        let mut flood = Flood::new(view, &self.registry, channel, true);
        let (cleared, mut seeds) = flood.remove(pos);
        for p in cleared {
            let src = flood.source_value(p);
            if src > 0 {
                flood.write(p, src);
            }
            seeds.push(p);
        }
        flood.fill(seeds);
        flood.changed_region()
    }
}

impl LightPropagator for FloodLightPropagator {
    fn update(&self, view: &mut ViewLock<'_>, pos: BlockPos, new: Block, old: Block) -> Region3 {
        if !view.contains(pos) {
            return Region3::EMPTY;
        }
        let block = self.update_channel(view, pos, Channel::Block);
        let sun = self.update_channel(view, pos, Channel::Sun);
        let changed = block.union(sun);
        log::trace!("relit {} for {:?} -> {:?} at {}", changed, old, new, pos);
        changed
    }
}

struct Flood<'v, 'a> {
    view: &'v mut ViewLock<'a>,
    registry: &'v BlockRegistry,
    channel: Channel,
    // first observed value of every cell written, when recording
    touched: Option<HashMap<BlockPos, u8>>,
}

impl<'v, 'a> Flood<'v, 'a> {
    fn new(
        view: &'v mut ViewLock<'a>,
        registry: &'v BlockRegistry,
        channel: Channel,
        record: bool,
    ) -> Self {
        Self {
            view,
            registry,
            channel,
            touched: record.then(HashMap::new),
        }
    }

    #[inline]
    fn get(&self, p: BlockPos) -> Option<u8> {
        match self.channel {
            Channel::Block => self.view.get_light(p),
            Channel::Sun => self.view.get_sunlight(p),
        }
    }

    fn write(&mut self, p: BlockPos, v: u8) {
        let Some(cur) = self.get(p) else { return };
        if let Some(touched) = self.touched.as_mut() {
            touched.entry(p).or_insert(cur);
        }
        match self.channel {
            Channel::Block => self.view.set_light(p, v),
            Channel::Sun => self.view.set_sunlight(p, v),
        };
    }

    /// Light a cell produces on its own, ignoring neighbours.
    fn source_value(&self, p: BlockPos) -> u8 {
        let Some(b) = self.view.get_block(p) else { return 0 };
        match self.channel {
            Channel::Block => self.registry.luminance(b),
            Channel::Sun => {
                if p.y != SIZE_Y as i32 - 1 {
                    return 0;
                }
                let prop = self.registry.propagation(b);
                if prop.keeps_sunlight_falling() {
                    MAX_LIGHT
                } else if prop.passes_light() {
                    MAX_LIGHT - 1
                } else {
                    0
                }
            }
        }
    }

    /// Value `v` becomes after crossing `side` into a cell holding `to`.
    #[inline]
    fn spread(&self, v: u8, side: Side, to: Block) -> u8 {
        let prop = self.registry.propagation(to);
        if !prop.passes_light() {
            return 0;
        }
        if self.channel == Channel::Sun
            && side == Side::Bottom
            && v == MAX_LIGHT
            && prop.keeps_sunlight_falling()
        {
            return MAX_LIGHT;
        }
        v.saturating_sub(1)
    }

    /// Clears every value that depended on `start`. Returns the cleared cells
    /// and the lit boundary cells that must re-flood into them.
    fn remove(&mut self, start: BlockPos) -> (Vec<BlockPos>, Vec<BlockPos>) {
        let v0 = self.get(start).unwrap_or(0);
        self.write(start, 0);
        let mut cleared = vec![start];
        let mut boundary = Vec::new();
        let mut queue = VecDeque::from([(start, v0)]);
        while let Some((p, v)) = queue.pop_front() {
            for side in Side::ALL {
                let n = p.step(side);
                let Some(nv) = self.get(n) else { continue };
                if nv == 0 {
                    continue;
                }
                let falling = self.channel == Channel::Sun
                    && side == Side::Bottom
                    && v == MAX_LIGHT
                    && nv == MAX_LIGHT;
                if nv < v || falling {
                    self.write(n, 0);
                    cleared.push(n);
                    queue.push_back((n, nv));
                } else {
                    boundary.push(n);
                }
            }
        }
        (cleared, boundary)
    }

    fn fill(&mut self, seeds: Vec<BlockPos>) {
        let mut queue = VecDeque::from(seeds);
        while let Some(p) = queue.pop_front() {
            let v = self.get(p).unwrap_or(0);
            if v == 0 {
                continue;
            }
            for side in Side::ALL {
                let n = p.step(side);
                let Some(b) = self.view.get_block(n) else { continue };
                let nv = self.spread(v, side, b);
                if nv == 0 {
                    continue;
                }
                if self.get(n).is_some_and(|cur| cur < nv) {
                    self.write(n, nv);
                    queue.push_back(n);
                }
            }
        }
    }

    fn changed_region(&self) -> Region3 {
        let Some(touched) = self.touched.as_ref() else {
            return Region3::EMPTY;
        };
        touched
            .iter()
            .filter(|&(&p, &before)| self.get(p) != Some(before))
            .fold(Region3::EMPTY, |acc, (&p, _)| acc.encompass(p))
    }
}
