//! Incremental light propagation over locked chunk views.
#![forbid(unsafe_code)]

use strata_blocks::Block;
use strata_chunk::ViewLock;
use strata_geom::{BlockPos, Region3};

mod flood;

pub use flood::FloodLightPropagator;

/// Recomputes light after a single block change.
///
/// Called with the view already locked and the new block already written at
/// `pos`. Implementations may only touch positions inside the view and must
/// return the bounding region of every light value they changed, or
/// [`Region3::EMPTY`] when nothing changed.
pub trait LightPropagator: Send + Sync {
    fn update(&self, view: &mut ViewLock<'_>, pos: BlockPos, new: Block, old: Block) -> Region3;
}
