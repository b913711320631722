//! Chunked voxel storage, multi-chunk views and chunk providers.
#![forbid(unsafe_code)]

mod chunk;
mod coord;
mod liquid;
mod provider;
mod view;

pub use chunk::{Chunk, ChunkLock};
pub use coord::{ChunkCoord, calc_block_pos, calc_chunk_pos, in_height_range};
pub use liquid::{LiquidData, LiquidType};
pub use provider::{ChunkProvider, MemoryChunkProvider};
pub use view::{ChunkView, ViewLock};

pub const SIZE_X: usize = 16;
pub const SIZE_Y: usize = 256;
pub const SIZE_Z: usize = 16;
pub const VOLUME: usize = SIZE_X * SIZE_Y * SIZE_Z;

/// Highest value stored in a light or sunlight cell.
pub const MAX_LIGHT: u8 = 15;
