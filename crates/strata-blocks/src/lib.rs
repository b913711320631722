//! Block types, light behavior, and the interned block registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use registry::{BlockRegistry, BlockType};
pub use types::{
    Block, BlockId, BlockState, LightPropagation, MAX_LUMINANCE, PropagationComparison,
    compare_light_propagation,
};
