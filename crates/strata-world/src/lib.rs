//! Authoritative world state: block, light and liquid mutation over loaded
//! chunks, with change notification.
#![forbid(unsafe_code)]

mod info;
mod listener;
mod provider;
mod sample;

pub use info::{ConfigError, TerrainConfig, WorldConfig, WorldInfo};
pub use listener::{ListenerRegistry, WorldChangeListener};
pub use provider::{BlockUpdate, WorldProvider};
pub use sample::{SampleSource, Sampled};
