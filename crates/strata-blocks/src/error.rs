use thiserror::Error;

use crate::types::BlockId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read block config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate block name `{0}`")]
    DuplicateName(String),
    #[error("block id {id} is assigned to both `{first}` and `{second}`")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("block `{name}` has luminance {luminance}, above the maximum of {max}")]
    LuminanceOutOfRange { name: String, luminance: u8, max: u8 },
    #[error("block id 0 is reserved for air, found `{0}`")]
    AirReserved(String),
    #[error("block `{block}` references unknown light profile `{profile}`")]
    UnknownProfile { block: String, profile: String },
}
