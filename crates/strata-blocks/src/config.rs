use serde::Deserialize;
use std::collections::HashMap;

use crate::types::LightPropagation;

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub lighting: Option<LightingConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub luminance: Option<u8>,
    #[serde(default)]
    pub propagation: Option<LightPropagation>,

    // Named entry in `[lighting.profiles]`; explicit fields above win over the profile.
    #[serde(default)]
    pub light_profile: Option<String>,
}

// Top-level lighting config with reusable profiles
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LightingConfig {
    #[serde(default)]
    pub profiles: HashMap<String, LightProfile>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct LightProfile {
    #[serde(default)]
    pub luminance: u8,
    #[serde(default = "default_profile_propagation")]
    pub propagation: LightPropagation,
}

fn default_profile_propagation() -> LightPropagation {
    LightPropagation::Transparent
}
