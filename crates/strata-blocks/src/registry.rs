use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig, LightProfile};
use super::error::RegistryError;
use super::types::{Block, BlockId, LightPropagation, MAX_LUMINANCE};

pub const AIR_NAME: &str = "air";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub luminance: u8,
    pub propagation: LightPropagation,
}

impl BlockType {
    fn air() -> Self {
        BlockType {
            id: 0,
            name: AIR_NAME.to_string(),
            solid: false,
            luminance: 0,
            propagation: LightPropagation::Transparent,
        }
    }

    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: true,
            luminance: 0,
            propagation: LightPropagation::Opaque,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

/// Interned block types. Id 0 is always air; ids skipped by explicit
/// assignments hold placeholders that read as dark and opaque.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Registry holding only air.
    pub fn new() -> Self {
        let air = BlockType::air();
        let by_name = HashMap::from([(air.name.clone(), air.id)]);
        Self {
            blocks: vec![air],
            by_name,
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks
            .get(id as usize)
            .filter(|ty| !ty.is_placeholder())
    }

    /// Every defined block type in id order, skipping placeholders.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> + '_ {
        self.blocks.iter().filter(|ty| !ty.is_placeholder())
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Light emitted by `b`; unknown ids emit nothing.
    #[inline]
    pub fn luminance(&self, b: Block) -> u8 {
        self.get(b.id).map(|ty| ty.luminance).unwrap_or(0)
    }

    /// Light-propagation class of `b`; unknown ids are opaque.
    #[inline]
    pub fn propagation(&self, b: Block) -> LightPropagation {
        self.get(b.id)
            .map(|ty| ty.propagation)
            .unwrap_or(LightPropagation::Opaque)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(blocks_toml: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        let profiles: HashMap<String, LightProfile> = cfg
            .lighting
            .as_ref()
            .map(|l| l.profiles.clone())
            .unwrap_or_default();
        for def in cfg.blocks.into_iter() {
            if def.name == AIR_NAME {
                reg.redefine_air(def, &profiles)?;
                continue;
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            let id = def.id.unwrap_or(reg.blocks.len() as BlockId);
            if id == 0 {
                return Err(RegistryError::AirReserved(def.name));
            }
            if let Some(existing) = reg.get(id) {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: existing.name.clone(),
                    second: def.name,
                });
            }
            let ty = compile_block(id, def, &profiles)?;
            while reg.blocks.len() <= id as usize {
                let gap = reg.blocks.len() as BlockId;
                reg.blocks.push(BlockType::placeholder(gap));
            }
            log::debug!(
                "registered block {} id={} luminance={} propagation={:?}",
                ty.name,
                ty.id,
                ty.luminance,
                ty.propagation
            );
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }
        Ok(reg)
    }

    fn redefine_air(
        &mut self,
        def: BlockDef,
        profiles: &HashMap<String, LightProfile>,
    ) -> Result<(), RegistryError> {
        if def.id.is_some_and(|id| id != 0) {
            return Err(RegistryError::AirReserved(def.name));
        }
        let air = compile_block(0, def, profiles)?;
        self.blocks[0] = air;
        Ok(())
    }
}

fn compile_block(
    id: BlockId,
    def: BlockDef,
    profiles: &HashMap<String, LightProfile>,
) -> Result<BlockType, RegistryError> {
    let profile = match def.light_profile.as_ref() {
        Some(name) => Some(profiles.get(name).copied().ok_or_else(|| {
            RegistryError::UnknownProfile {
                block: def.name.clone(),
                profile: name.clone(),
            }
        })?),
        None => None,
    };
    let solid = def.solid.unwrap_or(true);
    let luminance = def
        .luminance
        .or(profile.map(|p| p.luminance))
        .unwrap_or(0);
    if luminance > MAX_LUMINANCE {
        return Err(RegistryError::LuminanceOutOfRange {
            name: def.name,
            luminance,
            max: MAX_LUMINANCE,
        });
    }
    let propagation = def
        .propagation
        .or(profile.map(|p| p.propagation))
        .unwrap_or(if solid {
            LightPropagation::Opaque
        } else {
            LightPropagation::Transparent
        });
    Ok(BlockType {
        id,
        name: def.name,
        solid,
        luminance,
        propagation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_has_air_at_zero() {
        let reg = BlockRegistry::new();
        assert_eq!(reg.id_by_name(AIR_NAME), Some(0));
        assert_eq!(reg.propagation(Block::AIR), LightPropagation::Transparent);
        assert_eq!(reg.luminance(Block::AIR), 0);
    }

    #[test]
    fn unknown_ids_are_dark_and_opaque() {
        let reg = BlockRegistry::new();
        let ghost = Block::new(77);
        assert!(reg.get(77).is_none());
        assert_eq!(reg.luminance(ghost), 0);
        assert_eq!(reg.propagation(ghost), LightPropagation::Opaque);
    }
}
