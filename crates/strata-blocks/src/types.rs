use serde::{Deserialize, Serialize};

/// Highest luminance a block type may emit; matches the chunk light range.
pub const MAX_LUMINANCE: u8 = 15;

// Compact voxel representation used at runtime
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Block { id, state: 0 }
    }

    #[inline]
    pub const fn with_state(id: BlockId, state: BlockState) -> Self {
        Block { id, state }
    }

    /// Packs into the 32-bit word stored per voxel (id high, state low).
    #[inline]
    pub const fn to_bits(self) -> u32 {
        ((self.id as u32) << 16) | self.state as u32
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Block {
            id: (bits >> 16) as u16,
            state: (bits & 0xFFFF) as u16,
        }
    }
}

/// How a block lets light pass through it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightPropagation {
    /// Blocks all light.
    #[default]
    Opaque,
    /// Lets block light through, but sunlight loses a level even when falling straight down.
    Translucent,
    /// Lets all light through; sunlight falls without loss.
    Transparent,
}

impl LightPropagation {
    #[inline]
    fn rank(self) -> u8 {
        match self {
            LightPropagation::Opaque => 0,
            LightPropagation::Translucent => 1,
            LightPropagation::Transparent => 2,
        }
    }

    #[inline]
    pub fn passes_light(self) -> bool {
        !matches!(self, LightPropagation::Opaque)
    }

    #[inline]
    pub fn keeps_sunlight_falling(self) -> bool {
        matches!(self, LightPropagation::Transparent)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropagationComparison {
    Identical,
    MorePermissive,
    MoreRestricted,
}

impl PropagationComparison {
    #[inline]
    pub fn is_identical(self) -> bool {
        matches!(self, PropagationComparison::Identical)
    }
}

/// Compares how `new` lets light through relative to `old`.
#[inline]
pub fn compare_light_propagation(
    new: LightPropagation,
    old: LightPropagation,
) -> PropagationComparison {
    match new.rank().cmp(&old.rank()) {
        std::cmp::Ordering::Equal => PropagationComparison::Identical,
        std::cmp::Ordering::Greater => PropagationComparison::MorePermissive,
        std::cmp::Ordering::Less => PropagationComparison::MoreRestricted,
    }
}
