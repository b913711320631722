use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidType {
    #[default]
    Water,
    Lava,
}

/// Fluid kind and level at a voxel. Depth 0 means no liquid.
///
/// Only built through [`LiquidData::new`] or [`LiquidData::from_byte`], so
/// every value survives the one-byte packing unchanged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct LiquidData {
    liquid: LiquidType,
    depth: u8,
}

impl LiquidData {
    pub const MAX_DEPTH: u8 = 7;

    /// Clamps `depth` to `MAX_DEPTH`.
    #[inline]
    pub fn new(liquid: LiquidType, depth: u8) -> Self {
        Self {
            liquid,
            depth: depth.min(Self::MAX_DEPTH),
        }
    }

    #[inline]
    pub fn liquid(&self) -> LiquidType {
        self.liquid
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    // bit 3 = type, bits 0..3 = depth
    #[inline]
    pub fn to_byte(self) -> u8 {
        let ty = match self.liquid {
            LiquidType::Water => 0u8,
            LiquidType::Lava => 1u8,
        };
        (ty << 3) | (self.depth & Self::MAX_DEPTH)
    }

    #[inline]
    pub fn from_byte(b: u8) -> Self {
        let liquid = if (b >> 3) & 1 == 1 {
            LiquidType::Lava
        } else {
            LiquidType::Water
        };
        Self {
            liquid,
            depth: b & Self::MAX_DEPTH,
        }
    }
}

impl From<LiquidData> for u8 {
    fn from(value: LiquidData) -> Self {
        value.to_byte()
    }
}

impl From<u8> for LiquidData {
    fn from(b: u8) -> Self {
        LiquidData::from_byte(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_byte() {
        assert_eq!(LiquidData::default().to_byte(), 0);
        assert_eq!(LiquidData::from_byte(0), LiquidData::default());
    }

    #[test]
    fn byte_roundtrip_all_states() {
        for liquid in [LiquidType::Water, LiquidType::Lava] {
            for depth in 0..=LiquidData::MAX_DEPTH {
                let d = LiquidData::new(liquid, depth);
                assert_eq!(LiquidData::from_byte(d.to_byte()), d);
            }
        }
    }

    #[test]
    fn new_clamps_depth() {
        assert_eq!(LiquidData::new(LiquidType::Lava, 200).depth(), LiquidData::MAX_DEPTH);
        let d = LiquidData::new(LiquidType::Lava, 9);
        assert_eq!(LiquidData::from_byte(d.to_byte()), d);
    }
}
