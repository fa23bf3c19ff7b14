//! Block kinds and per-block health
//!
//! Air is not a block: an empty grid cell is air. Every behaviour that depends
//! on the kind goes through the static property table below.

use serde::{Deserialize, Serialize};

use crate::consts::BLOCK_MAX_HEALTH;

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Dirt,
    Grass,
    Stone,
    Coal,
    Iron,
    Gold,
    Diamond,
    MythicOre,
    Bedrock,
    Water,
    Lava,
    Tnt,
    // Biome variants
    Sand,
    Sandstone,
    Snow,
    Ice,
    JungleGrass,
    Mud,
    // Nether
    Netherrack,
    SoulSand,
    Glowstone,
    NetherQuartz,
}

/// Static properties of a block kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockProps {
    /// Damage divisor; `f32::INFINITY` means indestructible
    pub hardness: f32,
    /// Blocks movement
    pub solid: bool,
    pub liquid: bool,
    pub ore: bool,
    /// Base RGB color (also used for debris particles)
    pub color: [u8; 3],
}

const fn props(hardness: f32, color: [u8; 3]) -> BlockProps {
    BlockProps {
        hardness,
        solid: true,
        liquid: false,
        ore: false,
        color,
    }
}

const fn ore(hardness: f32, color: [u8; 3]) -> BlockProps {
    BlockProps {
        ore: true,
        ..props(hardness, color)
    }
}

const fn liquid(color: [u8; 3]) -> BlockProps {
    BlockProps {
        hardness: 0.1,
        solid: false,
        liquid: true,
        ore: false,
        color,
    }
}

impl BlockKind {
    pub const ALL: [BlockKind; 22] = [
        BlockKind::Dirt,
        BlockKind::Grass,
        BlockKind::Stone,
        BlockKind::Coal,
        BlockKind::Iron,
        BlockKind::Gold,
        BlockKind::Diamond,
        BlockKind::MythicOre,
        BlockKind::Bedrock,
        BlockKind::Water,
        BlockKind::Lava,
        BlockKind::Tnt,
        BlockKind::Sand,
        BlockKind::Sandstone,
        BlockKind::Snow,
        BlockKind::Ice,
        BlockKind::JungleGrass,
        BlockKind::Mud,
        BlockKind::Netherrack,
        BlockKind::SoulSand,
        BlockKind::Glowstone,
        BlockKind::NetherQuartz,
    ];

    /// Property table lookup
    pub const fn props(self) -> BlockProps {
        match self {
            BlockKind::Dirt => props(0.5, [150, 111, 51]),
            BlockKind::Grass => props(0.5, [0, 255, 0]),
            BlockKind::Stone => props(2.0, [125, 125, 125]),
            BlockKind::Coal => ore(3.0, [50, 50, 50]),
            BlockKind::Iron => ore(5.0, [192, 192, 192]),
            BlockKind::Gold => ore(4.0, [255, 215, 0]),
            BlockKind::Diamond => ore(8.0, [0, 255, 255]),
            BlockKind::MythicOre => ore(10.0, [148, 0, 211]),
            BlockKind::Bedrock => props(f32::INFINITY, [32, 32, 32]),
            BlockKind::Water => liquid([63, 118, 228]),
            BlockKind::Lava => liquid([255, 69, 0]),
            BlockKind::Tnt => props(1.0, [255, 0, 0]),
            BlockKind::Sand => props(0.5, [237, 201, 175]),
            BlockKind::Sandstone => props(1.5, [216, 190, 140]),
            BlockKind::Snow => props(0.4, [245, 250, 255]),
            BlockKind::Ice => props(1.0, [160, 200, 255]),
            BlockKind::JungleGrass => props(0.5, [40, 160, 40]),
            BlockKind::Mud => props(0.6, [95, 70, 45]),
            BlockKind::Netherrack => props(1.0, [110, 40, 40]),
            BlockKind::SoulSand => props(0.8, [80, 60, 45]),
            BlockKind::Glowstone => props(0.6, [255, 220, 120]),
            BlockKind::NetherQuartz => ore(4.0, [235, 225, 215]),
        }
    }

    pub fn hardness(self) -> f32 {
        self.props().hardness
    }

    pub fn is_solid(self) -> bool {
        self.props().solid
    }

    pub fn is_liquid(self) -> bool {
        self.props().liquid
    }

    pub fn is_ore(self) -> bool {
        self.props().ore
    }

    /// Finite hardness can be worn down
    pub fn is_mineable(self) -> bool {
        self.props().hardness.is_finite()
    }

    pub fn color(self) -> [u8; 3] {
        self.props().color
    }
}

/// A single materialized grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    health: f32,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            health: BLOCK_MAX_HEALTH,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        BLOCK_MAX_HEALTH
    }

    pub fn hardness(&self) -> f32 {
        self.kind.hardness()
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    pub fn is_mineable(&self) -> bool {
        self.kind.is_mineable()
    }

    /// Crack progress for rendering (0 = intact, 1 = about to break)
    pub fn damage_ratio(&self) -> f32 {
        1.0 - self.health / BLOCK_MAX_HEALTH
    }

    /// Apply mining damage scaled by hardness.
    ///
    /// Returns true once health reaches zero. Indestructible blocks ignore damage.
    pub fn damage(&mut self, amount: f32) -> bool {
        if !self.is_mineable() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount / self.hardness()).max(0.0);
        self.health <= 0.0
    }

    pub fn reset_health(&mut self) {
        self.health = BLOCK_MAX_HEALTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_is_consistent() {
        for kind in BlockKind::ALL {
            let p = kind.props();
            assert!(p.hardness > 0.0, "{kind:?}");
            assert!(!(p.solid && p.liquid), "{kind:?}");
        }
        assert!(!BlockKind::Bedrock.is_mineable());
        assert!(BlockKind::Diamond.is_ore());
        assert!(!BlockKind::Water.is_solid());
    }

    #[test]
    fn test_stone_breaks_after_four_hits() {
        let mut block = Block::new(BlockKind::Stone);
        assert!(!block.damage(50.0));
        assert!(!block.damage(50.0));
        assert!(!block.damage(50.0));
        assert!(block.damage(50.0));
        assert_eq!(block.health(), 0.0);
    }

    #[test]
    fn test_bedrock_ignores_damage() {
        let mut block = Block::new(BlockKind::Bedrock);
        assert!(!block.damage(1.0e9));
        assert_eq!(block.health(), block.max_health());
        assert_eq!(block.damage_ratio(), 0.0);
    }

    #[test]
    fn test_reset_health() {
        let mut block = Block::new(BlockKind::Dirt);
        block.damage(10.0);
        assert!(block.damage_ratio() > 0.0);
        block.reset_health();
        assert_eq!(block.health(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_damage_scales_with_hardness(kind_index in 0usize..BlockKind::ALL.len(), amount in 0.01f32..500.0) {
            let kind = BlockKind::ALL[kind_index];
            prop_assume!(kind.is_mineable());
            let mut block = Block::new(kind);
            let broke = block.damage(amount);
            let expected = (BLOCK_MAX_HEALTH - amount / kind.hardness()).max(0.0);
            prop_assert!((block.health() - expected).abs() < 1e-3);
            prop_assert_eq!(broke, expected <= 0.0);
        }

        #[test]
        fn prop_infinite_hardness_never_breaks(hits in proptest::collection::vec(0.0f32..1.0e6, 1..50)) {
            let mut block = Block::new(BlockKind::Bedrock);
            for amount in hits {
                prop_assert!(!block.damage(amount));
            }
            prop_assert_eq!(block.health(), BLOCK_MAX_HEALTH);
        }
    }
}
