//! Procedural terrain generation
//!
//! Deterministic for a given seed: the generator owns its own `Pcg32` and
//! visits cells column by column, top to bottom.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::BlockKind;
use super::grid::BlockGrid;
use crate::settings::WorldGenSettings;

/// Horizontal biome bands, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Tundra,
    Ocean,
    Plains,
    Jungle,
    Desert,
}

impl Biome {
    const BANDS: [Biome; 5] = [
        Biome::Tundra,
        Biome::Ocean,
        Biome::Plains,
        Biome::Jungle,
        Biome::Desert,
    ];

    /// Block on the surface row
    pub fn surface(self) -> BlockKind {
        match self {
            Biome::Tundra => BlockKind::Snow,
            Biome::Ocean => BlockKind::Water,
            Biome::Plains => BlockKind::Grass,
            Biome::Jungle => BlockKind::JungleGrass,
            Biome::Desert => BlockKind::Sand,
        }
    }

    /// Block in the shallow band below the surface
    pub fn subsurface(self) -> BlockKind {
        match self {
            Biome::Tundra => BlockKind::Dirt,
            Biome::Ocean => BlockKind::Sand,
            Biome::Plains => BlockKind::Dirt,
            Biome::Jungle => BlockKind::Mud,
            Biome::Desert => BlockKind::Sandstone,
        }
    }
}

/// Ore rolls, deepest first: (kind, minimum depth below stone start, chance)
const ORE_TABLE: [(BlockKind, i32, f32); 5] = [
    (BlockKind::MythicOre, 180, 0.0005),
    (BlockKind::Diamond, 100, 0.002),
    (BlockKind::Gold, 60, 0.005),
    (BlockKind::Iron, 20, 0.01),
    (BlockKind::Coal, 0, 0.02),
];

/// Nether rolls, checked in order; anything else is netherrack
const NETHER_TABLE: [(BlockKind, f32); 4] = [
    (BlockKind::Glowstone, 0.01),
    (BlockKind::NetherQuartz, 0.02),
    (BlockKind::SoulSand, 0.05),
    (BlockKind::Lava, 0.03),
];

/// Biome for a column given the world width
pub fn biome_at(settings: &WorldGenSettings, x: i32) -> Biome {
    if !settings.biomes {
        return Biome::Plains;
    }
    let band = (x.max(0) as i64 * Biome::BANDS.len() as i64 / settings.width.max(1) as i64)
        .min(Biome::BANDS.len() as i64 - 1);
    Biome::BANDS[band as usize]
}

/// Fill a grid from the layout settings
pub fn generate(settings: &WorldGenSettings, seed: u64) -> BlockGrid {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut grid = BlockGrid::new(settings.width, settings.height);

    for x in 0..settings.width {
        let biome = biome_at(settings, x);
        for y in 0..settings.height {
            let kind = block_for_cell(settings, biome, y, &mut rng);
            grid.set_block(x, y, kind);
        }
    }

    log::info!(
        "World generated: {}x{} blocks, {} solid cells (seed {seed})",
        settings.width,
        settings.height,
        grid.len()
    );
    grid
}

fn block_for_cell(
    settings: &WorldGenSettings,
    biome: Biome,
    y: i32,
    rng: &mut Pcg32,
) -> Option<BlockKind> {
    if y < settings.surface_row {
        return None;
    }
    if y == settings.surface_row {
        return Some(biome.surface());
    }
    if y < settings.dirt_end_row {
        return Some(biome.subsurface());
    }
    if y >= settings.bedrock_row {
        if !settings.nether {
            return Some(BlockKind::Bedrock);
        }
        if y < settings.bedrock_row + settings.bedrock_thickness || y == settings.height - 1 {
            return Some(BlockKind::Bedrock);
        }
        return Some(nether_block(rng));
    }

    let depth = y - settings.stone_start_row;
    for (ore, min_depth, chance) in ORE_TABLE {
        if depth > min_depth && rng.random::<f32>() < chance {
            return Some(ore);
        }
    }
    Some(BlockKind::Stone)
}

fn nether_block(rng: &mut Pcg32) -> BlockKind {
    let roll = rng.random::<f32>();
    let mut threshold = 0.0;
    for (kind, chance) in NETHER_TABLE {
        threshold += chance;
        if roll < threshold {
            return kind;
        }
    }
    BlockKind::Netherrack
}

impl BlockGrid {
    /// Generate a new world (see [`generate`])
    pub fn generate(settings: &WorldGenSettings, seed: u64) -> Self {
        generate(settings, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WorldGenSettings {
        WorldGenSettings {
            width: 25,
            height: 120,
            surface_row: 5,
            dirt_end_row: 8,
            stone_start_row: 10,
            bedrock_row: 100,
            bedrock_thickness: 2,
            biomes: false,
            nether: false,
        }
    }

    #[test]
    fn test_layers() {
        let settings = small();
        let grid = generate(&settings, 7);
        assert!(grid.get_block(3, 4).is_none());
        assert_eq!(grid.kind_at(3, 5), Some(BlockKind::Grass));
        assert_eq!(grid.kind_at(3, 7), Some(BlockKind::Dirt));
        assert_eq!(grid.kind_at(3, 100), Some(BlockKind::Bedrock));
        assert_eq!(grid.kind_at(3, 119), Some(BlockKind::Bedrock));
        // Coal is gated by depth > 0, so the stone start row is plain stone
        assert_eq!(grid.kind_at(3, 10), Some(BlockKind::Stone));
    }

    #[test]
    fn test_same_seed_same_world() {
        let settings = small();
        let a = generate(&settings, 42);
        let b = generate(&settings, 42);
        for x in 0..settings.width {
            for y in 0..settings.height {
                assert_eq!(a.kind_at(x, y), b.kind_at(x, y));
            }
        }
    }

    #[test]
    fn test_ores_respect_depth_gates() {
        let mut settings = small();
        settings.width = 100;
        let grid = generate(&settings, 3);
        for (pos, block) in grid.iter() {
            let depth = pos.y - settings.stone_start_row;
            match block.kind {
                BlockKind::Iron => assert!(depth > 20),
                BlockKind::Gold => assert!(depth > 60),
                BlockKind::Diamond => panic!("diamond needs depth > 100"),
                BlockKind::MythicOre => panic!("mythic ore needs depth > 180"),
                _ => {}
            }
        }
        assert!(grid.iter().any(|(_, b)| b.kind == BlockKind::Coal));
    }

    #[test]
    fn test_biome_bands() {
        let settings = WorldGenSettings {
            biomes: true,
            ..small()
        };
        assert_eq!(biome_at(&settings, 0), Biome::Tundra);
        assert_eq!(biome_at(&settings, 5), Biome::Ocean);
        assert_eq!(biome_at(&settings, 12), Biome::Plains);
        assert_eq!(biome_at(&settings, 24), Biome::Desert);

        let grid = generate(&settings, 1);
        assert_eq!(grid.kind_at(0, 5), Some(BlockKind::Snow));
        assert_eq!(grid.kind_at(6, 5), Some(BlockKind::Water));
        assert_eq!(grid.kind_at(24, 6), Some(BlockKind::Sandstone));
    }

    #[test]
    fn test_nether_below_bedrock() {
        let settings = WorldGenSettings {
            nether: true,
            ..small()
        };
        let grid = generate(&settings, 9);
        assert_eq!(grid.kind_at(0, 101), Some(BlockKind::Bedrock));
        assert_eq!(grid.kind_at(0, 119), Some(BlockKind::Bedrock));
        let nether: Vec<_> = (102..119).filter_map(|y| grid.kind_at(4, y)).collect();
        assert!(!nether.is_empty());
        assert!(nether.iter().all(|k| matches!(
            k,
            BlockKind::Netherrack
                | BlockKind::Glowstone
                | BlockKind::NetherQuartz
                | BlockKind::SoulSand
                | BlockKind::Lava
        )));
    }
}
