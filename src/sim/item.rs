//! Collectible items and loot tables

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, PhysicsParams, step_body};
use super::grid::BlockGrid;
use crate::consts::{BLOCK_SIZE, ITEM_COLLECT_RADIUS};

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    WoodPickaxe,
    StonePickaxe,
    IronPickaxe,
    DiamondPickaxe,
    /// Meteor drop
    Crystal,
    /// Meteor drop
    RareOre,
    /// Raises TNT power level
    TntUpgrade,
    /// Restores one hit point
    Heart,
}

/// What an item looks like and does when collected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemProps {
    /// Glow halo color, if the item glows
    pub glow: Option<[u8; 3]>,
    pub rare: bool,
    /// Mining damage multiplier granted by a pickaxe
    pub tool_multiplier: Option<f32>,
    /// TNT power levels granted
    pub power_levels: u32,
    /// Mining levels granted
    pub mining_levels: u32,
    pub heal: u8,
}

const PLAIN: ItemProps = ItemProps {
    glow: None,
    rare: false,
    tool_multiplier: None,
    power_levels: 0,
    mining_levels: 0,
    heal: 0,
};

impl ItemKind {
    pub const fn props(self) -> ItemProps {
        match self {
            ItemKind::WoodPickaxe => ItemProps {
                tool_multiplier: Some(1.0),
                ..PLAIN
            },
            ItemKind::StonePickaxe => ItemProps {
                tool_multiplier: Some(1.5),
                ..PLAIN
            },
            ItemKind::IronPickaxe => ItemProps {
                glow: Some([200, 220, 255]),
                tool_multiplier: Some(2.0),
                ..PLAIN
            },
            ItemKind::DiamondPickaxe => ItemProps {
                glow: Some([100, 255, 255]),
                rare: true,
                tool_multiplier: Some(3.0),
                ..PLAIN
            },
            ItemKind::Crystal => ItemProps {
                glow: Some([150, 220, 255]),
                rare: true,
                mining_levels: 1,
                ..PLAIN
            },
            ItemKind::RareOre => ItemProps {
                glow: Some([180, 100, 220]),
                rare: true,
                mining_levels: 2,
                ..PLAIN
            },
            ItemKind::TntUpgrade => ItemProps {
                glow: Some([255, 80, 40]),
                rare: true,
                power_levels: 1,
                ..PLAIN
            },
            ItemKind::Heart => ItemProps {
                glow: Some([255, 90, 120]),
                heal: 1,
                ..PLAIN
            },
        }
    }
}

/// A collectible item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub body: Body,
    /// Phase of the bobbing animation
    pub float_timer: f32,
    /// Seconds left before despawning (`None` = stays forever)
    pub ttl: Option<f32>,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, kind: ItemKind) -> Self {
        Self {
            id,
            kind,
            body: Body::new(pos, Vec2::splat(BLOCK_SIZE)),
            float_timer: 0.0,
            ttl: None,
        }
    }

    /// Advance physics and animation. Returns false once the item is gone.
    pub fn update(&mut self, dt: f32, grid: &BlockGrid) -> bool {
        self.float_timer += dt * 2.0;
        let outcome = step_body(&mut self.body, grid, &PhysicsParams::ITEM, dt);
        if outcome.fell_out {
            return false;
        }
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl -= dt;
            if *ttl <= 0.0 {
                return false;
            }
        }
        true
    }

    /// Vertical bob in pixels for rendering
    pub fn float_offset(&self) -> f32 {
        self.float_timer.sin() * 3.0
    }

    /// Position to draw at (with bob applied)
    pub fn render_pos(&self) -> Vec2 {
        self.body.pos + Vec2::new(0.0, self.float_offset())
    }

    pub fn can_collect(&self, collector_center: Vec2) -> bool {
        self.body.center().distance(collector_center) < ITEM_COLLECT_RADIUS
    }
}

/// Disjoint probability bands checked in order against a single draw
#[derive(Debug, Clone, Copy)]
pub struct LootTable {
    pub bands: &'static [(f32, ItemKind)],
}

impl LootTable {
    /// TNT detonation: rare upgrade, then healing, else nothing
    pub const DETONATION: LootTable = LootTable {
        bands: &[(0.05, ItemKind::TntUpgrade), (0.10, ItemKind::Heart)],
    };

    /// Mining an ore block
    pub const ORE: LootTable = LootTable {
        bands: &[(0.02, ItemKind::TntUpgrade), (0.03, ItemKind::Heart)],
    };

    /// Meteor impact: always drops something
    pub const METEOR: LootTable = LootTable {
        bands: &[(0.80, ItemKind::Crystal), (0.20, ItemKind::RareOre)],
    };

    /// Map a uniform draw in `[0, 1)` to a drop
    pub fn roll(&self, draw: f32) -> Option<ItemKind> {
        let mut upper = 0.0;
        for &(chance, kind) in self.bands {
            upper += chance;
            if draw < upper {
                return Some(kind);
            }
        }
        None
    }

    /// Total probability of any drop
    pub fn drop_chance(&self) -> f32 {
        self.bands.iter().map(|(chance, _)| chance).sum()
    }
}
