//! Outbound events and optional statistics hooks
//!
//! The simulation never talks to audio, rendering or achievements directly.
//! It emits [`GameEvent`]s into an [`EventSink`]; sinks that also track
//! statistics expose a [`StatsHook`] through [`EventSink::stats`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockKind;
use super::item::ItemKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Block broken by mining or a blast
    BlockBreak,
    /// Burning fuse tick
    TntFuse,
    /// TNT detonation
    Explosion,
    /// Player hit by a blast
    PlayerHit,
    /// Item picked up
    ItemCollect,
    /// Meteor touched down
    MeteorImpact,
    Jump,
}

/// Fire-and-forget notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScreenShake { intensity: f32, duration: f32 },
    ScreenFlash { color: [u8; 3], alpha: f32 },
    Sound { effect: SoundEffect, volume: f32 },
    BlockDestroyed { x: i32, y: i32, kind: BlockKind },
    HazardDetonated { pos: Vec2, power_level: u32, blocks_destroyed: u32 },
    ItemCollected { kind: ItemKind },
    MeteorShowerStarted { duration: f32 },
    MeteorShowerEnded,
    PlayerRespawned { pos: Vec2 },
}

/// Statistics/achievement callbacks. Every method defaults to a no-op.
pub trait StatsHook {
    /// `depth` is in blocks below the surface row
    fn on_block_mined(&mut self, _kind: BlockKind, _depth: i32) {}
    fn on_item_collected(&mut self, _kind: ItemKind) {}
    fn on_damage_taken(&mut self, _amount: u8) {}
    fn on_death(&mut self) {}
    fn on_explosion_survived(&mut self) {}
}

/// Receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);

    /// Optional statistics capability
    fn stats(&mut self) -> Option<&mut dyn StatsHook> {
        None
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Collect events for later inspection
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Counters fed by [`StatsHook`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub blocks_mined: u32,
    pub ores_mined: u32,
    pub deepest: i32,
    pub items_collected: u32,
    pub damage_taken: u32,
    pub deaths: u32,
    pub explosions_survived: u32,
}

impl StatsHook for SessionStats {
    fn on_block_mined(&mut self, kind: BlockKind, depth: i32) {
        self.blocks_mined += 1;
        if kind.is_ore() {
            self.ores_mined += 1;
        }
        self.deepest = self.deepest.max(depth);
    }

    fn on_item_collected(&mut self, _kind: ItemKind) {
        self.items_collected += 1;
    }

    fn on_damage_taken(&mut self, amount: u8) {
        self.damage_taken += amount as u32;
    }

    fn on_death(&mut self) {
        self.deaths += 1;
    }

    fn on_explosion_survived(&mut self) {
        self.explosions_survived += 1;
    }
}

/// Sink that records events and keeps session statistics
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
}

impl Recorder {
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for Recorder {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn stats(&mut self) -> Option<&mut dyn StatsHook> {
        Some(&mut self.stats)
    }
}
