//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod block;
pub mod body;
pub mod collision;
pub mod effects;
pub mod events;
pub mod grid;
pub mod hazard;
pub mod item;
pub mod player;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod world;

pub use block::{Block, BlockKind, BlockProps};
pub use body::{Body, PhysicsParams, StepOutcome, step_body};
pub use collision::{Axis, CollisionResult, Rect, resolve_overlap};
pub use effects::{ExplosionFx, ExplosionVariation, Meteor, MeteorColor, Particle};
pub use events::{EventSink, GameEvent, NullSink, Recorder, SessionStats, SoundEffect, StatsHook};
pub use grid::{BlockGrid, MineOutcome};
pub use hazard::{Hazard, HazardState};
pub use item::{Item, ItemKind, ItemProps, LootTable};
pub use player::Player;
pub use spawner::{HazardSpawner, MeteorShower};
pub use state::{GamePhase, GameState, RESPAWN_DELAY};
pub use terrain::Biome;
pub use tick::{TickInput, tick};
pub use world::World;
