//! TNT Miner - simulation core for a 2D side-scrolling mining game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block grid, physics, TNT, entities)
//! - `renderer`: Plain-old-data sprite snapshots for an external renderer
//! - `settings`: Data-driven world generation and spawn tuning

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Edge length of one grid cell in pixels
    pub const BLOCK_SIZE: f32 = 16.0;
    /// Health every block starts with
    pub const BLOCK_MAX_HEALTH: f32 = 100.0;

    /// Gravity (pixels/s²)
    pub const GRAVITY: f32 = 800.0;
    /// Maximum fall speed (pixels/s)
    pub const TERMINAL_VELOCITY: f32 = 600.0;
    /// Push-out buffer added when resolving a collision
    pub const COLLISION_BUFFER: f32 = 0.1;

    /// Player hitbox (smaller than the 32x32 sprite)
    pub const PLAYER_WIDTH: f32 = 26.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    pub const PLAYER_MAX_SPEED: f32 = 180.0;
    pub const PLAYER_ACCELERATION: f32 = 1200.0;
    pub const PLAYER_DECELERATION: f32 = 1600.0;
    /// Multiplicative horizontal friction applied every tick
    pub const PLAYER_FRICTION: f32 = 0.8;
    pub const JUMP_VELOCITY: f32 = -400.0;
    pub const PLAYER_MAX_HP: u8 = 3;
    /// Seconds without damage before one HP regenerates
    pub const HP_REGEN_DELAY: f32 = 5.0;
    /// Velocity cap after knockback is applied
    pub const MAX_KNOCKBACK_VELOCITY: f32 = 400.0;

    /// Mining damage per second while standing on a block
    pub const AUTO_DIG_DAMAGE: f32 = 20.0;
    /// Mining damage per manual click
    pub const MANUAL_MINE_DAMAGE: f32 = 50.0;
    /// Manual mining reach in blocks (from player center)
    pub const MINE_REACH: f32 = 5.0;

    /// TNT defaults
    pub const TNT_FUSE_TIME: f32 = 3.0;
    /// Seconds of burnt fuse between beeps
    pub const FUSE_BEEP_INTERVAL: f32 = 0.5;
    pub const TNT_EXPLOSION_RADIUS: f32 = 3.0;
    pub const TNT_KNOCKBACK_FORCE: f32 = 150.0;
    /// Knockback base imparted on neighbouring TNT (stronger than on bodies)
    pub const TNT_CHAIN_KNOCKBACK_FORCE: f32 = 300.0;
    /// Extra blocks beyond the blast radius that still knock the player
    pub const KNOCKBACK_MARGIN: f32 = 2.0;
    /// Extra blocks beyond the blast radius for the physical chain reaction
    pub const CHAIN_MARGIN: f32 = 4.0;
    /// Short fuse band for TNT re-armed by a neighbouring blast
    pub const CHAIN_FUSE_MIN: f32 = 0.15;
    pub const CHAIN_FUSE_MAX: f32 = 0.6;
    /// Radius bonus per power level (10%)
    pub const POWER_RADIUS_BONUS: f32 = 0.1;
    pub const TNT_FRICTION: f32 = 0.9;

    /// Dropped items
    pub const ITEM_TERMINAL_VELOCITY: f32 = 400.0;
    pub const ITEM_FRICTION: f32 = 0.9;
    pub const ITEM_COLLECT_RADIUS: f32 = BLOCK_SIZE * 1.5;
    /// Seconds before an uncollected loot drop despawns
    pub const LOOT_LIFETIME: f32 = 60.0;
}

/// Convert a world-space pixel position to the grid cell that contains it
#[inline]
pub fn world_to_grid(pos: Vec2) -> IVec2 {
    (pos / consts::BLOCK_SIZE).floor().as_ivec2()
}

/// Top-left pixel corner of a grid cell
#[inline]
pub fn grid_to_world(cell: IVec2) -> Vec2 {
    cell.as_vec2() * consts::BLOCK_SIZE
}

/// Pixel center of a grid cell
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    grid_to_world(cell) + Vec2::splat(consts::BLOCK_SIZE / 2.0)
}
