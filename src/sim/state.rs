//! Game state: the world, the player and the session phase

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventSink, GameEvent};
use super::player::Player;
use super::world::World;
use crate::consts::*;
use crate::settings::Settings;

/// Seconds between dying and coming back
pub const RESPAWN_DELAY: f32 = 3.0;
/// Respawn columns stay within this fraction of the world width
const RESPAWN_BAND: (f32, f32) = (0.2, 0.8);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player is dead; the world keeps running until the timer ends
    Respawning { timer: f32 },
}

/// Everything a running session owns
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation time in ticks
    pub time_ticks: u64,
    pub world: World,
    pub player: Player,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let world = World::new(settings, seed);
        let spawn = Self::surface_spawn(&world, 0.5);
        log::info!("Game initialized with seed {seed}");
        Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            world,
            player: Player::new(spawn),
            rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
        }
    }

    /// Pixel position two rows above the surface at `fraction` of the width
    fn surface_spawn(world: &World, fraction: f32) -> Vec2 {
        let surface = world.settings().world.surface_row;
        Vec2::new(
            world.grid().width_px() * fraction,
            (surface - 2) as f32 * BLOCK_SIZE,
        )
    }

    /// Elapsed simulation time in seconds
    pub fn elapsed(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Player depth in blocks below the surface
    pub fn depth(&self) -> i32 {
        self.player.depth(self.world.settings().world.surface_row)
    }

    /// Session RNG for player-side randomness (respawn column, drop fuses)
    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Put the player back on the surface at a random column
    pub fn respawn_player(&mut self, sink: &mut dyn EventSink) {
        let fraction = self.rng.random_range(RESPAWN_BAND.0..=RESPAWN_BAND.1);
        let pos = Self::surface_spawn(&self.world, fraction);
        let hp = (PLAYER_MAX_HP / 2).max(2);
        self.player.respawn(pos, hp);
        self.phase = GamePhase::Playing;
        log::info!("Player respawned at ({:.0}, {:.0}) with {hp} HP", pos.x, pos.y);
        sink.emit(GameEvent::PlayerRespawned { pos });
    }
}
