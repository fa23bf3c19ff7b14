//! Fixed timestep simulation tick
//!
//! Advances the player and then the world, in that order, once per call.

use glam::IVec2;
use rand::Rng;

use super::events::EventSink;
use super::state::{GamePhase, GameState, RESPAWN_DELAY};

/// Fuse band for TNT dropped by the player
const DROP_FUSE_MIN: f32 = 2.0;
const DROP_FUSE_MAX: f32 = 4.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// -1 left, 0 none, 1 right
    pub move_x: i8,
    /// Jump pressed this tick
    pub jump: bool,
    /// Jump released this tick (cuts the jump short)
    pub jump_release: bool,
    /// Drop a TNT at the player's position
    pub drop_tnt: bool,
    /// Grid cell to mine manually
    pub mine_target: Option<IVec2>,
    /// Pause toggle
    pub pause: bool,
    /// Respawn at the surface right now
    pub respawn: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, sink: &mut dyn EventSink) {
    // Handle pause toggle
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Paused => GamePhase::Playing,
            _ => GamePhase::Paused,
        };
        log::debug!("Phase -> {:?}", state.phase);
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    if let GamePhase::Respawning { timer } = state.phase {
        // The world keeps moving while the player is down
        let timer = timer - dt;
        if timer <= 0.0 {
            state.respawn_player(sink);
        } else {
            state.phase = GamePhase::Respawning { timer };
        }
        state.world.update(dt, None, sink);
        return;
    }

    if input.respawn {
        state.respawn_player(sink);
    }

    apply_input(state, input, sink);
    state.player.update(dt, &mut state.world, sink);

    if state.player.is_dead() {
        enter_death(state, sink);
    } else if state.player.fell_out {
        log::info!("Player fell out of the world");
        state.respawn_player(sink);
    }

    let player = match state.phase {
        GamePhase::Playing => Some(&mut state.player),
        _ => None,
    };
    state.world.update(dt, player, sink);

    // A blast this tick may have finished the player off
    if state.phase == GamePhase::Playing && state.player.is_dead() {
        enter_death(state, sink);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput, sink: &mut dyn EventSink) {
    let player = &mut state.player;
    player.set_move(input.move_x);
    if input.jump {
        player.jump(sink);
    }
    if input.jump_release {
        player.release_jump();
    }
    if let Some(target) = input.mine_target {
        player.mine(target, &mut state.world, sink);
    }
    if input.drop_tnt {
        let fuse = state.rng_mut().random_range(DROP_FUSE_MIN..=DROP_FUSE_MAX);
        let pos = state.player.body.pos;
        let power = state.player.tnt_power_level;
        state.world.spawn_hazard(pos, Some(fuse), power);
    }
}

fn enter_death(state: &mut GameState, sink: &mut dyn EventSink) {
    log::info!("Player died, respawning in {RESPAWN_DELAY}s");
    if let Some(stats) = sink.stats() {
        stats.on_death();
    }
    state.phase = GamePhase::Respawning {
        timer: RESPAWN_DELAY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::*;
    use crate::sim::events::{GameEvent, NullSink, Recorder};

    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        settings.shower.enabled = false;
        settings.hazards.base_chance = 0.0;
        settings.hazards.depth_multiplier = 0.0;
        settings
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut state = GameState::new(quiet_settings(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut NullSink);
        assert_eq!(state.time_ticks, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, &mut NullSink);
        let pos = state.player.body.pos;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut NullSink);
        }
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.player.body.pos, pos);

        tick(&mut state, &pause, SIM_DT, &mut NullSink);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_drop_tnt_uses_power_level() {
        let mut state = GameState::new(quiet_settings(), 3);
        state.player.tnt_power_level = 2;
        let input = TickInput {
            drop_tnt: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut NullSink);
        let hazards = state.world.hazards();
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].power_level, 2);
        assert!(hazards[0].fuse >= DROP_FUSE_MIN - SIM_DT && hazards[0].fuse <= DROP_FUSE_MAX);
    }

    #[test]
    fn test_death_waits_then_respawns() {
        let mut state = GameState::new(quiet_settings(), 5);
        state.player.apply_knockback(glam::Vec2::ZERO, 0.5, PLAYER_MAX_HP);
        let mut rec = Recorder::default();
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rec);
        assert!(matches!(state.phase, GamePhase::Respawning { .. }));
        assert_eq!(rec.stats.deaths, 1);

        let ticks = (RESPAWN_DELAY / SIM_DT) as usize + 2;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut rec);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.hp, 2);
        assert_eq!(rec.stats.deaths, 1);
        assert_eq!(
            rec.count(|e| matches!(e, GameEvent::PlayerRespawned { .. })),
            1
        );
    }

    #[test]
    fn test_fell_out_respawns_immediately() {
        let mut state = GameState::new(quiet_settings(), 9);
        let below = state.world.grid().death_zone_y() + 10.0;
        state.player.body.pos.y = below;
        let mut rec = Recorder::default();
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rec);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player.body.pos.y < below);
        assert_eq!(
            rec.count(|e| matches!(e, GameEvent::PlayerRespawned { .. })),
            1
        );
    }
}
