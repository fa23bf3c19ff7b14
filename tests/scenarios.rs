//! Cross-module scenarios for the world simulation.
//!
//! Each test builds a small hand-made world so the outcome does not depend on
//! terrain generation.

use glam::{IVec2, Vec2};
use tnt_miner::consts::*;
use tnt_miner::sim::{
    BlockGrid, BlockKind, GameEvent, GameState, NullSink, Player, Recorder, TickInput, World, tick,
};
use tnt_miner::{Settings, cell_center, grid_to_world};

/// Seed shared by every scenario.
const SEED: u64 = 42;

fn quiet_settings() -> Settings {
    let mut settings = Settings::default();
    settings.shower.enabled = false;
    settings.hazards.base_chance = 0.0;
    settings.hazards.depth_multiplier = 0.0;
    settings
}

fn world_with(width: i32, height: i32, fill: impl Fn(i32, i32) -> Option<BlockKind>) -> World {
    let mut grid = BlockGrid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            grid.set_block(x, y, fill(x, y));
        }
    }
    World::from_grid(grid, quiet_settings(), SEED)
}

#[test]
fn basic_dig_breaks_dirt_on_second_hit() {
    let mut world = world_with(10, 10, |x, y| (x == 5 && y == 5).then_some(BlockKind::Dirt));
    let mut rec = Recorder::default();

    // Dirt hardness 0.5: 25 damage takes 50 health per hit
    assert!(!world.mine_at(5, 5, 25.0, &mut rec));
    assert!(world.mine_at(5, 5, 25.0, &mut rec));
    assert!(world.grid().get_block(5, 5).is_none());
    assert!(!world.mine_at(5, 5, 25.0, &mut rec));
    assert!(!world.mine_at(5, 5, 25.0, &mut rec));

    assert_eq!(
        rec.count(|e| matches!(e, GameEvent::BlockDestroyed { .. })),
        1
    );
    assert_eq!(rec.stats.blocks_mined, 1);
}

#[test]
fn out_of_world_is_not_air() {
    let mut world = world_with(8, 8, |_, _| Some(BlockKind::Stone));
    let before = world.grid().len();

    for (x, y) in [(-1, 0), (0, -1), (8, 0), (0, 8), (i32::MIN, i32::MAX)] {
        assert!(world.grid().get_block(x, y).is_none());
        assert!(!world.grid().in_bounds(x, y));
        assert!(!world.mine_at(x, y, 1.0e6, &mut NullSink));
        world.grid_mut().set_block(x, y, Some(BlockKind::Dirt));
    }
    assert_eq!(world.grid().len(), before);
}

#[test]
fn bedrock_survives_ten_thousand_hits() {
    let mut world = world_with(4, 4, |_, y| (y == 3).then_some(BlockKind::Bedrock));
    for _ in 0..10_000 {
        assert!(!world.mine_at(1, 3, 1.0e6, &mut NullSink));
    }
    let block = world.grid().get_block(1, 3);
    assert!(block.is_some_and(|b| b.health() == BLOCK_MAX_HEALTH));
}

#[test]
fn blast_radius_is_exact() {
    let center = IVec2::new(15, 15);
    let mut world = world_with(31, 31, |x, y| {
        (IVec2::new(x, y) != center).then_some(BlockKind::Stone)
    });
    let mut rec = Recorder::default();

    let id = world.spawn_hazard(grid_to_world(center), Some(0.0), 0);
    assert!(id.is_some());
    world.update(SIM_DT, None, &mut rec);

    assert!(world.hazards().is_empty());
    for dy in -5..=5 {
        for dx in -5..=5 {
            let cell = center + IVec2::new(dx, dy);
            let inside = ((dx * dx + dy * dy) as f32).sqrt() <= TNT_EXPLOSION_RADIUS;
            let present = world.grid().get_block(cell.x, cell.y).is_some();
            assert_eq!(present, !inside, "cell offset ({dx}, {dy})");
        }
    }
    let destroyed = rec.events.iter().find_map(|e| match e {
        GameEvent::HazardDetonated {
            blocks_destroyed, ..
        } => Some(*blocks_destroyed),
        _ => None,
    });
    // 29 lattice points within radius 3, minus the empty center
    assert_eq!(destroyed, Some(28));
}

#[test]
fn chain_reaction_sets_off_long_fuse() {
    let mut world = world_with(30, 30, |_, y| (y == 20).then_some(BlockKind::Bedrock));
    let first = world.spawn_hazard(grid_to_world(IVec2::new(10, 19)), Some(0.5), 0);
    let second = world.spawn_hazard(grid_to_world(IVec2::new(12, 19)), Some(100.0), 0);
    assert!(first.is_some() && second.is_some());

    let mut rec = Recorder::default();
    let mut detonated_at = Vec::new();
    let mut ticks = 0;
    while !world.hazards().is_empty() {
        world.update(SIM_DT, None, &mut rec);
        ticks += 1;
        let total = rec.count(|e| matches!(e, GameEvent::HazardDetonated { .. }));
        while detonated_at.len() < total {
            detonated_at.push(ticks);
        }
        assert!(ticks < 40, "chain reaction never finished");
    }
    assert_eq!(detonated_at.len(), 2);
    // The 100 s fuse goes off in the same tick as the first blast or the next one
    assert!(
        detonated_at[1] - detonated_at[0] <= 1,
        "detonations at ticks {detonated_at:?}"
    );
}

#[test]
fn zero_distance_knockback_is_finite() {
    let mut world = world_with(20, 20, |_, _| None);
    let id = world.spawn_hazard(Vec2::new(152.0, 152.0), Some(10.0), 0);
    let Some(id) = id else {
        panic!("spawn refused in empty world");
    };
    let hazard_center = world.hazard(id).map(|h| h.center()).unwrap_or_default();

    let mut player = Player::new(Vec2::ZERO);
    player.body.pos = hazard_center - player.body.size * 0.5;
    assert!(player.center().distance(hazard_center) < 1e-3);

    let mut rec = Recorder::default();
    assert!(world.detonate_now(id, Some(&mut player), &mut rec));

    assert!(player.body.vel.is_finite());
    assert_eq!(player.body.vel.x, 0.0);
    assert!(player.body.vel.y < 0.0);
    assert!(player.control_locked());
    assert_eq!(player.hp, PLAYER_MAX_HP - 1);
    assert_eq!(rec.stats.explosions_survived, 1);
}

#[test]
fn detonation_happens_once() {
    let mut world = world_with(20, 20, |_, y| (y == 15).then_some(BlockKind::Bedrock));
    let mut rec = Recorder::default();
    world.spawn_hazard(grid_to_world(IVec2::new(8, 14)), Some(0.2), 1);

    for _ in 0..120 {
        world.update(SIM_DT, None, &mut rec);
    }
    assert_eq!(
        rec.count(|e| matches!(e, GameEvent::HazardDetonated { .. })),
        1
    );
    assert_eq!(
        rec.count(|e| matches!(e, GameEvent::ScreenFlash { .. })),
        1
    );
}

#[test]
fn player_knocked_away_from_blast() {
    let mut world = world_with(30, 30, |_, y| (y == 20).then_some(BlockKind::Bedrock));
    let id = world.spawn_hazard(grid_to_world(IVec2::new(10, 19)), Some(10.0), 0);
    let Some(id) = id else {
        panic!("spawn refused");
    };
    let mut player = Player::new(Vec2::new(cell_center(IVec2::new(12, 19)).x, 290.0));
    for _ in 0..30 {
        world.update(SIM_DT, None, &mut NullSink);
    }
    assert!(world.detonate_now(id, Some(&mut player), &mut NullSink));
    assert!(player.body.vel.x > 0.0);
    assert!(player.body.vel.y <= -TNT_KNOCKBACK_FORCE * 0.3 + 1e-3);
}

#[test]
fn player_respawns_after_falling_out() {
    let mut settings = quiet_settings();
    settings.world.width = 20;
    settings.world.height = 40;
    settings.world.bedrock_row = 38;
    let mut state = GameState::new(settings, SEED);

    // Open a shaft straight through the bedrock
    let column = state.player.cell().x;
    for y in 0..state.world.grid().height() {
        for x in column - 2..=column + 2 {
            state.world.grid_mut().set_block(x, y, None);
        }
    }

    let mut rec = Recorder::default();
    let mut respawned = false;
    for _ in 0..60 * 10 {
        tick(&mut state, &TickInput::default(), SIM_DT, &mut rec);
        if rec.count(|e| matches!(e, GameEvent::PlayerRespawned { .. })) > 0 {
            respawned = true;
            break;
        }
    }
    assert!(respawned);
    assert!(!state.player.fell_out);
}
