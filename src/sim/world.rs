//! World container and per-tick entity update loop
//!
//! The world owns the block grid and every live entity. Hazards are walked over
//! a snapshot of ids so a detonation can freely touch the other hazards; the
//! remaining collections update in place and compact with `retain`.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::block::{Block, BlockKind};
use super::effects::{
    ExplosionFx, METEOR_SPAWN_BAND, METEOR_SPAWN_Y, Meteor, Particle, debris_count, debris_origin,
};
use super::events::{EventSink, GameEvent, SoundEffect};
use super::grid::{BlockGrid, MineOutcome};
use super::hazard::Hazard;
use super::item::{Item, ItemKind, LootTable};
use super::player::Player;
use super::spawner::{HazardSpawner, MeteorShower};
use crate::consts::*;
use crate::settings::Settings;
use crate::{cell_center, grid_to_world, world_to_grid};

/// Knockback applied to a player sitting exactly on the blast center
const DIRECT_HIT_FORCE: f32 = TNT_KNOCKBACK_FORCE * 1.5;
/// Blocks beyond the blast radius where screen shake fades out
const SHAKE_MARGIN: f32 = 5.0;
const MAX_SHAKE: f32 = 15.0;
const SHAKE_DURATION: f32 = 0.3;
const FLASH_COLOR: [u8; 3] = [255, 200, 100];
const FLASH_ALPHA: f32 = 180.0;
const BLAST_COLOR: [u8; 3] = [255, 100, 0];
const BLAST_PARTICLE_SPEED: f32 = 200.0;
/// Chance a meteor breaks the block it lands on
const METEOR_BREAK_CHANCE: f32 = 0.3;
const METEOR_BREAK_DAMAGE: f32 = 999.0;
const LOOT_POP_VELOCITY: f32 = -150.0;

/// The simulated world: grid, entities, spawners and RNG
#[derive(Debug, Clone)]
pub struct World {
    grid: BlockGrid,
    settings: Settings,
    rng: Pcg32,
    next_id: u32,
    hazards: Vec<Hazard>,
    items: Vec<Item>,
    particles: Vec<Particle>,
    explosions: Vec<ExplosionFx>,
    meteors: Vec<Meteor>,
    spawner: HazardSpawner,
    shower: MeteorShower,
}

impl World {
    /// Generate terrain from the settings and seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let grid = BlockGrid::generate(&settings.world, seed);
        let mut world = Self::from_grid(grid, settings, seed);
        if world.settings.starter_items {
            world.spawn_starter_items();
        }
        world
    }

    /// Wrap an existing grid (no terrain generation)
    pub fn from_grid(grid: BlockGrid, settings: Settings, seed: u64) -> Self {
        // Separate stream from terrain generation
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(0x9E37_79B9_7F4A_7C15));
        let spawner = HazardSpawner::new(&settings.hazards);
        let shower = MeteorShower::new(&settings.shower, &mut rng);
        Self {
            grid,
            settings,
            rng,
            next_id: 1,
            hazards: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            meteors: Vec::new(),
            spawner,
            shower,
        }
    }

    fn spawn_starter_items(&mut self) {
        let y = (self.settings.world.surface_row - 1) as f32 * BLOCK_SIZE;
        for (column, kind) in [
            (5, ItemKind::WoodPickaxe),
            (8, ItemKind::StonePickaxe),
            (11, ItemKind::IronPickaxe),
            (14, ItemKind::DiamondPickaxe),
        ] {
            self.spawn_item(Vec2::new(column as f32 * BLOCK_SIZE, y), kind);
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // --- Read-only access ---

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut BlockGrid {
        &mut self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn hazard(&self, id: u32) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn explosions(&self) -> &[ExplosionFx] {
        &self.explosions
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn shower(&self) -> &MeteorShower {
        &self.shower
    }

    pub fn spawner(&self) -> &HazardSpawner {
        &self.spawner
    }

    /// Non-air blocks in a pixel window (see [`BlockGrid::visible_blocks`])
    pub fn visible_blocks(&self, min: Vec2, max: Vec2) -> Vec<(i32, i32, &Block)> {
        self.grid.visible_blocks(min, max)
    }

    // --- Mutation ---

    /// Damage a block. Returns true if it broke; side effects are emitted then.
    pub fn mine_at(&mut self, x: i32, y: i32, damage: f32, sink: &mut dyn EventSink) -> bool {
        let MineOutcome::Destroyed(kind) = self.grid.apply_damage(x, y, damage) else {
            return false;
        };
        self.on_block_broken(x, y, kind, sink);
        sink.emit(GameEvent::Sound {
            effect: SoundEffect::BlockBreak,
            volume: 0.5,
        });
        if let Some(stats) = sink.stats() {
            stats.on_block_mined(kind, y - self.settings.world.surface_row);
        }
        if kind.is_ore() {
            let draw = self.rng.random::<f32>();
            if let Some(loot) = LootTable::ORE.roll(draw) {
                log::debug!("Ore at ({x}, {y}) dropped {loot:?}");
                self.spawn_loot(grid_to_world(IVec2::new(x, y)), loot, LOOT_POP_VELOCITY);
            }
        }
        true
    }

    /// Debris and the destroyed event, shared by mining and blasts
    fn on_block_broken(&mut self, x: i32, y: i32, kind: BlockKind, sink: &mut dyn EventSink) {
        let origin = debris_origin(x, y);
        let count = debris_count(&mut self.rng);
        let debris: Vec<Particle> = (0..count)
            .map(|_| Particle::debris(origin, kind.color(), &mut self.rng))
            .collect();
        self.push_particles(debris);
        sink.emit(GameEvent::BlockDestroyed { x, y, kind });
    }

    /// Light a TNT at a pixel position. Refused inside solid blocks.
    ///
    /// `fuse: None` uses the default fuse.
    pub fn spawn_hazard(&mut self, pos: Vec2, fuse: Option<f32>, power_level: u32) -> Option<u32> {
        let cell = world_to_grid(pos);
        if self.grid.is_solid(cell.x, cell.y) {
            log::debug!("TNT spawn refused inside solid block at ({}, {})", cell.x, cell.y);
            return None;
        }
        let fuse = fuse.unwrap_or(TNT_FUSE_TIME);
        let id = self.alloc_id();
        self.hazards.push(Hazard::new(id, pos, fuse, power_level));
        log::debug!("TNT {id} spawned at ({}, {}) with {fuse:.1}s fuse", cell.x, cell.y);
        Some(id)
    }

    /// Drop a collectible that stays until picked up
    pub fn spawn_item(&mut self, pos: Vec2, kind: ItemKind) -> u32 {
        let id = self.alloc_id();
        self.items.push(Item::new(id, pos, kind));
        id
    }

    /// Loot pops upward and despawns if ignored
    fn spawn_loot(&mut self, pos: Vec2, kind: ItemKind, pop: f32) -> u32 {
        let id = self.alloc_id();
        let mut item = Item::new(id, pos, kind);
        item.body.vel.y = pop;
        item.ttl = Some(LOOT_LIFETIME);
        self.items.push(item);
        id
    }

    fn push_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
        let cap = self.settings.max_particles();
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    /// Detonate a live hazard right away. Returns false if the id is unknown.
    pub fn detonate_now(
        &mut self,
        id: u32,
        player: Option<&mut Player>,
        sink: &mut dyn EventSink,
    ) -> bool {
        let Some(index) = self.hazards.iter().position(|h| h.id == id) else {
            return false;
        };
        let hazard = self.hazards.remove(index);
        self.detonate(&hazard, player, sink);
        true
    }

    /// Advance every entity by one fixed step
    pub fn update(&mut self, dt: f32, mut player: Option<&mut Player>, sink: &mut dyn EventSink) {
        self.update_shower(dt, sink);
        self.update_spawner(dt, player.as_deref());

        let ids: Vec<u32> = self.hazards.iter().map(|h| h.id).collect();
        for id in ids {
            // Already consumed by an earlier detonation this tick
            let Some(index) = self.hazards.iter().position(|h| h.id == id) else {
                continue;
            };
            if self.hazards[index].update(dt, &self.grid) {
                log::debug!("TNT {id} fell out of the world");
                self.hazards.remove(index);
                continue;
            }
            if self.hazards[index].take_beep() {
                sink.emit(GameEvent::Sound {
                    effect: SoundEffect::TntFuse,
                    volume: 0.3,
                });
            }
            if self.hazards[index].should_detonate() {
                let hazard = self.hazards.remove(index);
                self.detonate(&hazard, player.as_deref_mut(), sink);
            }
        }

        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(|p| !p.is_dead());

        for fx in &mut self.explosions {
            fx.update(dt);
        }
        self.explosions.retain(|fx| !fx.is_finished());

        self.update_items(dt, player.as_deref_mut(), sink);
        self.update_meteors(dt, sink);
    }

    fn update_spawner(&mut self, dt: f32, player: Option<&Player>) {
        let Some(player) = player else {
            return;
        };
        let depth = player.depth(self.settings.world.surface_row);
        let request = self.spawner.update(
            dt,
            depth,
            self.grid.width(),
            &self.settings.hazards,
            &mut self.rng,
        );
        if let Some(request) = request {
            let pos = Vec2::new(request.column as f32 * BLOCK_SIZE, 0.0);
            self.spawn_hazard(pos, Some(request.fuse), 0);
        }
    }

    fn update_shower(&mut self, dt: f32, sink: &mut dyn EventSink) {
        let tick = self.shower.update(dt, &self.settings.shower, &mut self.rng);
        if let Some(duration) = tick.started {
            log::info!("Meteor shower started ({duration:.1}s)");
            sink.emit(GameEvent::MeteorShowerStarted { duration });
        }
        if tick.ended {
            log::info!("Meteor shower ended");
            sink.emit(GameEvent::MeteorShowerEnded);
        }
        if tick.spawn_meteor {
            let width = self.grid.width_px();
            let x = self
                .rng
                .random_range(width * METEOR_SPAWN_BAND.0..width * METEOR_SPAWN_BAND.1);
            let meteor = Meteor::new(Vec2::new(x, METEOR_SPAWN_Y), &mut self.rng);
            self.meteors.push(meteor);
        }
    }

    fn update_items(&mut self, dt: f32, mut player: Option<&mut Player>, sink: &mut dyn EventSink) {
        let grid = &self.grid;
        self.items.retain_mut(|item| {
            if !item.update(dt, grid) {
                return false;
            }
            let Some(player) = player.as_deref_mut() else {
                return true;
            };
            if !item.can_collect(player.center()) {
                return true;
            }
            log::debug!("Collected {:?}", item.kind);
            player.collect(item.kind);
            sink.emit(GameEvent::ItemCollected { kind: item.kind });
            sink.emit(GameEvent::Sound {
                effect: SoundEffect::ItemCollect,
                volume: 0.6,
            });
            if let Some(stats) = sink.stats() {
                stats.on_item_collected(item.kind);
            }
            false
        });
    }

    fn update_meteors(&mut self, dt: f32, sink: &mut dyn EventSink) {
        let mut trail = Vec::new();
        let mut i = 0;
        while i < self.meteors.len() {
            self.meteors[i].update(dt);
            if let Some(particle) = self.meteors[i].take_trail(&mut self.rng) {
                trail.push(particle);
            }
            if self.meteors[i].should_impact(&self.grid) {
                let meteor = self.meteors.remove(i);
                self.meteor_impact(&meteor, sink);
            } else {
                i += 1;
            }
        }
        self.push_particles(trail);
    }

    fn meteor_impact(&mut self, meteor: &Meteor, sink: &mut dyn EventSink) {
        let cell = meteor.cell();
        log::debug!("Meteor impact at ({}, {})", cell.x, cell.y);
        if self.rng.random::<f32>() < METEOR_BREAK_CHANCE {
            // The ground it landed on
            self.mine_at(cell.x, cell.y + 1, METEOR_BREAK_DAMAGE, sink);
        }
        let sparkles = meteor.impact_particles(&mut self.rng);
        self.push_particles(sparkles);

        let draw = self.rng.random::<f32>();
        if let Some(kind) = LootTable::METEOR.roll(draw) {
            self.spawn_loot(grid_to_world(cell), kind, 0.0);
        }
        sink.emit(GameEvent::Sound {
            effect: SoundEffect::MeteorImpact,
            volume: 0.3,
        });
    }

    /// Blow up a hazard that has already been removed from the list
    fn detonate(&mut self, hazard: &Hazard, mut player: Option<&mut Player>, sink: &mut dyn EventSink) {
        let origin = hazard.center();
        let center = world_to_grid(origin);
        let radius = hazard.blast_radius();

        // Blocks
        let mut destroyed = 0u32;
        let reach = radius.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f32).sqrt() > radius {
                    continue;
                }
                let (bx, by) = (center.x + dx, center.y + dy);
                if !self.grid.get_block(bx, by).is_some_and(Block::is_mineable) {
                    continue;
                }
                if let Some(block) = self.grid.remove(bx, by) {
                    self.on_block_broken(bx, by, block.kind, sink);
                    destroyed += 1;
                }
            }
        }

        // Player
        if let Some(player) = player.as_deref_mut() {
            self.knock_player(player, origin, radius, sink);
        }

        // Physical chain reaction: nearby TNT is thrown and its fuse shortened
        let chain_range = (radius + CHAIN_MARGIN) * BLOCK_SIZE;
        for other in &mut self.hazards {
            let offset = other.center() - origin;
            let distance = offset.length();
            if distance >= chain_range {
                continue;
            }
            let ratio = 1.0 - distance / chain_range;
            let dir = offset.try_normalize().unwrap_or(Vec2::NEG_Y);
            let mut impulse = dir * TNT_CHAIN_KNOCKBACK_FORCE * ratio;
            impulse.y = impulse.y.min(0.0) - TNT_CHAIN_KNOCKBACK_FORCE * 0.5 * ratio;
            let fuse_cap = self.rng.random_range(CHAIN_FUSE_MIN..=CHAIN_FUSE_MAX);
            other.knock(impulse, fuse_cap);
        }

        // Grid-distance chain reaction: close TNT goes off immediately
        for other in &mut self.hazards {
            let cell = world_to_grid(other.center());
            if (cell - center).as_vec2().length() <= radius + 1.0 {
                other.fuse = 0.0;
            }
        }

        // Effects
        let whiten = (hazard.power_level as f32 * 0.15).min(1.0);
        let color = [
            BLAST_COLOR[0],
            lerp_u8(BLAST_COLOR[1], 255, whiten),
            lerp_u8(BLAST_COLOR[2], 255, whiten),
        ];
        let count = 30 + 10 * hazard.power_level as usize;
        let mut burst = Vec::with_capacity(count);
        for _ in 0..count {
            burst.push(Particle::blast(origin, color, BLAST_PARTICLE_SPEED, &mut self.rng));
        }
        self.push_particles(burst);

        let fx = ExplosionFx::new(cell_center(center), &mut self.rng);
        self.explosions.push(fx);

        let shake = match player.as_deref() {
            Some(player) => {
                let max = (radius + SHAKE_MARGIN) * BLOCK_SIZE;
                let distance = player.center().distance(origin);
                (distance < max).then(|| MAX_SHAKE * (1.0 - distance / max))
            }
            None => Some(10.0),
        };
        if let Some(intensity) = shake {
            sink.emit(GameEvent::ScreenShake {
                intensity,
                duration: SHAKE_DURATION,
            });
        }
        sink.emit(GameEvent::ScreenFlash {
            color: FLASH_COLOR,
            alpha: FLASH_ALPHA,
        });
        sink.emit(GameEvent::Sound {
            effect: SoundEffect::Explosion,
            volume: 1.0,
        });

        // Loot
        let draw = self.rng.random::<f32>();
        if let Some(kind) = LootTable::DETONATION.roll(draw) {
            let pos = origin - Vec2::new(BLOCK_SIZE / 2.0, BLOCK_SIZE);
            self.spawn_loot(pos, kind, LOOT_POP_VELOCITY);
        }

        log::debug!(
            "TNT {} exploded at ({}, {}) power {}: {destroyed} blocks",
            hazard.id,
            center.x,
            center.y,
            hazard.power_level
        );
        sink.emit(GameEvent::HazardDetonated {
            pos: origin,
            power_level: hazard.power_level,
            blocks_destroyed: destroyed,
        });
    }

    fn knock_player(&mut self, player: &mut Player, origin: Vec2, radius: f32, sink: &mut dyn EventSink) {
        let offset = player.center() - origin;
        let distance = offset.length();
        let max = (radius + KNOCKBACK_MARGIN) * BLOCK_SIZE;
        if distance >= max {
            return;
        }

        let (force, hurt) = if distance < 1e-3 {
            (Vec2::new(0.0, -DIRECT_HIT_FORCE), 1.0)
        } else {
            let ratio = 1.0 - distance / max;
            let mut force = offset / distance * TNT_KNOCKBACK_FORCE * ratio.powf(0.7);
            force.y *= if force.y > 0.0 { 0.5 } else { 1.5 };
            force.y = force.y.min(-TNT_KNOCKBACK_FORCE * 0.3);
            (force, 0.5 + 0.5 * ratio)
        };

        player.apply_knockback(force, hurt, 1);
        sink.emit(GameEvent::Sound {
            effect: SoundEffect::PlayerHit,
            volume: 0.8,
        });
        if let Some(stats) = sink.stats() {
            stats.on_damage_taken(1);
            if !player.is_dead() {
                stats.on_explosion_survived();
            }
        }
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}
