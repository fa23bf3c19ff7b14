//! The player character: walking, jumping, digging, getting blown up

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::body::{Body, PhysicsParams, step_body};
use super::events::{EventSink, GameEvent, SoundEffect};
use super::item::ItemKind;
use super::world::World;
use crate::consts::*;
use crate::{cell_center, world_to_grid};

/// Knockback resistance gained per hit
const RESISTANCE_PER_HIT: f32 = 0.3;
const MAX_RESISTANCE: f32 = 0.8;
/// Smallest fraction of a knockback that always gets through
const MIN_RESISTANCE_FACTOR: f32 = 0.2;
/// Mining speed bonus per level, and its cap
const MINING_BONUS_PER_LEVEL: f32 = 0.1;
const MAX_MINING_BONUS: f32 = 2.0;

/// Player state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing_right: bool,
    /// -1, 0 or 1 for this tick; cleared after every update
    move_dir: i8,
    is_jumping: bool,
    jump_released: bool,
    /// True while auto-dig found something to chew on last tick
    pub is_mining: bool,

    /// Seconds left in the hurt window (controls locked while > 0)
    pub hurt_timer: f32,
    /// Decays by one per second
    pub knockback_resistance: f32,

    pub hp: u8,
    /// Seconds since damage was last taken
    since_damage: f32,
    /// Set when a physics step left the world
    pub fell_out: bool,

    /// Best pickaxe collected so far
    pub tool: Option<ItemKind>,
    pub mining_level: u32,
    pub tnt_power_level: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            facing_right: true,
            move_dir: 0,
            is_jumping: false,
            jump_released: false,
            is_mining: false,
            hurt_timer: 0.0,
            knockback_resistance: 0.0,
            hp: PLAYER_MAX_HP,
            since_damage: 0.0,
            fell_out: false,
            tool: None,
            mining_level: 0,
            tnt_power_level: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Grid cell under the player's center
    pub fn cell(&self) -> IVec2 {
        world_to_grid(self.center())
    }

    /// Rows below the surface (0 at or above it)
    pub fn depth(&self, surface_row: i32) -> i32 {
        (world_to_grid(self.body.pos).y - surface_row).max(0)
    }

    pub fn control_locked(&self) -> bool {
        self.hurt_timer > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Dead or out of the world
    pub fn needs_respawn(&self) -> bool {
        self.is_dead() || self.fell_out
    }

    /// Mining speed bonus from level (0.0 to 2.0)
    pub fn mining_bonus(&self) -> f32 {
        (self.mining_level as f32 * MINING_BONUS_PER_LEVEL).min(MAX_MINING_BONUS)
    }

    pub fn tool_multiplier(&self) -> f32 {
        self.tool
            .and_then(|t| t.props().tool_multiplier)
            .unwrap_or(1.0)
    }

    /// Request horizontal movement for this tick
    pub fn set_move(&mut self, dir: i8) {
        if self.control_locked() {
            return;
        }
        self.move_dir = dir.signum();
        if dir > 0 {
            self.facing_right = true;
        } else if dir < 0 {
            self.facing_right = false;
        }
    }

    pub fn jump(&mut self, sink: &mut dyn EventSink) -> bool {
        if self.control_locked() || !self.body.on_ground || self.is_jumping {
            return false;
        }
        self.body.vel.y = JUMP_VELOCITY;
        self.body.on_ground = false;
        self.is_jumping = true;
        self.jump_released = false;
        sink.emit(GameEvent::Sound {
            effect: SoundEffect::Jump,
            volume: 0.4,
        });
        true
    }

    /// Letting go early cuts the jump short
    pub fn release_jump(&mut self) {
        self.jump_released = true;
    }

    /// One fixed step: movement, timers, physics, auto-dig
    pub fn update(&mut self, dt: f32, world: &mut World, sink: &mut dyn EventSink) {
        self.apply_movement(dt);

        self.knockback_resistance = (self.knockback_resistance - dt).max(0.0);
        if self.hurt_timer > 0.0 {
            self.hurt_timer = (self.hurt_timer - dt).max(0.0);
        }

        self.since_damage += dt;
        if self.since_damage >= HP_REGEN_DELAY && self.hp < PLAYER_MAX_HP && self.hp > 0 {
            self.hp += 1;
            self.since_damage = 0.0;
            log::debug!("HP regenerated: {}/{}", self.hp, PLAYER_MAX_HP);
        }

        if self.is_jumping && self.jump_released && self.body.vel.y < 0.0 {
            self.body.vel.y *= 0.5;
            self.is_jumping = false;
        }

        let outcome = step_body(&mut self.body, world.grid(), &PhysicsParams::PLAYER, dt);
        if self.body.on_ground {
            self.is_jumping = false;
        }
        if outcome.fell_out {
            self.fell_out = true;
            return;
        }

        self.is_mining = false;
        if self.body.on_ground {
            self.auto_dig(dt, world, sink);
        }
    }

    fn apply_movement(&mut self, dt: f32) {
        let vx = &mut self.body.vel.x;
        if self.move_dir != 0 {
            let dir = self.move_dir as f32;
            *vx += dir * PLAYER_ACCELERATION * dt;
            if vx.abs() > PLAYER_MAX_SPEED {
                *vx = dir * PLAYER_MAX_SPEED;
            }
        } else {
            let decel = PLAYER_DECELERATION * dt;
            if vx.abs() <= decel {
                *vx = 0.0;
            } else {
                let sign = vx.signum();
                *vx -= decel * sign;
            }
        }
        self.move_dir = 0;
    }

    /// Chew on every mineable block under the feet
    fn auto_dig(&mut self, dt: f32, world: &mut World, sink: &mut dyn EventSink) {
        let rect = self.body.rect();
        let left = (rect.min.x / BLOCK_SIZE).floor() as i32;
        let right = (rect.max().x / BLOCK_SIZE).floor() as i32;
        let foot_y = ((rect.max().y + 1.0) / BLOCK_SIZE).floor() as i32;
        let damage = AUTO_DIG_DAMAGE * dt * (1.0 + self.mining_bonus());

        for bx in left..=right {
            if world.grid().get_block(bx, foot_y).is_some_and(|b| b.is_mineable()) {
                self.is_mining = true;
                world.mine_at(bx, foot_y, damage, sink);
            }
        }
    }

    /// Manual mining of a target cell within reach. Returns true if it broke.
    pub fn mine(&mut self, target: IVec2, world: &mut World, sink: &mut dyn EventSink) -> bool {
        if self.control_locked() {
            return false;
        }
        if self.center().distance(cell_center(target)) > MINE_REACH * BLOCK_SIZE {
            return false;
        }
        let damage = MANUAL_MINE_DAMAGE * self.tool_multiplier() * (1.0 + self.mining_bonus());
        world.mine_at(target.x, target.y, damage, sink)
    }

    /// Blast impulse: scaled by resistance, capped, opens a hurt window and
    /// costs `damage` hit points.
    pub fn apply_knockback(&mut self, force: Vec2, hurt_duration: f32, damage: u8) {
        let factor = (1.0 - self.knockback_resistance).max(MIN_RESISTANCE_FACTOR);
        self.body.push(force * factor);
        self.body.vel = self.body.vel.clamp(
            Vec2::splat(-MAX_KNOCKBACK_VELOCITY),
            Vec2::splat(MAX_KNOCKBACK_VELOCITY),
        );

        self.hurt_timer = hurt_duration;
        self.move_dir = 0;
        self.knockback_resistance = (self.knockback_resistance + RESISTANCE_PER_HIT).min(MAX_RESISTANCE);

        self.hp = self.hp.saturating_sub(damage);
        self.since_damage = 0.0;
        if self.hp == 0 {
            if self.mining_level > 0 || self.tnt_power_level > 0 {
                log::info!(
                    "Player died, progress lost (mining level {}, TNT power {})",
                    self.mining_level,
                    self.tnt_power_level
                );
            }
            self.mining_level = 0;
            self.tnt_power_level = 0;
        }
    }

    /// Apply a collected item's effect
    pub fn collect(&mut self, kind: ItemKind) {
        let props = kind.props();
        if props
            .tool_multiplier
            .is_some_and(|multiplier| multiplier > self.tool_multiplier())
        {
            self.tool = Some(kind);
        }
        self.mining_level += props.mining_levels;
        self.tnt_power_level += props.power_levels;
        self.hp = (self.hp + props.heal).min(PLAYER_MAX_HP);
    }

    /// Put the player back in the world with `hp` hit points
    pub fn respawn(&mut self, pos: Vec2, hp: u8) {
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.body.on_ground = false;
        self.hurt_timer = 0.0;
        self.knockback_resistance = 0.0;
        self.is_jumping = false;
        self.fell_out = false;
        self.hp = hp.clamp(1, PLAYER_MAX_HP);
        self.since_damage = 0.0;
    }
}
