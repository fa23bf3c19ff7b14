//! Shared moving-body physics
//!
//! The player, falling TNT and dropped items all integrate through
//! [`step_body`], so gravity, terminal velocity and collision response can't
//! drift apart between entity types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, Rect, resolve_overlap};
use super::grid::BlockGrid;
use crate::consts::*;

/// Per-entity physics tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Multiplicative horizontal velocity decay applied each tick
    pub friction: f32,
}

impl PhysicsParams {
    pub const PLAYER: Self = Self {
        gravity: GRAVITY,
        terminal_velocity: TERMINAL_VELOCITY,
        friction: PLAYER_FRICTION,
    };

    pub const TNT: Self = Self {
        gravity: GRAVITY,
        terminal_velocity: TERMINAL_VELOCITY,
        friction: TNT_FRICTION,
    };

    pub const ITEM: Self = Self {
        gravity: GRAVITY,
        terminal_velocity: ITEM_TERMINAL_VELOCITY,
        friction: ITEM_FRICTION,
    };
}

/// An axis-aligned moving body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in pixels
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
}

/// What happened during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// A downward collision resolved this tick
    pub landed: bool,
    /// Body dropped below the death zone; the owner decides what happens
    pub fell_out: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            on_ground: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Add an impulse and leave the ground
    pub fn push(&mut self, impulse: Vec2) {
        self.vel += impulse;
        if impulse.y < 0.0 {
            self.on_ground = false;
        }
    }
}

/// Advance a body by one fixed timestep against the grid
pub fn step_body(body: &mut Body, grid: &BlockGrid, params: &PhysicsParams, dt: f32) -> StepOutcome {
    body.vel.y = (body.vel.y + params.gravity * dt).min(params.terminal_velocity);
    body.pos += body.vel * dt;
    body.vel.x *= params.friction;

    let landed = resolve_grid_collisions(body, grid);

    body.pos.x = body.pos.x.clamp(0.0, grid.width_px());

    StepOutcome {
        landed,
        fell_out: body.pos.y > grid.death_zone_y(),
    }
}

/// Push a body out of every solid cell it overlaps.
///
/// Cells are visited row-major with a one-cell margin around the box. Each
/// resolution sees the position left by the previous one, so dense corners
/// resolve in a fixed (but order-dependent) way. Returns true if the body
/// ended up standing on something.
pub fn resolve_grid_collisions(body: &mut Body, grid: &BlockGrid) -> bool {
    body.on_ground = false;

    let rect = body.rect();
    let left = (rect.min.x / BLOCK_SIZE).floor() as i32;
    let right = (rect.max().x / BLOCK_SIZE).floor() as i32;
    let top = (rect.min.y / BLOCK_SIZE).floor() as i32;
    let bottom = (rect.max().y / BLOCK_SIZE).floor() as i32;

    for by in (top - 1).max(0)..(bottom + 2).min(grid.height()) {
        for bx in (left - 1).max(0)..(right + 2).min(grid.width()) {
            if !grid.is_solid(bx, by) {
                continue;
            }
            let block_rect = Rect::new(
                Vec2::new(bx as f32, by as f32) * BLOCK_SIZE,
                Vec2::splat(BLOCK_SIZE),
            );
            let Some(hit) = resolve_overlap(&body.rect(), &block_rect, COLLISION_BUFFER) else {
                continue;
            };
            match hit.axis {
                Axis::Horizontal => {
                    body.pos.x += hit.push;
                    body.vel.x = 0.0;
                }
                Axis::Vertical => {
                    body.pos.y += hit.push;
                    if hit.push < 0.0 {
                        // Pushed up out of the floor
                        if body.vel.y >= 0.0 {
                            body.vel.y = 0.0;
                            body.on_ground = true;
                        }
                    } else if body.vel.y <= 0.0 {
                        // Ceiling
                        body.vel.y = 0.0;
                    }
                }
            }
        }
    }

    body.on_ground
}
