//! Purely visual entities: debris particles, explosion animations, meteors
//!
//! None of these feed back into gameplay except meteor impacts, which go
//! through the world's normal mining path.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::BlockGrid;
use crate::consts::{BLOCK_SIZE, GRAVITY};
use crate::world_to_grid;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Debris with a random upward spray
    pub fn debris(pos: Vec2, color: [u8; 3], rng: &mut Pcg32) -> Self {
        let life = rng.random_range(0.5..1.5);
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-100.0..100.0), rng.random_range(-150.0..-50.0)),
            color,
            life,
            max_life: life,
            size: rng.random_range(2..=4) as f32,
        }
    }

    /// Fast omnidirectional blast particle
    pub fn blast(pos: Vec2, color: [u8; 3], speed: f32, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-speed..speed), rng.random_range(-speed..speed)),
            color,
            life: 1.0,
            max_life: 1.0,
            size: rng.random_range(2..=4) as f32,
        }
    }

    pub fn update(&mut self, dt: f32) {
        // Half gravity so debris hangs in the air a bit
        self.vel.y += GRAVITY * dt * 0.5;
        self.pos += self.vel * dt;
        self.life -= dt;
        self.vel *= 0.98;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fade factor for rendering (1 = fresh, 0 = gone)
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Explosion animation timing variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionVariation {
    A,
    B,
    C,
}

impl ExplosionVariation {
    pub fn frame_count(self) -> u32 {
        match self {
            ExplosionVariation::A => 12,
            ExplosionVariation::B => 14,
            ExplosionVariation::C => 13,
        }
    }

    /// Seconds per frame
    pub fn frame_duration(self) -> f32 {
        match self {
            ExplosionVariation::A => 0.04,
            ExplosionVariation::B => 0.035,
            ExplosionVariation::C => 0.042,
        }
    }
}

/// A playing explosion animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionFx {
    pub pos: Vec2,
    pub variation: ExplosionVariation,
    pub frame: u32,
    frame_timer: f32,
}

impl ExplosionFx {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        let variation = match rng.random_range(0..3) {
            0 => ExplosionVariation::A,
            1 => ExplosionVariation::B,
            _ => ExplosionVariation::C,
        };
        Self {
            pos,
            variation,
            frame: 0,
            frame_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.frame_timer += dt;
        let duration = self.variation.frame_duration();
        while self.frame_timer >= duration && !self.is_finished() {
            self.frame_timer -= duration;
            self.frame += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.variation.frame_count()
    }

    /// 0 at the first frame, 1 at the last
    pub fn progress(&self) -> f32 {
        self.frame as f32 / (self.variation.frame_count() - 1) as f32
    }
}

/// Meteor color variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteorColor {
    Orange,
    Cyan,
    Purple,
    Yellow,
}

impl MeteorColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            MeteorColor::Orange => [255, 140, 50],
            MeteorColor::Cyan => [80, 220, 255],
            MeteorColor::Purple => [200, 80, 255],
            MeteorColor::Yellow => [255, 240, 80],
        }
    }
}

/// A slow decorative meteor from a shower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: MeteorColor,
    /// Degrees
    pub rotation: f32,
    pub rotation_speed: f32,
    pub glow_phase: f32,
    pub age: f32,
    #[serde(default)]
    trail_timer: f32,
}

impl Meteor {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        let color = match rng.random_range(0..4) {
            0 => MeteorColor::Orange,
            1 => MeteorColor::Cyan,
            2 => MeteorColor::Purple,
            _ => MeteorColor::Yellow,
        };
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-15.0..-5.0), rng.random_range(40.0..60.0)),
            size: 12.0,
            color,
            rotation: rng.random_range(0.0..360.0),
            rotation_speed: rng.random_range(-60.0..60.0),
            glow_phase: rng.random_range(0.0..std::f32::consts::TAU),
            age: 0.0,
            trail_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.pos += self.vel * dt;
        self.rotation += self.rotation_speed * dt;
        self.glow_phase += dt * 3.0;
        self.trail_timer += dt;
    }

    /// A drifting trail particle, at most one per `METEOR_TRAIL_INTERVAL`
    pub fn take_trail(&mut self, rng: &mut Pcg32) -> Option<Particle> {
        if self.trail_timer <= METEOR_TRAIL_INTERVAL {
            return None;
        }
        self.trail_timer = 0.0;
        let jitter = Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-2.0..=2.0));
        Some(Particle {
            pos: self.center() + jitter,
            vel: Vec2::new(rng.random_range(-10.0..=10.0), rng.random_range(-20.0..=0.0)),
            color: self.color.rgb(),
            life: rng.random_range(0.6..=1.2),
            max_life: 1.2,
            size: rng.random_range(3.0..=6.0),
        })
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn cell(&self) -> glam::IVec2 {
        world_to_grid(self.pos)
    }

    /// Touching solid ground or the bottom row
    pub fn should_impact(&self, grid: &BlockGrid) -> bool {
        let cell = self.cell();
        grid.is_solid(cell.x, cell.y + 1) || cell.y >= grid.height() - 1
    }

    pub fn glow_intensity(&self) -> f32 {
        0.5 + 0.5 * self.glow_phase.sin()
    }

    /// Impact sparkles biased upward
    pub fn impact_particles(&self, rng: &mut Pcg32) -> Vec<Particle> {
        (0..20)
            .map(|_| {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let speed = rng.random_range(30.0..80.0);
                let life = rng.random_range(0.5..1.2);
                Particle {
                    pos: self.center(),
                    vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 50.0),
                    color: self.color.rgb(),
                    life,
                    max_life: 1.2,
                    size: rng.random_range(2.0..5.0),
                }
            })
            .collect()
    }
}

/// Seconds between meteor trail particles
pub const METEOR_TRAIL_INTERVAL: f32 = 0.05;

/// Spawn x band for meteors as fractions of world width
pub const METEOR_SPAWN_BAND: (f32, f32) = (0.3, 0.9);
/// Meteors start this far above the top of the world
pub const METEOR_SPAWN_Y: f32 = -20.0;

/// Debris burst count for a broken block
pub fn debris_count(rng: &mut Pcg32) -> usize {
    rng.random_range(8..=12)
}

/// Center of a grid cell for spawning debris
pub fn debris_origin(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32) * BLOCK_SIZE + Vec2::splat(BLOCK_SIZE / 2.0)
}
