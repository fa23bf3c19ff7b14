//! TNT hazards: fuse, fall and land
//!
//! Detonation itself lives on [`World`](super::world::World) because it
//! touches the grid, the player and every other hazard.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, PhysicsParams, step_body};
use super::grid::BlockGrid;
use crate::consts::*;

/// Lifecycle state of a live hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardState {
    /// Under gravity
    Falling,
    /// Resting on a block; physics is skipped until knocked loose
    Landed,
}

/// A lit TNT block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub body: Body,
    /// Seconds until detonation
    pub fuse: f32,
    pub total_fuse: f32,
    pub state: HazardState,
    pub power_level: u32,
    /// Fuse reading at the last beep
    #[serde(default)]
    last_beep: f32,
}

impl Hazard {
    pub fn new(id: u32, pos: Vec2, fuse: f32, power_level: u32) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(BLOCK_SIZE)),
            fuse,
            total_fuse: fuse.max(f32::EPSILON),
            state: HazardState::Falling,
            power_level,
            last_beep: fuse,
        }
    }

    /// Burn the fuse and, while falling, integrate physics.
    ///
    /// Returns true if the hazard fell out of the world.
    pub fn update(&mut self, dt: f32, grid: &BlockGrid) -> bool {
        self.fuse -= dt;
        if self.state != HazardState::Falling {
            return false;
        }
        let outcome = step_body(&mut self.body, grid, &PhysicsParams::TNT, dt);
        if outcome.landed {
            self.state = HazardState::Landed;
            self.body.vel = Vec2::ZERO;
        }
        outcome.fell_out
    }

    /// True once per `FUSE_BEEP_INTERVAL` of burnt fuse
    pub fn take_beep(&mut self) -> bool {
        if self.fuse < self.last_beep - FUSE_BEEP_INTERVAL {
            self.last_beep = self.fuse;
            true
        } else {
            false
        }
    }

    pub fn should_detonate(&self) -> bool {
        self.fuse <= 0.0
    }

    /// Remaining fuse as a fraction (1 = just lit)
    pub fn fuse_ratio(&self) -> f32 {
        (self.fuse / self.total_fuse).clamp(0.0, 1.0)
    }

    /// Blast radius in blocks
    pub fn blast_radius(&self) -> f32 {
        TNT_EXPLOSION_RADIUS * (1.0 + self.power_level as f32 * POWER_RADIUS_BONUS)
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Throw the hazard back into the air and shorten its fuse to at most `fuse_cap`
    pub fn knock(&mut self, impulse: Vec2, fuse_cap: f32) {
        self.body.push(impulse);
        self.body.on_ground = false;
        self.state = HazardState::Falling;
        self.fuse = self.fuse.min(fuse_cap);
    }

    /// Blink faster as the fuse runs down (for rendering)
    pub fn is_flash_on(&self) -> bool {
        let rate = 4.0 + 16.0 * (1.0 - self.fuse_ratio());
        ((self.total_fuse - self.fuse) * rate) as i32 % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::BlockKind;

    fn ground() -> BlockGrid {
        let mut grid = BlockGrid::new(10, 10);
        for x in 0..10 {
            grid.set_block(x, 8, Some(BlockKind::Stone));
        }
        grid
    }

    #[test]
    fn test_falls_then_lands() {
        let grid = ground();
        let mut hazard = Hazard::new(1, Vec2::new(32.0, 0.0), 10.0, 0);
        for _ in 0..120 {
            assert!(!hazard.update(SIM_DT, &grid));
        }
        assert_eq!(hazard.state, HazardState::Landed);
        assert!(hazard.body.rect().max().y <= 8.0 * BLOCK_SIZE);
        assert!(!hazard.should_detonate());
    }

    #[test]
    fn test_fuse_burns_while_landed() {
        let grid = ground();
        let mut hazard = Hazard::new(1, Vec2::new(32.0, 0.0), 1.0, 0);
        let mut ticks = 0;
        while !hazard.should_detonate() {
            hazard.update(SIM_DT, &grid);
            ticks += 1;
        }
        assert!((59..=61).contains(&ticks));
        assert_eq!(hazard.fuse_ratio(), 0.0);
    }

    #[test]
    fn test_knock_rearms_and_caps_fuse() {
        let grid = ground();
        let mut hazard = Hazard::new(1, Vec2::new(32.0, 0.0), 3.0, 0);
        for _ in 0..120 {
            hazard.update(SIM_DT, &grid);
        }
        assert_eq!(hazard.state, HazardState::Landed);
        hazard.knock(Vec2::new(50.0, -200.0), 0.4);
        assert_eq!(hazard.state, HazardState::Falling);
        assert!(hazard.fuse <= 0.4);
        assert!(hazard.body.vel.y < 0.0);
    }

    #[test]
    fn test_fuse_beeps_every_half_second() {
        let grid = ground();
        let mut hazard = Hazard::new(1, Vec2::new(32.0, 0.0), 3.0, 0);
        let mut beeps = 0;
        let mut ticks = 0;
        while !hazard.should_detonate() {
            hazard.update(SIM_DT, &grid);
            if hazard.take_beep() {
                beeps += 1;
            }
            ticks += 1;
        }
        assert!((179..=181).contains(&ticks));
        assert!((5..=6).contains(&beeps), "{beeps} beeps");
        assert!(!hazard.take_beep());
    }

    #[test]
    fn test_blast_radius_scales_with_power() {
        let hazard = Hazard::new(1, Vec2::ZERO, 3.0, 0);
        assert_eq!(hazard.blast_radius(), 3.0);
        let strong = Hazard::new(2, Vec2::ZERO, 3.0, 5);
        assert!((strong.blast_radius() - 4.5).abs() < 1e-5);
    }
}
