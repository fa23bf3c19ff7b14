//! Instance types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// What an instance depicts; lets the renderer pick a texture
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpriteLayer {
    Block = 0,
    Hazard = 1,
    Item = 2,
    ItemGlow = 3,
    Particle = 4,
    Explosion = 5,
    Meteor = 6,
    Player = 7,
}

/// One axis-aligned sprite: world position, size, tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left in world pixels
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// Radians
    pub rotation: f32,
    /// [`SpriteLayer`] discriminant
    pub layer: u32,
    /// Layer-specific: animation frame, crack stage, kind index
    pub param: u32,
    pub _pad: u32,
}

impl SpriteInstance {
    pub const fn new(position: [f32; 2], size: [f32; 2], color: [f32; 4], layer: SpriteLayer) -> Self {
        Self {
            position,
            size,
            color,
            rotation: 0.0,
            layer: layer as u32,
            param: 0,
            _pad: 0,
        }
    }

    pub const fn with_param(mut self, param: u32) -> Self {
        self.param = param;
        self
    }

    pub const fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.45, 0.7, 0.95, 1.0];
    pub const PLAYER: [f32; 4] = [0.25, 0.45, 0.85, 1.0];
    /// Player tint while the hurt window is open
    pub const PLAYER_HURT: [f32; 4] = [1.0, 0.35, 0.35, 1.0];
    pub const TNT: [f32; 4] = [0.85, 0.15, 0.1, 1.0];
    pub const TNT_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.75, 0.3, 1.0];

    /// 8-bit RGB to linear-ish float RGBA
    pub fn rgb(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
        [
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
            alpha,
        ]
    }
}
