//! Render snapshot module
//!
//! Flattens a read-only view of the game into plain-old-data sprite instances
//! that any GPU backend can upload as-is.

pub mod vertex;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{GameState, Player, World};
pub use vertex::{SpriteInstance, SpriteLayer, colors};

/// Sprite instances for one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub instances: Vec<SpriteInstance>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bytes for a GPU instance buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn count(&self, layer: SpriteLayer) -> usize {
        self.instances
            .iter()
            .filter(|i| i.layer == layer as u32)
            .count()
    }
}

/// Build a frame for the camera window `[min, max]` (world pixels)
pub fn build_frame(state: &GameState, min: Vec2, max: Vec2) -> Frame {
    let mut frame = Frame::default();
    push_world(&mut frame, &state.world, min, max);
    push_player(&mut frame, &state.player);
    frame
}

fn push_world(frame: &mut Frame, world: &World, min: Vec2, max: Vec2) {
    let out = &mut frame.instances;
    let cell = [BLOCK_SIZE, BLOCK_SIZE];

    for (x, y, block) in world.visible_blocks(min, max) {
        // Darken as the block takes damage
        let shade = 1.0 - 0.5 * block.damage_ratio();
        let [r, g, b] = block.kind.color();
        let color = [
            r as f32 / 255.0 * shade,
            g as f32 / 255.0 * shade,
            b as f32 / 255.0 * shade,
            if block.kind.is_liquid() { 0.7 } else { 1.0 },
        ];
        let crack_stage = (block.damage_ratio() * 4.0).floor() as u32;
        out.push(
            SpriteInstance::new([x as f32 * BLOCK_SIZE, y as f32 * BLOCK_SIZE], cell, color, SpriteLayer::Block)
                .with_param(crack_stage),
        );
    }

    for hazard in world.hazards() {
        let color = if hazard.is_flash_on() {
            colors::TNT_FLASH
        } else {
            colors::TNT
        };
        out.push(
            SpriteInstance::new(hazard.body.pos.into(), hazard.body.size.into(), color, SpriteLayer::Hazard)
                .with_param(hazard.power_level),
        );
    }

    for item in world.items() {
        let props = item.kind.props();
        let pos = item.render_pos();
        if let Some(glow) = props.glow {
            let pulse = 0.35 + 0.15 * item.float_timer.sin();
            out.push(SpriteInstance::new(
                (pos - Vec2::splat(BLOCK_SIZE / 2.0)).into(),
                [BLOCK_SIZE * 2.0; 2],
                colors::rgb(glow, pulse),
                SpriteLayer::ItemGlow,
            ));
        }
        out.push(
            SpriteInstance::new(pos.into(), item.body.size.into(), [1.0; 4], SpriteLayer::Item)
                .with_param(item.kind as u32),
        );
    }

    for meteor in world.meteors() {
        let alpha = 0.6 + 0.4 * meteor.glow_intensity();
        out.push(
            SpriteInstance::new(
                meteor.pos.into(),
                [meteor.size; 2],
                colors::rgb(meteor.color.rgb(), alpha),
                SpriteLayer::Meteor,
            )
            .with_rotation(meteor.rotation.to_radians()),
        );
    }

    for fx in world.explosions() {
        let size = BLOCK_SIZE * 4.0;
        out.push(
            SpriteInstance::new(
                (fx.pos - Vec2::splat(size / 2.0)).into(),
                [size; 2],
                colors::EXPLOSION,
                SpriteLayer::Explosion,
            )
            .with_param(fx.frame),
        );
    }

    for particle in world.particles() {
        out.push(SpriteInstance::new(
            particle.pos.into(),
            [particle.size; 2],
            colors::rgb(particle.color, particle.alpha()),
            SpriteLayer::Particle,
        ));
    }
}

fn push_player(frame: &mut Frame, player: &Player) {
    let color = if player.control_locked() {
        colors::PLAYER_HURT
    } else {
        colors::PLAYER
    };
    frame.instances.push(
        SpriteInstance::new(player.body.pos.into(), player.body.size.into(), color, SpriteLayer::Player)
            .with_param(player.facing_right as u32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    #[test]
    fn test_frame_contains_visible_world() {
        let state = GameState::new(Settings::default(), 4);
        let frame = build_frame(&state, Vec2::ZERO, Vec2::new(320.0, 240.0));
        assert_eq!(frame.count(SpriteLayer::Player), 1);
        // Surface row 10 through the bottom of the window (+2 margin), 22 columns
        assert!(frame.count(SpriteLayer::Block) >= 22 * 7);
        assert_eq!(
            frame.as_bytes().len(),
            frame.len() * std::mem::size_of::<SpriteInstance>()
        );
    }

    #[test]
    fn test_instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 48);
    }
}
