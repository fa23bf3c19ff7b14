//! Sparse block grid
//!
//! Only non-air cells are stored. Coordinates outside the world are "out of
//! world": they read as `None` and ignore writes, and are never treated as air
//! by callers that care about the difference (`in_bounds`).

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use super::block::{Block, BlockKind};
use crate::consts::BLOCK_SIZE;

/// Result of applying mining damage to a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MineOutcome {
    /// Out of world, air, or indestructible: nothing changed
    Ignored,
    /// Health reduced, block still standing
    Damaged,
    /// Health hit zero and the cell is now air
    Destroyed(BlockKind),
}

#[derive(Debug, Clone)]
pub struct BlockGrid {
    width: i32,
    height: i32,
    cells: HashMap<IVec2, Block>,
}

impl BlockGrid {
    /// Empty (all air) grid
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// World width in pixels
    pub fn width_px(&self) -> f32 {
        self.width as f32 * BLOCK_SIZE
    }

    /// Bodies below this y (pixels) have left the world
    pub fn death_zone_y(&self) -> f32 {
        self.height as f32 * BLOCK_SIZE
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Number of materialized (non-air) cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get_block(&self, x: i32, y: i32) -> Option<&Block> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.get(&IVec2::new(x, y))
    }

    pub fn kind_at(&self, x: i32, y: i32) -> Option<BlockKind> {
        self.get_block(x, y).map(|b| b.kind)
    }

    /// True if the cell holds a movement-blocking block
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get_block(x, y).is_some_and(Block::is_solid)
    }

    /// Place a fresh block, or clear the cell with `None`
    pub fn set_block(&mut self, x: i32, y: i32, kind: Option<BlockKind>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let key = IVec2::new(x, y);
        match kind {
            Some(kind) => {
                self.cells.insert(key, Block::new(kind));
            }
            None => {
                self.cells.remove(&key);
            }
        }
    }

    /// Remove a block and hand it back
    pub fn remove(&mut self, x: i32, y: i32) -> Option<Block> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.remove(&IVec2::new(x, y))
    }

    /// Apply hardness-scaled damage; a destroyed block is removed from storage
    pub fn apply_damage(&mut self, x: i32, y: i32, damage: f32) -> MineOutcome {
        if !self.in_bounds(x, y) {
            return MineOutcome::Ignored;
        }
        let key = IVec2::new(x, y);
        let Some(block) = self.cells.get_mut(&key) else {
            return MineOutcome::Ignored;
        };
        if !block.is_mineable() {
            return MineOutcome::Ignored;
        }
        if block.damage(damage) {
            let kind = block.kind;
            self.cells.remove(&key);
            MineOutcome::Destroyed(kind)
        } else {
            MineOutcome::Damaged
        }
    }

    /// Non-air cells overlapping a pixel-space window, row-major.
    ///
    /// Includes one cell of margin before and two after so sprites don't pop
    /// in at the screen edges.
    pub fn visible_blocks(&self, min: Vec2, max: Vec2) -> Vec<(i32, i32, &Block)> {
        let start_x = ((min.x / BLOCK_SIZE).floor() as i32 - 1).max(0);
        let start_y = ((min.y / BLOCK_SIZE).floor() as i32 - 1).max(0);
        let end_x = ((max.x / BLOCK_SIZE).floor() as i32 + 2).min(self.width);
        let end_y = ((max.y / BLOCK_SIZE).floor() as i32 + 2).min(self.height);

        let mut visible = Vec::new();
        for y in start_y..end_y {
            for x in start_x..end_x {
                if let Some(block) = self.cells.get(&IVec2::new(x, y)) {
                    visible.push((x, y, block));
                }
            }
        }
        visible
    }

    /// Iterate every stored cell (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Block)> {
        self.cells.iter().map(|(pos, block)| (*pos, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear_returns_to_baseline() {
        let mut grid = BlockGrid::new(10, 10);
        grid.set_block(1, 1, Some(BlockKind::Stone));
        let baseline = grid.len();

        grid.set_block(5, 5, Some(BlockKind::Dirt));
        assert_eq!(grid.len(), baseline + 1);
        grid.set_block(5, 5, None);
        assert_eq!(grid.len(), baseline);
        assert!(grid.get_block(5, 5).is_none());

        // Clearing air is still a no-op
        grid.set_block(5, 5, None);
        assert_eq!(grid.len(), baseline);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = BlockGrid::new(10, 10);
        grid.set_block(-1, 5, Some(BlockKind::Stone));
        grid.set_block(10, 5, Some(BlockKind::Stone));
        assert!(grid.is_empty());
        assert!(grid.get_block(-1, 5).is_none());
        assert!(grid.get_block(10, 5).is_none());
        assert_eq!(grid.apply_damage(-1, 5, 100.0), MineOutcome::Ignored);
        assert!(!grid.in_bounds(0, 10));
    }

    #[test]
    fn test_replace_resets_health() {
        let mut grid = BlockGrid::new(4, 4);
        grid.set_block(0, 0, Some(BlockKind::Stone));
        assert_eq!(grid.apply_damage(0, 0, 50.0), MineOutcome::Damaged);
        grid.set_block(0, 0, Some(BlockKind::Stone));
        assert_eq!(grid.get_block(0, 0).unwrap().health(), 100.0);
    }

    #[test]
    fn test_destroy_removes_cell() {
        let mut grid = BlockGrid::new(4, 4);
        grid.set_block(2, 2, Some(BlockKind::Dirt));
        assert_eq!(grid.apply_damage(2, 2, 25.0), MineOutcome::Damaged);
        assert_eq!(
            grid.apply_damage(2, 2, 25.0),
            MineOutcome::Destroyed(BlockKind::Dirt)
        );
        assert!(grid.is_empty());
        assert_eq!(grid.apply_damage(2, 2, 25.0), MineOutcome::Ignored);
    }

    #[test]
    fn test_visible_blocks_window() {
        let mut grid = BlockGrid::new(20, 20);
        grid.set_block(0, 0, Some(BlockKind::Stone));
        grid.set_block(5, 5, Some(BlockKind::Stone));
        grid.set_block(19, 19, Some(BlockKind::Stone));

        // Window covering cells 4..=6 sees (5,5) only
        let visible = grid.visible_blocks(Vec2::splat(64.0), Vec2::splat(100.0));
        assert_eq!(visible.len(), 1);
        assert_eq!((visible[0].0, visible[0].1), (5, 5));

        let all = grid.visible_blocks(Vec2::ZERO, Vec2::splat(20.0 * BLOCK_SIZE));
        assert_eq!(all.len(), 3);
    }
}
