use bevy::prelude::*;
use chess_core::Position;

/// Width reserved on the right of the window for the status sidebar.
pub const SIDEBAR_WIDTH: f32 = 280.0;

/// Where the board sits in world space. Recomputed when the window resizes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub square_size: f32,
    pub center: Vec2,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::fit(1100.0, 800.0)
    }
}

impl BoardLayout {
    /// Largest board that fits next to the sidebar with a one-square margin.
    pub fn fit(width: f32, height: f32) -> Self {
        let available = (width - SIDEBAR_WIDTH).min(height).max(0.0);
        Self {
            square_size: available / 9.0,
            center: Vec2::new(-SIDEBAR_WIDTH / 2.0, 0.0),
        }
    }

    pub fn board_size(&self) -> f32 {
        self.square_size * 8.0
    }

    /// White is at the bottom.
    pub fn square_center(&self, pos: Position) -> Vec2 {
        let half = self.board_size() / 2.0;
        Vec2::new(
            self.center.x - half + (pos.file as f32 - 0.5) * self.square_size,
            self.center.y - half + (pos.rank as f32 - 0.5) * self.square_size,
        )
    }

    pub fn square_at(&self, point: Vec2) -> Option<Position> {
        if self.square_size <= 0.0 {
            return None;
        }
        let half = self.board_size() / 2.0;
        let file = ((point.x - self.center.x + half) / self.square_size).floor();
        let rank = ((point.y - self.center.y + half) / self.square_size).floor();
        if !(0.0..8.0).contains(&file) || !(0.0..8.0).contains(&rank) {
            return None;
        }
        Position::new(file as u8 + 1, rank as u8 + 1)
    }
}
