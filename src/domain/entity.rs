/// Entity definitions: the avatar and the rising obstacles.

use super::grid::{Glyph, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObstacleKind {
    /// Freezes the avatar for a while.
    Cloud,
    /// Ends the session.
    Sun,
}

impl ObstacleKind {
    /// Kind for a roll in `[0, 2)`.
    pub fn from_roll(roll: u32) -> Self {
        if roll == 0 { ObstacleKind::Cloud } else { ObstacleKind::Sun }
    }

    pub fn glyph(self) -> Glyph {
        match self {
            ObstacleKind::Cloud => Glyph::Cloud,
            ObstacleKind::Sun => Glyph::Sun,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Position,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, pos: Position) -> Self {
        Obstacle { kind, pos }
    }

    /// Move one row toward the top. Returns false once it has left the grid.
    pub fn rise(&mut self) -> bool {
        self.pos.row -= 1;
        self.pos.row >= 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Avatar {
    pub pos: Position,
    /// Movement is ignored while set.
    pub slowed: bool,
}

impl Avatar {
    pub fn new(pos: Position) -> Self {
        Avatar { pos, slowed: false }
    }

    pub fn glyph(&self) -> Glyph {
        if self.slowed { Glyph::Frozen } else { Glyph::Raindrop }
    }
}
