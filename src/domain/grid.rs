/// Grid value types shared by every component.
///
/// Coordinates are `(col, row)` with row 0 at the top. Obstacles rise
/// toward row 0, so "advance" means `row - 1`.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Position { col, row }
    }

    /// Is this position inside a `width` x `height` grid?
    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.col >= 0 && self.col < width && self.row >= 0 && self.row < height
    }
}

/// Everything the game ever draws on a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Glyph {
    Raindrop,
    Frozen,
    Cloud,
    Sun,
    Plant,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Glyph::Raindrop => '☔',
            Glyph::Frozen => '❄',
            Glyph::Cloud => '☁',
            Glyph::Sun => '⛅',
            Glyph::Plant => '✨',
        }
    }

    /// Does the symbol take two terminal columns?
    pub fn is_wide(self) -> bool {
        matches!(self, Glyph::Raindrop | Glyph::Sun | Glyph::Plant)
    }
}

/// Cell background colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellColor {
    #[default]
    White,
    Green,
}

/// Step direction for keyboard / wheel / d-pad movement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(d_row, d_col)` for one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}
