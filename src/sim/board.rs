/// Board: the in-memory grid surface the game draws on.
///
/// Cells are stored row-major. Every write bumps `revision`, which the
/// renderer uses to skip idle frames and tests use to prove that an
/// ignored input rendered nothing.

use crate::domain::grid::{CellColor, Glyph, Position};

use super::services::GridSurface;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BoardCell {
    pub color: CellColor,
    pub glyph: Option<Glyph>,
}

#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<BoardCell>,
    status: String,
    revision: u64,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Board {
            width,
            height,
            cells: vec![BoardCell::default(); (width * height) as usize],
            status: String::new(),
            revision: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell(&self, pos: Position) -> BoardCell {
        match self.index(pos) {
            Some(i) => self.cells[i],
            None => BoardCell::default(),
        }
    }

    #[cfg(test)]
    pub fn glyph_at(&self, pos: Position) -> Option<Glyph> {
        self.cell(pos).glyph
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All positions currently showing `glyph`.
    #[cfg(test)]
    pub fn find(&self, glyph: Glyph) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.glyph == Some(glyph))
            .map(|(i, _)| Position::new(i as i32 % self.width, i as i32 / self.width))
            .collect()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.in_bounds(self.width, self.height) {
            Some((pos.row * self.width + pos.col) as usize)
        } else {
            None
        }
    }
}

impl GridSurface for Board {
    fn set_glyph(&mut self, pos: Position, glyph: Option<Glyph>) {
        if let Some(i) = self.index(pos) {
            self.cells[i].glyph = glyph;
            self.revision += 1;
        }
    }

    fn set_color(&mut self, pos: Position, color: CellColor) {
        if let Some(i) = self.index(pos) {
            self.cells[i].color = color;
            self.revision += 1;
        }
    }

    fn grid_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        self.revision += 1;
    }
}
