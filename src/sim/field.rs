/// Obstacle field: the live set of rising clouds and suns.
///
/// Obstacles spawn on the bottom row and rise one row per advance.
/// `advance` rebuilds the live set instead of removing in place, so an
/// obstacle leaving the grid never causes its neighbour to be skipped.

use log::trace;

use crate::domain::entity::{Obstacle, ObstacleKind};
use crate::domain::grid::Position;

use super::services::{GridSurface, RandomSource};

#[derive(Debug)]
pub struct ObstacleField {
    width: i32,
    height: i32,
    live: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(width: i32, height: i32) -> Self {
        ObstacleField { width, height, live: Vec::new() }
    }

    /// Row new obstacles appear on.
    pub fn spawn_row(&self) -> i32 {
        self.height - 1
    }

    /// Create one obstacle of random kind in a random column of the bottom row.
    pub fn spawn<H: GridSurface + RandomSource + ?Sized>(&mut self, host: &mut H) -> Obstacle {
        let kind = ObstacleKind::from_roll(host.random_int(2));
        let col = host.random_int(self.width.max(1) as u32) as i32;
        let obstacle = Obstacle::new(kind, Position::new(col, self.spawn_row()));
        host.set_glyph(obstacle.pos, Some(kind.glyph()));
        self.live.push(obstacle);
        trace!("spawned {:?} at col {}", kind, col);
        obstacle
    }

    /// Insert an obstacle at an explicit position (drawn immediately).
    #[cfg(test)]
    pub fn place<G: GridSurface + ?Sized>(&mut self, grid: &mut G, obstacle: Obstacle) {
        grid.set_glyph(obstacle.pos, Some(obstacle.kind.glyph()));
        self.live.push(obstacle);
    }

    /// Move every obstacle up one row; drop the ones that leave the grid.
    pub fn advance<G: GridSurface + ?Sized>(&mut self, grid: &mut G) {
        let mut survivors = Vec::with_capacity(self.live.len());
        for mut obstacle in self.live.drain(..) {
            grid.set_glyph(obstacle.pos, None);
            if obstacle.rise() {
                survivors.push(obstacle);
            }
        }
        // Draw after all clears so two obstacles in one column don't erase each other.
        for obstacle in &survivors {
            grid.set_glyph(obstacle.pos, Some(obstacle.kind.glyph()));
        }
        self.live = survivors;
    }

    /// Erase and forget every obstacle.
    pub fn clear<G: GridSurface + ?Sized>(&mut self, grid: &mut G) {
        for obstacle in self.live.drain(..) {
            grid.set_glyph(obstacle.pos, None);
        }
    }

    /// Drop every obstacle of `kind` at `pos` without touching the grid.
    /// Returns how many were removed.
    pub fn take_at(&mut self, pos: Position, kind: ObstacleKind) -> usize {
        let before = self.live.len();
        self.live.retain(|o| !(o.pos == pos && o.kind == kind));
        before - self.live.len()
    }

    pub fn any_at(&self, pos: Position, kind: ObstacleKind) -> bool {
        self.live.iter().any(|o| o.pos == pos && o.kind == kind)
    }

    /// Repaint whatever obstacle occupies `pos`, if any.
    pub fn redraw_at<G: GridSurface + ?Sized>(&self, grid: &mut G, pos: Position) {
        if let Some(o) = self.live.iter().rev().find(|o| o.pos == pos) {
            grid.set_glyph(pos, Some(o.kind.glyph()));
        }
    }

    #[cfg(test)]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.live
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Glyph;
    use crate::sim::board::Board;
    use crate::sim::host::LocalHost;
    use crate::sim::rng::ScriptedRandom;
    use proptest::prelude::*;

    fn host(w: i32, h: i32, rolls: &[u32]) -> LocalHost<ScriptedRandom> {
        LocalHost::new(w, h, ScriptedRandom::new(rolls))
    }

    #[test]
    fn spawn_uses_bottom_row_and_rolls() {
        let mut host = host(11, 11, &[1, 7]);
        let mut field = ObstacleField::new(11, 11);
        let o = field.spawn(&mut host);
        assert_eq!(o.kind, ObstacleKind::Sun);
        assert_eq!(o.pos, Position::new(7, 10));
        assert_eq!(host.board.glyph_at(o.pos), Some(Glyph::Sun));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn advance_moves_glyph_and_drops_at_top() {
        let mut board = Board::new(5, 3);
        let mut field = ObstacleField::new(5, 3);
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, Position::new(2, 2)));

        field.advance(&mut board);
        assert_eq!(board.glyph_at(Position::new(2, 2)), None);
        assert_eq!(board.glyph_at(Position::new(2, 1)), Some(Glyph::Cloud));

        field.advance(&mut board);
        field.advance(&mut board);
        assert!(field.is_empty());
        assert!(board.find(Glyph::Cloud).is_empty());
    }

    #[test]
    fn removal_does_not_skip_neighbours() {
        let mut board = Board::new(5, 5);
        let mut field = ObstacleField::new(5, 5);
        // First one leaves on this advance; the next must still move.
        field.place(&mut board, Obstacle::new(ObstacleKind::Sun, Position::new(0, 0)));
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, Position::new(1, 3)));
        field.place(&mut board, Obstacle::new(ObstacleKind::Sun, Position::new(2, 0)));
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, Position::new(3, 4)));

        field.advance(&mut board);
        let rows: Vec<(i32, i32)> = field.obstacles().iter().map(|o| (o.pos.col, o.pos.row)).collect();
        assert_eq!(rows, vec![(1, 2), (3, 3)]);
    }

    #[test]
    fn stacked_column_keeps_both_glyphs() {
        let mut board = Board::new(3, 5);
        let mut field = ObstacleField::new(3, 5);
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, Position::new(1, 3)));
        field.place(&mut board, Obstacle::new(ObstacleKind::Sun, Position::new(1, 4)));
        field.advance(&mut board);
        assert_eq!(board.glyph_at(Position::new(1, 2)), Some(Glyph::Cloud));
        assert_eq!(board.glyph_at(Position::new(1, 3)), Some(Glyph::Sun));
    }

    #[test]
    fn clear_erases_everything() {
        let mut board = Board::new(4, 4);
        let mut field = ObstacleField::new(4, 4);
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, Position::new(0, 3)));
        field.place(&mut board, Obstacle::new(ObstacleKind::Sun, Position::new(3, 1)));
        field.clear(&mut board);
        assert!(field.is_empty());
        assert!(board.find(Glyph::Cloud).is_empty());
        assert!(board.find(Glyph::Sun).is_empty());
    }

    #[test]
    fn take_at_filters_by_kind() {
        let mut board = Board::new(4, 4);
        let mut field = ObstacleField::new(4, 4);
        let p = Position::new(2, 2);
        field.place(&mut board, Obstacle::new(ObstacleKind::Cloud, p));
        field.place(&mut board, Obstacle::new(ObstacleKind::Sun, p));
        assert_eq!(field.take_at(p, ObstacleKind::Cloud), 1);
        assert!(field.any_at(p, ObstacleKind::Sun));
        assert!(!field.any_at(p, ObstacleKind::Cloud));
    }

    proptest! {
        #[test]
        fn rows_strictly_decrease_until_removed(
            ops in proptest::collection::vec((any::<bool>(), 0u32..2, 0u32..11), 1..120)
        ) {
            let mut host = host(11, 11, &[]);
            let mut field = ObstacleField::new(11, 11);

            for (spawn, kind, col) in ops {
                if spawn {
                    host.rng.push(&[kind, col]);
                    field.spawn(&mut host);
                    continue;
                }
                let before: Vec<Obstacle> = field.obstacles().to_vec();
                field.advance(&mut host);
                let after = field.obstacles();

                // Survivors keep their order and are exactly one row higher.
                let expected: Vec<Obstacle> = before
                    .iter()
                    .filter(|o| o.pos.row > 0)
                    .map(|o| Obstacle::new(o.kind, Position::new(o.pos.col, o.pos.row - 1)))
                    .collect();
                prop_assert_eq!(after, expected.as_slice());
                prop_assert!(after.iter().all(|o| o.pos.row >= 0));

                // Every drawn obstacle glyph belongs to a live obstacle.
                for glyph in [Glyph::Cloud, Glyph::Sun] {
                    for pos in host.board.find(glyph) {
                        prop_assert!(after.iter().any(|o| o.pos == pos && o.kind.glyph() == glyph));
                    }
                }
            }
        }
    }
}
