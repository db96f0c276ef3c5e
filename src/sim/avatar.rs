/// Avatar controller: position, clamped movement and the slowdown debuff.

use log::debug;

use crate::domain::entity::Avatar;
use crate::domain::grid::Position;

use super::services::{GridSurface, TimerId, TimerMode, TimerService};
use super::timers::SessionTimers;

pub const STATUS_PLAYING: &str = "Guide using 'WSAD', Mouse & Scroll Wheel";
pub const STATUS_FROZEN: &str = "Oops! Hit a cloud! It's freezing...";

#[derive(Debug)]
pub struct AvatarController {
    avatar: Avatar,
    start: Position,
    width: i32,
    max_row: i32,
}

impl AvatarController {
    pub fn new(start: Position, width: i32, max_row: i32) -> Self {
        let mut ctl = AvatarController {
            avatar: Avatar::new(start),
            start,
            width,
            max_row,
        };
        ctl.start = ctl.clamp(start);
        ctl.avatar.pos = ctl.start;
        ctl
    }

    pub fn position(&self) -> Position {
        self.avatar.pos
    }

    pub fn is_slowed(&self) -> bool {
        self.avatar.slowed
    }

    /// Back to the start cell, debuff dropped. Draws nothing.
    pub fn reset(&mut self) {
        self.avatar = Avatar::new(self.start);
    }

    pub fn render<G: GridSurface + ?Sized>(&self, grid: &mut G) {
        grid.set_glyph(self.avatar.pos, Some(self.avatar.glyph()));
    }

    /// Move to a column on the current row. Returns false when ignored.
    pub fn move_to<G: GridSurface + ?Sized>(&mut self, grid: &mut G, col: i32) -> bool {
        let target = Position::new(col, self.avatar.pos.row);
        self.relocate(grid, target)
    }

    /// Step by a row/column delta. Returns false when ignored.
    pub fn move_by<G: GridSurface + ?Sized>(&mut self, grid: &mut G, d_row: i32, d_col: i32) -> bool {
        let p = self.avatar.pos;
        let target = Position::new(p.col + d_col, p.row + d_row);
        self.relocate(grid, target)
    }

    /// Place the avatar anywhere on the grid, ignoring `max_row` and the debuff.
    /// Used by the landing animation.
    pub fn force_to<G: GridSurface + ?Sized>(&mut self, grid: &mut G, pos: Position) {
        grid.set_glyph(self.avatar.pos, None);
        self.avatar.pos = pos;
        self.render(grid);
    }

    /// Freeze the avatar and (re)start the debuff timer.
    pub fn apply_slowdown<H: GridSurface + TimerService + ?Sized>(
        &mut self,
        host: &mut H,
        timers: &mut SessionTimers,
        duration_ticks: u32,
    ) {
        self.avatar.slowed = true;
        self.render(host);
        host.set_status(STATUS_FROZEN);
        timers.start(host, TimerId::Debuff, duration_ticks, TimerMode::Once);
        debug!("avatar slowed at {:?} for {} ticks", self.avatar.pos, duration_ticks);
    }

    /// Debuff timer expiry.
    pub fn end_slowdown<G: GridSurface + ?Sized>(&mut self, grid: &mut G) {
        self.avatar.slowed = false;
        self.render(grid);
        grid.set_status(STATUS_PLAYING);
        debug!("avatar thawed");
    }

    /// Drop the debuff without drawing (state exits).
    pub fn thaw(&mut self) {
        self.avatar.slowed = false;
    }

    fn relocate<G: GridSurface + ?Sized>(&mut self, grid: &mut G, target: Position) -> bool {
        if self.avatar.slowed {
            return false;
        }
        let target = self.clamp(target);
        if target == self.avatar.pos {
            return false;
        }
        grid.set_glyph(self.avatar.pos, None);
        self.avatar.pos = target;
        self.render(grid);
        true
    }

    fn clamp(&self, p: Position) -> Position {
        Position::new(
            p.col.clamp(0, (self.width - 1).max(0)),
            p.row.clamp(0, self.max_row.max(0)),
        )
    }
}
