/// Screen state machine: Title → Playing → Ending(Win | Lose) → Title.
///
/// Every transition cancels the timers of the state it leaves before
/// arming its own, so no callback from an old state survives into a new
/// one. Transitions out of the wrong state are silently ignored.

use log::info;

use crate::domain::grid::{CellColor, Glyph, Position};

use super::event::GameEvent;
use super::services::{GridSurface, Host, TimerId, TimerMode};
use super::session::Session;

pub const STATUS_TITLE: &str = "Raindrop Journey - Press 'Space' to Start";
pub const STATUS_WIN: &str = "Congrats! You've successfully guided raindrop!";
pub const STATUS_LANDED: &str = "It helps the seed grow into a plant!";
pub const STATUS_LOSE: &str = "Oops! Hit a sun! Restarting...";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Win,
    Lose,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Title,
    Playing,
    Ending(Outcome),
}

impl Session {
    pub(crate) fn enter_title<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.timers.cancel_all(host);
        self.field.clear(host);
        clear_grid(host);
        self.avatar.reset();
        host.set_status(STATUS_TITLE);
        self.screen = Screen::Title;
        info!("title screen");
    }

    pub(crate) fn start<H: Host + ?Sized>(&mut self, host: &mut H, events: &mut Vec<GameEvent>) {
        if self.screen != Screen::Title {
            return;
        }
        self.timers.cancel_all(host);
        self.field.clear(host);
        self.avatar.reset();
        self.avatar.render(host);
        host.set_status(super::avatar::STATUS_PLAYING);
        self.screen = Screen::Playing;

        let t = self.timing;
        self.timers.start(host, TimerId::Spawn, t.spawn_interval, TimerMode::Repeat);
        self.timers.start(host, TimerId::Countdown, t.session_length, TimerMode::Once);
        info!("session started ({} ticks)", t.session_length);
        events.push(GameEvent::Started);
    }

    pub(crate) fn win<H: Host + ?Sized>(&mut self, host: &mut H, events: &mut Vec<GameEvent>) {
        if self.screen != Screen::Playing {
            return;
        }
        self.timers.cancel_all(host);
        self.avatar.thaw();
        self.field.clear(host);
        clear_grid(host);
        self.avatar.render(host);
        host.set_status(STATUS_WIN);
        self.screen = Screen::Ending(Outcome::Win);

        self.timers.start(host, TimerId::WinStep, self.timing.win_step_interval, TimerMode::Repeat);
        info!("won at {:?}", self.avatar.position());
        events.push(GameEvent::Won);
    }

    /// One row of the landing animation.
    pub(crate) fn win_step<H: Host + ?Sized>(&mut self, host: &mut H, events: &mut Vec<GameEvent>) {
        if self.screen != Screen::Ending(Outcome::Win) {
            return;
        }
        let (_, height) = host.grid_size();
        let bottom = height - 1;
        let p = self.avatar.position();
        if p.row < bottom {
            self.avatar.force_to(host, Position::new(p.col, p.row + 1));
        }
        if self.avatar.position().row < bottom {
            return;
        }

        self.timers.cancel(host, TimerId::WinStep);
        let at = self.avatar.position();
        host.set_color(at, CellColor::Green);
        host.set_glyph(at, Some(Glyph::Plant));
        host.set_status(STATUS_LANDED);
        self.timers.start(host, TimerId::ReturnToTitle, self.timing.win_display_delay, TimerMode::Once);
        info!("landed in column {}", at.col);
        events.push(GameEvent::Landed { col: at.col });
    }

    pub(crate) fn lose<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.screen != Screen::Playing {
            return;
        }
        self.timers.cancel_all(host);
        self.field.clear(host);
        clear_grid(host);
        self.avatar.reset();
        host.set_status(STATUS_LOSE);
        self.screen = Screen::Ending(Outcome::Lose);

        self.timers.start(host, TimerId::ReturnToTitle, self.timing.lose_reset_delay, TimerMode::Once);
        info!("lost; back to title in {} ticks", self.timing.lose_reset_delay);
    }
}

/// Blank every cell: no glyph, white background.
pub fn clear_grid<G: GridSurface + ?Sized>(grid: &mut G) {
    let (width, height) = grid.grid_size();
    for row in 0..height {
        for col in 0..width {
            let p = Position::new(col, row);
            grid.set_glyph(p, None);
            grid.set_color(p, CellColor::White);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Obstacle, ObstacleKind};
    use crate::sim::board::Board;
    use crate::sim::session::test_host::TestHost;

    #[test]
    fn clear_grid_resets_colors_and_glyphs() {
        let mut board = Board::new(3, 3);
        board.set_color(Position::new(1, 2), CellColor::Green);
        board.set_glyph(Position::new(1, 2), Some(Glyph::Plant));
        clear_grid(&mut board);
        assert_eq!(board.cell(Position::new(1, 2)).color, CellColor::White);
        assert_eq!(board.glyph_at(Position::new(1, 2)), None);
    }

    #[test]
    fn win_only_from_playing() {
        let mut host = TestHost::sized(11, 11);
        let mut s = Session::with_defaults();
        s.on_init(&mut host);
        let mut events = Vec::new();
        s.win(&mut host, &mut events);
        assert!(events.is_empty());
        assert_eq!(s.screen(), Screen::Title);
        assert_eq!(host.sched.live_count(), 0);
    }

    #[test]
    fn win_twice_keeps_one_animation() {
        let mut host = TestHost::sized(11, 11);
        let mut s = Session::with_defaults();
        s.on_init(&mut host);
        s.on_start_intent(&mut host);
        let mut events = Vec::new();
        s.win(&mut host, &mut events);
        s.win(&mut host, &mut events);
        s.lose(&mut host);
        assert_eq!(events, vec![GameEvent::Won]);
        assert_eq!(host.sched.live_with_id(TimerId::WinStep), 1);
        assert_eq!(s.screen(), Screen::Ending(Outcome::Win));
        assert_eq!(host.board.status(), STATUS_WIN);
    }

    #[test]
    fn start_clears_leftover_obstacles() {
        let mut host = TestHost::sized(11, 11);
        let mut s = Session::with_defaults();
        s.on_init(&mut host);
        let stray = Position::new(2, 5);
        s.field.place(&mut host, Obstacle::new(ObstacleKind::Sun, stray));
        s.on_start_intent(&mut host);
        assert!(s.field.is_empty());
        assert_eq!(host.board.glyph_at(stray), None);
        assert_eq!(host.board.cell(stray).color, CellColor::White);
        // Nothing left to collide with on the first cadence tick.
        let spawn = s.timing.spawn_interval;
        host.run_ticks(&mut s, spawn);
        assert_eq!(s.screen(), Screen::Playing);
    }

    #[test]
    fn win_thaws_a_frozen_avatar() {
        let mut host = TestHost::sized(11, 11);
        let mut s = Session::with_defaults();
        s.on_init(&mut host);
        s.on_start_intent(&mut host);
        let d = s.timing.debuff_duration;
        s.avatar.apply_slowdown(&mut host, &mut s.timers, d);
        let mut events = Vec::new();
        s.win(&mut host, &mut events);
        assert!(!s.avatar.is_slowed());
        assert!(!s.timers.is_active(TimerId::Debuff));
        assert_eq!(host.board.glyph_at(s.avatar.position()), Some(Glyph::Raindrop));
    }

    #[test]
    fn win_step_outside_win_is_ignored() {
        let mut host = TestHost::sized(11, 11);
        let mut s = Session::with_defaults();
        s.on_init(&mut host);
        s.on_start_intent(&mut host);
        let mut events = Vec::new();
        s.win_step(&mut host, &mut events);
        assert_eq!(s.avatar.position(), Position::new(4, 0));
        assert!(events.is_empty());
    }
}
