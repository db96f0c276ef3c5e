/// LocalHost: board + scheduler + random source in one value.
///
/// This is the host the terminal front end drives, and the one tests
/// drive with a scripted random source. `run_tick` is the dispatch loop:
/// advance the clock, then deliver each due callback to completion
/// before the next one starts.

use log::trace;

use crate::domain::grid::{CellColor, Glyph, Position};

use super::board::Board;
use super::event::GameEvent;
use super::scheduler::TickScheduler;
use super::services::{GridSurface, RandomSource, TimerHandle, TimerId, TimerMode, TimerService};
use super::session::Session;

pub struct LocalHost<R: RandomSource> {
    pub board: Board,
    pub sched: TickScheduler,
    pub rng: R,
}

impl<R: RandomSource> LocalHost<R> {
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        LocalHost {
            board: Board::new(width, height),
            sched: TickScheduler::new(),
            rng,
        }
    }

    /// Advance one tick and run every callback that falls due.
    pub fn run_tick(&mut self, session: &mut Session) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for handle in self.sched.tick() {
            let Some(fired) = self.sched.fire(handle) else {
                trace!("skipping {:?}: cancelled earlier this tick", handle);
                continue;
            };
            events.extend(session.on_timer(self, fired));
        }
        events
    }

    /// Run `ticks` ticks, collecting events.
    #[cfg(test)]
    pub fn run_ticks(&mut self, session: &mut Session, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.run_tick(session));
        }
        events
    }
}

impl<R: RandomSource> GridSurface for LocalHost<R> {
    fn set_glyph(&mut self, pos: Position, glyph: Option<Glyph>) {
        self.board.set_glyph(pos, glyph);
    }

    fn set_color(&mut self, pos: Position, color: CellColor) {
        self.board.set_color(pos, color);
    }

    fn grid_size(&self) -> (i32, i32) {
        self.board.grid_size()
    }

    fn set_status(&mut self, text: &str) {
        self.board.set_status(text);
    }
}

impl<R: RandomSource> TimerService for LocalHost<R> {
    fn start_timer(&mut self, interval_ticks: u32, mode: TimerMode, id: TimerId) -> TimerHandle {
        self.sched.start_timer(interval_ticks, mode, id)
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.sched.cancel_timer(handle);
    }
}

impl<R: RandomSource> RandomSource for LocalHost<R> {
    fn random_int(&mut self, bound: u32) -> u32 {
        self.rng.random_int(bound)
    }
}
