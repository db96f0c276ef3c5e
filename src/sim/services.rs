/// Services the host provides to the game core.
///
/// The core never owns the grid, the clock or the random source. Every
/// handler receives the host as `&mut H` and calls back through these
/// traits, so one `Session` can run against the terminal host or a test
/// double without change.

use crate::domain::grid::{CellColor, Glyph, Position};

/// Addressable 2D cells with a color and an optional glyph, plus a status line.
pub trait GridSurface {
    fn set_glyph(&mut self, pos: Position, glyph: Option<Glyph>);
    fn set_color(&mut self, pos: Position, color: CellColor);
    /// `(width, height)`
    fn grid_size(&self) -> (i32, i32);
    fn set_status(&mut self, text: &str);
}

/// Named timers. Each name has at most one live instance per session.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum TimerId {
    /// Session length; fires once and wins the game.
    Countdown,
    /// Obstacle cadence.
    Spawn,
    /// Slowdown expiry.
    Debuff,
    /// One row of the landing animation.
    WinStep,
    /// Delay before going back to the title screen.
    ReturnToTitle,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerMode {
    Once,
    Repeat,
}

/// Opaque handle returned by `start_timer`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct TimerHandle(pub u64);

/// A timer callback delivered by the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fired {
    pub handle: TimerHandle,
    pub id: TimerId,
    pub mode: TimerMode,
}

pub trait TimerService {
    fn start_timer(&mut self, interval_ticks: u32, mode: TimerMode, id: TimerId) -> TimerHandle;
    /// Must be a no-op for handles that already fired or were cancelled.
    fn cancel_timer(&mut self, handle: TimerHandle);
}

pub trait RandomSource {
    /// Uniform integer in `[0, bound)`.
    fn random_int(&mut self, bound: u32) -> u32;
}

/// Everything a session handler may touch.
pub trait Host: GridSurface + TimerService + RandomSource {}

impl<T: GridSurface + TimerService + RandomSource> Host for T {}
