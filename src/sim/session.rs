/// Session: the explicit context for one running game.
///
/// Owns the screen state, the avatar, the obstacle field and the named
/// timers. The host is passed into every handler; nothing here keeps a
/// reference to it between calls.
///
/// Handlers (wired into host dispatch):
///   - `on_init`          grid size known, go to Title
///   - `on_start_intent`  Title → Playing
///   - `on_move_intent`   steer the avatar while Playing
///   - `on_timer`         every timer callback, by tag
///
/// Each returns the events it produced, in order.

use log::{debug, trace};

use crate::config::{AvatarConfig, TimingConfig};
use crate::domain::grid::{Direction, Position};

use super::avatar::AvatarController;
use super::collision::{self, CollisionOutcome};
use super::event::GameEvent;
use super::field::ObstacleField;
use super::screen::Screen;
use super::services::{Fired, Host, TimerId};
use super::timers::SessionTimers;

/// A pre-filtered movement request from the input layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveIntent {
    Step(Direction),
    /// Pointer input: jump to a column on the current row.
    Column(i32),
}

pub struct Session {
    pub(crate) screen: Screen,
    pub(crate) avatar: AvatarController,
    pub(crate) field: ObstacleField,
    pub(crate) timers: SessionTimers,
    pub(crate) timing: TimingConfig,
    avatar_cfg: AvatarConfig,
}

impl Session {
    pub fn new(timing: TimingConfig, avatar_cfg: AvatarConfig) -> Self {
        // Real bounds arrive with `on_init`.
        let start = Position::new(avatar_cfg.start_column, avatar_cfg.start_row);
        Session {
            screen: Screen::Title,
            avatar: AvatarController::new(start, i32::MAX, avatar_cfg.max_row),
            field: ObstacleField::new(0, 0),
            timers: SessionTimers::new(),
            timing,
            avatar_cfg,
        }
    }

    #[cfg(test)]
    pub fn with_defaults() -> Self {
        Session::new(TimingConfig::default(), AvatarConfig::default())
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[cfg(test)]
    pub fn avatar(&self) -> &AvatarController {
        &self.avatar
    }

    #[cfg(test)]
    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    #[cfg(test)]
    pub fn timers(&self) -> &SessionTimers {
        &self.timers
    }

    // ── Handlers ──

    pub fn on_init<H: Host + ?Sized>(&mut self, host: &mut H) -> Vec<GameEvent> {
        let (width, height) = host.grid_size();
        debug!("session init on {}x{} grid", width, height);

        self.timers.cancel_all(host);
        self.field = ObstacleField::new(width, height);
        let max_row = self.avatar_cfg.max_row.min(height - 2).max(0);
        let start = Position::new(self.avatar_cfg.start_column, self.avatar_cfg.start_row);
        self.avatar = AvatarController::new(start, width, max_row);

        self.enter_title(host);
        Vec::new()
    }

    pub fn on_start_intent<H: Host + ?Sized>(&mut self, host: &mut H) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.start(host, &mut events);
        events
    }

    pub fn on_move_intent<H: Host + ?Sized>(&mut self, host: &mut H, intent: MoveIntent) -> Vec<GameEvent> {
        if self.screen != Screen::Playing {
            return vec![];
        }
        let from = self.avatar.position();
        let moved = match intent {
            MoveIntent::Step(dir) => {
                let (d_row, d_col) = dir.delta();
                self.avatar.move_by(host, d_row, d_col)
            }
            MoveIntent::Column(col) => self.avatar.move_to(host, col),
        };
        if !moved {
            return vec![];
        }
        // Leaving a cell must not erase an obstacle sharing it.
        self.field.redraw_at(host, from);
        trace!("avatar {:?} -> {:?}", from, self.avatar.position());
        vec![GameEvent::Moved { to: self.avatar.position() }]
    }

    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, fired: Fired) -> Vec<GameEvent> {
        if !self.timers.accept(&fired) {
            debug!("dropping stale {:?} callback ({:?})", fired.id, fired.handle);
            return vec![];
        }

        let mut events = Vec::new();
        match fired.id {
            TimerId::Countdown => self.win(host, &mut events),
            TimerId::Spawn => self.spawn_tick(host, &mut events),
            TimerId::Debuff => {
                if self.screen == Screen::Playing && self.avatar.is_slowed() {
                    self.avatar.end_slowdown(host);
                    events.push(GameEvent::Thawed);
                }
            }
            TimerId::WinStep => self.win_step(host, &mut events),
            TimerId::ReturnToTitle => {
                if matches!(self.screen, Screen::Ending(_)) {
                    self.enter_title(host);
                    events.push(GameEvent::ReturnedToTitle);
                }
            }
        }
        events
    }

    /// One cadence tick: advance, resolve, then spawn.
    fn spawn_tick<H: Host + ?Sized>(&mut self, host: &mut H, events: &mut Vec<GameEvent>) {
        if self.screen != Screen::Playing {
            return;
        }
        self.field.advance(host);
        if collision::resolve(self, host, events) == CollisionOutcome::Lost {
            return;
        }
        let o = self.field.spawn(host);
        events.push(GameEvent::Spawned { kind: o.kind, col: o.pos.col });
    }

    #[cfg(test)]
    pub fn is_won(&self) -> bool {
        self.screen == Screen::Ending(super::screen::Outcome::Win)
    }
}

/// Host used by scenario tests: real board and scheduler, scripted rolls.
#[cfg(test)]
pub(crate) mod test_host {
    use crate::sim::host::LocalHost;
    use crate::sim::rng::ScriptedRandom;

    pub type TestHost = LocalHost<ScriptedRandom>;

    impl TestHost {
        pub fn sized(width: i32, height: i32) -> Self {
            LocalHost::new(width, height, ScriptedRandom::default())
        }
    }
}
