/// Named timer registry for one session.
///
/// Holds at most one handle per `TimerId`. Starting a name that is already
/// live cancels the old instance first, so a callback chain can never be
/// duplicated. A fired callback whose handle is not the registered one is
/// stale and must be dropped by the caller.

use std::collections::BTreeMap;

use log::trace;

use super::services::{Fired, TimerHandle, TimerId, TimerMode, TimerService};

#[derive(Debug, Default)]
pub struct SessionTimers {
    active: BTreeMap<TimerId, TimerHandle>,
}

impl SessionTimers {
    pub fn new() -> Self {
        SessionTimers { active: BTreeMap::new() }
    }

    pub fn start<T: TimerService + ?Sized>(
        &mut self,
        svc: &mut T,
        id: TimerId,
        interval_ticks: u32,
        mode: TimerMode,
    ) -> TimerHandle {
        self.cancel(svc, id);
        let handle = svc.start_timer(interval_ticks.max(1), mode, id);
        trace!("timer {:?} started as {:?} ({} ticks, {:?})", id, handle, interval_ticks, mode);
        self.active.insert(id, handle);
        handle
    }

    pub fn cancel<T: TimerService + ?Sized>(&mut self, svc: &mut T, id: TimerId) {
        if let Some(handle) = self.active.remove(&id) {
            svc.cancel_timer(handle);
            trace!("timer {:?} cancelled ({:?})", id, handle);
        }
    }

    pub fn cancel_all<T: TimerService + ?Sized>(&mut self, svc: &mut T) {
        for (_, handle) in std::mem::take(&mut self.active) {
            svc.cancel_timer(handle);
        }
    }

    /// Accept a delivered callback. Returns false for stale ones.
    /// One-shot timers are forgotten once accepted.
    pub fn accept(&mut self, fired: &Fired) -> bool {
        if self.active.get(&fired.id) != Some(&fired.handle) {
            return false;
        }
        if fired.mode == TimerMode::Once {
            self.active.remove(&fired.id);
        }
        true
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.active.contains_key(&id)
    }

    #[cfg(test)]
    pub fn handle(&self, id: TimerId) -> Option<TimerHandle> {
        self.active.get(&id).copied()
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scheduler::TickScheduler;

    #[test]
    fn restart_keeps_single_instance() {
        let mut sched = TickScheduler::new();
        let mut timers = SessionTimers::new();

        let first = timers.start(&mut sched, TimerId::Spawn, 20, TimerMode::Repeat);
        let second = timers.start(&mut sched, TimerId::Spawn, 20, TimerMode::Repeat);

        assert_ne!(first, second);
        assert_eq!(timers.active_count(), 1);
        assert_eq!(timers.handle(TimerId::Spawn), Some(second));
        assert!(!sched.is_live(first));
        assert!(sched.is_live(second));
        assert_eq!(sched.live_count(), 1);
    }

    #[test]
    fn stale_callback_rejected() {
        let mut sched = TickScheduler::new();
        let mut timers = SessionTimers::new();
        let old = timers.start(&mut sched, TimerId::Debuff, 5, TimerMode::Once);
        timers.start(&mut sched, TimerId::Debuff, 5, TimerMode::Once);

        let stale = Fired { handle: old, id: TimerId::Debuff, mode: TimerMode::Once };
        assert!(!timers.accept(&stale));
        assert!(timers.is_active(TimerId::Debuff));
    }

    #[test]
    fn once_timer_forgotten_after_accept() {
        let mut sched = TickScheduler::new();
        let mut timers = SessionTimers::new();
        let h = timers.start(&mut sched, TimerId::Countdown, 3, TimerMode::Once);
        let fired = Fired { handle: h, id: TimerId::Countdown, mode: TimerMode::Once };
        assert!(timers.accept(&fired));
        assert!(!timers.is_active(TimerId::Countdown));
        // A second delivery of the same handle is stale.
        assert!(!timers.accept(&fired));
    }

    #[test]
    fn cancel_all_empties_registry_and_scheduler() {
        let mut sched = TickScheduler::new();
        let mut timers = SessionTimers::new();
        timers.start(&mut sched, TimerId::Spawn, 20, TimerMode::Repeat);
        timers.start(&mut sched, TimerId::Countdown, 1800, TimerMode::Once);
        timers.start(&mut sched, TimerId::Debuff, 90, TimerMode::Once);

        timers.cancel_all(&mut sched);
        assert_eq!(timers.active_count(), 0);
        assert_eq!(sched.live_count(), 0);
    }
}
