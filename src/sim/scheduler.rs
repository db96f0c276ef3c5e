/// Tick-based timer service.
///
/// The host calls `tick()` once per frame tick, then `fire()` for each
/// returned handle in order, dispatching every `Some` result to the
/// session before firing the next. A callback that cancels another timer
/// due on the same tick therefore suppresses it: `fire()` re-checks
/// liveness at dispatch time.
///
/// Ordering: due tick first, then start order. A repeating timer
/// re-arms itself on `tick()`; a one-shot timer is retired on `fire()`.

use super::services::{Fired, TimerHandle, TimerId, TimerMode, TimerService};

#[derive(Clone, Debug)]
struct Entry {
    handle: TimerHandle,
    id: TimerId,
    mode: TimerMode,
    interval: u32,
    due: u64,
}

#[derive(Debug)]
pub struct TickScheduler {
    entries: Vec<Entry>,
    now: u64,
    next_handle: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        TickScheduler { entries: Vec::new(), now: 0, next_handle: 1 }
    }

    /// Current tick count.
    #[cfg(test)]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance the clock one tick and collect the handles that are due.
    pub fn tick(&mut self) -> Vec<TimerHandle> {
        self.now += 1;
        let now = self.now;

        let mut due: Vec<(u64, TimerHandle)> = Vec::new();
        for entry in self.entries.iter_mut() {
            if entry.due <= now {
                due.push((entry.due, entry.handle));
                if entry.mode == TimerMode::Repeat {
                    entry.due = now + entry.interval as u64;
                }
            }
        }
        due.sort();
        due.into_iter().map(|(_, h)| h).collect()
    }

    /// Deliver one due handle. `None` if it was cancelled meanwhile.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<Fired> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        let entry = &self.entries[idx];
        let fired = Fired { handle, id: entry.id, mode: entry.mode };
        if entry.mode == TimerMode::Once {
            self.entries.remove(idx);
        }
        Some(fired)
    }

    #[cfg(test)]
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of live timers carrying `id`.
    #[cfg(test)]
    pub fn live_with_id(&self, id: TimerId) -> usize {
        self.entries.iter().filter(|e| e.id == id).count()
    }
}

impl TimerService for TickScheduler {
    fn start_timer(&mut self, interval_ticks: u32, mode: TimerMode, id: TimerId) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let interval = interval_ticks.max(1);
        self.entries.push(Entry {
            handle,
            id,
            mode,
            interval,
            due: self.now + interval as u64,
        });
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }
}
