//! Cooperative periodic task scheduler
//!
//! An append-only table of tasks, each with a repeat interval, an optional
//! identifier, and a callback. [`Scheduler::tick`] is called from the host
//! run loop as often as possible; a task fires when strictly more than its
//! interval has elapsed since it last fired, measured wrap-safe on the
//! 32-bit millisecond counter. There are no threads and no preemption —
//! a callback runs to completion on the loop thread, and long passes
//! yield to the host between fired tasks.
//!
//! Scheduling drifts rather than catching up: the fire stamp is taken
//! *after* the callback returns, so a slow callback pushes every later
//! firing out. Missed periods are never replayed. For telemetry work the
//! freshest sample matters and a burst of catch-up firings would not.
//!
//! Tasks are never removed. A disabled task (interval zero) stays in its
//! slot and can be revived with [`Scheduler::reschedule_with`]. When two
//! tasks share an identifier, by-id operations address the most recently
//! registered one.
//!
//! Callbacks receive the scheduler itself plus a caller-supplied context
//! value `C`, so a task can reschedule its peers and touch the application
//! state without globals.

use alloc::boxed::Box;
use heapless::Vec;

use crate::{
    errors::{SchedulerError, SchedulerResult},
    time::{wrap_safe_elapsed, TimeSource, Timestamp},
    traits::YieldNow,
};

/// Maximum number of registered tasks.
pub const MAX_TASKS: usize = 32;

/// Task callback: gets the scheduler (to reschedule, disable, or register
/// tasks) and the application context.
pub type Callback<C> = Box<dyn FnMut(&mut Scheduler<C>, &mut C)>;

/// One scheduled task. Created by [`Scheduler::register`], never removed.
pub struct Task<C> {
    interval: u32,
    last_fired: Timestamp,
    id: Option<&'static str>,
    /// Taken out for the duration of a callback so the callback can borrow
    /// the scheduler; `None` only transiently.
    callback: Option<Callback<C>>,
}

impl<C> Task<C> {
    /// Repeat interval in milliseconds; zero means disabled.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Identifier, if the task was registered with one.
    pub fn id(&self) -> Option<&'static str> {
        self.id
    }

    /// Counter value at the last firing (or at registration).
    pub fn last_fired(&self) -> Timestamp {
        self.last_fired
    }

    /// `false` when the interval is zero.
    pub fn is_active(&self) -> bool {
        self.interval != 0
    }

    /// Wrap-safe milliseconds since this task last fired.
    pub fn elapsed(&self, clock: &dyn TimeSource) -> u32 {
        wrap_safe_elapsed(self.last_fired, clock.now())
    }
}

/// Append-only cooperative scheduler over context type `C`.
///
/// ```
/// use stratus_core::{Scheduler, time::MockClock};
///
/// struct App {
///     samples: u32,
/// }
///
/// let clock = MockClock::new(0);
/// let mut app = App { samples: 0 };
/// let mut scheduler: Scheduler<App> = Scheduler::new();
///
/// scheduler
///     .register(5_000, Some("sample"), &clock, |_, app| app.samples += 1)
///     .unwrap();
///
/// clock.advance(5_001);
/// scheduler.tick(&clock, &mut app);
/// assert_eq!(app.samples, 1);
/// ```
pub struct Scheduler<C> {
    tasks: Vec<Task<C>, MAX_TASKS>,
    yield_hook: Option<Box<dyn YieldNow>>,
}

impl<C> Scheduler<C> {
    /// Empty scheduler.
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            yield_hook: None,
        }
    }

    /// Install a cooperative yield hook, called after each fired task
    /// during a tick pass.
    pub fn set_yield_hook(&mut self, hook: Box<dyn YieldNow>) {
        self.yield_hook = Some(hook);
    }

    /// Register a task. The first firing happens one full interval after
    /// registration. An interval of zero registers the task disabled.
    ///
    /// Identifiers are not checked for uniqueness; a duplicate shadows the
    /// older task for by-id operations only.
    pub fn register(
        &mut self,
        interval: u32,
        id: Option<&'static str>,
        clock: &dyn TimeSource,
        callback: impl FnMut(&mut Scheduler<C>, &mut C) + 'static,
    ) -> SchedulerResult<()> {
        let task = Task {
            interval,
            last_fired: clock.now(),
            id,
            callback: Some(Box::new(callback)),
        };
        self.tasks.push(task).map_err(|_| SchedulerError::TableFull)
    }

    /// Register a task and run its callback once immediately, for work
    /// that must not wait a full interval after boot. The immediate run
    /// does not re-stamp the fire time.
    pub fn register_cold(
        &mut self,
        interval: u32,
        id: Option<&'static str>,
        clock: &dyn TimeSource,
        ctx: &mut C,
        callback: impl FnMut(&mut Scheduler<C>, &mut C) + 'static,
    ) -> SchedulerResult<()> {
        self.register(interval, id, clock, callback)?;
        let index = self.tasks.len() - 1;
        self.invoke(index, ctx);
        Ok(())
    }

    /// Number of registered tasks, disabled ones included.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one pass: fire every due task, newest registration first.
    ///
    /// The clock is re-read for each task, and again after each callback
    /// for the fire stamp, so one slow callback does not make every later
    /// task in the pass look overdue by the same amount. Tasks registered
    /// by a callback during the pass are not visited until the next pass.
    pub fn tick(&mut self, clock: &dyn TimeSource, ctx: &mut C) {
        let snapshot = self.tasks.len();
        for index in (0..snapshot).rev() {
            let task = &self.tasks[index];
            if task.interval == 0 {
                continue;
            }
            let now = clock.now();
            if wrap_safe_elapsed(task.last_fired, now) <= task.interval {
                continue;
            }

            #[cfg(feature = "log")]
            log::trace!("scheduler: firing {:?}", self.tasks[index].id);

            self.invoke(index, ctx);
            // Stamp after the callback: slow work delays the next firing
            // instead of shortening it.
            self.tasks[index].last_fired = clock.now();
            self.breathe();
        }
    }

    /// Look up a task by identifier, most recently registered first.
    pub fn find(&self, id: &str) -> Option<&Task<C>> {
        self.index_of(id).map(|index| &self.tasks[index])
    }

    /// Wrap-safe milliseconds since the task last fired, or `0` for an
    /// unknown identifier.
    pub fn elapsed_since(&self, id: &str, clock: &dyn TimeSource) -> u32 {
        self.find(id).map(|task| task.elapsed(clock)).unwrap_or(0)
    }

    /// Restart the task's period from now without firing it. Unknown
    /// identifiers are ignored.
    pub fn reschedule(&mut self, id: &str, clock: &dyn TimeSource) {
        if let Some(index) = self.index_of(id) {
            self.tasks[index].last_fired = clock.now();
        }
    }

    /// Change the task's interval and restart its period from now. Also
    /// revives a disabled task when `interval` is nonzero.
    pub fn reschedule_with(&mut self, id: &str, interval: u32, clock: &dyn TimeSource) {
        if let Some(index) = self.index_of(id) {
            let task = &mut self.tasks[index];
            task.interval = interval;
            task.last_fired = clock.now();
        }
    }

    /// Stop the task from firing by zeroing its interval. The slot stays.
    pub fn disable(&mut self, id: &str) {
        if let Some(index) = self.index_of(id) {
            self.tasks[index].interval = 0;
        }
    }

    /// `true` when the task exists and has a nonzero interval.
    pub fn is_active(&self, id: &str) -> bool {
        self.find(id).map(Task::is_active).unwrap_or(false)
    }

    /// Most-recently-registered match. Duplicates shadow older tasks.
    fn index_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().rposition(|t| t.id == Some(id))
    }

    /// Take the callback out of its slot, run it against the scheduler
    /// and context, and put it back. A re-entrant tick sees the empty
    /// slot and skips the task.
    fn invoke(&mut self, index: usize, ctx: &mut C) {
        let Some(mut callback) = self.tasks[index].callback.take() else {
            return;
        };
        callback(self, ctx);
        self.tasks[index].callback = Some(callback);
    }

    fn breathe(&mut self) {
        if let Some(hook) = self.yield_hook.as_mut() {
            hook.yield_now();
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}
