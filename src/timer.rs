//! Delayed task scheduling
//!
//! Every animation step and toast lifecycle transition is a delayed task.
//! [`ManualScheduler`] runs them against a virtual clock so lifecycles can
//! be tested without waiting.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Identifies a scheduled task so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(pub u64);

/// Fire-and-forget delayed execution on the page's event loop
pub trait Scheduler: Clone + 'static {
    /// Run `task` once after `delay_ms` milliseconds
    fn schedule(&self, delay_ms: u32, task: impl FnOnce() + 'static) -> TaskHandle;

    /// Drop a pending task; returns false if it already ran or was cancelled
    fn cancel(&self, handle: TaskHandle) -> bool;
}

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct ManualState {
    now: u64,
    next_seq: u64,
    /// Keyed by (due time, scheduling order)
    queue: BTreeMap<(u64, u64), Task>,
    due_by_seq: HashMap<u64, u64>,
}

/// Virtual-clock scheduler; time only moves on [`ManualScheduler::advance`]
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Move the clock forward, running every task that falls due on the way.
    ///
    /// Tasks run in due order, ties in scheduling order. Tasks scheduled by
    /// a running task also run if they fall inside the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let Some((&(due, seq), _)) = state.queue.iter().next() else {
                    break;
                };
                if due > target {
                    break;
                }
                state.now = due;
                state.due_by_seq.remove(&seq);
                state.queue.remove(&(due, seq))
            };

            if let Some(task) = task {
                task();
            }
        }

        self.state.borrow_mut().now = target;
    }

    /// Run everything that is pending, however far in the future
    pub fn run_until_idle(&self) {
        loop {
            let next_due = self.state.borrow().queue.keys().next().map(|&(due, _)| due);
            let Some(due) = next_due else {
                break;
            };
            let now = self.now();
            self.advance(due.saturating_sub(now));
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: impl FnOnce() + 'static) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;

        let due = state.now + u64::from(delay_ms);
        state.queue.insert((due, seq), Box::new(task));
        state.due_by_seq.insert(seq, due);

        TaskHandle(seq)
    }

    fn cancel(&self, handle: TaskHandle) -> bool {
        let mut state = self.state.borrow_mut();
        match state.due_by_seq.remove(&handle.0) {
            Some(due) => state.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }
}
