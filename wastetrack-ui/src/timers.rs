//! Browser scheduler backed by `setTimeout`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wastetrack::{Scheduler, TaskHandle};

/// Scheduler running tasks on the page's event loop
#[derive(Clone, Default)]
pub struct BrowserScheduler {
    pending: Rc<RefCell<HashMap<u64, Timeout>>>,
    next_id: Rc<Cell<u64>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: impl FnOnce() + 'static) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let pending = Rc::clone(&self.pending);
        let timeout = Timeout::new(delay_ms, move || {
            // wasm-bindgen defers freeing a closure dropped during its own call
            let _fired = pending.borrow_mut().remove(&id);
            task();
        });
        self.pending.borrow_mut().insert(id, timeout);

        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) -> bool {
        // Dropping a gloo Timeout clears it
        self.pending.borrow_mut().remove(&handle.0).is_some()
    }
}
