//! Shared work store: pending tasks plus the active-task counter.
//!
//! Both live under one mutex. `active` counts tasks that have been enqueued and
//! not yet completed; a task is completed only after its children are enqueued,
//! so `pending.is_empty() && active == 0` can only hold once all work is done.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::errors::PoolError;
use crate::pool::modes::SchedulingMode;
use crate::pool::task::Task;

#[derive(Debug, Default)]
struct StoreState {
    pending: VecDeque<Task>,
    active: usize,
    enqueued_total: usize,
    failure: Option<PoolError>,
}

/// Point-in-time view of the store, taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub pending: usize,
    pub active: usize,
    pub enqueued_total: usize,
    pub aborted: bool,
}

pub struct WorkStore<M> {
    state: Mutex<StoreState>,
    /// Signalled when a task is enqueued, on abort, and on stop.
    available: Condvar,
    /// Signalled when the store drains or the run aborts.
    settled: Condvar,
    mode: M,
}

impl<M: SchedulingMode> WorkStore<M> {
    pub fn new(mode: M) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            available: Condvar::new(),
            settled: Condvar::new(),
            mode,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> &'static str {
        self.mode.mode()
    }

    /// Adds a task, counts it as active, and wakes one waiting worker.
    pub fn enqueue(&self, task: Task) {
        {
            let mut state = self.lock();
            state.pending.push_back(task);
            state.active += 1;
            state.enqueued_total += 1;
        }
        self.available.notify_one();
    }

    /// Blocks until a task is available, returning `None` once the pool is
    /// stopping with nothing pending or the run has aborted.
    pub fn take(&self, running: &AtomicBool) -> Option<Task> {
        let mut state = self.lock();
        loop {
            if state.failure.is_some() {
                return None;
            }
            if let Some(task) = self.mode.take(&mut state.pending) {
                return Some(task);
            }
            if !running.load(Ordering::Acquire) {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks one taken task as fully processed.
    pub fn complete(&self) {
        let drained = {
            let mut state = self.lock();
            state.active = state.active.saturating_sub(1);
            state.active == 0 && state.pending.is_empty()
        };
        if drained {
            self.settled.notify_all();
            self.available.notify_all();
        }
    }

    /// Records a fatal error. Only the first one is kept.
    pub fn abort(&self, error: PoolError) {
        {
            let mut state = self.lock();
            if state.failure.is_none() {
                state.failure = Some(error);
            }
        }
        self.available.notify_all();
        self.settled.notify_all();
    }

    pub fn failure(&self) -> Option<PoolError> {
        self.lock().failure.clone()
    }

    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        state.pending.is_empty() && state.active == 0
    }

    /// Blocks until the store drains, or returns the error that aborted the run.
    pub fn wait_settled(&self) -> Result<(), PoolError> {
        let mut state = self.lock();
        loop {
            if let Some(failure) = &state.failure {
                return Err(failure.clone());
            }
            if state.pending.is_empty() && state.active == 0 {
                return Ok(());
            }
            state = self
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wakes every blocked worker so it can observe a lowered stop flag.
    ///
    /// The lock is taken between the flag store and the notification, so a
    /// worker cannot check the flag and then miss the wake-up.
    pub fn wake_all(&self) {
        drop(self.lock());
        self.available.notify_all();
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock();
        StoreSnapshot {
            pending: state.pending.len(),
            active: state.active,
            enqueued_total: state.enqueued_total,
            aborted: state.failure.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::modes::{BreadthFirst, DepthFirst};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn task(a: f64) -> Task {
        Task {
            a,
            b: a + 1.0,
            tol: 1e-3,
            depth: 0,
        }
    }

    #[test]
    fn drained_only_after_complete() {
        let store = WorkStore::new(DepthFirst);
        let running = AtomicBool::new(true);
        assert!(store.is_drained());

        store.enqueue(task(0.0));
        assert!(!store.is_drained());

        let taken = store.take(&running).unwrap();
        assert_eq!(taken.a, 0.0);
        // Dequeued but still in flight.
        assert!(!store.is_drained());
        assert_eq!(store.snapshot().active, 1);

        store.complete();
        assert!(store.is_drained());
        assert_eq!(store.snapshot().enqueued_total, 1);
    }

    #[test]
    fn children_keep_the_store_busy() {
        let store = WorkStore::new(BreadthFirst);
        let running = AtomicBool::new(true);
        store.enqueue(task(0.0));
        let _parent = store.take(&running).unwrap();
        store.enqueue(task(0.0));
        store.enqueue(task(0.5));
        store.complete();
        assert!(!store.is_drained());
        assert_eq!(store.snapshot().active, 2);
    }

    #[test]
    fn take_returns_none_when_stopped() {
        let store = Arc::new(WorkStore::new(DepthFirst));
        let running = Arc::new(AtomicBool::new(true));

        let waiter = {
            let store = Arc::clone(&store);
            let running = Arc::clone(&running);
            thread::spawn(move || store.take(&running))
        };

        thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Release);
        store.wake_all();
        assert!(waiter.join().unwrap().is_none());
    }

    #[test]
    fn abort_wakes_the_driver_and_keeps_first_error() {
        let store = Arc::new(WorkStore::new(DepthFirst));
        let running = AtomicBool::new(true);
        store.enqueue(task(0.0));
        let _in_flight = store.take(&running).unwrap();

        let driver = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.wait_settled())
        };

        store.abort(PoolError::JoinError { worker: 1 });
        store.abort(PoolError::JoinError { worker: 2 });
        assert_eq!(
            driver.join().unwrap(),
            Err(PoolError::JoinError { worker: 1 })
        );
        assert!(store.take(&running).is_none());
    }
}
