//! Scheduling modes for the quadrature pool.
//!
//! A mode decides which pending task a worker takes next. No result depends on
//! the order, but it changes how the task graph is explored: depth-first keeps
//! the store small, breadth-first spreads shallow work across workers sooner.

use std::collections::VecDeque;

use super::task::Task;

/// A trait representing a task scheduling mode.
///
/// Tasks are always appended to the back of the pending deque; a mode only
/// chooses the end they are taken from.
pub trait SchedulingMode: Send + Sync + 'static {
    /// Returns the name of the scheduling mode.
    fn mode(&self) -> &'static str;

    /// Removes the next task to process.
    fn take(&self, pending: &mut VecDeque<Task>) -> Option<Task>;
}

/// Last in, first out: children are processed before their siblings' subtrees.
pub struct DepthFirst;

impl SchedulingMode for DepthFirst {
    fn mode(&self) -> &'static str {
        "DepthFirst"
    }

    fn take(&self, pending: &mut VecDeque<Task>) -> Option<Task> {
        pending.pop_back()
    }
}

/// First in, first out: the task graph is explored level by level.
pub struct BreadthFirst;

impl SchedulingMode for BreadthFirst {
    fn mode(&self) -> &'static str {
        "BreadthFirst"
    }

    fn take(&self, pending: &mut VecDeque<Task>) -> Option<Task> {
        pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> VecDeque<Task> {
        [0.0, 1.0, 2.0]
            .into_iter()
            .map(|a| Task {
                a,
                b: a + 1.0,
                tol: 1e-3,
                depth: 0,
            })
            .collect()
    }

    #[test]
    fn depth_first_takes_newest() {
        let mut queue = pending();
        assert_eq!(DepthFirst.take(&mut queue).map(|t| t.a), Some(2.0));
    }

    #[test]
    fn breadth_first_takes_oldest() {
        let mut queue = pending();
        assert_eq!(BreadthFirst.take(&mut queue).map(|t| t.a), Some(0.0));
    }
}
