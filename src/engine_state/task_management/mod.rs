//! # Task Management System
//!
//! Expensive chunk work (tree placement and the re-upload that follows it) is
//! not done when a chunk spawns. It is published to a FIFO queue and the world
//! drains a bounded number of tasks each tick, spreading the cost over frames.
//!
//! ## Task Lifecycle
//! 1. `World::spawn_chunk` publishes a task via `TaskQueue::publish_task()`
//! 2. `World::process_tasks` pops at most `tasks_per_frame` tasks per tick
//! 3. Each task runs to completion on the calling thread
//!
//! Tasks never interleave and are never cancelled; a task whose chunk is gone
//! by the time it runs does nothing.

pub mod task;

use std::collections::VecDeque;

/// First-in first-out queue of deferred tasks.
#[derive(Debug)]
pub struct TaskQueue<T> {
    queued_tasks: VecDeque<T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        TaskQueue {
            queued_tasks: VecDeque::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to the back of the queue.
    pub fn publish_task(&mut self, task: T) {
        self.queued_tasks.push_back(task);
    }

    /// Removes the oldest task, or returns `None` when the queue is empty.
    pub fn pop_task(&mut self) -> Option<T> {
        self.queued_tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queued_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued_tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_pop_in_publish_order() {
        let mut queue = TaskQueue::new();
        queue.publish_task(1);
        queue.publish_task(2);
        queue.publish_task(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_task(), Some(1));
        assert_eq!(queue.pop_task(), Some(2));
        assert_eq!(queue.pop_task(), Some(3));
        assert_eq!(queue.pop_task(), None);
        assert!(queue.is_empty());
    }
}
