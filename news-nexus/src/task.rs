//! Abortable background tasks.
//!
//! Navigations load their views on spawned tasks. A newer navigation aborts
//! the loads it supersedes through a [`TaskTracker`].

use tokio::task::AbortHandle;

/// Handle to a spawned task.
#[derive(Debug)]
pub struct TaskHandle(AbortHandle);

impl TaskHandle {
    pub fn new(abort_handle: AbortHandle) -> Self {
        Self(abort_handle)
    }

    /// Cancel the task at its next await point.
    pub fn abort(&self) {
        self.0.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

/// Tasks cancelled together, on `abort_all` or when the tracker is dropped.
#[derive(Debug, Default)]
pub struct TaskTracker {
    running: Vec<TaskHandle>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a task, forgetting the ones that already finished.
    pub fn track(&mut self, handle: TaskHandle) {
        self.running.retain(|h| !h.is_finished());
        self.running.push(handle);
    }

    pub fn abort_all(&mut self) {
        self.running.drain(..).for_each(|h| h.abort());
    }
}

impl Drop for TaskTracker {
    fn drop(&mut self) {
        self.abort_all();
    }
}
