pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

use crate::app_core::DataEventHandler;
use crate::commands::executor;
use crate::events::AppCommand;
use crate::state::AppState;
use data_loader::DataLoader;

/// Manages background tasks for loads and submissions
/// Tracks running tasks and provides cancellation support
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a background task
    /// If a task with the same ID already exists, it will be cancelled first
    pub fn spawn_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|_, handle| !handle.is_finished());

        if let Some(handle) = self.tasks.remove(&task_id) {
            handle.abort();
        }

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    pub fn is_running(&self, task_id: &str) -> bool {
        self.tasks
            .get(task_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort one task. Returns whether it was still running.
    pub fn cancel(&mut self, task_id: &str) -> bool {
        match self.tasks.remove(task_id) {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Production handler: commands become tokio tasks
pub struct TaskHandler {
    task_manager: BackgroundTaskManager,
    data_loader: DataLoader,
}

impl TaskHandler {
    pub fn new(data_loader: DataLoader) -> Self {
        Self {
            task_manager: BackgroundTaskManager::new(),
            data_loader,
        }
    }

    pub fn shutdown(&mut self) {
        self.task_manager.cancel_all();
    }
}

impl DataEventHandler for TaskHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        executor::execute_command(command, state, &mut self.task_manager, &self.data_loader);
    }
}
