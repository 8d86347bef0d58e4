//! A handle to a spawned server/reader task that can be asked to stop and
//! joined, the way `Worker::add_shutdown_handle` collects one per listening
//! interface.

use async_std::task::JoinHandle;
use stop_token::StopSource;

pub struct ShutdownHandle {
    task: JoinHandle<()>,
    stop_source: StopSource,
}

impl ShutdownHandle {
    pub fn new(task: JoinHandle<()>, stop_source: StopSource) -> Self {
        ShutdownHandle { task, stop_source }
    }

    pub async fn graceful_shutdown(self) {
        drop(self.stop_source);
        self.task.await;
    }
}
