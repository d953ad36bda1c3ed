//! FIFO task queue owned by a single worker task

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::{HistoryError, HistoryResult};

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Serializes critical sections for one store
///
/// Jobs run one at a time, in submission order, on a dedicated worker task.
/// A job that fails or panics does not stop the worker; the next job still
/// runs. Cloning the handle shares the same worker.
#[derive(Clone)]
pub struct SerialQueue {
    label: Arc<str>,
    tx: mpsc::UnboundedSender<Job>,
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("label", &self.label)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl SerialQueue {
    /// Spawn a worker on the current tokio runtime
    pub fn spawn(label: impl Into<Arc<str>>) -> HistoryResult<Self> {
        let handle = Handle::try_current().map_err(|_| HistoryError::NoRuntime)?;
        Ok(Self::spawn_on(&handle, label))
    }

    /// Spawn a worker on a specific runtime
    pub fn spawn_on(handle: &Handle, label: impl Into<Arc<str>>) -> Self {
        let label = label.into();
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run_worker(Arc::clone(&label), rx));
        Self { label, tx }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Submit `task` and get a future for its result
    ///
    /// The task is placed in the queue before this function returns, so its
    /// position is fixed at the call site rather than at first poll. It will
    /// observe the effects of every task submitted earlier.
    pub fn enqueue<T, F, Fut>(
        &self,
        task: F,
    ) -> impl Future<Output = HistoryResult<T>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = HistoryResult<T>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            async move {
                let outcome = task().await;
                // Caller may have dropped its future; the work still counts.
                let _ = done_tx.send(outcome);
            }
            .boxed()
        });

        let submitted = self.tx.send(job).map_err(|_| HistoryError::QueueClosed);

        async move {
            submitted?;
            done_rx.await.map_err(|_| HistoryError::TaskAborted)?
        }
    }

    /// Resolve once every task submitted before this call has finished
    pub fn drained(&self) -> impl Future<Output = HistoryResult<()>> + Send + 'static {
        self.enqueue(|| async { Ok(()) })
    }
}

async fn run_worker(label: Arc<str>, mut rx: mpsc::UnboundedReceiver<Job>) {
    debug!(queue = %label, "history queue started");

    while let Some(job) = rx.recv().await {
        if AssertUnwindSafe(job()).catch_unwind().await.is_err() {
            error!(queue = %label, "queued history task panicked, continuing");
        }
    }

    debug!(queue = %label, "history queue stopped");
}
