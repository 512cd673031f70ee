use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::foundation::error::{AvatrError, AvatrResult};
use crate::schema::JobRequest;
use crate::worker::CompositionWorker;

/// One-way hand-off of a validated job to the composition worker.
///
/// `invoke_async` returns once the job is accepted, never once it completes.
/// The caller gets its key back before the rendered asset exists; the object
/// at that key becomes available eventually and callers must tolerate that.
#[async_trait]
pub trait JobDispatcher: Send + Sync {
    async fn invoke_async(&self, job: JobRequest) -> AvatrResult<()>;
}

/// Dispatcher backed by a bounded in-process queue.
#[derive(Clone)]
pub struct QueueDispatcher {
    tx: mpsc::Sender<JobRequest>,
}

impl QueueDispatcher {
    /// Create the dispatcher and the receiving end for [`spawn_worker`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobDispatcher for QueueDispatcher {
    async fn invoke_async(&self, job: JobRequest) -> AvatrResult<()> {
        self.tx
            .send(job)
            .await
            .map_err(|_| AvatrError::dispatch("worker queue is closed"))
    }
}

/// Run the composition worker over a job queue until the queue closes.
///
/// Job failures are logged and dropped; nothing retries them and no partial
/// output is left behind (the worker only writes on full success).
pub fn spawn_worker(
    worker: Arc<CompositionWorker>,
    mut rx: mpsc::Receiver<JobRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let key = job.key.clone();
            if let Err(err) = worker.process(&job).await {
                warn!(%key, error = %err, "avatar job failed");
            }
        }
    })
}
