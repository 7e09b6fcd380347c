use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::db::log_service::LogStore;
use crate::db::model::PredictionLogEntry;

/// Hands prediction log entries to a fixed pool of workers over a bounded
/// queue. `dispatch` never blocks the caller; all store inserts are
/// serialized behind one lock, so write order is lock-acquisition order.
pub struct LogDispatcher {
    sender: mpsc::Sender<PredictionLogEntry>,
    workers: Vec<JoinHandle<()>>,
}

impl LogDispatcher {
    pub fn start<S>(store: S, workers: usize, queue_capacity: usize) -> Self
    where
        S: LogStore + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let store = Arc::new(Mutex::new(store));

        let workers = (0..workers.max(1))
            .map(|worker_id| {
                let receiver = Arc::clone(&receiver);
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    loop {
                        let entry = { receiver.lock().await.recv().await };
                        let Some(entry) = entry else {
                            debug!("Log worker {} shutting down", worker_id);
                            break;
                        };
                        let store = store.lock().await;
                        match store.insert_entry(&entry).await {
                            Ok(id) => info!("{} - prediction logged successfully", id),
                            Err(e) => {
                                error!("Failed to log prediction {}: {}", entry.id, e)
                            }
                        }
                    }
                })
            })
            .collect();

        Self { sender, workers }
    }

    /// Queues the entry and returns immediately. A full queue drops the
    /// entry rather than blocking the interactive path.
    pub fn dispatch(&self, entry: PredictionLogEntry) {
        match self.sender.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                warn!(
                    "Log queue full, dropping prediction {} ({})",
                    entry.id, entry.label
                );
            }
            Err(TrySendError::Closed(entry)) => {
                error!(
                    "Log workers are gone, dropping prediction {} ({})",
                    entry.id, entry.label
                );
            }
        }
    }

    /// Closes the queue and waits for the workers to drain it.
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}
