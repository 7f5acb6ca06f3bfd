use shared_types::CartItem;
use std::sync::Arc;
use storage_backend::KeyValueStorage;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace, warn};

type Snapshot = Arc<Vec<CartItem>>;

enum Command {
    Write(Snapshot),
    Flush(oneshot::Sender<()>),
}

/// Background writer for cart snapshots.
///
/// One storage write is in flight at a time and writes land in issue order.
/// Snapshots queued behind a running write are coalesced so only the newest
/// one is written. Failed writes are logged and dropped.
pub(crate) struct Persister {
    tx: mpsc::UnboundedSender<Command>,
}

impl Persister {
    /// Spawn the writer task on the current tokio runtime.
    pub(crate) fn spawn(storage: Arc<dyn KeyValueStorage>, key: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(storage, key, rx));
        Self { tx }
    }

    /// Queue `items` for writing without waiting for the write.
    pub(crate) fn persist(&self, items: Snapshot) {
        if self.tx.send(Command::Write(items)).is_err() {
            warn!("Cart writer stopped; dropping snapshot");
        }
    }

    /// Wait until every snapshot queued before this call has been written.
    pub(crate) async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Flush(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }
}

async fn run(
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        let mut batch = Batch::default();
        batch.absorb(command);
        while let Ok(command) = rx.try_recv() {
            batch.absorb(command);
        }

        if batch.skipped > 0 {
            trace!(skipped = batch.skipped, "Coalesced cart snapshots");
        }
        if let Some(items) = batch.latest {
            write(storage.as_ref(), &key, &items).await;
        }
        for ack in batch.acks {
            let _ = ack.send(());
        }
    }

    debug!(key = %key, "Cart writer stopped");
}

#[derive(Default)]
struct Batch {
    latest: Option<Snapshot>,
    acks: Vec<oneshot::Sender<()>>,
    skipped: usize,
}

impl Batch {
    fn absorb(&mut self, command: Command) {
        match command {
            Command::Write(items) => {
                if self.latest.replace(items).is_some() {
                    self.skipped += 1;
                }
            }
            Command::Flush(ack) => self.acks.push(ack),
        }
    }
}

async fn write(storage: &dyn KeyValueStorage, key: &str, items: &[CartItem]) {
    let blob = match serde_json::to_string(items) {
        Ok(blob) => blob,
        Err(e) => {
            error!(key, error = %e, "Failed to serialize cart");
            return;
        }
    };

    match storage.set(key, &blob).await {
        Ok(()) => debug!(key, items = items.len(), "Persisted cart"),
        Err(e) => error!(key, error = %e, "Failed to persist cart"),
    }
}
