use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{AuditConfig, AUDIT_STDERR_SINK, AUDIT_STDOUT_SINK};

use super::event::AuditEvent;

#[derive(Clone)]
pub struct AuditTx {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
    drop_when_full: bool,
}

impl AuditTx {
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub async fn send_event(&self, event: &AuditEvent) {
        match serde_json::to_string(event) {
            Ok(line) => self.send_line(line).await,
            Err(e) => tracing::warn!(
                target: "s3lens.audit",
                error = %e,
                "failed to serialize audit event"
            ),
        }
    }

    pub async fn send_line(&self, line: String) {
        if self.drop_when_full {
            if self.tx.try_send(line).is_err() {
                let count = self.dropped.fetch_add(1, Ordering::Relaxed);
                // Log every 100 dropped events to avoid log spam
                if count % 100 == 0 {
                    tracing::warn!(
                        target: "s3lens.audit",
                        dropped_total = count + 1,
                        "audit channel full, events are being dropped"
                    );
                }
            }
        } else if self.tx.send(line).await.is_err() {
            tracing::debug!(target: "s3lens.audit", "audit writer closed, send failed");
        }
    }
}

/// Owns the background writer task. Dropping every `AuditTx` clone and then
/// awaiting `shutdown` guarantees all accepted events reached the sink.
pub struct AuditWriter {
    tx: AuditTx,
    task: JoinHandle<()>,
}

impl AuditWriter {
    pub fn sender(&self) -> AuditTx {
        self.tx.clone()
    }

    /// Returns how many events were dropped because the channel was full.
    pub async fn shutdown(self) -> u64 {
        let AuditWriter { tx, task } = self;
        let dropped = tx.dropped_count();
        drop(tx);
        if let Err(e) = task.await {
            tracing::error!(target: "s3lens.audit", error = %e, "audit writer task failed");
        }
        if dropped > 0 {
            tracing::warn!(
                target: "s3lens.audit",
                dropped,
                "audit trail is incomplete, events were dropped while the channel was full"
            );
        }
        dropped
    }
}

pub async fn start_audit(cfg: &AuditConfig) -> std::io::Result<Option<AuditWriter>> {
    if !cfg.enabled {
        tracing::debug!(target: "s3lens.audit", "audit trail disabled in config");
        return Ok(None);
    }
    if cfg.path.trim().is_empty() {
        tracing::warn!(
            target: "s3lens.audit",
            "audit path is empty in config, no audit events will be written"
        );
        return Ok(None);
    }

    let mut writer: Box<dyn tokio::io::AsyncWrite + Unpin + Send> = match cfg.path.as_str() {
        AUDIT_STDOUT_SINK => Box::new(tokio::io::stdout()),
        AUDIT_STDERR_SINK => Box::new(tokio::io::stderr()),
        path => {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            let file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            Box::new(file)
        }
    };

    tracing::info!(
        target: "s3lens.audit",
        path = %cfg.path,
        channel_capacity = cfg.channel_capacity,
        drop_when_full = cfg.drop_when_full,
        "audit writer started"
    );

    let (tx, mut rx) = mpsc::channel::<String>(cfg.channel_capacity);
    let unbuffered_sink = cfg.path == AUDIT_STDOUT_SINK || cfg.path == AUDIT_STDERR_SINK;

    let task = tokio::spawn(async move {
        let mut write_count = 0usize;
        while let Some(mut line) = rx.recv().await {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            if writer.write_all(line.as_bytes()).await.is_err() {
                tracing::error!(
                    target: "s3lens.audit",
                    "failed to write audit event, writer task exiting"
                );
                return;
            }
            write_count += 1;
            if (write_count % 10 == 0 || unbuffered_sink) && writer.flush().await.is_err() {
                tracing::error!(target: "s3lens.audit", "failed to flush audit sink");
                return;
            }
        }
        let _ = writer.flush().await;
    });

    Ok(Some(AuditWriter {
        tx: AuditTx {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            drop_when_full: cfg.drop_when_full,
        },
        task,
    }))
}
