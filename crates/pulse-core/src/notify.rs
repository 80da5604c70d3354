use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Best-effort outbound delivery. Implementations may fail; callers go
/// through [`dispatch`], which never surfaces that failure.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, note: &Notification) -> anyhow::Result<()>;
}

/// Used when no delivery endpoint is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _note: &Notification) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Posts the notification as JSON to a relay endpoint (mail gateway,
/// chat hook, whatever the deployment wires up).
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, note: &Notification) -> anyhow::Result<()> {
        let resp = self.client.post(&self.endpoint).json(note).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("notification endpoint returned {}", resp.status());
        }
        Ok(())
    }
}

/// Fire-and-forget: spawns the delivery attempt and returns immediately.
/// Never blocks the caller, never fails it; delivery errors are logged at
/// warn and dropped. Outside a runtime the attempt is skipped entirely.
pub fn dispatch(notifier: Arc<dyn Notifier>, note: Notification) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(to = %note.to, "no runtime available, notification skipped");
        return;
    };
    handle.spawn(async move {
        if let Err(e) = notifier.notify(&note).await {
            tracing::warn!(error = %e, to = %note.to, "notification delivery failed");
        }
    });
}
