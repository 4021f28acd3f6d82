use async_trait::async_trait;
use tracing::info;

/// Capability invoked when a claim reaches a terminal verdict. Optional
/// collaborator: the wizard core never depends on one being wired in.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn claim_completed(&self, session_id: &str);
}

/// Default notifier: a structured log line.
pub struct LogNotifier;

#[async_trait]
impl CompletionNotifier for LogNotifier {
    async fn claim_completed(&self, session_id: &str) {
        info!(session_id, "claim adjudication completed");
    }
}
