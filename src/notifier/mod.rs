pub mod slack;

pub use slack::SlackNotifier;

use crate::model::NotifyError;
use tracing::info;

/// Destination for the finished report.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;
}

/// Writes the report to the log instead of a channel.
pub struct DryRunNotifier;

#[async_trait::async_trait]
impl Notifier for DryRunNotifier {
    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        info!("📝 Dry run, report not sent:\n{}", text);
        Ok(())
    }
}
