// notifier/slack.rs

use crate::config::SlackConfig;
use crate::model::NotifyError;
use crate::notifier::Notifier;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Body of a `chat.postMessage` call.
#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    mrkdwn: bool,
}

#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    error: Option<String>,
}

pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn post_message_url(&self) -> String {
        format!("{}/chat.postMessage", self.config.api_url.trim_end_matches('/'))
    }

    fn payload<'a>(&'a self, text: &'a str) -> PostMessage<'a> {
        PostMessage {
            channel: &self.config.channel,
            text,
            mrkdwn: true,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    /// Posts the report once; failures are returned, never retried.
    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        info!("📤 Sending report to {} ({} chars)", self.config.channel, text.chars().count());

        let response = self
            .client
            .post(self.post_message_url())
            .bearer_auth(&self.config.token)
            .json(&self.payload(text))
            .send()
            .await
            .map_err(|e| {
                warn!("❌ Slack send() failed: {:?}", e);
                NotifyError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("❌ Slack API responded [{}]: {}", status, body);
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SlackApiResponse = response.json().await?;
        check_response(body)?;
        info!("✅ Report delivered [{}]", status);
        Ok(())
    }
}

/// Slack reports most failures as HTTP 200 with `"ok": false`.
fn check_response(body: SlackApiResponse) -> Result<(), NotifyError> {
    if body.ok {
        Ok(())
    } else {
        Err(NotifyError::Rejected(body.error.unwrap_or_else(|| "unknown_error".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notifier() -> SlackNotifier {
        SlackNotifier::new(SlackConfig {
            token: "xoxb-test".into(),
            channel: "#alerts".into(),
            api_url: "https://slack.example/api/".into(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn payload_enables_mrkdwn_for_the_channel() {
        let notifier = notifier();
        let payload = serde_json::to_value(notifier.payload("*bold*")).unwrap();
        assert_eq!(payload, json!({ "channel": "#alerts", "text": "*bold*", "mrkdwn": true }));
        assert_eq!(notifier.post_message_url(), "https://slack.example/api/chat.postMessage");
    }

    #[test]
    fn ok_false_is_a_rejection() {
        let body: SlackApiResponse =
            serde_json::from_value(json!({ "ok": false, "error": "channel_not_found" })).unwrap();
        match check_response(body) {
            Err(NotifyError::Rejected(reason)) => assert_eq!(reason, "channel_not_found"),
            other => panic!("unexpected result: {:?}", other),
        }

        let body: SlackApiResponse = serde_json::from_value(json!({ "ok": true, "ts": "1.2" })).unwrap();
        assert!(check_response(body).is_ok());
    }
}
