// src/notify/webhook.rs
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;
use crate::error::PipelineError;

/// Generic JSON webhook sink: posts `{"text": message}` with a bounded
/// timeout and retry budget. The retries here are transport hygiene inside
/// one send; the detection cycle itself never retries a failed alert.
#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<(), PipelineError> {
        let payload = WebhookPayload { text: message };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(PipelineError::notification(format!(
                            "webhook HTTP error: {e}"
                        )));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(PipelineError::notification(format!(
                        "webhook request failed: {e}"
                    )));
                }
            }
        }
    }
}
