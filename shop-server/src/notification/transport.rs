//! WhatsApp transports
//!
//! Each provider is one enum variant. `send` never returns an error: every
//! failure is logged and reported as `false`.

use serde_json::json;
use std::time::Duration;

/// HTTP timeout applied to every provider request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Selected WhatsApp provider
#[derive(Debug, Clone)]
pub enum WhatsAppTransport {
    /// Nothing is sent; every send fails
    Disabled,
    /// Messages are written to the log only (development)
    LoggingOnly,
    /// Meta WhatsApp Cloud API
    MetaCloud { api_url: String, access_token: String },
    /// Twilio WhatsApp messaging
    Twilio {
        api_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String,
    },
    /// Any endpoint accepting `{phone, message, token}`
    Generic { api_url: String, token: String },
}

impl WhatsAppTransport {
    pub fn name(&self) -> &'static str {
        match self {
            WhatsAppTransport::Disabled => "disabled",
            WhatsAppTransport::LoggingOnly => "logging",
            WhatsAppTransport::MetaCloud { .. } => "meta",
            WhatsAppTransport::Twilio { .. } => "twilio",
            WhatsAppTransport::Generic { .. } => "generic",
        }
    }

    /// Deliver `text` to `recipient`; `true` on success
    pub async fn send(&self, client: &reqwest::Client, recipient: &str, text: &str) -> bool {
        match self {
            WhatsAppTransport::Disabled => {
                tracing::debug!(to = %recipient, "WhatsApp disabled, message dropped");
                false
            }
            WhatsAppTransport::LoggingOnly => {
                tracing::info!(to = %recipient, message = %text, "WhatsApp message (logging only)");
                true
            }
            WhatsAppTransport::MetaCloud {
                api_url,
                access_token,
            } => {
                let payload = json!({
                    "messaging_product": "whatsapp",
                    "to": recipient.replace('+', ""),
                    "text": { "body": text },
                });
                let request = client.post(api_url).bearer_auth(access_token).json(&payload);
                deliver(self.name(), recipient, request, &[200, 201]).await
            }
            WhatsAppTransport::Twilio {
                api_url,
                account_sid,
                auth_token,
                from_number,
            } => {
                let form = [
                    ("From", format!("whatsapp:{from_number}")),
                    ("To", format!("whatsapp:{recipient}")),
                    ("Body", text.to_string()),
                ];
                let request = client
                    .post(api_url)
                    .basic_auth(account_sid, Some(auth_token))
                    .form(&form);
                deliver(self.name(), recipient, request, &[200, 201]).await
            }
            WhatsAppTransport::Generic { api_url, token } => {
                let payload = json!({
                    "phone": recipient,
                    "message": text,
                    "token": token,
                });
                let request = client.post(api_url).json(&payload);
                deliver(self.name(), recipient, request, &[200]).await
            }
        }
    }
}

async fn deliver(
    provider: &'static str,
    recipient: &str,
    request: reqwest::RequestBuilder,
    accepted: &[u16],
) -> bool {
    match request.send().await {
        Ok(resp) if accepted.contains(&resp.status().as_u16()) => {
            tracing::info!(provider, to = %recipient, "WhatsApp message sent");
            true
        }
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(provider, to = %recipient, status = %status, body = %body, "WhatsApp provider rejected message");
            false
        }
        Err(e) => {
            tracing::error!(provider, to = %recipient, error = %e, "WhatsApp request failed");
            false
        }
    }
}

/// Shared HTTP client for provider calls
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build WhatsApp HTTP client, using defaults");
            reqwest::Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_always_fails() {
        let client = http_client();
        assert!(!WhatsAppTransport::Disabled.send(&client, "+1", "hi").await);
    }

    #[tokio::test]
    async fn test_logging_only_always_succeeds() {
        let client = http_client();
        assert!(WhatsAppTransport::LoggingOnly.send(&client, "+1", "hi").await);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_false() {
        let client = http_client();
        let transport = WhatsAppTransport::Generic {
            // nothing listens on port 9 locally
            api_url: "http://127.0.0.1:9/send".into(),
            token: "t".into(),
        };
        assert!(!transport.send(&client, "+1", "hi").await);
    }
}
