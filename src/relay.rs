//! Email relay boundary.
//!
//! The contact form does not talk to a mail server; it hands the message to
//! a transactional email relay that fills a stored template and delivers it.
//! This module defines that boundary as the [`EmailRelay`] trait plus one
//! concrete adapter, [`EmailJsRelay`], which speaks the EmailJS REST API:
//!
//! ```text
//! POST {endpoint}
//! {
//!   "service_id": "...",
//!   "template_id": "...",
//!   "user_id": "<public key>",
//!   "template_params": {
//!     "from_name": "...", "from_email": "...",
//!     "message": "...",   "to_name": "..."
//!   }
//! }
//! ```
//!
//! Any 2xx response is a success. Everything else (non-2xx status, transport
//! error, timeout) is a [`RelayError`]. There is no retry, queueing, or
//! offline buffering: one call per submission.

use crate::config::RelayConfig;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Response bodies are only kept for error messages.
const MAX_ERROR_BODY_BYTES: usize = 2 * 1024;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay did not answer within {0}s")]
    Timeout(u64),
    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("relay is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Template fields the relay fills in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_name: String,
}

/// One outward send: which service and template, and the template fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayRequest {
    pub service_id: String,
    pub template_id: String,
    pub template_params: TemplateParams,
}

/// Something that can deliver a contact message.
#[async_trait]
pub trait EmailRelay: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<(), RelayError>;
}

#[derive(Serialize)]
struct EmailJsBody<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST adapter.
pub struct EmailJsRelay {
    client: reqwest::Client,
    endpoint: String,
    public_key: String,
    timeout_secs: u64,
}

impl EmailJsRelay {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        if !config.is_configured() {
            return Err(RelayError::NotConfigured(
                "relay.service_id, relay.template_id and relay.public_key must all be set",
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            public_key: config.public_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl EmailRelay for EmailJsRelay {
    async fn send(&self, request: &RelayRequest) -> Result<(), RelayError> {
        let body = EmailJsBody {
            service_id: &request.service_id,
            template_id: &request.template_id,
            user_id: &self.public_key,
            template_params: &request.template_params,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.map_err(|e| self.classify(e))?;
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body: truncate(&text, MAX_ERROR_BODY_BYTES),
        })
    }
}

impl EmailJsRelay {
    fn classify(&self, err: reqwest::Error) -> RelayError {
        if err.is_timeout() {
            RelayError::Timeout(self.timeout_secs)
        } else {
            RelayError::Transport(err)
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}
