//! Contact form submission.
//!
//! [`MessageSubmitter`] owns the submission status and makes exactly one
//! relay call per accepted submit:
//!
//! ```text
//!   Idle ──submit──▶ Sending ──relay ok──▶ Succeeded ──acknowledge──▶ Idle
//!                       │
//!                       └────relay err───▶ Failed ─────acknowledge──▶ Idle
//! ```
//!
//! A terminal status may also be submitted from directly (the user retries
//! after a failure). While `Sending`, further submits are refused without
//! touching the relay, which is what disabling the submit button does in the
//! browser. A submit that is cancelled mid-send returns to `Idle`.
//!
//! [`ContactForm`] is the form boundary: it owns the field values, checks
//! they are filled in, and resets them after a successful send only, so a
//! failed message can be resent without retyping.

use crate::config::RelayConfig;
use crate::relay::{EmailRelay, RelayRequest, TemplateParams};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown to the visitor after a successful send.
pub const SUCCESS_NOTICE: &str = "Thank you for your message! I will get back to you soon.";
/// Shown to the visitor after a failed send.
pub const FAILURE_NOTICE: &str = "Sorry, there was an error sending your message. Please try again.";

#[derive(Error, Debug, PartialEq)]
pub enum SubmitError {
    #[error("a message is already being sent")]
    AlreadySending,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not an email address")]
    InvalidEmail(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// All fields filled in (ignoring surrounding whitespace) and the email
    /// looks like `local@domain`.
    pub fn validate(&self) -> Result<(), SubmitError> {
        for (label, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(SubmitError::MissingField(label));
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(SubmitError::InvalidEmail(email.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Succeeded | SubmissionStatus::Failed)
    }

    /// Visitor-facing notice for a terminal status.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            SubmissionStatus::Succeeded => Some(SUCCESS_NOTICE),
            SubmissionStatus::Failed => Some(FAILURE_NOTICE),
            _ => None,
        }
    }
}

/// Relay identifiers that do not change between submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayTarget {
    pub service_id: String,
    pub template_id: String,
    pub to_name: String,
}

impl From<&RelayConfig> for RelayTarget {
    fn from(config: &RelayConfig) -> Self {
        Self {
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            to_name: config.to_name.clone(),
        }
    }
}

pub struct MessageSubmitter<R> {
    relay: R,
    target: RelayTarget,
    status: Mutex<SubmissionStatus>,
    last_error: Mutex<Option<String>>,
}

impl<R: EmailRelay> MessageSubmitter<R> {
    pub fn new(relay: R, target: RelayTarget) -> Self {
        Self {
            relay,
            target,
            status: Mutex::new(SubmissionStatus::Idle),
            last_error: Mutex::new(None),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        *lock(&self.status)
    }

    /// Detail of the most recent relay failure, for logs and `--verbose` output.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Send one submission through the relay.
    ///
    /// Returns the terminal status. Relay failures are reported as
    /// `Ok(SubmissionStatus::Failed)`; `Err` means the submit was refused
    /// and no relay call was made.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<SubmissionStatus, SubmitError> {
        let sending = self.begin()?;

        let request = RelayRequest {
            service_id: self.target.service_id.clone(),
            template_id: self.target.template_id.clone(),
            template_params: TemplateParams {
                from_name: submission.name.clone(),
                from_email: submission.email.clone(),
                message: submission.message.clone(),
                to_name: self.target.to_name.clone(),
            },
        };

        let outcome = match self.relay.send(&request).await {
            Ok(()) => {
                info!(from = %submission.email, "contact message sent");
                *lock(&self.last_error) = None;
                SubmissionStatus::Succeeded
            }
            Err(e) => {
                warn!(error = %e, "failed to send contact message");
                *lock(&self.last_error) = Some(e.to_string());
                SubmissionStatus::Failed
            }
        };
        sending.finish(outcome);
        Ok(outcome)
    }

    /// Reset a terminal status to `Idle`. No effect while sending.
    pub fn acknowledge(&self) -> SubmissionStatus {
        let mut status = lock(&self.status);
        if status.is_terminal() {
            *status = SubmissionStatus::Idle;
        }
        *status
    }

    fn begin(&self) -> Result<SendingGuard<'_>, SubmitError> {
        let mut status = lock(&self.status);
        if *status == SubmissionStatus::Sending {
            return Err(SubmitError::AlreadySending);
        }
        *status = SubmissionStatus::Sending;
        Ok(SendingGuard {
            status: &self.status,
            armed: true,
        })
    }
}

/// Holds the `Sending` status for one relay call.
///
/// If the submit future is dropped before the relay answers (a timeout, a
/// `select!`, a caller going away) the guard puts the submitter back to
/// `Idle`, so the next submit is accepted.
struct SendingGuard<'a> {
    status: &'a Mutex<SubmissionStatus>,
    armed: bool,
}

impl SendingGuard<'_> {
    fn finish(mut self, outcome: SubmissionStatus) {
        *lock(self.status) = outcome;
        self.armed = false;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("contact submission cancelled before the relay answered");
            *lock(self.status) = SubmissionStatus::Idle;
        }
    }
}

/// Status values stay meaningful even if a holder panicked mid-update.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The contact form: field values plus the submitter behind them.
pub struct ContactForm<R> {
    pub fields: ContactSubmission,
    submitter: MessageSubmitter<R>,
}

impl<R: EmailRelay> ContactForm<R> {
    pub fn new(submitter: MessageSubmitter<R>) -> Self {
        Self {
            fields: ContactSubmission::default(),
            submitter,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.submitter.status()
    }

    pub fn submitter(&self) -> &MessageSubmitter<R> {
        &self.submitter
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.status() != SubmissionStatus::Sending
    }

    /// Validate and send the current fields. Clears them on success only.
    pub async fn submit(&mut self) -> Result<SubmissionStatus, SubmitError> {
        self.fields.validate()?;
        let status = self.submitter.submit(&self.fields).await?;
        if status == SubmissionStatus::Succeeded {
            self.fields.clear();
        }
        Ok(status)
    }

    pub fn acknowledge(&self) -> SubmissionStatus {
        self.submitter.acknowledge()
    }
}
