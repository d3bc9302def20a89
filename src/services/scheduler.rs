//! Debounced, last-request-wins scheduling of generation requests.
//!
//! The scheduler owns the single pending timer and the monotonically
//! increasing request token. It does no I/O itself: the pipeline asks it
//! when the timer is due, runs the engine call for the returned [`Ticket`],
//! and reports back. A result is applied only when its token is still the
//! latest one issued; everything older is dropped on arrival.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::models::GenerationParameters;

/// State of the single logical "current request" slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    /// Waiting for the debounce timer or for the engine to answer
    Pending,
    Fulfilled,
    Failed,
}

/// Permission to run one engine call
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub token: u64,
    pub params: GenerationParameters,
}

/// What to do with a finished engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Latest request: apply its result
    Apply,
    /// Superseded by a newer request: discard
    Stale,
}

pub struct GenerationScheduler {
    debounce: Duration,
    deadline: Option<Instant>,
    proposed: Option<GenerationParameters>,
    latest_token: u64,
    outstanding: Option<u64>,
    state: RequestState,
}

impl GenerationScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            proposed: None,
            latest_token: 0,
            outstanding: None,
            state: RequestState::Idle,
        }
    }

    /// Record a parameter change and (re)start the debounce timer.
    ///
    /// Earlier proposals still waiting on the timer are replaced.
    pub fn propose(&mut self, params: GenerationParameters, now: Instant) {
        let restarted = self.deadline.is_some();
        self.proposed = Some(params);
        self.deadline = Some(now + self.debounce);
        self.state = RequestState::Pending;
        tracing::debug!(
            restarted,
            debounce_ms = self.debounce.as_millis() as u64,
            "Generation debounce timer started"
        );
    }

    /// When the pending timer fires, if one is running
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Issue the proposed parameters if the timer has expired.
    pub fn poll_due(&mut self, now: Instant) -> Option<Ticket> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                let params = self.proposed.take()?;
                Some(self.issue(params))
            }
            _ => None,
        }
    }

    /// Issue a request immediately, cancelling any pending timer.
    pub fn issue_now(&mut self, params: GenerationParameters) -> Ticket {
        if self.deadline.take().is_some() {
            tracing::debug!("Pending debounce timer superseded by immediate request");
        }
        self.proposed = None;
        self.issue(params)
    }

    fn issue(&mut self, params: GenerationParameters) -> Ticket {
        self.latest_token += 1;
        self.outstanding = Some(self.latest_token);
        self.state = RequestState::Pending;
        tracing::debug!(token = self.latest_token, "Generation request issued");
        Ticket {
            token: self.latest_token,
            params,
        }
    }

    /// Report a finished engine call and learn whether to apply it.
    pub fn complete(&mut self, token: u64, succeeded: bool) -> Completion {
        if token != self.latest_token {
            tracing::debug!(
                token,
                latest = self.latest_token,
                "Discarding stale generation result"
            );
            return Completion::Stale;
        }

        self.outstanding = None;
        if self.deadline.is_none() {
            self.state = if succeeded {
                RequestState::Fulfilled
            } else {
                RequestState::Failed
            };
        }
        Completion::Apply
    }

    /// True while the latest issued request has not come back
    pub fn awaiting_result(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    pub fn state(&self) -> RequestState {
        self.state
    }
}
