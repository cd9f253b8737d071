//! Form state plus the outcome of the most recent submission.
//!
//! A submission is split into [`SubmissionController::begin_submit`] and
//! [`SubmissionController::resolve`] so callers can keep several requests in
//! flight. Which late responses are allowed to land is decided by the
//! [`StaleResponsePolicy`].

use crate::{
    Config, FormState, PredictError, PredictionService, config::StaleResponsePolicy,
    model::FormField,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome {
    #[default]
    Idle,
    Loading,
    Succeeded(f64),
    Failed(String),
}

impl RequestOutcome {
    pub fn prediction(&self) -> Option<f64> {
        match self {
            RequestOutcome::Succeeded(p) => Some(*p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestOutcome::Loading)
    }
}

impl From<Result<f64, PredictError>> for RequestOutcome {
    fn from(result: Result<f64, PredictError>) -> Self {
        match result {
            Ok(p) => RequestOutcome::Succeeded(p),
            Err(err) => RequestOutcome::Failed(err.user_message().to_string()),
        }
    }
}

/// Handle for one in-flight submission: its sequence number and the form
/// exactly as it was when submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    id: u64,
    form: FormState,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    form: FormState,
    outcome: RequestOutcome,
    policy: StaleResponsePolicy,
    last_issued: u64,
}

impl SubmissionController {
    pub fn new(policy: StaleResponsePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stale_responses)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn policy(&self) -> StaleResponsePolicy {
        self.policy
    }

    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Enter `Loading`, dropping any previous result, and issue a ticket.
    pub fn begin_submit(&mut self) -> SubmissionTicket {
        self.last_issued += 1;
        self.outcome = RequestOutcome::Loading;
        tracing::debug!(ticket = self.last_issued, "submission started");

        SubmissionTicket { id: self.last_issued, form: self.form.clone() }
    }

    /// Apply the result of a submission. Returns `false` if the policy
    /// discarded it as stale.
    pub fn resolve(&mut self, ticket: SubmissionTicket, result: Result<f64, PredictError>) -> bool {
        let stale = ticket.id != self.last_issued;
        if stale && self.policy == StaleResponsePolicy::LatestOnly {
            tracing::info!(
                ticket = ticket.id,
                latest = self.last_issued,
                "discarding response to superseded submission"
            );
            return false;
        }
        if stale {
            tracing::debug!(ticket = ticket.id, latest = self.last_issued, "applying out-of-order response");
        }

        self.outcome = RequestOutcome::from(result);
        true
    }

    /// Submit the current form through `service` and wait for the answer.
    pub async fn submit(&mut self, service: &dyn PredictionService) -> &RequestOutcome {
        let ticket = self.begin_submit();
        let result = service.predict(ticket.form()).await;
        self.resolve(ticket, result);
        &self.outcome
    }
}
