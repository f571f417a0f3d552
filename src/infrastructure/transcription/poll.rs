//! Status polling driver for asynchronous transcription jobs

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::application::ports::{StatusSink, TranscribeError};
use crate::application::CancelHandle;
use crate::domain::transcript::{JobStatus, TranscriptionJob};

/// Interval between status checks
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Parameters for one polling run
pub struct PollPlan<'a> {
    /// Job status endpoint
    pub url: String,
    /// Bearer credential for the status endpoint
    pub access_token: &'a str,
    /// Statuses that count as terminal success
    pub completed: &'a [JobStatus],
    /// Bound on status checks before giving up
    pub max_attempts: u32,
    /// Wait between checks
    pub interval: Duration,
}

/// Poll a job's status endpoint until a terminal state is reached.
///
/// Drives `pending → transcribing → {transcribed, complete}`. Server
/// failures keep their semantic distinction (`failed` vs
/// `validation_failed`); exhausting `max_attempts` is a timeout, a
/// different animal from a confirmed failure since the job's outcome is
/// unknown. Cancellation is honored between polls: once signaled, no
/// further network calls happen.
pub async fn poll_job(
    client: &reqwest::Client,
    plan: PollPlan<'_>,
    cancel: &CancelHandle,
    status_sink: &dyn StatusSink,
) -> Result<TranscriptionJob, TranscribeError> {
    for attempt in 1..=plan.max_attempts {
        if cancel.is_cancelled() {
            return Err(TranscribeError::Cancelled);
        }

        let response = client
            .get(&plan.url)
            .bearer_auth(plan.access_token)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(TranscribeError::QuotaExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::RequestFailed(format!("{}: {}", status, body)));
        }

        let job: TranscriptionJob = response
            .json()
            .await
            .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))?;

        debug!(job = %job.id, status = %job.status, attempt, "poll");

        if plan.completed.contains(&job.status) {
            return Ok(job);
        }

        match job.status {
            JobStatus::Failed => {
                return Err(TranscribeError::JobFailed(format!(
                    "job {} reported status {}",
                    job.id, job.status
                )));
            }
            JobStatus::ValidationFailed => {
                return Err(TranscribeError::InvalidInput(format!(
                    "job {} reported status {}",
                    job.id, job.status
                )));
            }
            _ => {
                match job.progress {
                    Some(progress) => status_sink.status(&format!(
                        "Transcribing... {} ({:.0}%)",
                        job.status, progress
                    )),
                    None => status_sink.status(&format!("Transcribing... {}", job.status)),
                }
                if attempt < plan.max_attempts {
                    tokio::time::sleep(plan.interval).await;
                }
            }
        }
    }

    Err(TranscribeError::Timeout {
        attempts: plan.max_attempts,
    })
}

/// Completion set for a job: enrichment (summary/outline/keywords) is
/// computed after basic transcription, so when any is requested the
/// stricter `complete` status must be awaited.
pub const fn completion_statuses(wants_enrichment: bool) -> &'static [JobStatus] {
    if wants_enrichment {
        &[JobStatus::Complete]
    } else {
        &[JobStatus::Transcribed, JobStatus::Complete]
    }
}
