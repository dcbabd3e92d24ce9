//! Queue job handle and status types.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a queued job as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Accepted and waiting for a worker
    Queued,
    /// A worker is running the job
    InProgress,
    /// Output is ready at the result locator
    Completed,
    /// The provider reported a terminal failure or cancellation
    Failed,
    /// Missing or unrecognized status field
    #[default]
    Unknown,
}

impl JobStatus {
    /// Whether polling should stop on this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the job is still pending (including unknown states).
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::InProgress => write!(f, "InProgress"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed => write!(f, "Failed"),
            JobStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Snapshot of a queued job, decoded from a create-job or status response.
///
/// A handle is never updated in place: every status check yields a new one.
/// `result_locator` is only guaranteed to be present once `status` is
/// [`JobStatus::Completed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobHandle {
    /// Where to check job progress
    pub status_locator: Option<Url>,
    /// Where to fetch the final output
    pub result_locator: Option<Url>,
    /// Where to request cancellation
    pub cancel_locator: Option<Url>,
    /// Provider-assigned job id
    pub request_id: Option<String>,
    /// Position in the provider queue (Fal only)
    pub queue_position: Option<u64>,
    /// Provider error message attached to a failed job
    pub error: Option<String>,
    /// Provider status string as received, before mapping
    pub raw_status: Option<String>,
    pub status: JobStatus,
}

impl JobHandle {
    /// Create a handle with only a status.
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_status_locator(mut self, url: Url) -> Self {
        self.status_locator = Some(url);
        self
    }

    pub fn with_result_locator(mut self, url: Url) -> Self {
        self.result_locator = Some(url);
        self
    }

    pub fn with_cancel_locator(mut self, url: Url) -> Self {
        self.cancel_locator = Some(url);
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Check if the job finished successfully
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// Check if the job ended in failure
    pub fn is_failed(&self) -> bool {
        self.status == JobStatus::Failed
    }
}

/// Parse an optional locator string from a provider response.
///
/// Empty strings are treated as absent; anything else must be an absolute URL.
pub(crate) fn parse_locator(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Url>, crate::error::RelayError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Url::parse(raw).map(Some).map_err(|e| {
            crate::error::RelayError::DecodeError(format!("invalid {field} '{raw}': {e}"))
        }),
    }
}
