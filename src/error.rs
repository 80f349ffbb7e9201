use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("tolerance must be between 1 and 255, got {0}")]
    InvalidTolerance(u8),

    #[error("host service failure: {0}")]
    Host(#[from] HostError),
}

/// Failure reported by a host collaborator call.
///
/// `service` names the collaborator that failed (`"palette"`, `"scene"`,
/// `"drawing"`, `"undo"`); `detail` is the host's own description. Host
/// failures are fatal for the run; the engine performs no retries.
#[derive(Debug, Error)]
#[error("{service}: {detail}")]
pub struct HostError {
    service: &'static str,
    detail: String,
}

impl HostError {
    pub fn new(service: &'static str, detail: impl Into<String>) -> Self {
        Self {
            service,
            detail: detail.into(),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
