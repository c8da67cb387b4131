/// Failure surfaced by an external capability (search API, language model).
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unreachable: {0}")]
    Unreachable(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("rate limited")]
    RateLimited,
}
