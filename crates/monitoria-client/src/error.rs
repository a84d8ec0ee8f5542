use reqwest::StatusCode;
use thiserror::Error;

/// Error taxonomy for every backend operation.
///
/// All variants render to a human-readable message; store operations catch
/// them at the operation boundary and surface that message as visible error
/// state. Nothing here is retried — a failure is terminal until the user
/// re-triggers the operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("empty API base URL")]
    BaseUrlMissing,

    /// Non-OK HTTP status. Carries the status line and the raw body text.
    #[error("request failed with status {status}: {body}")]
    Fetch { status: StatusCode, body: String },

    /// The response parsed but did not have the agreed shape
    /// (`success: false`, or a missing `messages`/`items` array).
    #[error("unexpected response shape: {0}")]
    Shape(String),

    /// An authenticated-only action was attempted without a token.
    #[error("labeling requires an authenticated session")]
    AuthRequired,

    #[error("request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
