use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exception severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Expected for some inputs, e.g. a video in an unsupported playback mode.
    Common,
    /// The remote service behaved unexpectedly.
    Suspicious,
    /// The request could not be carried out at all.
    Fault,
}

/// Category of a [`ResolutionError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Transport,
    MetadataUnavailable,
    MissingStreamDescriptor,
    AccessRightsDenied,
    AudioVariantNotFound,
    Unsupported,
}

/// Terminal failure of a single resolution attempt.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The HTTP layer could not complete the request.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered, but not with a successful response.
    #[error("{context} responded with status {status} ({url})")]
    UnexpectedStatus {
        context: &'static str,
        status: u16,
        url: String,
    },

    #[error("no video metadata available for {0} from the watch API or the watch page")]
    MetadataUnavailable(String),

    #[error("video {id} is not in a supported playback mode: missing {field}")]
    MissingStreamDescriptor { id: String, field: &'static str },

    #[error("access rights for {id} were not granted: {cause}")]
    AccessRightsDenied { id: String, cause: String },

    #[error("failed to find audio playlist URL in manifest")]
    AudioVariantNotFound,

    #[error("no source can handle identifier: {0}")]
    Unsupported(String),
}

impl ResolutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::UnexpectedStatus { .. } => ErrorKind::Transport,
            Self::MetadataUnavailable(_) => ErrorKind::MetadataUnavailable,
            Self::MissingStreamDescriptor { .. } => ErrorKind::MissingStreamDescriptor,
            Self::AccessRightsDenied { .. } => ErrorKind::AccessRightsDenied,
            Self::AudioVariantNotFound => ErrorKind::AudioVariantNotFound,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Transport { .. } => Severity::Fault,
            Self::MissingStreamDescriptor { .. } | Self::Unsupported(_) => Severity::Common,
            _ => Severity::Suspicious,
        }
    }

    pub(crate) fn transport(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: err.to_string(),
        }
    }
}
