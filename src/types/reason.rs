//! Where a reply came from and why the local fallback was used

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Reply provenance codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReplySource {
    // =========================================================================
    // F100: Remote
    // =========================================================================
    /// Reply text and analysis overrides came from the backend
    F100_REMOTE,
    /// Backend answered but without reply text; canned reply used
    F101_REMOTE_EMPTY,

    // =========================================================================
    // F200: Local fallback
    // =========================================================================
    /// No backend configured
    F200_FALLBACK_OFFLINE,
    /// Network error or timeout
    F201_FALLBACK_TRANSPORT,
    /// Backend answered with a non-success status
    F202_FALLBACK_STATUS,
    /// Backend answer could not be decoded
    F203_FALLBACK_DECODE,
}

impl ReplySource {
    /// Map a remote failure to its fallback code
    pub fn from_remote_error(err: &RemoteError) -> Self {
        match err {
            RemoteError::Disabled => Self::F200_FALLBACK_OFFLINE,
            RemoteError::Transport(_) => Self::F201_FALLBACK_TRANSPORT,
            RemoteError::Status(_) => Self::F202_FALLBACK_STATUS,
            RemoteError::Decode(_) => Self::F203_FALLBACK_DECODE,
        }
    }

    /// True when no remote-derived state was applied
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::F100_REMOTE | Self::F101_REMOTE_EMPTY)
    }

    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::F100_REMOTE => "F100_REMOTE",
            Self::F101_REMOTE_EMPTY => "F101_REMOTE_EMPTY",
            Self::F200_FALLBACK_OFFLINE => "F200_FALLBACK_OFFLINE",
            Self::F201_FALLBACK_TRANSPORT => "F201_FALLBACK_TRANSPORT",
            Self::F202_FALLBACK_STATUS => "F202_FALLBACK_STATUS",
            Self::F203_FALLBACK_DECODE => "F203_FALLBACK_DECODE",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::F100_REMOTE => "Remote reply",
            Self::F101_REMOTE_EMPTY => "Remote analysis, canned reply",
            Self::F200_FALLBACK_OFFLINE => "Offline, canned reply",
            Self::F201_FALLBACK_TRANSPORT => "Backend unreachable, canned reply",
            Self::F202_FALLBACK_STATUS => "Backend error status, canned reply",
            Self::F203_FALLBACK_DECODE => "Backend answer unreadable, canned reply",
        }
    }
}

impl std::fmt::Display for ReplySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
