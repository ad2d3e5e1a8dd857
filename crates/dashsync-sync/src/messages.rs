//! Request and response messages.
//!
//! Wire shapes are JSON: requests are tagged by `action`, responses by
//! `status`.

use serde::{Deserialize, Serialize};

use dashsync_core::{DashboardGuid, SyncVerdict, VerdictResponse};

/// A request for the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SyncRequest {
    /// Compare the live dashboard with the repository copy.
    #[serde(rename = "compareDashboards")]
    CompareDashboards {
        #[serde(alias = "identifier")]
        guid: DashboardGuid,
    },

    /// Write the live dashboard into the repository.
    #[serde(rename = "commitDashboard")]
    CommitDashboard {
        #[serde(alias = "identifier")]
        guid: DashboardGuid,
    },
}

impl SyncRequest {
    pub fn compare(guid: DashboardGuid) -> Self {
        Self::CompareDashboards { guid }
    }

    pub fn commit(guid: DashboardGuid) -> Self {
        Self::CommitDashboard { guid }
    }

    pub fn guid(&self) -> &DashboardGuid {
        match self {
            Self::CompareDashboards { guid } | Self::CommitDashboard { guid } => guid,
        }
    }

    /// Wire name of the action.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CompareDashboards { .. } => "compareDashboards",
            Self::CommitDashboard { .. } => "commitDashboard",
        }
    }
}

/// Outcome of a commit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommitResponse {
    Success { message: String },
    Error { message: String },
}

impl CommitResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Error { message } => message,
        }
    }
}

/// A response from the sync service.
///
/// Serialized without an extra tag, so the JSON is exactly the
/// [`VerdictResponse`] or [`CommitResponse`] shape. An error body parses as
/// [`SyncResponse::Compare`] since both error shapes are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncResponse {
    Compare(VerdictResponse),
    Commit(CommitResponse),
}

impl SyncResponse {
    /// The comparison verdict, for compare responses.
    pub fn verdict(&self) -> Option<SyncVerdict> {
        match self {
            Self::Compare(response) => Some(response.clone().into()),
            Self::Commit(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Compare(VerdictResponse::Error { .. }) | Self::Commit(CommitResponse::Error { .. })
        )
    }
}

impl From<SyncVerdict> for SyncResponse {
    fn from(verdict: SyncVerdict) -> Self {
        Self::Compare(verdict.into())
    }
}

impl From<CommitResponse> for SyncResponse {
    fn from(response: CommitResponse) -> Self {
        Self::Commit(response)
    }
}
