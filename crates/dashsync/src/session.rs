//! Which dashboard the user is looking at.
//!
//! The caller owns a [`SessionState`] and feeds it every URL the user
//! navigates to; the returned [`SessionChange`] says whether a check should
//! start, restart or stop.

use dashsync_core::DashboardGuid;

/// Effect of a navigation on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// A dashboard page was opened.
    Started(DashboardGuid),
    /// The user moved from one dashboard to another.
    Switched {
        from: DashboardGuid,
        to: DashboardGuid,
    },
    /// The user left the dashboard pages.
    Left(DashboardGuid),
    /// Same dashboard as before, or still no dashboard.
    Unchanged,
}

/// The dashboard currently being viewed, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Option<DashboardGuid>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&DashboardGuid> {
        self.current.as_ref()
    }

    /// Record a navigation to `url`.
    pub fn observe(&mut self, url: &str) -> SessionChange {
        let next = DashboardGuid::from_url(url);
        let change = match (self.current.as_ref(), next.as_ref()) {
            (None, None) => SessionChange::Unchanged,
            (Some(prev), Some(next)) if prev == next => SessionChange::Unchanged,
            (None, Some(next)) => SessionChange::Started(next.clone()),
            (Some(prev), Some(next)) => SessionChange::Switched {
                from: prev.clone(),
                to: next.clone(),
            },
            (Some(prev), None) => SessionChange::Left(prev.clone()),
        };
        if change != SessionChange::Unchanged {
            tracing::debug!(?change, "dashboard session changed");
        }
        self.current = next;
        change
    }
}
