//! Periodic background checks of one dashboard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use dashsync_core::{DashboardGuid, SyncVerdict};
use dashsync_sync::{RequestHandler, SyncRequest};

/// Interval between checks when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Verdict of one background check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    pub guid: DashboardGuid,
    pub verdict: SyncVerdict,
}

/// Handle to a running poller.
///
/// Dropping the handle stops the poller. A check that is running at that
/// moment is abandoned.
#[derive(Debug)]
pub struct Poller {
    guid: DashboardGuid,
    events: mpsc::Receiver<PollEvent>,
    task: JoinHandle<()>,
}

impl Poller {
    pub fn guid(&self) -> &DashboardGuid {
        &self.guid
    }

    /// Wait for the next verdict. `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Check `guid` now and then every `interval`.
pub fn spawn_poller<H: RequestHandler>(
    handler: Arc<H>,
    guid: DashboardGuid,
    interval: Duration,
) -> Poller {
    let (sender, events) = mpsc::channel(4);
    let period = interval.max(Duration::from_millis(1));
    let task_guid = guid.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let response = handler.handle(SyncRequest::compare(task_guid.clone())).await;
            let verdict = response
                .verdict()
                .unwrap_or_else(|| SyncVerdict::error("unexpected response to a compare request"));
            tracing::debug!(guid = %task_guid, %verdict, "background check finished");

            let event = PollEvent {
                guid: task_guid.clone(),
                verdict,
            };
            if sender.send(event).await.is_err() {
                break;
            }
        }
        tracing::debug!(guid = %task_guid, "poller stopped");
    });

    Poller { guid, events, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use dashsync_sync::SyncResponse;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler for Counting {
        async fn handle(&self, _request: SyncRequest) -> SyncResponse {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 0 {
                SyncVerdict::InSync.into()
            } else {
                SyncVerdict::OutOfSync.into()
            }
        }
    }

    fn guid() -> DashboardGuid {
        DashboardGuid::parse("GUIDA").unwrap()
    }

    #[tokio::test]
    async fn test_checks_immediately_then_repeatedly() {
        let handler = Arc::new(Counting::default());
        let mut poller = spawn_poller(Arc::clone(&handler), guid(), Duration::from_millis(10));
        assert_eq!(poller.guid(), &guid());

        let first = poller.next().await.unwrap();
        assert_eq!(first, PollEvent { guid: guid(), verdict: SyncVerdict::InSync });
        let second = poller.next().await.unwrap();
        assert_eq!(second.verdict, SyncVerdict::OutOfSync);

        poller.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after_stop = handler.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handler.calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_first_check_does_not_wait_for_interval() {
        let handler = Arc::new(Counting::default());
        let mut poller = spawn_poller(handler, guid(), Duration::from_secs(3600));
        let event = tokio::time::timeout(Duration::from_secs(5), poller.next())
            .await
            .expect("first check ran immediately");
        assert!(event.is_some());
    }
}
