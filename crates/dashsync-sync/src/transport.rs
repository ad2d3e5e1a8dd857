//! In-process request channel.
//!
//! Callers hold a cloneable [`SyncClient`]; a server task drains the
//! [`SyncInbox`] and answers each request on its own task, so a slow
//! comparison never holds up the next request.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Result, SyncError};
use crate::messages::{SyncRequest, SyncResponse};

/// Something that answers sync requests.
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    async fn handle(&self, request: SyncRequest) -> SyncResponse;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    async fn handle(&self, request: SyncRequest) -> SyncResponse {
        (**self).handle(request).await
    }
}

/// Message envelope carrying the reply slot.
#[derive(Debug)]
struct Envelope {
    request: SyncRequest,
    reply: oneshot::Sender<SyncResponse>,
}

/// Sending half of the request channel.
#[derive(Debug, Clone)]
pub struct SyncClient {
    sender: mpsc::Sender<Envelope>,
}

impl SyncClient {
    /// Send a request and wait for its response.
    ///
    /// Dropping the returned future abandons the request; the server
    /// discards the response when it is ready.
    pub async fn request(&self, request: SyncRequest) -> Result<SyncResponse> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { request, reply })
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        response.await.map_err(|_| SyncError::ChannelClosed)
    }

    /// True once the server side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half of the request channel, consumed by [`serve`].
#[derive(Debug)]
pub struct SyncInbox {
    receiver: mpsc::Receiver<Envelope>,
}

/// Create a request channel holding up to `buffer` pending requests.
pub fn channel(buffer: usize) -> (SyncClient, SyncInbox) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    (SyncClient { sender }, SyncInbox { receiver })
}

/// Answer requests from `inbox` until every client is dropped.
///
/// Each request runs on its own task.
pub fn serve<H: RequestHandler>(inbox: SyncInbox, handler: Arc<H>) -> JoinHandle<()> {
    let mut receiver = inbox.receiver;
    tokio::spawn(async move {
        while let Some(Envelope { request, reply }) = receiver.recv().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let action = request.action();
                let response = handler.handle(request).await;
                if reply.send(response).is_err() {
                    tracing::debug!(action, "requester went away, response dropped");
                }
            });
        }
        tracing::debug!("request channel closed, server stopping");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dashsync_core::{DashboardGuid, SyncVerdict};
    use tokio::sync::Barrier;

    use crate::messages::CommitResponse;

    fn guid(raw: &str) -> DashboardGuid {
        DashboardGuid::parse(raw).unwrap()
    }

    /// Answers compare with in-sync and commit with the guid.
    struct EchoHandler;

    #[async_trait]
    impl RequestHandler for EchoHandler {
        async fn handle(&self, request: SyncRequest) -> SyncResponse {
            match request {
                SyncRequest::CompareDashboards { .. } => SyncVerdict::InSync.into(),
                SyncRequest::CommitDashboard { guid } => CommitResponse::Success {
                    message: guid.to_string(),
                }
                .into(),
            }
        }
    }

    /// Blocks every request until `parties` requests are in flight.
    struct GateHandler {
        gate: Barrier,
    }

    #[async_trait]
    impl RequestHandler for GateHandler {
        async fn handle(&self, _request: SyncRequest) -> SyncResponse {
            self.gate.wait().await;
            SyncVerdict::OutOfSync.into()
        }
    }

    #[tokio::test]
    async fn test_request_response() {
        let (client, inbox) = channel(8);
        let server = serve(inbox, Arc::new(EchoHandler));

        let response = client.request(SyncRequest::compare(guid("A"))).await.unwrap();
        assert_eq!(response.verdict(), Some(SyncVerdict::InSync));

        let response = client.request(SyncRequest::commit(guid("B"))).await.unwrap();
        assert_eq!(
            response,
            SyncResponse::Commit(CommitResponse::Success { message: "B".into() })
        );

        drop(client);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_overlapping_requests_do_not_block() {
        let (client, inbox) = channel(8);
        serve(
            inbox,
            Arc::new(GateHandler {
                gate: Barrier::new(2),
            }),
        );

        let other = client.clone();
        let both = async {
            tokio::join!(
                client.request(SyncRequest::compare(guid("A"))),
                other.request(SyncRequest::compare(guid("B"))),
            )
        };
        let (a, b) = tokio::time::timeout(Duration::from_secs(5), both)
            .await
            .expect("requests were served one at a time");
        assert_eq!(a.unwrap().verdict(), Some(SyncVerdict::OutOfSync));
        assert_eq!(b.unwrap().verdict(), Some(SyncVerdict::OutOfSync));
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (client, inbox) = channel(1);
        drop(inbox);
        assert!(client.is_closed());
        let err = client
            .request(SyncRequest::compare(guid("A")))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ChannelClosed));
    }
}
