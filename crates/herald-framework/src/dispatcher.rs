//! Event dispatcher for the Herald framework.
//!
//! The [`Dispatcher`] is built once by [`Registrar::build`](crate::Registrar::build)
//! and never changes afterwards, so it can be shared as `Arc<Dispatcher>` and
//! called concurrently without locking.
//!
//! For every inbound event:
//!
//! 1. The event's [`RouteKey`] (kind, identifier, focused option) is computed
//! 2. Registrations with exactly that key are looked up; none is a silent no-op
//! 3. Each match runs in registration order: its parameters are extracted and,
//!    if that succeeds, the handler is awaited. A failed extraction is logged
//!    and only that handler is skipped.
//!
//! Replies produced from handler return values are sent on tasks tracked by
//! the dispatcher. `dispatch` returns without waiting for them, so a slow
//! client call never holds back the next handler.
//! [`flush_replies`](Dispatcher::flush_replies) waits for them.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{Instrument, Level, debug, error, span, trace};

use herald_core::{BoxedClient, InboundEvent};

use crate::context::BaseContext;
use crate::registry::{Registry, RouteKey};

/// What happened to one dispatched event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Registrations whose key matched.
    pub matched: usize,
    /// Handlers that ran.
    pub invoked: usize,
    /// Handlers skipped because their parameters could not be extracted.
    pub skipped: usize,
}

/// The central event dispatcher.
///
/// # Thread Safety
///
/// `Dispatcher` is `Send + Sync`; dispatch takes `&self`.
pub struct Dispatcher {
    registry: Registry,
    replies: TaskTracker,
}

impl Dispatcher {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            registry,
            replies: TaskTracker::new(),
        }
    }

    /// Returns the route table.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of replies still being sent.
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    /// Waits until every reply issued so far has been sent or has failed.
    ///
    /// Dispatching can continue meanwhile; replies issued during the wait
    /// are waited for as well.
    pub async fn flush_replies(&self) {
        self.replies.close();
        self.replies.wait().await;
        self.replies.reopen();
    }

    /// Dispatches an event to every handler registered for its route key.
    ///
    /// Must be called within a Tokio runtime.
    pub async fn dispatch(&self, event: InboundEvent, client: BoxedClient) -> DispatchReport {
        let key = RouteKey::of(&event);
        let span = span!(
            Level::DEBUG,
            "dispatch",
            kind = %key.kind,
            identifier = key.identifier.as_deref().unwrap_or_default()
        );

        async move {
            let matches = self.registry.lookup(&key);
            if matches.is_empty() {
                debug!("No handler mapped, ignoring event");
                return DispatchReport::default();
            }

            let base = Arc::new(BaseContext::with_tracker(
                event,
                client,
                self.replies.clone(),
            ));
            let mut report = DispatchReport {
                matched: matches.len(),
                ..DispatchReport::default()
            };

            for registration in matches {
                match registration
                    .handler
                    .call(Arc::clone(&base), &registration.params)
                {
                    Ok(invocation) => {
                        trace!(handler = %registration.name, "Executing handler");
                        invocation.await;
                        report.invoked += 1;
                    }
                    Err(e) => {
                        error!(
                            handler = %registration.name,
                            "Skipping handler, parameter extraction failed: {e}"
                        );
                        report.skipped += 1;
                    }
                }
            }

            debug!(
                invoked = report.invoked,
                skipped = report.skipped,
                "Dispatch finished"
            );
            report
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.registry.len())
            .field("pending_replies", &self.replies.len())
            .finish()
    }
}
