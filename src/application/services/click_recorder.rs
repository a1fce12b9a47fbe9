//! Click persistence and live notification.
//!
//! This is the background half of the redirect pipeline. The redirect handler
//! answers the client first and then hands a [`ClickEvent`] to
//! [`ClickRecorder::record_detached`], which runs the steps below on its own
//! task:
//!
//! 1. Persist the click. On failure: log, stop.
//! 2. Count all clicks for the code and resolve its owner. On failure: log, stop.
//! 3. Broadcast `{code, total}` to the owner's live connection, if any.
//!
//! Nothing is retried and nothing is surfaced to a client. The broadcast
//! total is whatever is visible when the count runs, so it may already include
//! a concurrent click on the same code.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::realtime::{Delivery, NotificationHub};

/// Records clicks and pushes fresh totals to owners.
pub struct ClickRecorder<C: ClickRepository + ?Sized> {
    click_repository: Arc<C>,
    hub: NotificationHub,
}

impl<C: ClickRepository + ?Sized + 'static> ClickRecorder<C> {
    /// Creates a new click recorder.
    pub fn new(click_repository: Arc<C>, hub: NotificationHub) -> Self {
        Self {
            click_repository,
            hub,
        }
    }

    /// Runs the full record → count → broadcast sequence for one click.
    ///
    /// # Errors
    ///
    /// Returns the first store error. When persisting fails the count and
    /// broadcast never run.
    pub async fn record(&self, event: ClickEvent) -> Result<Delivery, AppError> {
        let code = event.code.clone();

        self.click_repository
            .record_click(NewClick::from(event))
            .await?;
        metrics::counter!("linkpulse_clicks_recorded_total").increment(1);

        let tally = self.click_repository.tally_for_code(&code).await?;

        let delivery = self.hub.broadcast(tally.owner_id, &code, tally.total).await;
        debug!(
            code = %code,
            owner = tally.owner_id,
            total = tally.total,
            ?delivery,
            "Click recorded"
        );

        Ok(delivery)
    }

    /// Runs [`Self::record`] on a detached task.
    ///
    /// Returns immediately. The task is not tied to the request that spawned
    /// it and is never cancelled; its failure is logged and otherwise
    /// swallowed.
    pub fn record_detached(self: &Arc<Self>, event: ClickEvent) {
        let recorder = Arc::clone(self);

        tokio::spawn(async move {
            let code = event.code.clone();
            if let Err(e) = recorder.record(event).await {
                metrics::counter!("linkpulse_click_failures_total").increment(1);
                warn!("Failed to record click for {}: {}", code, e);
            }
        });
    }
}
