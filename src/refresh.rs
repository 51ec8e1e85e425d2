// Background refresh for the claims view.
//
// A poller is tied to the view that started it: the returned PollHandle
// aborts the task when it is stopped or dropped, so a view that goes away
// never leaves a timer running behind it.
//
// Fetch failures never escape the task. They are logged and recorded on the
// view as LoadState::Failed, and the previous data stays on screen.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::sequence::RequestSequencer;
use crate::api::traits::ClaimsFeed;
use crate::claims::filter::FilterCriteria;
use crate::claims::view::ClaimsView;

/// Fetch once and apply the result to `view` unless a newer fetch already
/// landed. Returns whether the response was applied.
///
/// The full claim set is always fetched; the view's own criteria are then
/// re-applied locally by `ClaimsView::refresh`.
pub async fn refresh_once(
    feed: &dyn ClaimsFeed,
    view: &Mutex<ClaimsView>,
    sequencer: &RequestSequencer,
) -> Result<bool> {
    let ticket = sequencer.begin();
    let result = feed.fetch_claims(&FilterCriteria::default()).await;

    if !sequencer.try_apply(ticket) {
        debug!(ticket, applied = sequencer.applied(), "Discarding stale claims response");
        return Ok(false);
    }

    match result {
        Ok(claims) => {
            view.lock().await.refresh(claims);
            Ok(true)
        }
        Err(e) => {
            view.lock().await.fail_load(format!("Error loading claims: {e}"));
            Err(e)
        }
    }
}

/// Handle to a running poller. Dropping it stops the poller.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling now.
    pub fn stop(self) {
        // Drop does the abort.
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start polling `feed` every `interval`. The caller is expected to have
/// loaded the view already, so the first fetch happens one interval in.
pub fn spawn_poller(
    feed: Arc<dyn ClaimsFeed>,
    view: Arc<Mutex<ClaimsView>>,
    sequencer: Arc<RequestSequencer>,
    interval: Duration,
) -> PollHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs_f64(), "Claims poller started");

        loop {
            ticker.tick().await;
            match refresh_once(feed.as_ref(), &view, &sequencer).await {
                Ok(true) => debug!("Claims refreshed by poller"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Claims refresh failed"),
            }
        }
    });

    PollHandle { task }
}
