// ClaimsView: the in-memory claims list controller.
//
// Holds the last fetched batch, the filtered/sorted projection of it and the
// page cursor. The projection is a list of indices into `all_claims` and is
// only ever rebuilt as a whole by `load`, `refresh`, `apply_filter` and
// `reset`; pagination moves the cursor and nothing else.
//
// Rendering is not done here. Observers are told what changed and get a
// shared borrow of the view to read from.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::debug;

use super::filter::{self, FilterCriteria};
use super::models::Claim;
use crate::notify::LoadState;
use crate::paging::Paginator;

/// Default number of claims per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What caused an observer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    Loaded,
    Refreshed,
    Filtered,
    Reset,
    PageChanged,
    LoadFailed,
}

/// Receives change notifications. Gets read-only access to the view.
pub trait ViewObserver: Send {
    fn on_change(&mut self, change: ViewChange, view: &ClaimsView);
}

impl<F> ViewObserver for F
where
    F: FnMut(ViewChange, &ClaimsView) + Send,
{
    fn on_change(&mut self, change: ViewChange, view: &ClaimsView) {
        self(change, view)
    }
}

pub struct ClaimsView {
    all_claims: Vec<Claim>,
    filtered: Vec<usize>,
    criteria: FilterCriteria,
    pager: Paginator,
    load_state: LoadState,
    observers: Vec<Box<dyn ViewObserver>>,
}

impl Default for ClaimsView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ClaimsView {
    pub fn new(page_size: usize) -> Self {
        Self {
            all_claims: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            pager: Paginator::new(page_size),
            load_state: LoadState::Idle,
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&mut self, observer: impl ViewObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -- Writers --

    /// Replace the claim set and show all of it in default order.
    ///
    /// Criteria go back to their defaults, so the result is the same as
    /// `reset()` on the new data.
    pub fn load(&mut self, claims: Vec<Claim>) {
        self.all_claims = claims;
        self.criteria = FilterCriteria::default();
        self.recompute(Utc::now());
        self.pager.reset();
        self.load_state = LoadState::from_count(self.all_claims.len());
        debug!(claims = self.all_claims.len(), "Claims loaded");
        self.notify(ViewChange::Loaded);
    }

    /// Replace the claim set but keep the current criteria and, where it
    /// still exists, the current page. Used by background polling.
    pub fn refresh(&mut self, claims: Vec<Claim>) {
        self.refresh_at(claims, Utc::now());
    }

    pub fn refresh_at(&mut self, claims: Vec<Claim>, now: DateTime<Utc>) {
        self.all_claims = claims;
        self.recompute(now);
        self.pager.clamp(self.filtered.len());
        self.load_state = LoadState::from_count(self.all_claims.len());
        debug!(
            claims = self.all_claims.len(),
            visible = self.filtered.len(),
            page = self.pager.current(),
            "Claims refreshed"
        );
        self.notify(ViewChange::Refreshed);
    }

    /// Record a failed fetch. The previous data stays in place; renderers
    /// show the error instead of rows.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.load_state = LoadState::Failed(message.into());
        self.notify(ViewChange::LoadFailed);
    }

    pub fn mark_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Filter and sort against the current time.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.apply_filter_at(criteria, Utc::now());
    }

    /// Filter and sort with an explicit "now" for the time-period cutoff.
    pub fn apply_filter_at(&mut self, criteria: FilterCriteria, now: DateTime<Utc>) {
        self.criteria = criteria;
        self.recompute(now);
        self.pager.reset();
        debug!(
            visible = self.filtered.len(),
            total = self.all_claims.len(),
            "Filters applied"
        );
        self.notify(ViewChange::Filtered);
    }

    /// Back to default criteria over the current claim set.
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
        self.recompute(Utc::now());
        self.pager.reset();
        self.notify(ViewChange::Reset);
    }

    /// Jump to a page. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        if self.pager.go_to(page, self.filtered.len()) {
            self.notify(ViewChange::PageChanged);
        }
    }

    pub fn next_page(&mut self) {
        if self.pager.next(self.filtered.len()) {
            self.notify(ViewChange::PageChanged);
        }
    }

    pub fn previous_page(&mut self) {
        if self.pager.previous(self.filtered.len()) {
            self.notify(ViewChange::PageChanged);
        }
    }

    // -- Readers --

    /// Claims on the current page, in display order.
    pub fn current_page_items(&self) -> Vec<&Claim> {
        self.filtered[self.pager.window(self.filtered.len())]
            .iter()
            .map(|&i| &self.all_claims[i])
            .collect()
    }

    /// Zero when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered.len())
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn has_previous(&self) -> bool {
        self.pager.current() > 1
    }

    pub fn has_next(&self) -> bool {
        self.pager.current() < self.total_pages()
    }

    /// Every claim passing the current criteria, in display order.
    pub fn filtered_claims(&self) -> Vec<&Claim> {
        self.filtered.iter().map(|&i| &self.all_claims[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn all_claims(&self) -> &[Claim] {
        &self.all_claims
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// JSON document for exporting the filtered list.
    pub fn export_payload(&self) -> serde_json::Value {
        json!({ "claims": self.filtered_claims() })
    }

    // -- Internals --

    fn recompute(&mut self, now: DateTime<Utc>) {
        self.filtered = filter::apply(&self.all_claims, &self.criteria, now);
    }

    fn notify(&mut self, change: ViewChange) {
        // Observers borrow the view immutably, so take them out for the call.
        let mut observers = std::mem::take(&mut self.observers);
        for observer in observers.iter_mut() {
            observer.on_change(change, self);
        }
        // Keep any observers registered from inside a callback.
        observers.append(&mut self.observers);
        self.observers = observers;
    }
}
