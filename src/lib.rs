// Claimdesk: terminal client for a fake news detection backend
//
// This is the library root. The claims view controller (filter, sort,
// search, paginate) lives in `claims`; the other modules feed it data,
// render it, or cover the dashboard's secondary panels.

pub mod analysis;
pub mod api;
pub mod claims;
pub mod config;
pub mod crisis;
pub mod dashboard;
pub mod events;
pub mod export;
pub mod insights;
pub mod notify;
pub mod output;
pub mod paging;
pub mod refresh;
pub mod sources;
pub mod status;
