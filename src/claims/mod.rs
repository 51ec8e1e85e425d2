// Claims: records, the filter pipeline and the list view controller.

pub mod detailed;
pub mod filter;
pub mod models;
pub mod view;

pub use detailed::DetailedClaim;
pub use filter::{FilterCriteria, SortOrder, TimePeriod};
pub use models::{Claim, ClaimId, ClaimStatus};
pub use view::ClaimsView;
