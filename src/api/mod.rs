// Dashboard backend API: HTTP client, push event socket, feed trait and
// request sequencing.

pub mod client;
pub mod realtime;
pub mod sequence;
pub mod traits;

pub use client::DashboardClient;
pub use realtime::PushSubscription;
pub use sequence::RequestSequencer;
pub use traits::ClaimsFeed;
