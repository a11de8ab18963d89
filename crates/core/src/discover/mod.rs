//! Discovery of pictures under a scan root.
//!
//! [`Discoverer`] walks the tree on the calling thread (directory listing and
//! metadata decoding are blocking), keeps entries whose extension is on the
//! allow-list, resolves each one's date and pushes it to the work queue.

mod discoverer;
mod error;
mod types;

pub use discoverer::Discoverer;
pub use error::DiscoveryError;
pub use types::{DiscoveredItem, DiscoveryStats, DEFAULT_EXTENSIONS};
