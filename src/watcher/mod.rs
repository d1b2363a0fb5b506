//! Change-notification subsystem: recursive watcher plus subscription hub.
//!
//! # Architecture
//!
//! ```text
//! OS file event
//!      |
//! DocWatcher (one background task)
//!   - filters to write/create of recognized documents
//!      |
//! SubscriberHub
//!   - fan-out, non-blocking send per mailbox, drop on overflow
//!      |
//!    +------+------+
//!    |      |      |
//!  viewer viewer viewer   (one bounded mailbox each)
//! ```

mod error;
mod hub;
mod recursive;

pub use error::WatchError;
pub use hub::{SubscriberHub, SubscriberId, Subscription};
pub use recursive::DocWatcher;
