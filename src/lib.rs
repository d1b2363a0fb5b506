pub mod config;
pub mod logging;
pub mod server;
pub mod tree;
pub mod watcher;

pub use config::Settings;
pub use tree::{DocTree, Document, TreeError};
pub use watcher::{DocWatcher, SubscriberHub, Subscription, WatchError};
