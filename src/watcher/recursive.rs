//! Recursive filesystem watcher for document directories.
//!
//! Registers every non-hidden directory under each watched root with the
//! OS notification primitive at construction time, then runs one background
//! task that filters raw events down to document changes and fans them out
//! through the [`SubscriberHub`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::config::WatchConfig;
use crate::{debug_event, log_event};

use super::error::WatchError;
use super::hub::{SubscriberHub, SubscriberId, Subscription};

/// Watches one or more document roots and notifies subscribers of changes.
///
/// Registration is computed once at construction by a recursive walk:
/// hidden directories (dot-prefixed names) are skipped as whole subtrees,
/// and directories created after startup are not picked up. Construction is
/// all-or-nothing; on any walk or registration error the partially built
/// watcher is dropped, releasing every OS registration, before the error
/// is returned.
///
/// Must be created inside a Tokio runtime: the event loop is spawned as a
/// background task that lives until [`close`](Self::close) (or drop).
#[derive(Debug)]
pub struct DocWatcher {
    hub: Arc<SubscriberHub>,
    // Kept alive to keep the OS registrations alive; dropping it closes the
    // event channel, which is what terminates the background task.
    watcher: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
}

impl DocWatcher {
    /// Watch `roots` with default settings (`.md` documents, mailbox
    /// capacity 10).
    pub fn new(roots: &[PathBuf]) -> Result<Self, WatchError> {
        Self::with_config(roots, &WatchConfig::default())
    }

    /// Watch `roots` with explicit watch settings.
    pub fn with_config(roots: &[PathBuf], config: &WatchConfig) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel(config.event_buffer.max(1));

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| {
                let _ = tx.blocking_send(res);
            })?;

        let mut dir_count = 0usize;
        for root in roots {
            dir_count += register_root(&mut watcher, root)?;
        }

        let hub = Arc::new(SubscriberHub::new(config.subscriber_capacity));

        let task_hub = hub.clone();
        let extension = config.extension.clone();
        let task = tokio::spawn(event_loop(rx, task_hub, extension));

        log_event!(
            "watcher",
            "started",
            "{dir_count} directories under {} roots",
            roots.len()
        );

        Ok(Self {
            hub,
            watcher: Some(watcher),
            task: Some(task),
        })
    }

    /// Register a new viewer mailbox.
    ///
    /// Calling this after [`close`](Self::close) is a caller error: the
    /// returned subscription will never be closed by the watcher and never
    /// receives events.
    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// Remove a viewer mailbox and close it. Safe to call twice.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.hub.unsubscribe(id);
    }

    /// The hub backing this watcher, for handing to the presentation layer.
    pub fn hub(&self) -> Arc<SubscriberHub> {
        self.hub.clone()
    }

    /// Shut the watcher down.
    ///
    /// Releases the OS registrations and closes the raw event channel
    /// (terminating the background task), then closes every live subscriber
    /// mailbox exactly once. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            self.hub.close_all();
            log_event!("watcher", "closed");
        }
        // The task exits on its own once the event channel closes; the
        // handle is detached rather than awaited so close stays synchronous.
        self.task.take();
    }
}

impl Drop for DocWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

/// Register `root` and every non-hidden directory below it.
///
/// Returns the number of directories registered. Hidden directories are
/// pruned from the walk itself (subtree skip), so nothing inside them is
/// ever visited; the root is exempt from the hidden check.
fn register_root(watcher: &mut RecommendedWatcher, root: &Path) -> Result<usize, WatchError> {
    let mut count = 0usize;

    let walk = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walk {
        let entry = entry.map_err(|e| WatchError::RootWalkFailed {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_dir() {
            watcher
                .watch(entry.path(), RecursiveMode::NonRecursive)
                .map_err(|e| WatchError::PathWatchFailed {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                })?;
            debug_event!("watcher", "watching", "{}", entry.path().display());
            count += 1;
        }
    }

    Ok(count)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Single event-processing loop, one per watcher instance.
///
/// Serializes all raw events, so delivery order per subscriber matches
/// detection order. Exits when the event channel closes (watcher dropped);
/// errors reported by the OS primitive are logged and never terminate the
/// loop.
async fn event_loop(
    mut rx: mpsc::Receiver<notify::Result<Event>>,
    hub: Arc<SubscriberHub>,
    extension: String,
) {
    while let Some(res) = rx.recv().await {
        match res {
            Ok(event) => {
                if !is_change(&event.kind) {
                    continue;
                }
                for path in event.paths {
                    if has_extension(&path, &extension) {
                        log_event!("watcher", "changed", "{}", path.display());
                        hub.notify(&path);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("[watcher] event stream error: {e}");
            }
        }
    }
    debug_event!("watcher", "event loop exited");
}

/// Only writes and creations count as document changes; metadata and
/// rename noise is dropped.
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
    )
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RenameMode};

    #[test]
    fn change_kind_filter() {
        assert!(is_change(&EventKind::Create(CreateKind::File)));
        assert!(is_change(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(is_change(&EventKind::Modify(ModifyKind::Any)));

        assert!(!is_change(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Permissions
        ))));
        assert!(!is_change(&EventKind::Modify(ModifyKind::Name(
            RenameMode::Any
        ))));
        assert!(!is_change(&EventKind::Remove(notify::event::RemoveKind::File)));
        assert!(!is_change(&EventKind::Access(notify::event::AccessKind::Any)));
    }

    #[test]
    fn extension_filter() {
        assert!(has_extension(Path::new("/docs/a.md"), "md"));
        assert!(!has_extension(Path::new("/docs/a.txt"), "md"));
        assert!(!has_extension(Path::new("/docs/md"), "md"));
        assert!(!has_extension(Path::new("/docs/a.md.bak"), "md"));
    }

    #[test]
    fn hidden_name_check() {
        assert!(is_hidden(std::ffi::OsStr::new(".git")));
        assert!(is_hidden(std::ffi::OsStr::new(".specify")));
        assert!(!is_hidden(std::ffi::OsStr::new("specs")));
    }
}
