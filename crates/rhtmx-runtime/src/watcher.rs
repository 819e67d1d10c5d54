use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rhtmx_manifest::DevConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::runtime::SiteRuntime;

/// Kind of change a file event represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    /// A file appeared, disappeared or was renamed: the route table may change
    Structure(PathBuf),
    /// A file's contents changed: only its static paths may change
    Content(PathBuf),
}

impl PageChange {
    pub fn path(&self) -> &Path {
        match self {
            PageChange::Structure(path) | PageChange::Content(path) => path,
        }
    }
}

/// Classifies a raw watcher event
pub fn classify(event: &Event) -> Vec<PageChange> {
    let wrap: fn(PathBuf) -> PageChange = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)) => {
            PageChange::Structure
        }
        EventKind::Modify(_) => PageChange::Content,
        _ => return Vec::new(),
    };

    event.paths.iter().cloned().map(wrap).collect()
}

/// Watches the pages directory and keeps a [`SiteRuntime`] current
///
/// Events are coalesced: after the first event of a burst, further events
/// are collected until the channel stays quiet for the debounce window, and
/// the whole batch is applied at once.
pub struct ManifestWatcher {
    _watcher: notify::RecommendedWatcher,
    task: JoinHandle<()>,
}

impl ManifestWatcher {
    /// Starts watching `runtime.pages_dir()`
    pub fn spawn(runtime: Arc<SiteRuntime>, debounce: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = tx.blocking_send(event);
            }
            Err(e) => error!("Watch error: {:?}", e),
        })?;

        let pages = runtime.pages_dir();
        if pages.exists() {
            watcher.watch(pages, RecursiveMode::Recursive)?;
            info!("Watching: {:?}", pages);
        } else {
            warn!("Path does not exist: {:?}", pages);
        }

        let task = tokio::spawn(Self::drive(runtime, rx, debounce));

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }

    /// Starts watching with the `[dev]` settings, or not at all when
    /// watching is disabled
    pub fn from_config(runtime: Arc<SiteRuntime>, dev: &DevConfig) -> Result<Option<Self>> {
        if !dev.watch {
            return Ok(None);
        }
        Self::spawn(runtime, Duration::from_millis(dev.debounce_ms)).map(Some)
    }

    /// Applies events from `rx` to `runtime` until the channel closes
    pub async fn drive(runtime: Arc<SiteRuntime>, mut rx: mpsc::Receiver<Event>, debounce: Duration) {
        while let Some(event) = rx.recv().await {
            let mut changes = classify(&event);

            while let Ok(Some(event)) = tokio::time::timeout(debounce, rx.recv()).await {
                changes.extend(classify(&event));
            }

            if changes.is_empty() {
                continue;
            }

            info!(changes = changes.len(), "Pages changed");
            if let Err(e) = runtime.apply(&changes).await {
                error!("Failed to apply page changes: {}", e);
            }
        }
    }
}

impl Drop for ManifestWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
