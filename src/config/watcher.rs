//! Manifest file watching for hot reload.
//!
//! # Responsibilities
//! - Watch the manifest file and reload it when it changes
//! - Collapse event bursts (editors and atomic renames emit several notify
//!   events per save) into one reload
//! - Diff the reloaded manifest against the last good one so the caller can
//!   rebuild only the distributors that actually changed
//!
//! # Design Decisions
//! - A reload that fails to parse or validate is logged and dropped; the
//!   previously delivered manifest stays authoritative
//! - The diff is per distributor: an untouched distributor never rebuilds

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_manifest;
use crate::config::validation::CompiledManifest;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// One delivered reload: the full manifest plus the distributors affected.
#[derive(Debug, Clone)]
pub struct ManifestUpdate {
    pub manifest: CompiledManifest,
    /// Distributor ids whose enable list, module set, or existence changed
    /// since the last delivered manifest. Ids no longer present in
    /// `manifest` were removed and should be retired.
    pub changed: Vec<String>,
}

/// Watches a manifest file and delivers debounced, diffed reloads.
pub struct ManifestWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ManifestWatcher {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Override the debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Start watching. Must be called within a tokio runtime.
    ///
    /// Returns the notify handle (watching stops when it is dropped) and the
    /// receiver for reloaded manifests.
    pub fn spawn(
        self,
    ) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<ManifestUpdate>), notify::Error> {
        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<()>();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let _ = tick_tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %self.path.display(), "Manifest watcher started");

        let path = self.path;
        let debounce = self.debounce;
        tokio::spawn(async move {
            let mut last: Option<CompiledManifest> = None;
            while tick_rx.recv().await.is_some() {
                // Drain the burst before reloading.
                loop {
                    match tokio::time::timeout(debounce, tick_rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) | Err(_) => break,
                    }
                }

                tracing::info!(path = %path.display(), "Manifest change detected, reloading");
                match load_manifest(&path) {
                    Ok(manifest) => {
                        let changed = changed_distributors(last.as_ref(), &manifest);
                        if changed.is_empty() {
                            tracing::debug!("Reloaded manifest is unchanged");
                            continue;
                        }
                        last = Some(manifest.clone());
                        if update_tx.send(ManifestUpdate { manifest, changed }).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to reload manifest: {}. Keeping current configuration.",
                            e
                        );
                    }
                }
            }
        });

        Ok((watcher, update_rx))
    }
}

/// Distributor ids affected by moving from `previous` to `next`.
///
/// With no previous manifest every distributor counts as changed. A change
/// to the shared module set affects every distributor; otherwise only those
/// whose enable list differs, plus any id that disappeared.
fn changed_distributors(
    previous: Option<&CompiledManifest>,
    next: &CompiledManifest,
) -> Vec<String> {
    let Some(prev) = previous else {
        return next.distributors.iter().map(|(id, _)| id.clone()).collect();
    };

    let mut changed: Vec<String> = if prev.modules != next.modules {
        next.distributors.iter().map(|(id, _)| id.clone()).collect()
    } else {
        next.distributors
            .iter()
            .filter(|(id, enabled)| {
                prev.distributors
                    .iter()
                    .find(|(prev_id, _)| prev_id == id)
                    .map_or(true, |(_, prev_enabled)| prev_enabled != enabled)
            })
            .map(|(id, _)| id.clone())
            .collect()
    };

    for (id, _) in &prev.distributors {
        if !next.distributors.iter().any(|(next_id, _)| next_id == id) {
            changed.push(id.clone());
        }
    }
    changed
}
