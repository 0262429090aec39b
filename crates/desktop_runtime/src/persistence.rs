//! Layout snapshot capture, validation and storage through [`platform_host::PrefsStore`].

use platform_host::{PrefsStore, StorageError};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    config::PersistenceConfig,
    geometry::{CssLength, WindowGeometry},
    model::DesktopState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopSnapshot {
    pub version: String,
    pub timestamp: u64,
    pub open_windows: Vec<SavedWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub left: CssLength,
    pub top: CssLength,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSize {
    pub width: CssLength,
    pub height: CssLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWindowState {
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default)]
    pub is_minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWindow {
    pub title: String,
    pub content_path: String,
    #[serde(default)]
    pub icon_url: String,
    pub position: SavedPosition,
    pub size: SavedSize,
    #[serde(default)]
    pub state: SavedWindowState,
    #[serde(deserialize_with = "de_z_index")]
    pub z_index: u32,
    /// Pre-maximize geometry, written only for maximized windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore: Option<WindowGeometry>,
}

impl SavedWindow {
    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry {
            left: self.position.left.clone(),
            top: self.position.top.clone(),
            width: self.size.width.clone(),
            height: self.size.height.clone(),
        }
    }
}

/// Accepts the z-index either as a number or as its decimal string form.
fn de_z_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(z) => Ok(z),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a stored snapshot is discarded instead of restored.
pub enum SnapshotRejection {
    #[error("snapshot is not valid JSON: {0}")]
    Corrupt(String),
    #[error("snapshot version {found} does not match {expected}")]
    VersionMismatch { found: String, expected: String },
    #[error("snapshot is {age_ms} ms old")]
    Expired { age_ms: u64 },
}

/// Captures every open window, back to front.
pub fn capture_snapshot(state: &DesktopState, version: &str, timestamp: u64) -> DesktopSnapshot {
    let mut windows: Vec<_> = state.windows.iter().collect();
    windows.sort_by_key(|w| w.z_index);
    DesktopSnapshot {
        version: version.to_string(),
        timestamp,
        open_windows: windows
            .into_iter()
            .map(|w| SavedWindow {
                title: w.title.clone(),
                content_path: w.content.as_str().to_string(),
                icon_url: w.icon_url.clone().unwrap_or_default(),
                position: SavedPosition {
                    left: w.geometry.left.clone(),
                    top: w.geometry.top.clone(),
                },
                size: SavedSize {
                    width: w.geometry.width.clone(),
                    height: w.geometry.height.clone(),
                },
                state: SavedWindowState {
                    is_maximized: w.flags.maximized,
                    is_minimized: w.flags.minimized,
                },
                z_index: w.z_index,
                restore: w.restore_geometry.clone(),
            })
            .collect(),
    }
}

/// Parses and validates a stored snapshot.
///
/// # Errors
///
/// Rejects unparseable documents, documents written under another schema version, and snapshots
/// older than `config.max_age_ms`.
pub fn validate_snapshot(
    raw: &str,
    config: &PersistenceConfig,
    now_ms: u64,
) -> Result<DesktopSnapshot, SnapshotRejection> {
    let snapshot: DesktopSnapshot =
        serde_json::from_str(raw).map_err(|e| SnapshotRejection::Corrupt(e.to_string()))?;
    if snapshot.version != config.schema_version {
        return Err(SnapshotRejection::VersionMismatch {
            found: snapshot.version,
            expected: config.schema_version.clone(),
        });
    }
    let age_ms = platform_host::elapsed_ms_since(snapshot.timestamp, now_ms);
    if age_ms > config.max_age_ms {
        return Err(SnapshotRejection::Expired { age_ms });
    }
    Ok(snapshot)
}

/// Loads the stored snapshot. Rejected snapshots are deleted and logged; storage failures are
/// logged and treated as "nothing stored".
pub async fn load_snapshot(
    store: &dyn PrefsStore,
    config: &PersistenceConfig,
    now_ms: u64,
) -> Option<DesktopSnapshot> {
    let raw = match store.load_pref(&config.storage_key).await {
        Ok(raw) => raw?,
        Err(err) => {
            leptos::logging::warn!("desktop state load failed: {err}");
            return None;
        }
    };
    match validate_snapshot(&raw, config, now_ms) {
        Ok(snapshot) => Some(snapshot),
        Err(rejection) => {
            leptos::logging::warn!("discarding stored desktop state: {rejection}");
            if let Err(err) = store.delete_pref(&config.storage_key).await {
                leptos::logging::warn!("clearing stored desktop state failed: {err}");
            }
            None
        }
    }
}

/// Writes a snapshot of `state`, returning the number of bytes stored.
///
/// When the store reports its quota exhausted, the previous snapshot is cleared and the write
/// is dropped.
///
/// # Errors
///
/// Returns the storage error of a failed write.
pub async fn save_snapshot(
    store: &dyn PrefsStore,
    config: &PersistenceConfig,
    state: &DesktopState,
    now_ms: u64,
) -> Result<usize, StorageError> {
    let snapshot = capture_snapshot(state, &config.schema_version, now_ms);
    let raw =
        serde_json::to_string(&snapshot).map_err(|e| StorageError::Serialization(e.to_string()))?;
    match store.save_pref(&config.storage_key, &raw).await {
        Ok(()) => Ok(raw.len()),
        Err(StorageError::QuotaExceeded) => {
            leptos::logging::warn!("desktop state exceeds storage quota; clearing saved state");
            if let Err(err) = store.delete_pref(&config.storage_key).await {
                leptos::logging::warn!("clearing stored desktop state failed: {err}");
            }
            Err(StorageError::QuotaExceeded)
        }
        Err(err) => Err(err),
    }
}

/// Deletes the stored snapshot.
///
/// # Errors
///
/// Returns the storage error of a failed delete.
pub async fn clear_snapshot(
    store: &dyn PrefsStore,
    config: &PersistenceConfig,
) -> Result<(), StorageError> {
    store.delete_pref(&config.storage_key).await
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Trailing-edge debouncer for layout saves.
///
/// Every change takes a ticket; when a timer fires, only the newest ticket writes.
pub struct SaveDebouncer {
    latest: u64,
    fired: u64,
}

impl SaveDebouncer {
    /// Records a change and returns its ticket.
    pub fn schedule(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether the timer for `ticket` should write. Consumes the ticket.
    pub fn fire(&mut self, ticket: u64) -> bool {
        if ticket != self.latest || self.fired == ticket {
            return false;
        }
        self.fired = ticket;
        true
    }

    /// Whether a scheduled write has not fired yet.
    pub fn pending(&self) -> bool {
        self.latest != self.fired
    }

    /// Marks everything scheduled so far as written (used after an immediate save).
    pub fn flush(&mut self) {
        self.fired = self.latest;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn stored(version: &str, timestamp: u64) -> String {
        serde_json::json!({
            "version": version,
            "timestamp": timestamp,
            "openWindows": [{
                "title": "Notes",
                "contentPath": "notes.html",
                "iconUrl": "",
                "position": {"left": "40px", "top": "60px"},
                "size": {"width": "500px", "height": "400px"},
                "state": {"isMaximized": false, "isMinimized": true},
                "zIndex": "1004"
            }]
        })
        .to_string()
    }

    #[test]
    fn validation_accepts_string_z_index() {
        let config = PersistenceConfig::default();
        let snapshot = validate_snapshot(&stored("1.1", NOW - 1_000), &config, NOW).expect("valid");
        let window = &snapshot.open_windows[0];
        assert_eq!(window.z_index, 1004);
        assert!(window.state.is_minimized);
        assert_eq!(window.restore, None);
        assert_eq!(
            window.geometry(),
            WindowGeometry::from_css("40px", "60px", "500px", "400px")
        );
    }

    #[test]
    fn validation_rejects_stale_mismatched_and_corrupt_documents() {
        let config = PersistenceConfig::default();
        let day = config.max_age_ms;
        assert!(matches!(
            validate_snapshot(&stored("1.1", NOW - day - 1), &config, NOW),
            Err(SnapshotRejection::Expired { .. })
        ));
        assert!(validate_snapshot(&stored("1.1", NOW - day), &config, NOW).is_ok());
        assert!(matches!(
            validate_snapshot(&stored("1.0", NOW), &config, NOW),
            Err(SnapshotRejection::VersionMismatch { .. })
        ));
        assert!(matches!(
            validate_snapshot("{not json", &config, NOW),
            Err(SnapshotRejection::Corrupt(_))
        ));
    }

    #[test]
    fn rejected_snapshots_are_cleared_on_load() {
        let config = PersistenceConfig::default();
        let store = MemoryPrefsStore::default();
        store.insert_raw(&config.storage_key, &stored("0.9", NOW));
        assert_eq!(block_on(load_snapshot(&store, &config, NOW)), None);
        assert_eq!(store.raw(&config.storage_key), None);
    }

    #[test]
    fn quota_failure_clears_previous_state() {
        let config = PersistenceConfig::default();
        let store = MemoryPrefsStore::with_quota(16);
        store.insert_raw(&config.storage_key, "{}");
        let err = block_on(save_snapshot(&store, &config, &DesktopState::default(), NOW))
            .expect_err("quota");
        assert_eq!(err, StorageError::QuotaExceeded);
        assert_eq!(store.raw(&config.storage_key), None);
    }

    #[test]
    fn saved_snapshot_loads_back_until_cleared() {
        let config = PersistenceConfig::default();
        let store = MemoryPrefsStore::default();
        let mut state = DesktopState::default();
        crate::window_manager::create_window(
            &mut state,
            &crate::model::OpenWindowRequest::new("Notes", "hello"),
        )
        .unwrap();

        block_on(save_snapshot(&store, &config, &state, NOW)).unwrap();
        let loaded = block_on(load_snapshot(&store, &config, NOW + 5)).expect("stored");
        assert_eq!(loaded, capture_snapshot(&state, "1.1", NOW));

        block_on(clear_snapshot(&store, &config)).unwrap();
        assert_eq!(block_on(load_snapshot(&store, &config, NOW + 5)), None);
    }

    #[test]
    fn debouncer_writes_only_the_latest_ticket_once() {
        let mut debouncer = SaveDebouncer::default();
        let first = debouncer.schedule();
        let second = debouncer.schedule();
        assert!(debouncer.pending());
        assert!(!debouncer.fire(first));
        assert!(debouncer.fire(second));
        assert!(!debouncer.fire(second));
        assert!(!debouncer.pending());

        debouncer.schedule();
        debouncer.flush();
        assert!(!debouncer.pending());
    }
}
