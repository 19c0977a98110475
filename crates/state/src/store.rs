//! Durable state: one JSON document, loaded whole and replaced whole.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use mwatch_extract::LatestEpisode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Newest state file layout this build understands.
pub const CURRENT_VERSION: u32 = 1;

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// The last confirmed observation of one tracked work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    pub latest: LatestEpisode,
    /// Unix seconds of the run that last confirmed `latest`.
    #[serde(default)]
    pub seen_at: i64,
}

/// Everything mwatch remembers, keyed by identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFile {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub items: BTreeMap<String, PersistedEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<i64>,
}
impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            items: BTreeMap::new(),
            last_run_at: None,
        }
    }
}
impl StateFile {
    /// Stamp the end of a run. Older layouts are upgraded on the next save.
    pub fn finish_run(&mut self, now: i64) {
        self.version = CURRENT_VERSION;
        self.last_run_at = Some(now);
    }
}

/// Location of the state file, with whole-file load and atomic save.
///
/// There is no locking: concurrent runs against the same path must be
/// serialized by the caller.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}
impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state file, or an empty state if it does not exist yet.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Read`] if the file exists but cannot be read.
    /// - [`ErrorKind::Corrupt`] if it is not valid state JSON.
    /// - [`ErrorKind::UnsupportedVersion`] if a newer mwatch wrote it.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<StateFile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                debug!("no state file yet, starting empty");
                return Ok(StateFile::default());
            },
            Err(err) => return Err(err).or_raise(|| ErrorKind::Read(self.path.clone())),
        };
        let state: StateFile = serde_json::from_str(&raw).or_raise(|| ErrorKind::Corrupt(self.path.clone()))?;
        if state.version > CURRENT_VERSION {
            exn::bail!(ErrorKind::UnsupportedVersion {
                found: state.version,
                supported: CURRENT_VERSION,
            });
        }
        debug!(items = state.items.len(), "loaded state");
        Ok(state)
    }

    /// Replace the state file with `state`.
    ///
    /// The document is written to a temporary file beside the target and
    /// renamed over it, so readers see either the old file or the new one.
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Write`] if any step fails; the previous file is left intact.
    #[instrument(level = "debug", skip(self, state), fields(path = %self.path.display(), items = state.items.len()))]
    pub fn save(&self, state: &StateFile) -> Result<()> {
        let error = || ErrorKind::Write(self.path.clone());
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).or_raise(error)?;
        let mut file = NamedTempFile::new_in(parent).or_raise(error)?;
        serde_json::to_writer_pretty(&mut file, state).or_raise(error)?;
        file.write_all(b"\n").or_raise(error)?;
        file.as_file().sync_all().or_raise(error)?;
        file.persist(&self.path).or_raise(error)?;
        debug!("saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mwatch_extract::models::SERIES;
    use rstest::rstest;
    use tempfile::TempDir;

    fn sample() -> StateFile {
        let latest = LatestEpisode::new("https://comic-walker.com/detail/KC_003913_S/episodes/KC_0039130008900011_E")
            .with_series_title(Some("航宙軍士官、冒険者になる".to_string()))
            .with_episode_title(Some("第61話".to_string()))
            .with_episode_code("KC_0039130008900011_E")
            .with_extra(SERIES, Some("KC_003913_S"));
        let mut state = StateFile::default();
        state.items.insert(
            "KC_003913_S".to_string(),
            PersistedEntry {
                latest,
                seen_at: 1_767_225_600,
            },
        );
        state.finish_run(1_767_225_600);
        state
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let state = store.load().unwrap();
        assert_eq!(state, StateFile::default());
        assert!(!store.path().exists(), "loading must not create the file");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("nested/deeper/state.json"));
        let state = sample();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_saved_layout() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&sample()).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        // Pretty-printed, non-ASCII kept as-is, camelCase keys.
        assert!(raw.contains("\n  \"version\": 1"));
        assert!(raw.contains("航宙軍士官"));
        assert!(raw.contains("\"seenAt\": 1767225600"));
        assert!(raw.contains("\"lastRunAt\": 1767225600"));
        assert!(raw.contains("\"episodeCode\": \"KC_0039130008900011_E\""));
        assert!(raw.contains("\"series\": \"KC_003913_S\""));
    }

    #[test]
    fn test_save_replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&sample()).unwrap();
        store.save(&StateFile::default()).unwrap();
        assert!(store.load().unwrap().items.is_empty());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files must not be left behind");
    }

    #[rstest]
    #[case::nulls(r#"{"version":1,"items":{"k":{"latest":{"seriesTitle":null,"episodeTitle":null,"episodeCode":null,"url":"u"},"seenAt":5}},"lastRunAt":null}"#)]
    #[case::no_version(r#"{"items":{"k":{"latest":{"url":"u"},"seenAt":5}}}"#)]
    fn test_tolerant_load(#[case] raw: &str) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        fs::write(store.path(), raw).unwrap();
        let state = store.load().unwrap();
        assert_eq!(state.version, CURRENT_VERSION);
        assert_eq!(state.last_run_at, None);
        let entry = &state.items["k"];
        assert_eq!(entry.latest.url, "u");
        assert_eq!(entry.latest.series_title, None);
        assert_eq!(entry.seen_at, 5);
    }

    #[rstest]
    #[case::not_json("{ this is not json", ErrorKind::Corrupt(PathBuf::new()))]
    #[case::wrong_shape(r#"{"items": []}"#, ErrorKind::Corrupt(PathBuf::new()))]
    #[case::newer(r#"{"version": 2, "items": {}}"#, ErrorKind::UnsupportedVersion { found: 2, supported: 1 })]
    fn test_rejected_load(#[case] raw: &str, #[case] expected: ErrorKind) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        fs::write(store.path(), raw).unwrap();
        let err = store.load().unwrap_err();
        match expected {
            ErrorKind::Corrupt(_) => assert_eq!(*err, ErrorKind::Corrupt(store.path().to_path_buf())),
            expected => assert_eq!(*err, expected),
        }
    }
}
