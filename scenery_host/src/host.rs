//! Collaborator surface the host application provides to Scenery.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use scenery_core::{VariationSet, ViewerRole, FLAG_KEY, FLAG_SCOPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A scene as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Primary background image of the scene.
    #[serde(default)]
    pub img: String,
    /// Module-namespaced flag storage: `flags[scope][key]`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, BTreeMap<String, Value>>,
}

impl SceneDocument {
    pub fn new(id: impl Into<String>, name: impl Into<String>, img: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            img: img.into(),
            flags: BTreeMap::new(),
        }
    }

    pub fn flag(&self, scope: &str, key: &str) -> Option<&Value> {
        self.flags.get(scope).and_then(|entries| entries.get(key))
    }

    /// Stored Scenery data, if any. Unreadable data counts as absent.
    pub fn variation_set(&self) -> Option<VariationSet> {
        match VariationSet::from_flag(self.flag(FLAG_SCOPE, FLAG_KEY)) {
            Ok(set) => set,
            Err(err) => {
                log::warn!("scene {} has unreadable scenery data: {err}", self.id);
                None
            }
        }
    }
}

/// Dotted-path change description handed to scene update hooks, e.g.
/// `{"flags": {"scenery": {"data": {...}}}}`.
pub type SceneChange = Value;

/// Builds the change object for a flag write.
pub fn flag_change(scope: &str, key: &str, value: Value) -> SceneChange {
    serde_json::json!({ "flags": { scope: { key: value } } })
}

/// Value at the dotted `path` of `change` (`flags.scenery.data`), if present.
pub fn property<'a>(change: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(change, |value, segment| value.as_object()?.get(segment))
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("scene '{0}' does not exist")]
    UnknownScene(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scene document {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scene documents and their flags.
pub trait SceneRepository {
    fn scene(&self, id: &str) -> Result<SceneDocument, StorageError>;

    fn scenes(&self) -> Result<Vec<SceneDocument>, StorageError>;

    fn update_background(&mut self, id: &str, img: &str) -> Result<(), StorageError>;

    /// Writes a flag and returns the change object the host broadcasts.
    fn set_flag(
        &mut self,
        id: &str,
        scope: &str,
        key: &str,
        value: Value,
    ) -> Result<SceneChange, StorageError>;
}

/// Files and folders found at a browsed location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Directory that was listed, relative to the data root.
    pub target: String,
    pub dirs: Vec<String>,
    /// Full paths of the files, relative to the data root.
    pub files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("directory '{0}' does not exist")]
    NotFound(String),
    #[error("path '{0}' escapes the data root")]
    OutsideRoot(String),
    #[error("failed to list '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// The host's file-storage browser.
pub trait FileBrowser {
    /// Lists the directory named by `target`, or the directory containing it
    /// when `target` names a file.
    fn browse(&self, target: &str) -> Result<DirectoryListing, BrowseError>;
}

/// Failures of the host renderer.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("failed to load image '{path}': {reason}")]
    ResourceLoad { path: String, reason: String },
    #[error("canvas redraw failed: {0}")]
    Draw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Toast-style messages shown to the user.
pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// The user the host is rendering for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub role: ViewerRole,
}

impl Viewer {
    pub fn game_master() -> Self {
        Self {
            role: ViewerRole::GameMaster,
        }
    }

    pub fn player() -> Self {
        Self {
            role: ViewerRole::Player,
        }
    }

    pub fn is_gm(&self) -> bool {
        self.role.is_gm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_walks_dotted_paths() {
        let change = flag_change("scenery", "data", json!({ "bg": "a.webp" }));
        assert!(property(&change, "flags.scenery.data").is_some());
        assert!(property(&change, "flags.other.data").is_none());
        assert_eq!(
            property(&change, "flags.scenery.data.bg"),
            Some(&json!("a.webp"))
        );
        assert!(property(&json!({ "img": "x" }), "flags.scenery.data").is_none());
    }

    #[test]
    fn documents_expose_stored_sets() {
        let mut scene = SceneDocument::new("s1", "Tavern", "maps/tavern.webp");
        assert_eq!(scene.variation_set(), None);

        scene
            .flags
            .entry("scenery".into())
            .or_default()
            .insert("data".into(), json!({ "bg": "maps/tavern.webp", "variations": [] }));
        let set = scene.variation_set().unwrap();
        assert_eq!(set.background, "maps/tavern.webp");

        scene
            .flags
            .entry("scenery".into())
            .or_default()
            .insert("data".into(), json!("not an object"));
        assert_eq!(scene.variation_set(), None);
    }
}
