//! Filesystem-backed host used by the `scenery` binary and the tests.
//!
//! A world directory holds one JSON document per scene under `scenes/` and
//! image files anywhere below the root. File paths stored in scenes are
//! relative to the root and always use `/`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use scenery_core::Canvas;
use serde_json::Value;
use walkdir::WalkDir;

use crate::host::{
    flag_change, BrowseError, CanvasError, DirectoryListing, FileBrowser, NoticeLevel, Notifier,
    SceneChange, SceneDocument, SceneRepository, StorageError,
};

const SCENES_DIR: &str = "scenes";

#[derive(Debug, Clone)]
pub struct FsWorld {
    root: PathBuf,
}

impl FsWorld {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `scene` to disk, replacing any document with the same id.
    pub fn insert_scene(&self, scene: &SceneDocument) -> Result<(), StorageError> {
        let path = self.scene_path(&scene.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_scene(&path, scene)
    }

    fn scene_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::UnknownScene(id.to_string()));
        }
        Ok(self.root.join(SCENES_DIR).join(format!("{id}.json")))
    }

    fn modify_scene<F>(&self, id: &str, edit: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut SceneDocument),
    {
        let path = self.scene_path(id)?;
        let mut scene = read_scene(&path, id)?;
        edit(&mut scene);
        write_scene(&path, &scene)
    }
}

fn read_scene(path: &Path, id: &str) -> Result<SceneDocument, StorageError> {
    if !path.is_file() {
        return Err(StorageError::UnknownScene(id.to_string()));
    }
    let raw = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_scene(path: &Path, scene: &SceneDocument) -> Result<(), StorageError> {
    let serialized = serde_json::to_string_pretty(scene).map_err(|source| {
        StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, serialized).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl SceneRepository for FsWorld {
    fn scene(&self, id: &str) -> Result<SceneDocument, StorageError> {
        read_scene(&self.scene_path(id)?, id)
    }

    fn scenes(&self) -> Result<Vec<SceneDocument>, StorageError> {
        let dir = self.root.join(SCENES_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut scenes = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| StorageError::Io {
                path: dir.clone(),
                source: err.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("json")
            {
                continue;
            }
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            scenes.push(read_scene(path, &id)?);
        }
        Ok(scenes)
    }

    fn update_background(&mut self, id: &str, img: &str) -> Result<(), StorageError> {
        self.modify_scene(id, |scene| scene.img = img.to_string())
    }

    fn set_flag(
        &mut self,
        id: &str,
        scope: &str,
        key: &str,
        value: Value,
    ) -> Result<SceneChange, StorageError> {
        let change = flag_change(scope, key, value.clone());
        self.modify_scene(id, |scene| {
            scene
                .flags
                .entry(scope.to_string())
                .or_default()
                .insert(key.to_string(), value);
        })?;
        Ok(change)
    }
}

impl FileBrowser for FsWorld {
    fn browse(&self, target: &str) -> Result<DirectoryListing, BrowseError> {
        let target = target.trim_matches('/');
        let relative = Path::new(target);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(BrowseError::OutsideRoot(target.to_string()));
        }

        let dir = if self.root.join(relative).is_dir() {
            target
        } else {
            target.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
        };
        let full = self.root.join(dir);
        if !full.is_dir() {
            return Err(BrowseError::NotFound(dir.to_string()));
        }

        let mut listing = DirectoryListing {
            target: dir.to_string(),
            ..DirectoryListing::default()
        };
        for entry in WalkDir::new(&full)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| BrowseError::Io {
                path: dir.to_string(),
                source: err.into(),
            })?;
            let name = entry.file_name().to_string_lossy();
            let path = if dir.is_empty() {
                name.into_owned()
            } else {
                format!("{dir}/{name}")
            };
            if entry.file_type().is_dir() {
                listing.dirs.push(path);
            } else if entry.file_type().is_file() {
                listing.files.push(path);
            }
        }
        log::debug!(
            "browsed '{}': {} file(s), {} folder(s)",
            listing.target,
            listing.files.len(),
            listing.dirs.len()
        );
        Ok(listing)
    }
}

/// Canvas without a window: tracks the background pointer, verifies images
/// decode, and counts redraws.
#[derive(Debug, Clone)]
pub struct HeadlessCanvas {
    root: PathBuf,
    background: Option<String>,
    loaded: Vec<String>,
    draws: usize,
}

impl HeadlessCanvas {
    pub fn new(root: impl Into<PathBuf>, background: Option<String>) -> Self {
        Self {
            root: root.into(),
            background,
            loaded: Vec::new(),
            draws: 0,
        }
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl Canvas for HeadlessCanvas {
    type Error = CanvasError;

    fn set_background(&mut self, file: &str) {
        self.background = Some(file.to_string());
    }

    fn load_texture(&mut self, file: &str) -> Result<(), CanvasError> {
        if self.loaded.iter().any(|loaded| loaded == file) {
            return Ok(());
        }
        let path = self.root.join(file);
        let (width, height) =
            image::image_dimensions(&path).map_err(|err| CanvasError::ResourceLoad {
                path: file.to_string(),
                reason: err.to_string(),
            })?;
        log::debug!("loaded {file} ({width}x{height})");
        self.loaded.push(file.to_string());
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), CanvasError> {
        if self.background.is_none() {
            return Err(CanvasError::Draw("no background to draw".to_string()));
        }
        self.draws += 1;
        Ok(())
    }
}

/// Prints notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[scenery] {tag}: {message}");
    }
}
