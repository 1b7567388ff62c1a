//! The variation configuration form of a single scene.

use scenery_core::{commit, scan, RowId, ValidationError, Variation, VariationRows, VariationSet};
use scenery_core::{FLAG_KEY, FLAG_SCOPE};
use thiserror::Error;

use crate::host::{
    BrowseError, FileBrowser, NoticeLevel, Notifier, SceneChange, SceneRepository, StorageError,
    Viewer,
};
use crate::i18n::{self, Localizer};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("only a GM can configure scene variations")]
    GmOnly,
    #[error(transparent)]
    MissingSelection(#[from] ValidationError),
    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(#[from] BrowseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The background was updated but the variation data was not written.
    #[error("scene '{scene}' background updated but variation data was not saved: {source}")]
    PartialCommit {
        scene: String,
        #[source]
        source: StorageError,
    },
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub set: VariationSet,
    /// Change object to broadcast through the scene update hook.
    pub change: SceneChange,
}

/// Editing session over one scene's variations.
///
/// GM and player choices remember the row they point at, so deleting or adding
/// other rows does not move them.
#[derive(Debug, Clone)]
pub struct ConfigForm {
    scene_id: String,
    rows: VariationRows,
    gm: Option<RowId>,
    pl: Option<RowId>,
}

impl ConfigForm {
    /// Opens the form for `scene_id`, seeding rows from stored data or from
    /// the scene's current background.
    pub fn open(
        scenes: &dyn SceneRepository,
        scene_id: &str,
        viewer: Viewer,
        localizer: &Localizer,
    ) -> Result<Self, FormError> {
        if !viewer.is_gm() {
            return Err(FormError::GmOnly);
        }
        let scene = scenes.scene(scene_id)?;
        let set = VariationSet::load(scene.variation_set(), &scene.img);
        let rows = VariationRows::from_set(&set, &localizer.localize(i18n::DEFAULT));
        let gm = preselect(&rows, set.gm_selection.index, &set.gm_selection.file);
        let pl = preselect(&rows, set.pl_selection.index, &set.pl_selection.file);
        log::debug!(
            "opened scenery form for {scene_id} with {} row(s)",
            rows.len()
        );
        Ok(Self {
            scene_id: scene_id.to_string(),
            rows,
            gm,
            pl,
        })
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn rows(&self) -> &VariationRows {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut VariationRows {
        &mut self.rows
    }

    pub fn gm_choice(&self) -> Option<RowId> {
        self.gm
    }

    pub fn player_choice(&self) -> Option<RowId> {
        self.pl
    }

    pub fn choose_gm(&mut self, row: RowId) -> bool {
        let known = self.rows.get(row).is_some();
        if known {
            self.gm = Some(row);
        }
        known
    }

    pub fn choose_player(&mut self, row: RowId) -> bool {
        let known = self.rows.get(row).is_some();
        if known {
            self.pl = Some(row);
        }
        known
    }

    pub fn add_row(&mut self, name: impl Into<String>, file: impl Into<String>) -> RowId {
        self.rows.add_row(name, file)
    }

    pub fn remove_row(&mut self, row: RowId) -> Option<Variation> {
        self.rows.remove_row(row)
    }

    /// Image to show in a preview window for `row`, if it has one.
    pub fn preview(&self, row: RowId) -> Option<&str> {
        let file = self.rows.get(row)?.file.trim();
        (!file.is_empty()).then_some(file)
    }

    /// Looks for variations next to the default image and appends them.
    ///
    /// When the directory cannot be listed the user is told and the rows stay
    /// exactly as they were.
    pub fn scan(
        &mut self,
        files: &dyn FileBrowser,
        notifier: &mut dyn Notifier,
        localizer: &Localizer,
    ) -> Result<Vec<RowId>, FormError> {
        let reference = self
            .rows
            .default_row()
            .map(|row| row.variation.file.clone())
            .unwrap_or_default();
        let listing = match files.browse(&reference) {
            Ok(listing) => listing,
            Err(err) => {
                log::warn!("scan of {reference} failed: {err}");
                notifier.notify(
                    NoticeLevel::Error,
                    &localizer.format(i18n::ERROR_SCAN, &[("path", reference.as_str())]),
                );
                return Err(err.into());
            }
        };
        let found = scan(&reference, &self.rows.files(), &listing.files);
        let count = found.len().to_string();
        let ids = self.rows.merge_scanned(found);
        notifier.notify(
            NoticeLevel::Info,
            &localizer.format(i18n::SCAN_FOUND, &[("count", count.as_str())]),
        );
        Ok(ids)
    }

    /// Validates the rows and stores them on the scene.
    ///
    /// The scene background is written first, then the flag. If the flag write
    /// fails after the background succeeded, the user is notified and
    /// [`FormError::PartialCommit`] is returned.
    pub fn submit(
        &self,
        scenes: &mut dyn SceneRepository,
        notifier: &mut dyn Notifier,
        localizer: &Localizer,
    ) -> Result<Submitted, FormError> {
        let rows = self.rows.to_variations();
        let gm_index = self.choice_position(self.gm);
        let pl_index = self.choice_position(self.pl);
        let set = match commit(&rows, gm_index, pl_index) {
            Ok(set) => set,
            Err(err) => {
                notifier.notify(NoticeLevel::Error, &localizer.localize(i18n::ERROR_SELECTION));
                return Err(err.into());
            }
        };

        scenes.update_background(&self.scene_id, &set.background)?;
        let change = match scenes.set_flag(&self.scene_id, FLAG_SCOPE, FLAG_KEY, set.to_flag()) {
            Ok(change) => change,
            Err(source) => {
                log::error!(
                    "scene {} background saved but variations were not: {source}",
                    self.scene_id
                );
                notifier.notify(
                    NoticeLevel::Error,
                    &localizer.format(i18n::ERROR_PARTIAL_SAVE, &[("scene", self.scene_id.as_str())]),
                );
                return Err(FormError::PartialCommit {
                    scene: self.scene_id.clone(),
                    source,
                });
            }
        };
        log::info!(
            "saved {} variation(s) for scene {}",
            set.variations.len(),
            self.scene_id
        );
        Ok(Submitted { set, change })
    }

    /// Position of the chosen row; a missing choice maps past the end so the
    /// commit reports it as unselected.
    fn choice_position(&self, choice: Option<RowId>) -> usize {
        choice
            .and_then(|row| self.rows.position(row))
            .unwrap_or(self.rows.len())
    }
}

/// Row a stored selection points at: its recorded position when the file
/// still matches, else the first row holding that file, else the default row.
fn preselect(rows: &VariationRows, index: usize, file: &str) -> Option<RowId> {
    let at_index = rows
        .id_at(index)
        .filter(|id| rows.get(*id).is_some_and(|row| row.file == file));
    at_index
        .or_else(|| {
            rows.iter()
                .find(|row| row.variation.file == file)
                .map(|row| row.id)
        })
        .or_else(|| rows.id_at(0))
}
