//! Reactions to host lifecycle hooks.
//!
//! The host turns each of its hook callbacks into a [`HostEvent`] and hands it
//! to [`Scenery::handle`] together with a [`HostContext`]. Handlers never reach
//! for global state; everything they touch arrives through the context.

use scenery_core::{apply, resolve, Canvas, VariationSet, FLAG_KEY, FLAG_SCOPE};
use thiserror::Error;

use crate::config::SceneryConfig;
use crate::directory::{annotate_entries, DirectoryEntry, MenuAction, MenuEntry, MenuSource};
use crate::form::{ConfigForm, FormError};
use crate::host::{
    property, CanvasError, NoticeLevel, Notifier, SceneChange, SceneRepository, StorageError,
    Viewer,
};
use crate::i18n::{self, Localizer};

/// The canvas finished initialising for a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasInit {
    pub scene_id: String,
}

/// A scene document was updated; `change` holds only the changed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneUpdate {
    pub scene_id: String,
    pub change: SceneChange,
}

/// The scene directory sidebar is being rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRender {
    pub entries: Vec<DirectoryEntry>,
}

/// A scene context menu is being assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuBuild {
    pub source: MenuSource,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    CanvasInit(CanvasInit),
    SceneUpdate(SceneUpdate),
    DirectoryRender(DirectoryRender),
    ContextMenuBuild(ContextMenuBuild),
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::CanvasInit(_) => "canvasInit",
            HostEvent::SceneUpdate(_) => "updateScene",
            HostEvent::DirectoryRender(_) => "renderSceneDirectory",
            HostEvent::ContextMenuBuild(_) => "getSceneContextOptions",
        }
    }
}

/// Everything a hook handler may touch.
pub struct HostContext<'a> {
    pub viewer: Viewer,
    /// Scene currently shown on the canvas, if any.
    pub viewed_scene: Option<&'a str>,
    pub scenes: &'a dyn SceneRepository,
    pub canvas: &'a mut dyn Canvas<Error = CanvasError>,
    pub notifier: &'a mut dyn Notifier,
}

/// What the host should do after a hook ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookResponse {
    /// Background the canvas now shows, when Scenery changed it.
    pub background: Option<String>,
    /// The scene directory should be rendered again.
    pub refresh_directory: bool,
    /// Number of directory entries that received a label.
    pub labelled: usize,
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// The Scenery module as registered with the host.
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    config: SceneryConfig,
    localizer: Localizer,
}

impl Scenery {
    pub fn new(config: SceneryConfig, localizer: Localizer) -> Self {
        Self { config, localizer }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Runs the reaction for `event`. Directory and menu payloads are edited
    /// in place.
    pub fn handle(
        &self,
        event: &mut HostEvent,
        ctx: &mut HostContext<'_>,
    ) -> Result<HookResponse, HookError> {
        log::debug!("handling {} hook", event.name());
        match event {
            HostEvent::CanvasInit(init) => self.on_canvas_init(init, ctx),
            HostEvent::SceneUpdate(update) => self.on_scene_update(update, ctx),
            HostEvent::DirectoryRender(render) => self.on_directory_render(render, ctx),
            HostEvent::ContextMenuBuild(menu) => {
                self.on_context_menu(menu);
                Ok(HookResponse::default())
            }
        }
    }

    /// Runs a menu entry Scenery added.
    pub fn activate(
        &self,
        action: MenuAction,
        scene_id: &str,
        viewer: Viewer,
        scenes: &dyn SceneRepository,
    ) -> Result<ConfigForm, FormError> {
        match action {
            MenuAction::OpenSceneryConfig => {
                ConfigForm::open(scenes, scene_id, viewer, &self.localizer)
            }
        }
    }

    fn on_canvas_init(
        &self,
        init: &CanvasInit,
        ctx: &mut HostContext<'_>,
    ) -> Result<HookResponse, HookError> {
        let scene = ctx.scenes.scene(&init.scene_id)?;
        let set = scene.variation_set();
        let Some(image) = resolve(set.as_ref(), ctx.viewer.role) else {
            return Ok(HookResponse::default());
        };
        // The host draws right after canvas init, so only the pointer moves.
        apply(&mut *ctx.canvas, image, false)?;
        Ok(HookResponse {
            background: Some(image.to_string()),
            ..HookResponse::default()
        })
    }

    fn on_scene_update(
        &self,
        update: &SceneUpdate,
        ctx: &mut HostContext<'_>,
    ) -> Result<HookResponse, HookError> {
        let mut response = HookResponse {
            refresh_directory: true,
            ..HookResponse::default()
        };
        if ctx.viewed_scene != Some(update.scene_id.as_str()) {
            return Ok(response);
        }
        let path = format!("flags.{FLAG_SCOPE}.{FLAG_KEY}");
        let Some(data) = property(&update.change, &path) else {
            return Ok(response);
        };
        let set = match VariationSet::from_flag(Some(data)) {
            Ok(set) => set,
            Err(err) => {
                log::warn!("ignoring malformed scenery update for {}: {err}", update.scene_id);
                return Ok(response);
            }
        };
        let Some(image) = resolve(set.as_ref(), ctx.viewer.role) else {
            return Ok(response);
        };

        log::info!("{}: {image}", self.localizer.localize(i18n::LOADING));
        if let Err(err) = apply(&mut *ctx.canvas, image, true) {
            log::error!("failed to show {image} for scene {}: {err}", update.scene_id);
            ctx.notifier.notify(NoticeLevel::Error, &err.to_string());
            return Err(err.into());
        }
        response.background = Some(image.to_string());
        Ok(response)
    }

    fn on_directory_render(
        &self,
        render: &mut DirectoryRender,
        ctx: &mut HostContext<'_>,
    ) -> Result<HookResponse, HookError> {
        if !self.config.show_variations_label {
            return Ok(HookResponse::default());
        }
        let scenes = ctx.scenes.scenes()?;
        let labelled = annotate_entries(&mut render.entries, &scenes);
        Ok(HookResponse {
            labelled,
            ..HookResponse::default()
        })
    }

    fn on_context_menu(&self, menu: &mut ContextMenuBuild) {
        log::debug!("adding scenery entry to {:?} menu", menu.source);
        menu.entries
            .push(MenuEntry::scenery(self.localizer.localize(i18n::APP_NAME)));
    }
}
