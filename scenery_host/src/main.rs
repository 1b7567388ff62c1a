use anyhow::{bail, Context, Result};
use clap::Parser;
use scenery_core::RowId;
use scenery_host::directory::{DirectoryEntry, MenuAction, MenuSource};
use scenery_host::form::ConfigForm;
use scenery_host::hooks::{CanvasInit, ContextMenuBuild, DirectoryRender, SceneUpdate};
use scenery_host::host::{SceneRepository, Viewer};
use scenery_host::i18n::Localizer;
use scenery_host::world::{ConsoleNotifier, FsWorld, HeadlessCanvas};
use scenery_host::{HostContext, HostEvent, Scenery, SceneryConfig};

mod cli;
use cli::{Args, Command, EditArgs};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.world.join("scenery.json"));
    let config = SceneryConfig::from_json_file(&config_path)?;
    let localizer =
        Localizer::from_json_file(config.lang.as_deref()).context("loading language file")?;
    let scenery = Scenery::new(config, localizer);
    let mut world = FsWorld::open(args.world.clone());
    let viewer = if args.player {
        Viewer::player()
    } else {
        Viewer::game_master()
    };

    match args.command {
        Command::Scenes => list_scenes(&scenery, &world, viewer),
        Command::Menu { scene } => print_menu(&scenery, &world, viewer, &scene),
        Command::Show { scene } => show_scene(&scenery, &world, viewer, &scene),
        Command::Variations { scene } => {
            let form = scenery.activate(MenuAction::OpenSceneryConfig, &scene, viewer, &world)?;
            print_rows(&form);
            Ok(())
        }
        Command::Scan { scene } => {
            let mut form = ConfigForm::open(&world, &scene, viewer, scenery.localizer())?;
            let mut notifier = ConsoleNotifier;
            let found = form.scan(&world, &mut notifier, scenery.localizer())?;
            for id in found {
                if let Some(variation) = form.rows().get(id) {
                    println!("{:>3}  {:<24} {}", id, variation.name, variation.file);
                }
            }
            Ok(())
        }
        Command::Edit(edit) => edit_scene(&scenery, &mut world, viewer, edit),
    }
}

fn list_scenes(scenery: &Scenery, world: &FsWorld, viewer: Viewer) -> Result<()> {
    let scenes = world.scenes()?;
    let mut event = HostEvent::DirectoryRender(DirectoryRender {
        entries: scenes.iter().map(DirectoryEntry::from_scene).collect(),
    });
    let mut canvas = HeadlessCanvas::new(world.root(), None);
    let mut notifier = ConsoleNotifier;
    let mut ctx = HostContext {
        viewer,
        viewed_scene: None,
        scenes: world,
        canvas: &mut canvas,
        notifier: &mut notifier,
    };
    scenery.handle(&mut event, &mut ctx)?;

    if let HostEvent::DirectoryRender(render) = &event {
        for entry in &render.entries {
            match &entry.label {
                Some(label) => println!("{:<16} {} [{}]", entry.scene_id, entry.name, label.text),
                None => println!("{:<16} {}", entry.scene_id, entry.name),
            }
        }
    }
    Ok(())
}

fn print_menu(scenery: &Scenery, world: &FsWorld, viewer: Viewer, scene_id: &str) -> Result<()> {
    world.scene(scene_id)?;
    let mut event = HostEvent::ContextMenuBuild(ContextMenuBuild {
        source: MenuSource::SceneDirectory,
        entries: Vec::new(),
    });
    let mut canvas = HeadlessCanvas::new(world.root(), None);
    let mut notifier = ConsoleNotifier;
    let mut ctx = HostContext {
        viewer,
        viewed_scene: None,
        scenes: world,
        canvas: &mut canvas,
        notifier: &mut notifier,
    };
    scenery.handle(&mut event, &mut ctx)?;

    if let HostEvent::ContextMenuBuild(menu) = &event {
        for entry in menu.entries.iter().filter(|entry| entry.visible_to(viewer.is_gm())) {
            println!("{} ({})", entry.name, entry.icon);
        }
    }
    Ok(())
}

fn show_scene(scenery: &Scenery, world: &FsWorld, viewer: Viewer, scene_id: &str) -> Result<()> {
    let scene = world.scene(scene_id)?;
    let mut canvas = HeadlessCanvas::new(world.root(), Some(scene.img.clone()));
    let mut notifier = ConsoleNotifier;
    let mut ctx = HostContext {
        viewer,
        viewed_scene: Some(scene_id),
        scenes: world,
        canvas: &mut canvas,
        notifier: &mut notifier,
    };
    let mut event = HostEvent::CanvasInit(CanvasInit {
        scene_id: scene_id.to_string(),
    });
    scenery.handle(&mut event, &mut ctx)?;
    println!(
        "{} sees {}",
        role_label(viewer),
        canvas.background().unwrap_or_default()
    );
    Ok(())
}

fn edit_scene(scenery: &Scenery, world: &mut FsWorld, viewer: Viewer, edit: EditArgs) -> Result<()> {
    let localizer = scenery.localizer();
    let mut notifier = ConsoleNotifier;
    let mut form = ConfigForm::open(&*world, &edit.scene, viewer, localizer)?;

    for row in edit.remove {
        if form.remove_row(RowId(row)).is_none() {
            bail!("row {row} cannot be removed");
        }
    }
    for variation in edit.add {
        form.add_row(variation.name, variation.file);
    }
    if edit.scan {
        form.scan(&*world, &mut notifier, localizer)?;
    }
    if let Some(background) = edit.background {
        let default_row = form.rows().id_at(0).unwrap_or(RowId(0));
        form.rows_mut().set_file(default_row, background);
    }
    if let Some(row) = edit.gm {
        if !form.choose_gm(RowId(row)) {
            bail!("no row {row} to show to the GM");
        }
    }
    if let Some(row) = edit.pl {
        if !form.choose_player(RowId(row)) {
            bail!("no row {row} to show to players");
        }
    }

    let submitted = form.submit(world, &mut notifier, localizer)?;
    println!(
        "Saved {} variation(s) for {} (GM: {}, players: {})",
        submitted.set.variations.len(),
        edit.scene,
        submitted.set.gm_selection.file,
        submitted.set.pl_selection.file
    );

    // Treat the edited scene as the one on screen so the update hook redraws it.
    let scene = world.scene(&edit.scene)?;
    let mut canvas = HeadlessCanvas::new(world.root(), Some(scene.img));
    let mut ctx = HostContext {
        viewer,
        viewed_scene: Some(edit.scene.as_str()),
        scenes: &*world,
        canvas: &mut canvas,
        notifier: &mut notifier,
    };
    let mut event = HostEvent::SceneUpdate(SceneUpdate {
        scene_id: edit.scene.clone(),
        change: submitted.change,
    });
    match scenery.handle(&mut event, &mut ctx) {
        Ok(response) => {
            if let Some(background) = response.background {
                println!("Canvas now shows {background}");
            }
        }
        Err(err) => log::warn!("saved, but the canvas could not show the new background: {err}"),
    }
    Ok(())
}

fn print_rows(form: &ConfigForm) {
    for row in form.rows().iter() {
        let gm = if form.gm_choice() == Some(row.id) { 'G' } else { ' ' };
        let pl = if form.player_choice() == Some(row.id) { 'P' } else { ' ' };
        println!(
            "{:>3} {gm}{pl} {:<24} {}",
            row.id, row.variation.name, row.variation.file
        );
    }
}

fn role_label(viewer: Viewer) -> &'static str {
    if viewer.is_gm() {
        "GM"
    } else {
        "Player"
    }
}
