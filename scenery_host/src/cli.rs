use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use scenery_core::Variation;

#[derive(Parser, Debug)]
#[command(
    about = "Manage alternate background images of scenes in a world directory",
    version
)]
pub struct Args {
    /// World directory containing scenes/ and the image files
    #[arg(long, default_value = ".")]
    pub world: PathBuf,

    /// Settings file (default: <world>/scenery.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Act as a player instead of the GM
    #[arg(long, global = true)]
    pub player: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List scenes, labelling those with variations
    Scenes,
    /// Print the context menu entries offered for a scene
    Menu { scene: String },
    /// Initialise the canvas for a scene and print the background shown
    Show { scene: String },
    /// Print the configuration rows of a scene
    Variations { scene: String },
    /// Print variations found next to the scene's default image without saving
    Scan { scene: String },
    /// Edit and save the variations of a scene
    Edit(EditArgs),
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    pub scene: String,

    /// Replace the default background image
    #[arg(long)]
    pub background: Option<String>,

    /// Append a variation, given as NAME=FILE
    #[arg(long = "add", value_name = "NAME=FILE", value_parser = parse_variation)]
    pub add: Vec<Variation>,

    /// Remove the row with this id (see `variations`)
    #[arg(long = "remove", value_name = "ROW")]
    pub remove: Vec<u32>,

    /// Scan for variations before saving
    #[arg(long)]
    pub scan: bool,

    /// Row id the GM sees
    #[arg(long, value_name = "ROW")]
    pub gm: Option<u32>,

    /// Row id players see
    #[arg(long = "pl", value_name = "ROW")]
    pub pl: Option<u32>,
}

fn parse_variation(value: &str) -> Result<Variation> {
    let Some((name, file)) = value.split_once('=') else {
        bail!("expected NAME=FILE, got '{value}'");
    };
    Ok(Variation::new(name.trim(), file.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_arguments_parse() {
        let args = Args::try_parse_from([
            "scenery",
            "--world",
            "w",
            "edit",
            "tavern",
            "--add",
            "Night=maps/tavern_night.webp",
            "--add",
            "=maps/x.webp",
            "--remove",
            "2",
            "--gm",
            "1",
            "--pl",
            "0",
        ])
        .unwrap();
        let Command::Edit(edit) = args.command else {
            panic!("expected edit command");
        };
        assert_eq!(edit.scene, "tavern");
        assert_eq!(
            edit.add,
            vec![
                Variation::new("Night", "maps/tavern_night.webp"),
                Variation::new("", "maps/x.webp"),
            ]
        );
        assert_eq!(edit.remove, vec![2]);
        assert_eq!((edit.gm, edit.pl), (Some(1), Some(0)));
        assert!(!args.player);
    }

    #[test]
    fn variation_without_separator_is_rejected() {
        assert!(parse_variation("just-a-file.webp").is_err());
    }
}
