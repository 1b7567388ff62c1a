use crate::host::SceneDocument;

pub const MENU_ICON: &str = "fas fa-images";
pub const LABEL_ICON: &str = "fa fa-images";

/// One scene row of the host's scene directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub scene_id: String,
    pub name: String,
    /// Badge prepended to the entry, if any module added one.
    pub label: Option<EntryLabel>,
}

impl DirectoryEntry {
    pub fn from_scene(scene: &SceneDocument) -> Self {
        Self {
            scene_id: scene.id.clone(),
            name: scene.name.clone(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLabel {
    pub icon: &'static str,
    pub text: String,
}

/// Labels every entry whose scene has at least one stored variation with the
/// number of images it can show (the default counts).
pub fn annotate_entries(entries: &mut [DirectoryEntry], scenes: &[SceneDocument]) -> usize {
    let mut labelled = 0;
    for entry in entries.iter_mut() {
        let Some(scene) = scenes.iter().find(|scene| scene.id == entry.scene_id) else {
            continue;
        };
        let Some(set) = scene.variation_set() else {
            continue;
        };
        if set.variations.is_empty() {
            continue;
        }
        entry.label = Some(EntryLabel {
            icon: LABEL_ICON,
            text: set.image_count().to_string(),
        });
        labelled += 1;
    }
    labelled
}

/// Which host menu is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    SceneDirectory,
    SceneNavigation,
}

/// What a menu entry does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenSceneryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: String,
    pub icon: &'static str,
    pub gm_only: bool,
    pub action: MenuAction,
}

impl MenuEntry {
    pub fn scenery(name: String) -> Self {
        Self {
            name,
            icon: MENU_ICON,
            gm_only: true,
            action: MenuAction::OpenSceneryConfig,
        }
    }

    /// Whether the entry is shown to a viewer.
    pub fn visible_to(&self, is_gm: bool) -> bool {
        !self.gm_only || is_gm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenery_core::{Variation, VariationSet, FLAG_KEY, FLAG_SCOPE};

    fn scene_with(id: &str, variations: Vec<Variation>) -> SceneDocument {
        let mut scene = SceneDocument::new(id, id, "bg.webp");
        let set = VariationSet {
            variations,
            ..VariationSet::with_background("bg.webp")
        };
        scene
            .flags
            .entry(FLAG_SCOPE.to_string())
            .or_default()
            .insert(FLAG_KEY.to_string(), set.to_flag());
        scene
    }

    #[test]
    fn only_scenes_with_variations_get_labels() {
        let scenes = vec![
            scene_with("a", vec![Variation::new("Night", "n.webp"), Variation::new("", "r.webp")]),
            scene_with("b", Vec::new()),
            SceneDocument::new("c", "c", "c.webp"),
        ];
        let mut entries: Vec<DirectoryEntry> = scenes.iter().map(DirectoryEntry::from_scene).collect();
        assert_eq!(annotate_entries(&mut entries, &scenes), 1);
        assert_eq!(
            entries[0].label,
            Some(EntryLabel {
                icon: LABEL_ICON,
                text: "3".into()
            })
        );
        assert_eq!(entries[1].label, None);
        assert_eq!(entries[2].label, None);
    }

    #[test]
    fn menu_entry_is_gm_only() {
        let entry = MenuEntry::scenery("Scenery".into());
        assert!(entry.visible_to(true));
        assert!(!entry.visible_to(false));
    }
}
