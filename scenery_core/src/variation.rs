use serde::{Deserialize, Serialize};

/// A named alternate background image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: String,
}

impl Variation {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Rows without a file are never persisted.
    pub fn has_file(&self) -> bool {
        !self.file.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.file.is_empty()
    }
}

/// Which row a role sees, plus the file that row held when it was saved.
///
/// `file` is a cached copy taken at commit time. It is not re-derived from
/// `index` afterwards, so later edits that shift positions leave the remembered
/// file intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "id", default)]
    pub index: usize,
    #[serde(default)]
    pub file: String,
}

impl Selection {
    pub fn new(index: usize, file: impl Into<String>) -> Self {
        Self {
            index,
            file: file.into(),
        }
    }
}

/// Persisted variation data for a single scene.
///
/// Serialized as `{ variations, bg, gm: {id, file}, pl: {id, file} }`.
/// A selection index is the position of the chosen row in the submitted form,
/// counted before rows without a file were dropped; 0 is the background. Use
/// the selection's `file`, not the index, to find the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationSet {
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(rename = "bg", default)]
    pub background: String,
    #[serde(rename = "gm", default)]
    pub gm_selection: Selection,
    #[serde(rename = "pl", default)]
    pub pl_selection: Selection,
}

impl VariationSet {
    /// Set used for a scene that has never been configured.
    pub fn with_background(background: impl Into<String>) -> Self {
        let background = background.into();
        Self {
            variations: Vec::new(),
            gm_selection: Selection::new(0, background.clone()),
            pl_selection: Selection::new(0, background.clone()),
            background,
        }
    }

    /// Returns the stored set, or defaults derived from the scene's current
    /// background when nothing was stored yet.
    ///
    /// Blank fields of a partially written set fall back to the scene
    /// background one by one.
    pub fn load(existing: Option<VariationSet>, scene_background: &str) -> VariationSet {
        let Some(mut set) = existing else {
            return VariationSet::with_background(scene_background);
        };
        if set.background.is_empty() {
            set.background = scene_background.to_string();
        }
        if set.gm_selection.file.is_empty() {
            set.gm_selection = Selection::new(0, scene_background);
        }
        if set.pl_selection.file.is_empty() {
            set.pl_selection = Selection::new(0, scene_background);
        }
        set
    }

    /// Parses a stored flag value. `None` and `null` both mean "no data".
    pub fn from_flag(value: Option<&serde_json::Value>) -> Result<Option<Self>, serde_json::Error> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => VariationSet::deserialize(value).map(Some),
        }
    }

    /// Flag value in the persisted layout. Mirrors the serde renames above, so
    /// [`VariationSet::from_flag`] reads it back unchanged.
    pub fn to_flag(&self) -> serde_json::Value {
        serde_json::json!({
            "variations": self.variations,
            "bg": self.background,
            "gm": { "id": self.gm_selection.index, "file": self.gm_selection.file },
            "pl": { "id": self.pl_selection.index, "file": self.pl_selection.file },
        })
    }

    /// Number of images the scene can show, counting the default background.
    pub fn image_count(&self) -> usize {
        self.variations.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_without_data_defaults_to_scene_background() {
        let set = VariationSet::load(None, "maps/tavern.webp");
        assert_eq!(set.background, "maps/tavern.webp");
        assert!(set.variations.is_empty());
        assert_eq!(set.gm_selection, Selection::new(0, "maps/tavern.webp"));
        assert_eq!(set.pl_selection, Selection::new(0, "maps/tavern.webp"));
    }

    #[test]
    fn load_returns_stored_set_unchanged() {
        let stored = VariationSet {
            variations: vec![Variation::new("Night", "b.webp")],
            background: "a.webp".into(),
            gm_selection: Selection::new(1, "b.webp"),
            pl_selection: Selection::new(0, "a.webp"),
        };
        let loaded = VariationSet::load(Some(stored.clone()), "ignored.webp");
        assert_eq!(loaded, stored);
    }

    #[test]
    fn partial_flag_falls_back_per_field() {
        let value = json!({ "variations": [{ "name": "Rain", "file": "r.webp" }] });
        let stored = VariationSet::from_flag(Some(&value)).unwrap();
        let loaded = VariationSet::load(stored, "scene.webp");
        assert_eq!(loaded.background, "scene.webp");
        assert_eq!(loaded.gm_selection.file, "scene.webp");
        assert_eq!(loaded.variations.len(), 1);
    }

    #[test]
    fn flag_layout_uses_short_keys() {
        let set = VariationSet {
            variations: vec![Variation::new("Night", "b.webp")],
            background: "a.webp".into(),
            gm_selection: Selection::new(1, "b.webp"),
            pl_selection: Selection::new(0, "a.webp"),
        };
        let value = set.to_flag();
        assert_eq!(
            value,
            json!({
                "variations": [{ "name": "Night", "file": "b.webp" }],
                "bg": "a.webp",
                "gm": { "id": 1, "file": "b.webp" },
                "pl": { "id": 0, "file": "a.webp" },
            })
        );
        assert_eq!(serde_json::to_value(&set).unwrap(), value);
        let parsed = VariationSet::from_flag(Some(&value)).unwrap();
        assert_eq!(parsed, Some(set));
    }

    #[test]
    fn null_flag_means_no_data() {
        assert_eq!(VariationSet::from_flag(Some(&serde_json::Value::Null)).unwrap(), None);
        assert_eq!(VariationSet::from_flag(None).unwrap(), None);
    }

    #[test]
    fn image_count_includes_background() {
        let set = VariationSet {
            variations: vec![Variation::new("Night", "b.webp")],
            background: "a.webp".into(),
            ..VariationSet::default()
        };
        assert_eq!(set.image_count(), 2);
        assert_eq!(VariationSet::default().image_count(), 1);
    }
}
